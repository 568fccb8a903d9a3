//! Obtaining the extraction tool's XML for a presentation.

use crate::document::ParsedDocument;
use crate::slides::extract_slides;
use ppt2video_core::{Error, Result, SlideRecord};
use std::path::{Path, PathBuf};
use std::process::Command;

/// How to run the Apache Tika extraction tool.
#[derive(Debug, Clone)]
pub struct TikaConfig {
    /// Java launcher.
    pub java: String,
    /// Directory holding the Tika jar.
    pub lib_dir: PathBuf,
    /// File name of the Tika application jar.
    pub tika_jar: String,
}

impl Default for TikaConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            lib_dir: PathBuf::from("lib"),
            tika_jar: "tika-app.jar".to_string(),
        }
    }
}

impl TikaConfig {
    /// Arguments passed to the launcher for `input`.
    pub fn args(&self, input: &Path) -> Vec<String> {
        vec![
            "-jar".to_string(),
            self.lib_dir.join(&self.tika_jar).display().to_string(),
            "-x".to_string(),
            input.display().to_string(),
        ]
    }
}

/// Get the XHTML for `input`.
///
/// Files with an `.xml` extension are taken to be pre-extracted output and
/// read directly; anything else is run through the extraction tool.
pub fn obtain_xml(input: &Path, config: &TikaConfig) -> Result<String> {
    if input.extension().and_then(|e| e.to_str()) == Some("xml") {
        log::debug!("Reading pre-extracted XML from {}", input.display());
        return Ok(std::fs::read_to_string(input)?);
    }

    let args = config.args(input);
    log::info!("{} {}", config.java, args.join(" "));

    let output = Command::new(&config.java)
        .args(&args)
        .output()
        .map_err(|e| Error::ExtractionError(format!("Failed to run {}: {}", config.java, e)))?;

    if !output.status.success() {
        return Err(Error::ExtractionError(format!(
            "{} exited with {}: {}",
            config.java,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| Error::ExtractionError(format!("Extraction output is not UTF-8: {}", e)))
}

/// A presentation run through extraction: the parsed document and its slides.
#[derive(Debug, Clone)]
pub struct ExtractedPresentation {
    pub document: ParsedDocument,
    pub slides: Vec<SlideRecord>,
}

/// Obtain, parse and extract a presentation in one step.
pub fn extract(input: &Path, config: &TikaConfig) -> Result<ExtractedPresentation> {
    let xml = obtain_xml(input, config)?;
    let document = ParsedDocument::parse(&xml)?;
    let slides = extract_slides(&document);
    Ok(ExtractedPresentation { document, slides })
}

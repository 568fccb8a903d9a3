//! Contract with the external conversion engine.
//!
//! The engine does the actual video and audio work. This crate only drives
//! it: one document session (`init`), one archive-writer session
//! (`archive`), and any number of `process` calls in between.

use ppt2video_core::{Error, Result, Section, Topic};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Archive-writer session control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveControl {
    /// Open the archive for incremental writes.
    Start,
    /// Persist everything written so far.
    Flush,
}

impl ArchiveControl {
    fn as_arg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Flush => "flush",
        }
    }
}

/// What a `process` call should produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Only write the import manifest.
    pub import_json_only: bool,
    /// Only render the video of `target_topic`.
    pub video_only: bool,
    pub target_topic: Option<Topic>,
}

impl ProcessOptions {
    /// Manifest (import JSON) generation.
    pub fn import_json_only() -> Self {
        Self {
            import_json_only: true,
            ..Self::default()
        }
    }

    /// Video generation for a single topic.
    pub fn video_only(topic: Topic) -> Self {
        Self {
            video_only: true,
            target_topic: Some(topic),
            ..Self::default()
        }
    }
}

/// The operations the orchestrator needs from a conversion engine.
#[allow(async_fn_in_trait)]
pub trait ConversionEngine {
    /// Prepare a document session and report its sections.
    async fn init(&mut self) -> Result<Vec<Section>>;

    /// Control the archive-writer session.
    async fn archive(&mut self, control: ArchiveControl) -> Result<()>;

    /// Generate artifacts.
    async fn process(&mut self, options: ProcessOptions) -> Result<()>;
}

/// Adapter over an engine shipped as a separate program.
///
/// Every call runs the program once:
///
/// ```text
/// <program> init <document>                           # prints sections as JSON
/// <program> archive start|flush <document>
/// <program> process --import-json-only <document>
/// <program> process --video-only --topic <name> <document>
/// ```
///
/// Leading arguments set with [`CommandEngine::with_args`] go right after
/// `<program>`, e.g. the script for an interpreter.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    program_args: Vec<String>,
    document: PathBuf,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>, document: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            program_args: Vec::new(),
            document: document.into(),
        }
    }

    /// Arguments passed before every subcommand.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The document this engine session works on.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Arguments for a `process` call.
    fn process_args(options: &ProcessOptions) -> Vec<String> {
        let mut args = vec!["process".to_string()];
        if options.import_json_only {
            args.push("--import-json-only".to_string());
        }
        if options.video_only {
            args.push("--video-only".to_string());
        }
        if let Some(topic) = &options.target_topic {
            args.push("--topic".to_string());
            args.push(topic.name.clone());
        }
        args
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        log::debug!(
            "{} {} {} {}",
            self.program.display(),
            self.program_args.join(" "),
            args.join(" "),
            self.document.display()
        );

        let output = Command::new(&self.program)
            .args(&self.program_args)
            .args(args)
            .arg(&self.document)
            .output()
            .await
            .map_err(|e| {
                Error::Engine(format!("Failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::Engine(format!(
                "{} {} exited with {}: {}",
                self.program.display(),
                args.first().map(String::as_str).unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl ConversionEngine for CommandEngine {
    async fn init(&mut self) -> Result<Vec<Section>> {
        let stdout = self.run(&["init".to_string()]).await?;
        serde_json::from_slice(&stdout)
            .map_err(|e| Error::Engine(format!("Invalid section list from engine: {}", e)))
    }

    async fn archive(&mut self, control: ArchiveControl) -> Result<()> {
        self.run(&["archive".to_string(), control.as_arg().to_string()])
            .await
            .map(|_| ())
    }

    async fn process(&mut self, options: ProcessOptions) -> Result<()> {
        self.run(&Self::process_args(&options)).await.map(|_| ())
    }
}

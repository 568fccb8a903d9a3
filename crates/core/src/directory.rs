//! Listing presentation files in a user-chosen directory.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Matches the presentation extension exactly as `pptx` or `PPTX`.
static PPTX_EXACT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(pptx|PPTX)$").unwrap());

/// Matches the presentation extension in any letter case.
static PPTX_ANY_CASE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pptx$").unwrap());

/// How file extensions are compared when listing presentations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtensionMatch {
    /// Only all-lowercase or all-uppercase extensions.
    #[default]
    Exact,
    /// Any letter case (`.Pptx` included).
    IgnoreCase,
}

impl ExtensionMatch {
    /// Check whether a file name has a presentation extension.
    pub fn matches(self, filename: &str) -> bool {
        match self {
            Self::Exact => PPTX_EXACT_REGEX.is_match(filename),
            Self::IgnoreCase => PPTX_ANY_CASE_REGEX.is_match(filename),
        }
    }
}

/// List the presentation files in `dir`, sorted by name.
///
/// Failure to read the directory is reported as
/// [`Error::DirectoryAccess`] so it can be shown to the user directly.
pub fn list_presentations(dir: &Path, matching: ExtensionMatch) -> Result<Vec<String>> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| Error::DirectoryAccess(format!("{}: {}", dir.display(), e)))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::DirectoryAccess(e.to_string()))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if matching.matches(&name) {
            names.push(name);
        }
    }

    names.sort();
    log::debug!("Found {} presentation(s) in {}", names.len(), dir.display());
    Ok(names)
}

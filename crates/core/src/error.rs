//! Error types for presentation-to-video conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting slides or generating topic videos.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The extraction tool output could not be parsed.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The extraction tool could not be run or reported a failure.
    #[error("Text extraction error: {0}")]
    ExtractionError(String),

    /// The presentation directory could not be opened or enumerated.
    ///
    /// The message is meant to be shown to the user as-is.
    #[error("Could not open the directory.\n{0}")]
    DirectoryAccess(String),

    /// A call into the conversion engine failed.
    #[error("{0}")]
    Engine(String),

    /// The archive could not be written out.
    #[error("Failed to save the archive.\n{0}")]
    Finalize(String),

    /// A presentation name that is not in the open directory's listing.
    #[error("{0} is not a presentation in the open directory")]
    UnknownPresentation(String),

    /// A topic index past the end of the topic list.
    #[error("Topic index {index} out of range ({len} topics)")]
    TopicIndex { index: usize, len: usize },

    /// An operation was requested in a state that does not allow it.
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: String, state: String },

    /// The run was cancelled before it finished.
    #[error("Conversion cancelled")]
    Cancelled,

    /// Invalid configuration (property map file and the like).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidTransition`].
    pub fn invalid_transition(action: impl Into<String>, state: impl std::fmt::Debug) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            state: format!("{:?}", state),
        }
    }
}

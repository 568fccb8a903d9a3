//! Domain types for slides and conversion topics.

use serde::{Deserialize, Serialize};

/// One slide as produced by the extraction tool: its visible text and the
/// speaker notes that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Text lines of the slide body, in document order.
    pub content: Vec<String>,

    /// Speaker note lines, in document order.
    pub note: Vec<String>,
}

impl SlideRecord {
    /// Create a slide record from its content and note lines.
    pub fn new(content: Vec<String>, note: Vec<String>) -> Self {
        Self { content, note }
    }

    /// True when neither content nor notes carry any text.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.note.is_empty()
    }
}

/// Lifecycle of a single topic during a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicState {
    /// Not yet attempted.
    #[default]
    Init,
    /// Video generation in progress.
    Running,
    /// Video generated.
    Success,
    /// Generation failed, or the run was aborted while this topic was running.
    Error,
}

/// A unit of per-item video generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(default)]
    pub state: TopicState,
}

impl Topic {
    /// Create a topic in the [`TopicState::Init`] state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: TopicState::Init,
        }
    }
}

/// A group of topics as reported by the conversion engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Section {
    /// Create a section from topic names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: names.into_iter().map(Topic::new).collect(),
        }
    }

    /// The topic that gets converted for this section.
    ///
    /// Only the first topic of a section is ever converted.
    pub fn lead_topic(&self) -> Option<&Topic> {
        self.topics.first()
    }
}

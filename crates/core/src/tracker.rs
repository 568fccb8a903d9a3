//! Per-topic progress tracking with an animated text rendering.
//!
//! The tracker holds the lifecycle state of every topic in a conversion run
//! and renders it as one display line per topic. Running topics get a
//! spinner glyph that advances each time a snapshot is taken.

use crate::error::{Error, Result};
use crate::types::{Section, Topic, TopicState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Braille spinner frames used for running topics.
pub const SPINNER_GLYPHS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Tracker shared between the orchestrator (the only writer) and display pollers.
pub type SharedTracker = Arc<Mutex<TopicTracker>>;

/// Lock a shared tracker.
///
/// A poisoned lock still holds a consistent tracker (every mutation is a
/// plain field store), so the guard is recovered instead of propagating the panic.
pub fn lock(tracker: &SharedTracker) -> MutexGuard<'_, TopicTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How spinner frames advance across snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimationMode {
    /// Each running topic advances its own frame when it is rendered.
    #[default]
    PerTopic,
    /// One cursor for the whole list, advanced for every rendered topic
    /// whatever its state. Matches the legacy display frame for frame.
    Shared,
}

/// Prefixes used when rendering topic lines.
#[derive(Debug, Clone)]
pub struct DisplayStyle {
    /// Spinner frames for running topics.
    pub palette: Vec<String>,
    /// Prefix for topics that finished.
    pub success_marker: String,
    /// Prefix for topics that failed or were aborted.
    pub error_marker: String,
    pub animation: AnimationMode,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            palette: SPINNER_GLYPHS.iter().map(|g| g.to_string()).collect(),
            success_marker: "✓ ".to_string(),
            error_marker: "error!! ".to_string(),
            animation: AnimationMode::default(),
        }
    }
}

impl DisplayStyle {
    /// Set the animation mode.
    pub fn with_animation(mut self, animation: AnimationMode) -> Self {
        self.animation = animation;
        self
    }
}

/// Lifecycle state of every topic in a run, plus animation cursors.
#[derive(Debug, Clone, Default)]
pub struct TopicTracker {
    topics: Vec<Topic>,
    /// Per-topic spinner frame, used in [`AnimationMode::PerTopic`].
    frames: Vec<usize>,
    /// Global spinner cursor, used in [`AnimationMode::Shared`].
    cursor: usize,
    style: DisplayStyle,
}

impl TopicTracker {
    /// Create a tracker over the given topic names, all in `Init`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics: Vec<Topic> = names.into_iter().map(Topic::new).collect();
        Self {
            frames: vec![0; topics.len()],
            topics,
            cursor: 0,
            style: DisplayStyle::default(),
        }
    }

    /// Build the topic list from the lead topic of each section.
    pub fn from_sections(sections: &[Section]) -> Self {
        let mut tracker = Self::default();
        tracker.rebuild(sections);
        tracker
    }

    /// Use a custom display style.
    pub fn with_style(mut self, style: DisplayStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the topic list from section data, resetting every topic to
    /// `Init` and clearing the animation state. The display style is kept.
    pub fn rebuild(&mut self, sections: &[Section]) {
        self.topics.clear();
        for (idx, section) in sections.iter().enumerate() {
            match section.lead_topic() {
                Some(topic) => self.topics.push(Topic::new(topic.name.clone())),
                None => log::warn!("Section {} has no topics, skipping", idx),
            }
        }
        self.frames = vec![0; self.topics.len()];
        self.cursor = 0;
    }

    /// Number of tracked topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Tracked topics in order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Current state of every topic, in order.
    pub fn states(&self) -> Vec<TopicState> {
        self.topics.iter().map(|t| t.state).collect()
    }

    /// Set the state of the topic at `index`.
    pub fn set_state(&mut self, index: usize, state: TopicState) -> Result<()> {
        let len = self.topics.len();
        let topic = self
            .topics
            .get_mut(index)
            .ok_or(Error::TopicIndex { index, len })?;
        log::debug!("Topic {} '{}': {:?} -> {:?}", index, topic.name, topic.state, state);
        topic.state = state;
        Ok(())
    }

    /// Bulk-abort: move every running topic to `Error`.
    ///
    /// Topics in any other state are left alone. Returns how many topics
    /// were aborted.
    pub fn abort_running(&mut self) -> usize {
        let mut aborted = 0;
        for topic in self.topics.iter_mut().filter(|t| t.state == TopicState::Running) {
            topic.state = TopicState::Error;
            aborted += 1;
        }
        if aborted > 0 {
            log::debug!("Aborted {} running topic(s)", aborted);
        }
        aborted
    }

    /// Render one display line per topic.
    ///
    /// Topic states are not touched; only the spinner cursors advance.
    pub fn snapshot(&mut self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.topics.len());

        for (idx, topic) in self.topics.iter().enumerate() {
            let prefix = match topic.state {
                TopicState::Init => String::new(),
                TopicState::Running => {
                    let frame = match self.style.animation {
                        AnimationMode::Shared => self.cursor,
                        AnimationMode::PerTopic => {
                            let frame = self.frames[idx];
                            self.frames[idx] = frame.wrapping_add(1);
                            frame
                        }
                    };
                    format!("{} ", glyph(&self.style.palette, frame))
                }
                TopicState::Success => self.style.success_marker.clone(),
                TopicState::Error => self.style.error_marker.clone(),
            };

            if self.style.animation == AnimationMode::Shared {
                self.cursor += 1;
                if self.cursor >= self.style.palette.len() {
                    self.cursor = 0;
                }
            }

            lines.push(format!("{}{}", prefix, topic.name));
        }

        lines
    }
}

fn glyph(palette: &[String], frame: usize) -> &str {
    if palette.is_empty() {
        return "";
    }
    &palette[frame % palette.len()]
}

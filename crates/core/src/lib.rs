//! Core domain types, topic progress tracking, and workflow steps
//! for presentation-to-video conversion.

pub mod directory;
pub mod error;
pub mod tracker;
pub mod types;
pub mod workflow;

pub use directory::{list_presentations, ExtensionMatch};
pub use error::{Error, Result};
pub use tracker::{AnimationMode, DisplayStyle, SharedTracker, TopicTracker};
pub use types::{Section, SlideRecord, Topic, TopicState};
pub use workflow::{Step, StepEvent, Workflow};

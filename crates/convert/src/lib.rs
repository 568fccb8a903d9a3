//! Sequential per-topic video generation driving an external conversion engine.
//!
//! Topics are generated one at a time, in order, with fail-fast semantics.
//! Progress is tracked in a shared [`ppt2video_core::TopicTracker`] that a
//! display poller renders at a fixed cadence.

pub mod engine;
pub mod orchestrator;
pub mod poller;
pub mod session;

pub use engine::{ArchiveControl, CommandEngine, ConversionEngine, ProcessOptions};
pub use orchestrator::{Orchestrator, Phase};
pub use poller::{spawn_poller, DisplaySink, DEFAULT_REFRESH};
pub use session::Session;

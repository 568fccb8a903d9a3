//! The user-facing conversion workflow as an explicit state machine.
//!
//! Rendering is left to whoever drives the workflow; this module only knows
//! which step is current and which events may move it.

use crate::error::{Error, Result};

/// A step of the conversion workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    /// Waiting for the user to pick a directory.
    #[default]
    SelectDirectory,
    /// Directory open; waiting for a presentation to be picked.
    SelectDocument,
    /// Presentation open; topic list shown, waiting for start or cancel.
    ReviewTopics,
    /// Topic videos being generated.
    Generating,
    /// All topics generated; waiting for the archive to be saved.
    Review,
    /// Archive being written.
    Save,
}

/// Events that move the workflow between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    DirectoryOpened,
    DirectoryFailed,
    Reload,
    DocumentOpened,
    DocumentFailed,
    Start,
    Cancel,
    RunSucceeded,
    RunFailed,
    Save,
    Saved,
    SaveFailed,
}

/// Tracks the current workflow step.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    step: Step,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Apply an event, returning the new step.
    ///
    /// Events that are not valid for the current step leave it unchanged
    /// and return [`Error::InvalidTransition`].
    pub fn apply(&mut self, event: StepEvent) -> Result<Step> {
        let next = match (self.step, event) {
            (Step::SelectDirectory, StepEvent::DirectoryOpened) => Step::SelectDocument,
            (Step::SelectDirectory, StepEvent::DirectoryFailed) => Step::SelectDirectory,
            (Step::SelectDocument, StepEvent::Reload) => Step::SelectDocument,
            (Step::SelectDocument, StepEvent::DocumentOpened) => Step::ReviewTopics,
            (Step::SelectDocument, StepEvent::DocumentFailed) => Step::SelectDocument,
            (Step::ReviewTopics, StepEvent::Start) => Step::Generating,
            (Step::ReviewTopics, StepEvent::Cancel) => Step::SelectDocument,
            (Step::Generating, StepEvent::RunSucceeded) => Step::Review,
            (Step::Generating, StepEvent::RunFailed) => Step::ReviewTopics,
            (Step::Review, StepEvent::Save) => Step::Save,
            (Step::Save, StepEvent::Saved) => Step::SelectDocument,
            (Step::Save, StepEvent::SaveFailed) => Step::Review,
            (step, event) => {
                return Err(Error::invalid_transition(format!("{:?}", event), step));
            }
        };

        log::debug!("Workflow: {:?} --{:?}--> {:?}", self.step, event, next);
        self.step = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut workflow = Workflow::new();
        assert_eq!(workflow.step(), Step::SelectDirectory);

        let events = [
            (StepEvent::DirectoryOpened, Step::SelectDocument),
            (StepEvent::DocumentOpened, Step::ReviewTopics),
            (StepEvent::Start, Step::Generating),
            (StepEvent::RunSucceeded, Step::Review),
            (StepEvent::Save, Step::Save),
            (StepEvent::Saved, Step::SelectDocument),
        ];
        for (event, expected) in events {
            assert_eq!(workflow.apply(event).unwrap(), expected);
        }
    }

    #[test]
    fn test_failed_run_returns_to_review_topics() {
        let mut workflow = Workflow::new();
        workflow.apply(StepEvent::DirectoryOpened).unwrap();
        workflow.apply(StepEvent::DocumentOpened).unwrap();
        workflow.apply(StepEvent::Start).unwrap();

        assert_eq!(workflow.apply(StepEvent::RunFailed).unwrap(), Step::ReviewTopics);
        assert_eq!(workflow.apply(StepEvent::Cancel).unwrap(), Step::SelectDocument);
    }

    #[test]
    fn test_failed_save_allows_retry() {
        let mut workflow = Workflow { step: Step::Save };
        assert_eq!(workflow.apply(StepEvent::SaveFailed).unwrap(), Step::Review);
        assert_eq!(workflow.apply(StepEvent::Save).unwrap(), Step::Save);
    }

    #[test]
    fn test_invalid_event_keeps_step() {
        let mut workflow = Workflow::new();
        let err = workflow.apply(StepEvent::Start).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(workflow.step(), Step::SelectDirectory);
    }
}

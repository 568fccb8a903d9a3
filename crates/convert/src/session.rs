//! Conversion session: the context object for one user working through the
//! workflow, from picking a directory to saving the archive.

use crate::engine::ConversionEngine;
use crate::orchestrator::{Orchestrator, Phase};
use crate::poller::DisplaySink;
use ppt2video_core::{
    list_presentations, DisplayStyle, Error, ExtensionMatch, Result, Step, StepEvent, Workflow,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory, document and orchestrator state for one conversion workflow.
///
/// The document session (orchestrator) is created when a presentation is
/// opened and torn down on cancel or after the archive is saved.
pub struct Session<E> {
    workflow: Workflow,
    matching: ExtensionMatch,
    style: DisplayStyle,
    directory: Option<PathBuf>,
    presentations: Vec<String>,
    document: Option<PathBuf>,
    orchestrator: Option<Orchestrator<E>>,
}

impl<E: ConversionEngine> Session<E> {
    pub fn new(matching: ExtensionMatch) -> Self {
        Self {
            workflow: Workflow::new(),
            matching,
            style: DisplayStyle::default(),
            directory: None,
            presentations: Vec::new(),
            document: None,
            orchestrator: None,
        }
    }

    /// Use a custom display style for topic lists.
    pub fn with_style(mut self, style: DisplayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn step(&self) -> Step {
        self.workflow.step()
    }

    /// Presentations found in the open directory.
    pub fn presentations(&self) -> &[String] {
        &self.presentations
    }

    /// Path of the open presentation, if any.
    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// The active document session, if any.
    pub fn orchestrator(&self) -> Option<&Orchestrator<E>> {
        self.orchestrator.as_ref()
    }

    /// Open a directory and list its presentations.
    pub fn open_directory(&mut self, dir: &Path) -> Result<&[String]> {
        if self.workflow.step() != Step::SelectDirectory {
            return Err(Error::invalid_transition("open a directory", self.workflow.step()));
        }

        match list_presentations(dir, self.matching) {
            Ok(names) => {
                self.directory = Some(dir.to_path_buf());
                self.presentations = names;
                self.workflow.apply(StepEvent::DirectoryOpened)?;
                Ok(&self.presentations)
            }
            Err(e) => {
                self.workflow.apply(StepEvent::DirectoryFailed)?;
                Err(e)
            }
        }
    }

    /// List the open directory again.
    pub fn reload(&mut self) -> Result<&[String]> {
        let dir = self.current_directory()?.to_path_buf();
        self.workflow.apply(StepEvent::Reload)?;
        self.presentations = list_presentations(&dir, self.matching)?;
        Ok(&self.presentations)
    }

    /// Open a presentation from the directory listing.
    ///
    /// `make_engine` builds the engine session for the presentation's path.
    /// Returns the rendered topic list.
    pub async fn open_document<F>(&mut self, name: &str, make_engine: F) -> Result<Vec<String>>
    where
        F: FnOnce(&Path) -> E,
    {
        if self.workflow.step() != Step::SelectDocument {
            return Err(Error::invalid_transition("open a presentation", self.workflow.step()));
        }
        if !self.presentations.iter().any(|p| p == name) {
            self.workflow.apply(StepEvent::DocumentFailed)?;
            return Err(Error::UnknownPresentation(name.to_string()));
        }

        let path = self.current_directory()?.join(name);
        let engine = make_engine(&path);
        match Orchestrator::open_with_style(engine, self.style.clone()).await {
            Ok(orchestrator) => {
                let lines = orchestrator.snapshot();
                self.document = Some(path);
                self.orchestrator = Some(orchestrator);
                self.workflow.apply(StepEvent::DocumentOpened)?;
                Ok(lines)
            }
            Err(e) => {
                self.workflow.apply(StepEvent::DocumentFailed)?;
                Err(e)
            }
        }
    }

    /// Generate the manifest and every topic video, rendering progress into
    /// `sink` every `period`.
    ///
    /// After a failed run the document session is re-opened first, which
    /// resets every topic.
    pub async fn generate(&mut self, period: Duration, sink: DisplaySink) -> Result<()> {
        let step = self.workflow.step();
        if step != Step::ReviewTopics {
            return Err(Error::invalid_transition("start generating", step));
        }
        let orchestrator = self
            .orchestrator
            .as_mut()
            .ok_or_else(|| Error::invalid_transition("start generating", step))?;

        if orchestrator.phase() == Phase::Aborted {
            orchestrator.restart().await?;
        }

        self.workflow.apply(StepEvent::Start)?;
        let result = match orchestrator.start().await {
            Ok(()) => orchestrator.run_all_with_display(period, sink).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.workflow.apply(StepEvent::RunSucceeded)?;
                Ok(())
            }
            Err(e) => {
                self.workflow.apply(StepEvent::RunFailed)?;
                Err(e)
            }
        }
    }

    /// Drop the open presentation and go back to the directory listing.
    pub fn cancel(&mut self) -> Result<()> {
        self.workflow.apply(StepEvent::Cancel)?;
        self.teardown();
        self.refresh_listing();
        Ok(())
    }

    /// Save the archive.
    ///
    /// On success the document session is torn down and the directory is
    /// listed again. On failure the generated topics are kept so saving can
    /// be retried.
    pub async fn save(&mut self) -> Result<()> {
        let step = self.workflow.step();
        let orchestrator = self
            .orchestrator
            .as_mut()
            .ok_or_else(|| Error::invalid_transition("save the archive", step))?;
        self.workflow.apply(StepEvent::Save)?;

        match orchestrator.finalize().await {
            Ok(()) => {
                self.workflow.apply(StepEvent::Saved)?;
                self.teardown();
                self.refresh_listing();
                Ok(())
            }
            Err(e) => {
                self.workflow.apply(StepEvent::SaveFailed)?;
                Err(e)
            }
        }
    }

    /// Render the current topic list (empty with no open presentation).
    pub fn topic_lines(&self) -> Vec<String> {
        self.orchestrator
            .as_ref()
            .map(Orchestrator::snapshot)
            .unwrap_or_default()
    }

    fn current_directory(&self) -> Result<&Path> {
        self.directory
            .as_deref()
            .ok_or_else(|| Error::invalid_transition("use the directory", self.workflow.step()))
    }

    fn teardown(&mut self) {
        if let Some(orchestrator) = self.orchestrator.take() {
            drop(orchestrator.cancel());
        }
        self.document = None;
    }

    fn refresh_listing(&mut self) {
        let Some(dir) = self.directory.clone() else {
            return;
        };
        match list_presentations(&dir, self.matching) {
            Ok(names) => self.presentations = names,
            Err(e) => log::warn!("Could not list {} again: {}", dir.display(), e),
        }
    }
}

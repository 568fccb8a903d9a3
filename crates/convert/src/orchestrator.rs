//! Sequential per-topic video generation.
//!
//! The orchestrator owns one engine session. It opens the archive, writes
//! the import manifest, then generates topic videos strictly in order,
//! stopping at the first failure. Progress goes into a [`SharedTracker`]
//! that display pollers may read at any time.

use crate::engine::{ArchiveControl, ConversionEngine, ProcessOptions};
use crate::poller::{spawn_poller, DisplaySink};
use ppt2video_core::tracker::{self, SharedTracker};
use ppt2video_core::{DisplayStyle, Error, Result, Section, Topic, TopicState, TopicTracker};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Where the orchestrator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Document session ready, topic list built.
    Opened,
    /// Archive open and manifest written; topics may be generated.
    Started,
    /// Every topic generated; the archive may be finalized.
    Completed,
    /// Start or a topic failed. Needs [`Orchestrator::restart`].
    Aborted,
}

/// Drives one conversion engine session through a whole run.
pub struct Orchestrator<E> {
    engine: E,
    sections: Vec<Section>,
    /// Lead topic of each non-empty section, index-aligned with the tracker.
    targets: Vec<Topic>,
    tracker: SharedTracker,
    phase: Phase,
    cancel: CancellationToken,
}

impl<E: ConversionEngine> Orchestrator<E> {
    /// Open a document session with the default display style.
    pub async fn open(engine: E) -> Result<Self> {
        Self::open_with_style(engine, DisplayStyle::default()).await
    }

    /// Open a document session and build the topic list from its sections.
    pub async fn open_with_style(mut engine: E, style: DisplayStyle) -> Result<Self> {
        let sections = engine.init().await?;
        let targets = lead_topics(&sections);
        let tracker = TopicTracker::from_sections(&sections).with_style(style);
        log::info!(
            "Opened document: {} sections, {} topics",
            sections.len(),
            targets.len()
        );

        Ok(Self {
            engine,
            sections,
            targets,
            tracker: Arc::new(Mutex::new(tracker)),
            phase: Phase::Opened,
            cancel: CancellationToken::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sections reported by the engine.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Topics that get converted, in order.
    pub fn topics(&self) -> &[Topic] {
        &self.targets
    }

    /// Shared handle to the progress tracker.
    pub fn tracker(&self) -> SharedTracker {
        self.tracker.clone()
    }

    /// Token that stops a run before its next topic when cancelled.
    ///
    /// A topic already being generated is not interrupted.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current topic states.
    pub fn states(&self) -> Vec<TopicState> {
        tracker::lock(&self.tracker).states()
    }

    /// Render the topic list.
    pub fn snapshot(&self) -> Vec<String> {
        tracker::lock(&self.tracker).snapshot()
    }

    /// Open the archive and write the import manifest.
    ///
    /// Must be called once before [`run_all`](Self::run_all). A failure
    /// aborts the session.
    pub async fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Opened {
            return Err(Error::invalid_transition("start", self.phase));
        }

        let result = self.open_archive().await;
        if result.is_err() {
            self.phase = Phase::Aborted;
        } else {
            self.phase = Phase::Started;
        }
        result
    }

    async fn open_archive(&mut self) -> Result<()> {
        log::info!("Opening archive");
        self.engine.archive(ArchiveControl::Start).await?;
        log::info!("Writing import manifest");
        self.engine.process(ProcessOptions::import_json_only()).await
    }

    /// Generate every topic's video in order.
    ///
    /// Stops at the first failure: the running topic becomes `Error`, later
    /// topics are never attempted, and the engine error is returned.
    pub async fn run_all(&mut self) -> Result<()> {
        if self.phase != Phase::Started {
            return Err(Error::invalid_transition("generate topics", self.phase));
        }

        let total = self.targets.len();
        for index in 0..total {
            if self.cancel.is_cancelled() {
                log::info!("Run cancelled before topic {}", index);
                self.abort();
                return Err(Error::Cancelled);
            }

            let topic = self.targets[index].clone();
            tracker::lock(&self.tracker).set_state(index, TopicState::Running)?;
            log::info!("Generating topic {}/{}: {}", index + 1, total, topic.name);

            if let Err(e) = self.engine.process(ProcessOptions::video_only(topic)).await {
                log::warn!("Topic {} failed: {}", index, e);
                self.abort();
                return Err(e);
            }

            tracker::lock(&self.tracker).set_state(index, TopicState::Success)?;
        }

        log::info!("All {} topics generated", total);
        self.phase = Phase::Completed;
        Ok(())
    }

    /// [`run_all`](Self::run_all) with a display poller feeding `sink`
    /// every `period`.
    ///
    /// Once the run settles the poller is stopped, a bulk-abort pass is
    /// applied, and one final snapshot goes to `sink`.
    pub async fn run_all_with_display(&mut self, period: Duration, sink: DisplaySink) -> Result<()> {
        let stop = CancellationToken::new();
        let poller = spawn_poller(self.tracker.clone(), period, sink.clone(), stop.clone());

        let result = self.run_all().await;

        stop.cancel();
        if let Err(e) = poller.await {
            log::warn!("Display poller ended abnormally: {}", e);
        }

        let lines = {
            let mut tracker = tracker::lock(&self.tracker);
            tracker.abort_running();
            tracker.snapshot()
        };
        sink(lines);

        result
    }

    /// Re-open the document session after an aborted run.
    ///
    /// The topic list is rebuilt from fresh section data, so every topic
    /// starts over at `Init`.
    pub async fn restart(&mut self) -> Result<()> {
        if self.phase != Phase::Aborted {
            return Err(Error::invalid_transition("restart", self.phase));
        }

        let sections = self.engine.init().await?;
        self.targets = lead_topics(&sections);
        tracker::lock(&self.tracker).rebuild(&sections);
        self.sections = sections;
        self.cancel = CancellationToken::new();
        self.phase = Phase::Opened;
        log::info!("Restarted document session: {} topics", self.targets.len());
        Ok(())
    }

    /// Flush the archive.
    ///
    /// Only valid after a successful run. May be called again after a
    /// failure or a success; the topic list is kept either way.
    pub async fn finalize(&mut self) -> Result<()> {
        if self.phase != Phase::Completed {
            return Err(Error::invalid_transition("save the archive", self.phase));
        }

        log::info!("Flushing archive");
        self.engine
            .archive(ArchiveControl::Flush)
            .await
            .map_err(|e| Error::Finalize(e.to_string()))
    }

    /// Abandon the session, handing the engine back.
    ///
    /// Nothing the engine already wrote is cleaned up here.
    pub fn cancel(self) -> E {
        log::info!("Conversion session cancelled in phase {:?}", self.phase);
        self.cancel.cancel();
        self.engine
    }

    fn abort(&mut self) {
        tracker::lock(&self.tracker).abort_running();
        self.phase = Phase::Aborted;
    }
}

fn lead_topics(sections: &[Section]) -> Vec<Topic> {
    sections
        .iter()
        .filter_map(Section::lead_topic)
        .map(|topic| Topic::new(topic.name.clone()))
        .collect()
}

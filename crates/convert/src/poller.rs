//! Periodic display refresh of the topic list.

use ppt2video_core::tracker::{self, SharedTracker};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Default display refresh period.
pub const DEFAULT_REFRESH: Duration = Duration::from_millis(100);

/// Receives rendered topic lines.
pub type DisplaySink = Arc<dyn Fn(Vec<String>) + Send + Sync>;

/// Spawn a task that pushes a tracker snapshot into `sink` every `period`
/// until `cancel` fires.
///
/// The poller only renders; it never changes topic states. The first
/// snapshot is taken one period after spawning.
pub fn spawn_poller(
    tracker: SharedTracker,
    period: Duration,
    sink: DisplaySink,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::debug!("Display poller started ({:?})", period);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let lines = tracker::lock(&tracker).snapshot();
                    sink(lines);
                }
            }
        }

        log::debug!("Display poller stopped");
    })
}

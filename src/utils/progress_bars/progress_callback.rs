// src/utils/progress_bars/progress_callback.rs - Progress reporting owned by the caller

use indicatif::ProgressBar;
use log::{debug, info};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Progress callback invoked as `(current, total, message)`.
/// `total` is the number of representatives left to enrich when the run started.
pub type ProgressCallback = Arc<dyn Fn(usize, usize, String) + Send + Sync>;

/// One progress report, as delivered through [`progress_channel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Wraps an optional callback so a misbehaving observer can never abort processing.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self { callback }
    }

    pub fn disabled() -> Self {
        Self { callback: None }
    }

    pub fn report(&self, current: usize, total: usize, message: impl Into<String>) {
        let Some(cb) = &self.callback else {
            return;
        };
        let message = message.into();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| cb(current, total, message)));
        if outcome.is_err() {
            debug!("Progress callback panicked at {}/{}; ignoring", current, total);
        }
    }
}

/// Builds a callback that forwards reports into a bounded channel.
/// Sending never blocks: updates are dropped while the receiver lags behind.
pub fn progress_channel(capacity: usize) -> (ProgressCallback, mpsc::Receiver<ProgressUpdate>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let callback: ProgressCallback = Arc::new(move |current, total, message| {
        if tx
            .try_send(ProgressUpdate {
                current,
                total,
                message,
            })
            .is_err()
        {
            debug!("Progress channel full or closed, dropping update {}/{}", current, total);
        }
    });
    (callback, rx)
}

/// Percentage for display, clamped below 100 until the run reports completion.
pub fn percent_complete(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((current as f64 / total as f64) * 100.0).clamp(0.0, 99.0) as u8
}

/// Drains progress updates into a terminal bar, or into the log when no bar
/// is shown. Finishes once every sender is dropped and returns the number of
/// updates received.
pub fn spawn_progress_listener(
    mut rx: mpsc::Receiver<ProgressUpdate>,
    bar: Option<ProgressBar>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut received = 0;
        while let Some(update) = rx.recv().await {
            received += 1;
            match &bar {
                Some(pb) => {
                    pb.set_length(update.total as u64);
                    pb.set_position(update.current as u64);
                    pb.set_message(update.message);
                }
                None => info!(
                    "Progress {}% ({}/{}): {}",
                    percent_complete(update.current, update.total),
                    update.current,
                    update.total,
                    update.message
                ),
            }
        }
        if let Some(pb) = &bar {
            pb.finish();
        }
        received
    })
}

//! Cosmetic upload progress
//!
//! There is no real progress channel from the video service, so a background
//! task advances a percentage by a random step on a fixed interval. The task
//! never decides when the upload is done; it only stops when told to, or
//! when it reaches 100.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Coarse upload state shown next to the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadPhase {
    /// No submission in flight
    Idle,
    /// Submission in flight, simulated progress below 100
    Uploading,
    /// Submission in flight, simulated progress at 100
    Processing,
}

impl UploadPhase {
    pub fn from_progress(in_flight: bool, percent: u8) -> Self {
        match (in_flight, percent) {
            (false, _) => Self::Idle,
            (true, p) if p >= 100 => Self::Processing,
            (true, _) => Self::Uploading,
        }
    }
}

/// Spawns progress simulation tasks
#[derive(Debug, Clone, Copy)]
pub struct ProgressSimulator {
    tick: Duration,
    max_step: f64,
}

impl ProgressSimulator {
    pub fn new(tick: Duration, max_step: f64) -> Self {
        Self {
            tick: tick.max(Duration::from_millis(1)),
            max_step: if max_step.is_finite() {
                max_step.max(0.0)
            } else {
                0.0
            },
        }
    }

    /// Start advancing `sink` from its current value
    ///
    /// Published values are whole percentages, never decrease and never
    /// exceed 100. Must be called from within a tokio runtime.
    pub fn start<R>(&self, mut rng: R, sink: Arc<watch::Sender<u8>>) -> ProgressHandle
    where
        R: Rng + Send + 'static,
    {
        let tick = self.tick;
        let max_step = self.max_step;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // First tick completes immediately
            interval.tick().await;

            let mut progress = f64::from(*sink.borrow());
            while progress < 100.0 {
                interval.tick().await;

                let step = if max_step > 0.0 {
                    rng.gen_range(0.0..max_step)
                } else {
                    0.0
                };
                progress = (progress + step).min(100.0);
                let percent = progress.floor() as u8;

                sink.send_if_modified(|current| {
                    if percent > *current {
                        *current = percent;
                        true
                    } else {
                        false
                    }
                });
                trace!(percent, "Upload progress");
            }
        });

        ProgressHandle { task }
    }
}

/// Running simulation; aborted on [`stop`](ProgressHandle::stop) or drop
#[derive(Debug)]
pub struct ProgressHandle {
    task: JoinHandle<()>,
}

impl ProgressHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

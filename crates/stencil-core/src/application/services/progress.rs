//! Progress tracking and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::application::ports::{ProgressSink, ProgressUpdate};

/// Cloneable handle the caller uses to stop a run.
///
/// Workers check the token before claiming each artifact; artifacts already
/// being rendered finish normally.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn publish(&self, _update: &ProgressUpdate) {}
}

#[derive(Debug, Default)]
struct Counters {
    step: usize,
    files_generated: usize,
}

/// Step counter shared by the workers of one run.
///
/// Publication happens under the lock, so the sink sees steps in order even
/// when workers finish out of order.
pub(crate) struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    total_steps: usize,
    counters: Mutex<Counters>,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink, total_steps: usize) -> Self {
        Self {
            sink,
            total_steps: total_steps.max(1),
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Complete one step and publish it.
    pub(crate) fn advance(&self, label: impl Into<String>, files: usize) {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        if counters.step >= self.total_steps {
            return;
        }
        counters.step += 1;
        counters.files_generated += files;
        self.publish(&counters, label.into());
    }

    /// Jump to the last step (a terminal outcome other than completion).
    pub(crate) fn finish(&self, label: impl Into<String>) {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        if counters.step >= self.total_steps {
            return;
        }
        counters.step = self.total_steps;
        self.publish(&counters, label.into());
    }

    pub(crate) fn files_generated(&self) -> usize {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .files_generated
    }

    fn publish(&self, counters: &Counters, current_step: String) {
        let progress = (counters.step * 100 / self.total_steps).min(100) as u8;
        self.sink.publish(&ProgressUpdate {
            progress,
            current_step,
            files_generated: counters.files_generated,
            step: counters.step,
            total_steps: self.total_steps,
        });
    }
}

//! Progress sinks.
//!
//! [`ChannelProgress`] forwards every update to its subscribers;
//! [`PollingProgress`] keeps only the latest one for callers that ask for
//! the status on their own schedule.

use std::sync::{
    Arc, Mutex, PoisonError,
    mpsc::{self, Receiver, Sender},
};

use stencil_core::application::ports::{ProgressSink, ProgressUpdate};
use tracing::trace;

/// Fans updates out to any number of channel subscribers.
#[derive(Debug, Clone, Default)]
pub struct ChannelProgress {
    subscribers: Arc<Mutex<Vec<Sender<ProgressUpdate>>>>,
}

impl ChannelProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// A receiver for every update published from now on.
    pub fn subscribe(&self) -> Receiver<ProgressUpdate> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}

impl ProgressSink for ChannelProgress {
    fn publish(&self, update: &ProgressUpdate) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Dropped receivers unsubscribe.
        subscribers.retain(|tx| tx.send(update.clone()).is_ok());
        trace!(
            step = update.step,
            progress = update.progress,
            subscribers = subscribers.len(),
            "Progress published"
        );
    }
}

/// Remembers the most recent update.
#[derive(Debug, Clone, Default)]
pub struct PollingProgress {
    latest: Arc<Mutex<Option<ProgressUpdate>>>,
}

impl PollingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest update, if any has been published.
    pub fn latest(&self) -> Option<ProgressUpdate> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the run has reported 100%.
    pub fn is_finished(&self) -> bool {
        self.latest().is_some_and(|u| u.progress >= 100)
    }
}

impl ProgressSink for PollingProgress {
    fn publish(&self, update: &ProgressUpdate) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(update.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(step: usize, total: usize) -> ProgressUpdate {
        ProgressUpdate {
            progress: (step * 100 / total) as u8,
            current_step: format!("step {step}"),
            files_generated: step,
            step,
            total_steps: total,
        }
    }

    #[test]
    fn every_subscriber_sees_every_update() {
        let sink = ChannelProgress::new();
        let first = sink.subscribe();
        let second = sink.subscribe();

        sink.publish(&update(1, 2));
        sink.publish(&update(2, 2));

        let steps: Vec<usize> = first.try_iter().map(|u| u.step).collect();
        assert_eq!(steps, vec![1, 2]);
        assert_eq!(second.try_iter().count(), 2);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let sink = ChannelProgress::new();
        drop(sink.subscribe());
        let live = sink.subscribe();

        sink.publish(&update(1, 1));
        assert_eq!(live.try_iter().count(), 1);
        assert_eq!(sink.subscribers.lock().unwrap().len(), 1);
    }

    #[test]
    fn polling_keeps_the_latest() {
        let sink = PollingProgress::new();
        assert!(sink.latest().is_none());

        sink.publish(&update(1, 4));
        sink.publish(&update(4, 4));
        assert_eq!(sink.latest().map(|u| u.step), Some(4));
        assert!(sink.is_finished());
    }
}

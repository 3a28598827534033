//! Fire-and-forget event reporting
//!
//! `report` enqueues on a bounded channel and returns immediately; a single
//! background task drains the queue into the collector. A full queue or a
//! failed delivery drops the event. Nothing is retried.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::collector::Collector;
use crate::event::LogEvent;

/// Handle for submitting decision events.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: mpsc::Sender<LogEvent>,
}

impl Reporter {
    /// Create a reporter and the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<LogEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Create a reporter whose events are delivered to `collector` by a task
    /// on the current tokio runtime.
    pub fn spawn<C: Collector>(collector: Arc<C>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (reporter, rx) = Self::channel(capacity);
        let handle = tokio::spawn(deliver(collector, rx));
        (reporter, handle)
    }

    /// Queue an event without waiting.
    pub fn report(&self, event: LogEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::debug!("Report queue full, dropping event for {}", event.url);
            }
            Err(TrySendError::Closed(event)) => {
                log::debug!("Reporter stopped, dropping event for {}", event.url);
            }
        }
    }
}

async fn deliver<C: Collector>(collector: Arc<C>, mut rx: mpsc::Receiver<LogEvent>) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = collector.submit(&event).await {
            log::debug!("Dropping report for {}: {}", event.url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::testing::{event, wait_until, FakeCollector};
    use rf_core::RequestType;

    #[test]
    fn test_report_never_blocks_when_full() {
        let (reporter, mut rx) = Reporter::channel(2);
        for i in 0..10 {
            reporter.report(event(Action::Allow, RequestType::Image, &format!("http://a.com/{i}")));
        }
        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event.url);
        }
        assert_eq!(received, ["http://a.com/0", "http://a.com/1"]);
    }

    #[test]
    fn test_report_after_shutdown_is_dropped() {
        let (reporter, rx) = Reporter::channel(4);
        drop(rx);
        reporter.report(event(Action::Block, RequestType::Script, "http://a.com/x.js"));
    }

    #[tokio::test]
    async fn test_events_are_delivered_in_order() {
        let collector = Arc::new(FakeCollector::new(Vec::new()));
        let (reporter, _task) = Reporter::spawn(Arc::clone(&collector), 16);

        reporter.report(event(Action::Allow, RequestType::Image, "http://a.com/1.png"));
        reporter.report(event(Action::Block, RequestType::Script, "http://b.com/2.js"));

        wait_until(|| collector.submitted().len() == 2).await;
        let urls: Vec<String> = collector.submitted().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, ["http://a.com/1.png", "http://b.com/2.js"]);
    }

    #[tokio::test]
    async fn test_delivery_failures_are_swallowed() {
        let collector = Arc::new(FakeCollector::new(Vec::new()));
        collector.fail_submits(true);
        let (reporter, task) = Reporter::spawn(Arc::clone(&collector), 16);

        reporter.report(event(Action::Allow, RequestType::Image, "http://a.com/1.png"));
        wait_until(|| collector.submit_attempts() == 1).await;

        collector.fail_submits(false);
        reporter.report(event(Action::Allow, RequestType::Image, "http://a.com/2.png"));
        wait_until(|| collector.submitted().len() == 1).await;

        assert_eq!(collector.submitted()[0].url, "http://a.com/2.png");
        assert!(!task.is_finished());
    }
}

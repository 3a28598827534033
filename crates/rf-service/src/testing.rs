//! In-memory collector and helpers shared by the service tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rf_core::RequestType;

use crate::collector::Collector;
use crate::error::ServiceError;
use crate::event::{Action, LogEvent};

pub(crate) struct FakeCollector {
    /// `None` makes `fetch_list` fail
    list: Mutex<Option<Vec<String>>>,
    submitted: Mutex<Vec<LogEvent>>,
    fail_submits: AtomicBool,
    submit_attempts: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeCollector {
    pub(crate) fn new(list: Vec<&str>) -> Self {
        Self {
            list: Mutex::new(Some(list.into_iter().map(str::to_string).collect())),
            submitted: Mutex::new(Vec::new()),
            fail_submits: AtomicBool::new(false),
            submit_attempts: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_list(&self, list: Option<Vec<&str>>) {
        *self.list.lock().unwrap() = list.map(|keys| keys.into_iter().map(str::to_string).collect());
    }

    pub(crate) fn fail_submits(&self, fail: bool) {
        self.fail_submits.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn submitted(&self) -> Vec<LogEvent> {
        self.submitted.lock().unwrap().clone()
    }

    pub(crate) fn submit_attempts(&self) -> usize {
        self.submit_attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Collector for FakeCollector {
    async fn fetch_list(&self) -> Result<Vec<String>, ServiceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let list = self.list.lock().unwrap().clone();
        list.ok_or(ServiceError::Status(503))
    }

    async fn submit(&self, event: &LogEvent) -> Result<(), ServiceError> {
        self.submit_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_submits.load(Ordering::SeqCst) {
            return Err(ServiceError::Status(500));
        }
        self.submitted.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub(crate) fn event(action: Action, request_type: RequestType, url: &str) -> LogEvent {
    LogEvent {
        action,
        request_type,
        url: url.to_string(),
        reason: String::new(),
        tab_id: 1,
        tab_url: None,
    }
}

/// Poll `condition`, yielding to spawned tasks in between.
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not met in time");
}

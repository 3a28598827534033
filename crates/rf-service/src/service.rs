//! The filtering service: one per process.

use std::sync::Arc;

use rf_core::{Blacklist, BlacklistStore};
use tokio::task::JoinHandle;

use crate::collector::{Collector, HttpCollector};
use crate::config::Config;
use crate::error::ServiceError;
use crate::interceptor::{Decision, Interceptor, Request};
use crate::loader::Loader;
use crate::port::RequestHandler;
use crate::reporter::Reporter;
use crate::tracker::TabTracker;

/// Owns the blacklist store, the tab tracker, the interceptor and the
/// background reporter and reload tasks. Dropping it stops the tasks.
pub struct FilterService {
    store: Arc<BlacklistStore>,
    tabs: Arc<TabTracker>,
    interceptor: Arc<Interceptor>,
    tasks: Vec<JoinHandle<()>>,
}

impl FilterService {
    /// Start with the HTTP collector described by `config`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &Config, seed: Blacklist) -> Result<Self, ServiceError> {
        config.validate()?;
        let collector = Arc::new(HttpCollector::new(config)?);
        Ok(Self::with_collector(config, seed, collector))
    }

    /// Start with any collector. The first reload is issued immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_collector<C: Collector>(config: &Config, seed: Blacklist, collector: Arc<C>) -> Self {
        log::info!(
            "Starting filter service: {} seed keys, collector {}, reload every {}s",
            seed.len(),
            config.collector_base(),
            config.reload_interval_secs
        );

        let store = Arc::new(BlacklistStore::new(seed));
        let tabs = Arc::new(TabTracker::new());

        let (reporter, report_task) = Reporter::spawn(Arc::clone(&collector), config.report_queue);
        let reload_task = Loader::new(collector, Arc::clone(&store)).spawn_periodic(config.reload_interval());

        let interceptor = Arc::new(Interceptor::new(
            config,
            Arc::clone(&store),
            Arc::clone(&tabs),
            reporter,
        ));

        Self {
            store,
            tabs,
            interceptor,
            tasks: vec![report_task, reload_task],
        }
    }

    pub fn decide(&self, request: &Request) -> Decision {
        self.interceptor.decide(request)
    }

    /// Handler to register with an interception port.
    pub fn handler(&self) -> Arc<dyn RequestHandler> {
        self.interceptor.clone()
    }

    pub fn store(&self) -> &Arc<BlacklistStore> {
        &self.store
    }

    pub fn tabs(&self) -> &Arc<TabTracker> {
        &self.tabs
    }
}

impl Drop for FilterService {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::testing::{wait_until, FakeCollector};
    use rf_core::seed::seed_blacklist;
    use rf_core::RequestType;

    #[tokio::test]
    async fn test_startup_reload_replaces_seed() {
        let collector = Arc::new(FakeCollector::new(vec!["ads.example.net"]));
        let service = FilterService::with_collector(&Config::default(), seed_blacklist(), Arc::clone(&collector));

        wait_until(|| collector.fetches() == 1).await;
        let blacklist = service.store().get();
        assert_eq!(blacklist.len(), 1);
        assert!(blacklist.contains_key("ads.example.net"));
    }

    #[tokio::test]
    async fn test_seed_is_active_while_reload_fails() {
        let collector = Arc::new(FakeCollector::new(Vec::new()));
        collector.set_list(None);
        let service = FilterService::with_collector(&Config::default(), seed_blacklist(), Arc::clone(&collector));

        wait_until(|| collector.fetches() == 1).await;
        let decision = service.decide(&Request::new("https://graph.facebook.com/me", RequestType::Script, 1));
        assert!(decision.is_blocked());
    }

    #[tokio::test]
    async fn test_decisions_are_reported_to_collector() {
        let collector = Arc::new(FakeCollector::new(vec!["ads.example.net"]));
        let service = FilterService::with_collector(&Config::default(), Blacklist::new(), Arc::clone(&collector));
        wait_until(|| collector.fetches() == 1).await;

        let handler = service.handler();
        handler.on_before_request(&Request::new("https://news.example.com/", RequestType::MainFrame, 5));
        let response = handler.on_before_request(&Request::new("https://ads.example.net/banner.png", RequestType::Image, 5));
        assert_eq!(response.redirect_url.as_deref(), Some("chrome-extension://extension/empty.png"));
        handler.on_before_request(&Request::new("http://localhost:1709/log", RequestType::XmlHttpRequest, -1));

        wait_until(|| collector.submitted().len() == 1).await;
        let events = collector.submitted();
        assert_eq!(events[0].action, Action::Block);
        assert_eq!(events[0].url, "https://ads.example.net/banner.png");
        assert_eq!(events[0].tab_url.as_deref(), Some("https://news.example.com/"));
        assert_eq!(service.tabs().url_for(5).as_deref(), Some("https://news.example.com/"));
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let config = Config {
            report_queue: 0,
            ..Config::default()
        };
        assert!(matches!(
            FilterService::start(&config, Blacklist::new()),
            Err(ServiceError::Config(_))
        ));
    }
}

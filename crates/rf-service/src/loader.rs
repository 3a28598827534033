//! Blacklist refresh from the collector
//!
//! A reload fetches the collector's key list, compiles it into a blacklist
//! that blocks every path of every key and swaps it into the store. On any
//! failure the current blacklist stays in place.

use std::sync::Arc;
use std::time::Duration;

use rf_compiler::compile_domains;
use rf_core::BlacklistStore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::collector::Collector;
use crate::error::ServiceError;

pub struct Loader<C> {
    collector: Arc<C>,
    store: Arc<BlacklistStore>,
}

impl<C: Collector> Loader<C> {
    pub fn new(collector: Arc<C>, store: Arc<BlacklistStore>) -> Self {
        Self { collector, store }
    }

    /// Fetch and install a fresh blacklist. Returns the new key count.
    pub async fn reload(&self) -> Result<usize, ServiceError> {
        let keys = self.collector.fetch_list().await?;
        let blacklist = compile_domains(&keys);
        let count = blacklist.len();
        self.store.replace(blacklist);
        Ok(count)
    }

    /// Reload, logging the outcome instead of returning it.
    pub async fn reload_logged(&self) {
        match self.reload().await {
            Ok(count) => log::info!("Reloaded blacklist: {} keys", count),
            Err(e) => log::warn!("Blacklist reload failed, keeping previous list: {}", e),
        }
    }

    /// Reload now and then every `interval` on the current tokio runtime.
    pub fn spawn_periodic(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.reload_logged().await;
            }
        })
    }
}

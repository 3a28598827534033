//! Client for the remote log/config collector.
//!
//! - `GET <base>/list` returns a JSON array of match keys.
//! - `POST <base>/log` accepts one [`LogEvent`]; the response body is ignored.

use std::future::Future;

use crate::config::Config;
use crate::error::ServiceError;
use crate::event::LogEvent;

/// The collector's two endpoints.
pub trait Collector: Send + Sync + 'static {
    /// Fetch the current list of fully blocked keys.
    fn fetch_list(&self) -> impl Future<Output = Result<Vec<String>, ServiceError>> + Send;

    /// Submit one decision event.
    fn submit(&self, event: &LogEvent) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// HTTP collector client.
#[derive(Debug, Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    list_url: String,
    log_url: String,
}

impl HttpCollector {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            list_url: config.list_url(),
            log_url: config.log_url(),
        })
    }
}

impl Collector for HttpCollector {
    async fn fetch_list(&self) -> Result<Vec<String>, ServiceError> {
        let response = self.client.get(&self.list_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(response.json::<Vec<String>>().await?)
    }

    async fn submit(&self, event: &LogEvent) -> Result<(), ServiceError> {
        let response = self.client.post(&self.log_url).json(event).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(())
    }
}

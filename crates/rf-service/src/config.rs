//! Service configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object is
//! a valid configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use rf_core::url::ParsedUrl;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the log/config collector
    pub collector_url: String,
    /// Seconds between blacklist reloads
    pub reload_interval_secs: u64,
    /// Timeout for each collector call
    pub request_timeout_secs: u64,
    /// Reports queued beyond this are dropped
    pub report_queue: usize,
    /// Scheme of extension-internal resources, never blocked
    pub internal_scheme: String,
    /// Host part of extension-internal URLs
    pub extension_id: String,
    /// Redirect target for voided frames, scripts, stylesheets and XHRs
    pub void_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collector_url: "http://localhost:1709".to_string(),
            reload_interval_secs: 60,
            request_timeout_secs: 5,
            report_queue: 1024,
            internal_scheme: rf_core::DEFAULT_INTERNAL_SCHEME.to_string(),
            extension_id: "extension".to_string(),
            void_url: "about://blank".to_string(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ServiceError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        let url = ParsedUrl::parse(&self.collector_url)
            .map_err(|e| ServiceError::Config(format!("collector_url '{}': {}", self.collector_url, e)))?;
        if !url.scheme.eq_ignore_ascii_case("http") && !url.scheme.eq_ignore_ascii_case("https") {
            return Err(ServiceError::Config(format!(
                "collector_url must be http or https, got '{}'",
                url.scheme
            )));
        }
        if self.reload_interval_secs == 0 {
            return Err(ServiceError::Config("reload_interval_secs must be positive".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServiceError::Config("request_timeout_secs must be positive".to_string()));
        }
        if self.report_queue == 0 {
            return Err(ServiceError::Config("report_queue must be positive".to_string()));
        }
        if self.internal_scheme.is_empty() {
            return Err(ServiceError::Config("internal_scheme must not be empty".to_string()));
        }
        Ok(())
    }

    /// Collector base URL without a trailing slash.
    pub fn collector_base(&self) -> &str {
        self.collector_url.trim_end_matches('/')
    }

    pub fn list_url(&self) -> String {
        format!("{}/list", self.collector_base())
    }

    pub fn log_url(&self) -> String {
        format!("{}/log", self.collector_base())
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transparent image substituted for blocked images.
    pub fn placeholder_image_url(&self) -> String {
        format!("{}://{}/empty.png", self.internal_scheme, self.extension_id)
    }
}

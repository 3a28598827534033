//! Per-request decision point
//!
//! - `main_frame`: never blocked; the URL is recorded for the tab.
//! - `image`: matched; a rejected image is replaced by a placeholder.
//! - `sub_frame`, `stylesheet`, `script`, `xmlhttprequest`: matched; a
//!   rejected request is redirected to the void URL.
//! - `object`, `other` and unknown types: never matched, never blocked.
//!
//! Requests to the collector itself are passed through before any of this,
//! without a report. Every other non-`main_frame` request produces exactly
//! one report.

use std::sync::Arc;

use rf_core::{BlacklistStore, Matcher, RequestType};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::event::{Action, LogEvent};
use crate::port::RequestHandler;
use crate::reporter::Reporter;
use crate::tracker::TabTracker;

/// Tab id of requests not tied to a tab.
pub const NO_TAB: i32 = -1;

const MALFORMED_URL_REASON: &str = "malformed url, blocked";
const OBJECT_REASON: &str = "object request, not filtered";
const OTHER_REASON: &str = "other request, not filtered";

/// One intercepted network request, as delivered by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub url: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(rename = "tabId", default = "no_tab")]
    pub tab_id: i32,
}

fn no_tab() -> i32 {
    NO_TAB
}

impl Request {
    pub fn new(url: impl Into<String>, request_type: RequestType, tab_id: i32) -> Self {
        Self {
            url: url.into(),
            request_type,
            tab_id,
        }
    }
}

/// Outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request through
    Proceed,
    /// Substitute another resource (blocked images)
    Block { substitute_url: String },
    /// Void the request by redirecting it
    RedirectToBlank { redirect_url: String },
    /// Not ours to judge: the collector's own traffic
    ProceedNoDecision,
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Block { .. } | Self::RedirectToBlank { .. })
    }

    /// Browser blocking response for this decision.
    pub fn to_response(&self) -> BlockingResponse {
        match self {
            Self::Proceed => BlockingResponse {
                cancel: Some(false),
                redirect_url: None,
            },
            Self::Block { substitute_url } => BlockingResponse::redirect(substitute_url),
            Self::RedirectToBlank { redirect_url } => BlockingResponse::redirect(redirect_url),
            Self::ProceedNoDecision => BlockingResponse::default(),
        }
    }
}

/// `{"cancel": bool}` or `{"redirectUrl": string}`; empty when undecided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl BlockingResponse {
    /// `{"cancel": true}`
    pub fn cancel() -> Self {
        Self {
            cancel: Some(true),
            redirect_url: None,
        }
    }

    fn redirect(url: &str) -> Self {
        Self {
            cancel: None,
            redirect_url: Some(url.to_string()),
        }
    }
}

// =============================================================================
// Interceptor
// =============================================================================

pub struct Interceptor {
    matcher: Matcher,
    store: Arc<BlacklistStore>,
    tabs: Arc<TabTracker>,
    reporter: Reporter,
    collector_base: String,
    placeholder_url: String,
    void_url: String,
}

impl Interceptor {
    pub fn new(config: &Config, store: Arc<BlacklistStore>, tabs: Arc<TabTracker>, reporter: Reporter) -> Self {
        Self {
            matcher: Matcher::new(config.internal_scheme.as_str()),
            store,
            tabs,
            reporter,
            collector_base: lowercase_origin(config.collector_base()),
            placeholder_url: config.placeholder_image_url(),
            void_url: config.void_url.clone(),
        }
    }

    /// Decide on a request. Never blocks and never awaits.
    pub fn decide(&self, request: &Request) -> Decision {
        if self.targets_collector(&request.url) {
            return Decision::ProceedNoDecision;
        }

        match request.request_type {
            RequestType::MainFrame => {
                self.tabs.record(request.tab_id, &request.url);
                Decision::Proceed
            }
            RequestType::Image
            | RequestType::SubFrame
            | RequestType::Stylesheet
            | RequestType::Script
            | RequestType::XmlHttpRequest => self.filter(request),
            RequestType::Object => {
                self.report(request, Action::Allow, OBJECT_REASON);
                Decision::Proceed
            }
            RequestType::Other => {
                self.report(request, Action::Allow, OTHER_REASON);
                Decision::Proceed
            }
        }
    }

    fn filter(&self, request: &Request) -> Decision {
        let blacklist = self.store.get();
        match self.matcher.evaluate(&blacklist, &request.url) {
            Ok(result) if result.accepted => {
                self.report(request, Action::Allow, result.reason.as_str());
                Decision::Proceed
            }
            Ok(result) => {
                self.report(request, Action::Block, result.reason.as_str());
                self.reject(request.request_type)
            }
            Err(e) => {
                log::warn!("Cannot classify {} request to {}: {}", request.request_type, request.url, e);
                self.report(request, Action::Block, MALFORMED_URL_REASON);
                self.reject(request.request_type)
            }
        }
    }

    fn reject(&self, request_type: RequestType) -> Decision {
        match request_type {
            RequestType::Image => Decision::Block {
                substitute_url: self.placeholder_url.clone(),
            },
            _ => Decision::RedirectToBlank {
                redirect_url: self.void_url.clone(),
            },
        }
    }

    fn report(&self, request: &Request, action: Action, reason: &str) {
        log::debug!("{:?} {} {}: {}", action, request.request_type, request.url, reason);
        self.reporter.report(LogEvent {
            action,
            request_type: request.request_type,
            url: request.url.clone(),
            reason: reason.to_string(),
            tab_id: request.tab_id,
            tab_url: self.tabs.url_for(request.tab_id),
        });
    }

    /// Whether `url` is the collector base URL or below it.
    fn targets_collector(&self, url: &str) -> bool {
        match url.strip_prefix(self.collector_base.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
            None => false,
        }
    }
}

/// Lowercase the scheme and authority of `url`, leaving the path as is.
fn lowercase_origin(url: &str) -> String {
    let authority_end = match url.find("://") {
        Some(idx) => {
            let start = idx + 3;
            url[start..].find(['/', '?', '#']).map_or(url.len(), |end| start + end)
        }
        None => url.len(),
    };
    let (origin, rest) = url.split_at(authority_end);
    format!("{}{}", origin.to_ascii_lowercase(), rest)
}

impl RequestHandler for Interceptor {
    fn on_before_request(&self, request: &Request) -> BlockingResponse {
        self.decide(request).to_response()
    }
}

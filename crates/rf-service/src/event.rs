//! Decision events sent to the collector's `/log` endpoint.

use rf_core::RequestType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Block,
}

/// One allow/block decision.
///
/// Serialized as `{"action", "type", "url", "reason", "tabId", "tab"}`; `tab`
/// is omitted when the tab's top-level URL is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub action: Action,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub url: String,
    pub reason: String,
    #[serde(rename = "tabId")]
    pub tab_id: i32,
    #[serde(rename = "tab", default, skip_serializing_if = "Option::is_none")]
    pub tab_url: Option<String>,
}

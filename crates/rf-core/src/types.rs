//! Core type definitions for reqfilter
//!
//! These types cross the browser boundary (request types arrive as strings)
//! and the collector boundary (reasons are logged verbatim).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Request Types
// =============================================================================

/// Resource type of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// Top-level navigation
    MainFrame,
    /// iframe/frame
    SubFrame,
    Stylesheet,
    Script,
    XmlHttpRequest,
    Image,
    /// Plugin content (`<object>`, `<embed>`)
    Object,
    /// Anything else, including types this crate does not know about
    Other,
}

impl RequestType {
    /// Parse from browser request type string.
    ///
    /// Unknown types map to [`RequestType::Other`] so new resource types
    /// introduced by the browser pass through unfiltered.
    pub fn from_str(s: &str) -> Self {
        match s {
            "main_frame" => Self::MainFrame,
            "sub_frame" => Self::SubFrame,
            "stylesheet" => Self::Stylesheet,
            "script" => Self::Script,
            "xmlhttprequest" => Self::XmlHttpRequest,
            "image" => Self::Image,
            "object" => Self::Object,
            _ => Self::Other,
        }
    }

    /// Browser request type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainFrame => "main_frame",
            Self::SubFrame => "sub_frame",
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::XmlHttpRequest => "xmlhttprequest",
            Self::Image => "image",
            Self::Object => "object",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RequestType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str(&s))
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// Which branch of the matcher produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchReason {
    /// URL uses the extension's own scheme
    InternalResource,
    /// The full hostname is a blacklist key
    ExactHostname,
    /// A parent domain of the hostname is a `.`-prefixed blacklist key
    HostnameVariant,
    /// Nothing matched
    NoMatch,
}

impl MatchReason {
    /// Human-readable reason, sent to the collector as-is.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalResource => "internal resource, always accepted",
            Self::ExactHostname => "exact hostname in blacklist",
            Self::HostnameVariant => "hostname variant in blacklist",
            Self::NoMatch => "no blacklist match",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of matching a URL against a blacklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the request may proceed
    pub accepted: bool,
    /// Why
    pub reason: MatchReason,
}

impl MatchResult {
    pub fn accept(reason: MatchReason) -> Self {
        Self {
            accepted: true,
            reason,
        }
    }

    pub fn reject(reason: MatchReason) -> Self {
        Self {
            accepted: false,
            reason,
        }
    }
}

impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("MatchResult", 2)?;
        state.serialize_field("accepted", &self.accepted)?;
        state.serialize_field("reason", self.reason.as_str())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_round_trips_known_names() {
        for name in [
            "main_frame",
            "sub_frame",
            "stylesheet",
            "script",
            "xmlhttprequest",
            "image",
            "object",
            "other",
        ] {
            assert_eq!(RequestType::from_str(name).as_str(), name);
        }
    }

    #[test]
    fn test_unknown_request_type_is_other() {
        assert_eq!(RequestType::from_str("font"), RequestType::Other);
        assert_eq!(RequestType::from_str("websocket"), RequestType::Other);
        assert_eq!(RequestType::from_str(""), RequestType::Other);
    }

    #[test]
    fn test_request_type_deserializes_unknown_as_other() {
        let t: RequestType = serde_json::from_str("\"csp_report\"").unwrap();
        assert_eq!(t, RequestType::Other);
        let t: RequestType = serde_json::from_str("\"xmlhttprequest\"").unwrap();
        assert_eq!(t, RequestType::XmlHttpRequest);
    }

    #[test]
    fn test_match_result_serializes_reason_text() {
        let json = serde_json::to_string(&MatchResult::reject(MatchReason::ExactHostname)).unwrap();
        assert_eq!(json, r#"{"accepted":false,"reason":"exact hostname in blacklist"}"#);
    }
}

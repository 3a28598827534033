//! Core Matching Engine
//!
//! This is the hot path - every intercepted request goes through here.
//! Matching never performs I/O and never suspends.
//!
//! Order of checks:
//!
//! 1. Extension-internal scheme: always accepted.
//! 2. Exact hostname key.
//! 3. Suffix patterns (`.parent.domain`), most specific first, starting one
//!    level above the hostname.

use std::borrow::Cow;

use crate::blacklist::Blacklist;
use crate::domain::suffix_patterns;
use crate::types::{MatchReason, MatchResult};
use crate::url::{is_special_scheme, ParsedUrl, UrlError};

/// Scheme of extension-internal resources.
pub const DEFAULT_INTERNAL_SCHEME: &str = "chrome-extension";

// =============================================================================
// Matcher
// =============================================================================

/// The core matching engine.
#[derive(Debug, Clone)]
pub struct Matcher {
    internal_scheme: String,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_INTERNAL_SCHEME)
    }
}

impl Matcher {
    /// Create a matcher that always accepts URLs under `internal_scheme`.
    pub fn new(internal_scheme: impl Into<String>) -> Self {
        let internal_scheme = internal_scheme.into();
        let internal_scheme = internal_scheme.trim_end_matches(':').to_ascii_lowercase();
        Self { internal_scheme }
    }

    pub fn internal_scheme(&self) -> &str {
        &self.internal_scheme
    }

    /// Match a URL against `blacklist`.
    pub fn evaluate(&self, blacklist: &Blacklist, url: &str) -> Result<MatchResult, UrlError> {
        let parsed = ParsedUrl::parse(url)?;
        Ok(self.evaluate_parsed(blacklist, &parsed))
    }

    /// Match an already parsed URL against `blacklist`.
    pub fn evaluate_parsed(&self, blacklist: &Blacklist, url: &ParsedUrl<'_>) -> MatchResult {
        if url.scheme.eq_ignore_ascii_case(&self.internal_scheme) {
            return MatchResult::accept(MatchReason::InternalResource);
        }

        let host = lowercase_host(url.host);
        let path = browser_path(url);

        if blacklist.matches(&host, &path) {
            return MatchResult::reject(MatchReason::ExactHostname);
        }

        if suffix_patterns(&host).any(|pattern| blacklist.matches(pattern, &path)) {
            return MatchResult::reject(MatchReason::HostnameVariant);
        }

        MatchResult::accept(MatchReason::NoMatch)
    }
}

/// Match `url` against `blacklist` with the default internal scheme.
pub fn evaluate(blacklist: &Blacklist, url: &str) -> Result<MatchResult, UrlError> {
    Matcher::default().evaluate(blacklist, url)
}

/// Browsers hand over lowercase hosts; only allocate when they don't.
#[inline]
fn lowercase_host(host: &str) -> Cow<'_, str> {
    if host.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(host.to_ascii_lowercase())
    } else {
        Cow::Borrowed(host)
    }
}

/// Path as the browser resolves it: special schemes read `\\` as `/`.
#[inline]
fn browser_path<'a>(url: &ParsedUrl<'a>) -> Cow<'a, str> {
    if url.path.contains('\\') && is_special_scheme(url.scheme) {
        Cow::Owned(url.path.replace('\\', "/"))
    } else {
        Cow::Borrowed(url.path)
    }
}

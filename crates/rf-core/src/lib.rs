//! reqfilter Core Library
//!
//! This crate provides the matching engine for the reqfilter request filter.
//! It performs no I/O: every function here is safe to call from a browser's
//! synchronous request-interception callback.
//!
//! # Architecture
//!
//! A [`Blacklist`] maps a match key (an exact hostname such as `www.example.com`,
//! or a suffix pattern such as `.example.com`) to a [`PathRule`]. The [`Matcher`]
//! evaluates a URL against a blacklist: exact hostname first, then every parent
//! domain as a `.`-prefixed suffix pattern. The [`BlacklistStore`] holds the
//! current blacklist and swaps it atomically on reload.
//!
//! # Modules
//!
//! - `url`: Fast URL parsing without allocations
//! - `domain`: Suffix pattern walking for hostnames
//! - `blacklist`: Blacklist data model
//! - `matcher`: Core request matching engine
//! - `store`: Atomically swapped blacklist holder
//! - `seed`: Built-in seed blacklist
//! - `types`: Shared type definitions

pub mod blacklist;
pub mod domain;
pub mod matcher;
pub mod seed;
pub mod store;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use blacklist::{Blacklist, PathRule};
pub use matcher::{evaluate, Matcher, DEFAULT_INTERNAL_SCHEME};
pub use store::BlacklistStore;
pub use types::{MatchReason, MatchResult, RequestType};
pub use url::{ParsedUrl, UrlError};

//! reqfilter Service
//!
//! Wires the matching engine to the outside world:
//!
//! - `interceptor`: per-request decision point, dispatched on request type
//! - `tracker`: top-level URL of each tab, used as log context
//! - `reporter`: fire-and-forget delivery of decision events
//! - `loader`: periodic blacklist refresh from the collector
//! - `collector`: HTTP client for the collector's `/list` and `/log` endpoints
//! - `port`: the request-interception boundary and a JSON-lines adapter
//! - `service`: owns all of the above for the lifetime of the process
//!
//! Decisions are computed synchronously; every network call runs on the
//! tokio runtime and is never awaited from the decision path.

pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod interceptor;
pub mod loader;
pub mod port;
pub mod reporter;
pub mod service;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::{Collector, HttpCollector};
pub use config::Config;
pub use error::ServiceError;
pub use event::{Action, LogEvent};
pub use interceptor::{BlockingResponse, Decision, Interceptor, Request, NO_TAB};
pub use loader::Loader;
pub use port::{InterceptionPort, JsonLinesPort, RequestHandler};
pub use reporter::Reporter;
pub use service::FilterService;
pub use tracker::TabTracker;

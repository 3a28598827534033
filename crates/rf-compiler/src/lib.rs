//! reqfilter Blacklist Compiler
//!
//! This crate turns textual lists into a validated [`rf_core::Blacklist`]:
//! rule files (`key [prefix ...]`), the collector's domain list format and
//! the JSON blacklist form.

pub mod builder;
pub mod optimizer;
pub mod parser;

pub use builder::{build_blacklist, compile_domains};
pub use optimizer::{optimize_rules, OptimizeStats};
pub use parser::{
    normalize_key, parse_domain_list, parse_json_blacklist, parse_rule_list, BlacklistRule, ParseError,
    ParsedList,
};

use rf_core::{Blacklist, PathRule};

use crate::optimizer::optimize_rules;
use crate::parser::{normalize_key, BlacklistRule};

/// Build a blacklist from already optimized rules.
pub fn build_blacklist(rules: &[BlacklistRule]) -> Blacklist {
    rules
        .iter()
        .map(|rule| (rule.key.as_str(), rule.rule.clone()))
        .collect()
}

/// Compile a list of keys as served by the collector into a blacklist that
/// blocks every path of every valid key. Invalid keys are skipped.
pub fn compile_domains<S: AsRef<str>>(keys: &[S]) -> Blacklist {
    let mut rules: Vec<BlacklistRule> = keys
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            let key = normalize_key(raw);
            if key.is_none() {
                log::warn!("Skipping invalid blacklist key '{}'", raw);
            }
            key
        })
        .map(|key| BlacklistRule {
            key,
            rule: PathRule::All,
            line: 0,
        })
        .collect();

    optimize_rules(&mut rules);
    build_blacklist(&rules)
}

use std::collections::HashMap;

use rf_core::PathRule;

use crate::parser::BlacklistRule;

pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub merged: usize,
    pub empty_prefix_lists: usize,
}

/// Merge rules that share a key.
///
/// The first occurrence keeps its position. A universal block absorbs any
/// prefix list; otherwise prefix lists are unioned in first-seen order.
pub fn optimize_rules(rules: &mut Vec<BlacklistRule>) -> OptimizeStats {
    let before = rules.len();
    let mut first_index: HashMap<String, usize> = HashMap::with_capacity(rules.len());
    let mut merged_rules: Vec<BlacklistRule> = Vec::with_capacity(rules.len());
    let mut merged = 0usize;

    for rule in rules.drain(..) {
        match first_index.get(&rule.key) {
            Some(&idx) => {
                merged += 1;
                merge_into(&mut merged_rules[idx].rule, rule.rule);
            }
            None => {
                first_index.insert(rule.key.clone(), merged_rules.len());
                merged_rules.push(rule);
            }
        }
    }

    let mut empty_prefix_lists = 0usize;
    for rule in &merged_rules {
        if let PathRule::Prefixes(prefixes) = &rule.rule {
            if prefixes.is_empty() {
                empty_prefix_lists += 1;
                log::warn!("Key '{}' has an empty prefix list and blocks nothing", rule.key);
            }
        }
    }

    *rules = merged_rules;
    let after = rules.len();

    OptimizeStats {
        before,
        after,
        merged,
        empty_prefix_lists,
    }
}

fn merge_into(existing: &mut PathRule, incoming: PathRule) {
    match incoming {
        PathRule::All => *existing = PathRule::All,
        PathRule::Prefixes(extra) => {
            if let PathRule::Prefixes(current) = existing {
                for prefix in extra {
                    if !current.contains(&prefix) {
                        current.push(prefix);
                    }
                }
            }
        }
    }
}

//! Built-in seed blacklist
//!
//! Loaded at startup, before the first reload from the collector completes.
//! These are the only entries that carry path prefixes; reloaded lists always
//! block whole domains.

use crate::blacklist::{Blacklist, PathRule};

/// Seed entries: key and optional path prefixes (`None` blocks every path).
pub const SEED_RULES: &[(&str, Option<&[&str]>)] = &[
    ("js-agent.newrelic.com", None),
    ("edge.quantserve.com", None),
    ("static.chartbeat.com", None),
    ("stats.g.doubleclick.net", None),
    ("www.googletagservices.com", None),
    ("www.googletagmanager.com", None),
    ("www.google-analytics.com", None),
    ("www.google.com", Some(&["/jsapi"])),
    ("a.disquscdn.com", Some(&["/count"])),
    // thedissolve.disqus.com/count.js
    (".disqus.com", Some(&["/count"])),
    (".gamer-network.net", None),
    ("b.scorecardresearch.com", None),
    (".taboola.com", None),
    (".krxd.net", None),
    ("me-cdn.effectivemeasure.net", None),
    (".ivwbox.de", None),
    ("pagead2.googlesyndication.com", Some(&["/pagead/show_ads.js"])),
    ("apis.google.com", Some(&["/js/plusone.js"])),
    ("connect.facebook.net", None),
    ("graph.facebook.com", None),
    ("www.googleadservices.com", None),
    (".captifymedia.com", None),
    (".vdna-assets.com", None),
    (".inspectlet.com", None),
    ("clc.stackoverflow.com", None),
    (".ioam.de", None),
    (".meetrics.net", None),
    (".adition.com", None),
    ("c.spiegel.de", None),
    (".mxcdn.net", None),
];

/// Build the seed blacklist.
pub fn seed_blacklist() -> Blacklist {
    SEED_RULES
        .iter()
        .map(|&(key, prefixes)| {
            let rule = match prefixes {
                Some(prefixes) => PathRule::Prefixes(prefixes.iter().map(|p| p.to_string()).collect()),
                None => PathRule::All,
            };
            (key, rule)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::evaluate;
    use crate::types::MatchReason;

    #[test]
    fn test_seed_keys_are_unique() {
        assert_eq!(seed_blacklist().len(), SEED_RULES.len());
    }

    #[test]
    fn test_seed_blocks_known_trackers() {
        let bl = seed_blacklist();
        let result = evaluate(&bl, "https://www.google-analytics.com/analytics.js").unwrap();
        assert_eq!(result.reason, MatchReason::ExactHostname);
        let result = evaluate(&bl, "http://thedissolve.disqus.com/count.js").unwrap();
        assert_eq!(result.reason, MatchReason::HostnameVariant);
        let result = evaluate(&bl, "https://cdn.taboola.com/libtrc/loader.js").unwrap();
        assert!(!result.accepted);
    }

    #[test]
    fn test_seed_prefix_rules_leave_other_paths_alone() {
        let bl = seed_blacklist();
        assert!(evaluate(&bl, "https://www.google.com/search?q=rust").unwrap().accepted);
        assert!(evaluate(&bl, "https://apis.google.com/js/api.js").unwrap().accepted);
        assert!(!evaluate(&bl, "https://apis.google.com/js/plusone.js").unwrap().accepted);
    }
}

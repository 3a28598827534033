//! Hostname suffix utilities
//!
//! Suffix patterns are blacklist keys of the form `.example.com`. For a host
//! `a.b.example.com` the candidate patterns are `.b.example.com`,
//! `.example.com` and `.com`, most specific first. Each candidate is a slice
//! of the host itself, so walking does not allocate.
//!
//! # Examples
//!
//! ```
//! use rf_core::domain::suffix_patterns;
//!
//! let patterns: Vec<&str> = suffix_patterns("foo.bar.example.com").collect();
//! assert_eq!(patterns, [".bar.example.com", ".example.com", ".com"]);
//! ```

/// Strip a single trailing dot (`example.com.` is the FQDN form of `example.com`).
#[inline]
pub fn trim_fqdn_dot(host: &str) -> &str {
    host.strip_suffix('.').unwrap_or(host)
}

/// Iterator over the `.`-prefixed suffix patterns of a host.
///
/// The leftmost label is never yielded on its own: the full hostname is
/// looked up as an exact key before suffix walking starts.
pub struct SuffixPatterns<'a> {
    remaining: &'a str,
}

impl<'a> Iterator for SuffixPatterns<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let dot = self.remaining.find('.')?;
        let pattern = &self.remaining[dot..];
        self.remaining = &pattern[1..];
        Some(pattern)
    }
}

/// Walk suffix patterns from most specific to least specific.
pub fn suffix_patterns(host: &str) -> SuffixPatterns<'_> {
    SuffixPatterns {
        remaining: trim_fqdn_dot(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(host: &str) -> Vec<&str> {
        suffix_patterns(host).collect()
    }

    #[test]
    fn test_suffix_patterns_skip_leftmost_label() {
        assert_eq!(collect("thedissolve.disqus.com"), [".disqus.com", ".com"]);
        assert_eq!(collect("example.com"), [".com"]);
        assert_eq!(collect("localhost"), Vec::<&str>::new());
        assert_eq!(collect(""), Vec::<&str>::new());
    }

    #[test]
    fn test_suffix_patterns_trailing_dot() {
        assert_eq!(collect("foo.bar.com."), [".bar.com", ".com"]);
        assert_eq!(collect("."), Vec::<&str>::new());
    }

    #[test]
    fn test_suffix_patterns_only_one_trailing_dot_is_trimmed() {
        assert_eq!(collect("a.com.."), [".com.", "."]);
    }

    #[test]
    fn test_suffix_patterns_empty_labels() {
        assert_eq!(collect("a..b"), ["..b", ".b"]);
        assert_eq!(collect(".a.com"), [".a.com", ".com"]);
    }
}

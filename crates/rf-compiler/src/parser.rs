use rf_core::{Blacklist, PathRule};

/// Error type for list parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid rule on line {line}: {text}")]
    InvalidRule { line: usize, text: String },
    #[error("Invalid JSON blacklist: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistRule {
    /// Normalized match key (lowercase hostname or `.`-prefixed suffix)
    pub key: String,
    pub rule: PathRule,
    /// 1-based source line, 0 when the rule did not come from a text list
    pub line: usize,
}

/// Rules parsed from a text list, plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct ParsedList {
    pub rules: Vec<BlacklistRule>,
    pub errors: Vec<ParseError>,
}

impl ParsedList {
    fn skip(&mut self, line: usize, text: &str) {
        log::warn!("Skipping invalid rule on line {}: {}", line, text);
        self.errors.push(ParseError::InvalidRule {
            line,
            text: text.to_string(),
        });
    }
}

/// Parse a rule file.
///
/// One rule per line: a key followed by zero or more whitespace-separated
/// path prefixes. A key without prefixes blocks every path. `#` starts a
/// comment.
///
/// ```text
/// graph.facebook.com
/// www.google.com /jsapi
/// .disqus.com /count   # thedissolve.disqus.com/count.js
/// ```
pub fn parse_rule_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(key) = parts.next().and_then(normalize_key) else {
            parsed.skip(line_no, line);
            continue;
        };

        let prefixes: Vec<String> = parts.map(str::to_string).collect();
        if prefixes.iter().any(|prefix| !prefix.starts_with('/')) {
            parsed.skip(line_no, line);
            continue;
        }

        let rule = if prefixes.is_empty() {
            PathRule::All
        } else {
            PathRule::Prefixes(prefixes)
        };

        parsed.rules.push(BlacklistRule {
            key,
            rule,
            line: line_no,
        });
    }

    parsed
}

/// Parse the collector's domain list format: one key per line, every path
/// blocked. `#` starts a comment.
pub fn parse_domain_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }

        match normalize_key(line) {
            Some(key) => parsed.rules.push(BlacklistRule {
                key,
                rule: PathRule::All,
                line: line_no,
            }),
            None => parsed.skip(line_no, line),
        }
    }

    parsed
}

/// Parse the JSON blacklist form (`{"key": null | ["/prefix", ...]}`).
pub fn parse_json_blacklist(text: &str) -> Result<ParsedList, ParseError> {
    let blacklist: Blacklist = serde_json::from_str(text)?;
    let mut parsed = ParsedList::default();

    for (key, rule) in blacklist.iter() {
        match normalize_key(key) {
            Some(normalized) => parsed.rules.push(BlacklistRule {
                key: normalized,
                rule: rule.clone(),
                line: 0,
            }),
            None => parsed.skip(0, key),
        }
    }

    Ok(parsed)
}

/// Normalize a match key: lowercase, optional single leading `.`, hostname
/// characters only.
pub fn normalize_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let host = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if host.is_empty() || host.starts_with('.') || host.contains("..") {
        return None;
    }

    if !host
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_')
    {
        return None;
    }

    Some(trimmed.to_ascii_lowercase())
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => line[..pos].trim(),
        None => line.trim(),
    }
}

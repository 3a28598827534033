use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::ValueEnum;
use rf_compiler::{build_blacklist, optimize_rules, parse_domain_list, parse_json_blacklist, parse_rule_list, ParsedList};
use rf_core::seed::seed_blacklist;
use rf_core::{Blacklist, PathRule};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListFormat {
    /// `key [prefix ...]` per line
    Rules,
    /// One key per line, as served by the collector
    Domains,
    /// `{"key": null | ["/prefix", ...]}`
    Json,
}

impl ListFormat {
    /// Guess from the file extension: `.json` is JSON, anything else rules.
    pub fn for_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ListFormat::Json,
            _ => ListFormat::Rules,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompileStats {
    pub lines: usize,
    pub rules_before: usize,
    pub rules_after: usize,
    pub rules_merged: usize,
    pub skipped: usize,
    pub empty_prefix_lists: usize,
    pub total_ms: f64,
}

pub struct Source<'a> {
    pub name: &'a str,
    pub content: String,
    pub format: ListFormat,
}

fn parse_source(source: &Source<'_>) -> Result<ParsedList, String> {
    match source.format {
        ListFormat::Rules => Ok(parse_rule_list(&source.content)),
        ListFormat::Domains => Ok(parse_domain_list(&source.content)),
        ListFormat::Json => parse_json_blacklist(&source.content).map_err(|e| format!("{}: {}", source.name, e)),
    }
}

/// Parse, merge and build already loaded sources.
pub fn compile_sources(sources: &[Source<'_>], strict: bool, verbose: bool) -> Result<(Blacklist, CompileStats), String> {
    if sources.is_empty() {
        return Err("No input files specified".to_string());
    }

    let start = Instant::now();
    let mut all_rules = Vec::new();
    let mut stats = CompileStats::default();

    for (idx, source) in sources.iter().enumerate() {
        let parsed = parse_source(source)?;
        let line_count = source.content.lines().count();
        stats.lines += line_count;
        stats.skipped += parsed.errors.len();

        if strict {
            if let Some(first) = parsed.errors.first() {
                return Err(format!("{}: {}", source.name, first));
            }
        }

        if verbose {
            println!(
                "  [{}] {} - {} lines, {} rules, {} skipped",
                idx,
                Path::new(source.name).file_name().unwrap_or_default().to_string_lossy(),
                line_count,
                parsed.rules.len(),
                parsed.errors.len()
            );
        }

        all_rules.extend(parsed.rules);
    }

    let optimize_stats = optimize_rules(&mut all_rules);
    let blacklist = build_blacklist(&all_rules);

    stats.rules_before = optimize_stats.before;
    stats.rules_after = optimize_stats.after;
    stats.rules_merged = optimize_stats.merged;
    stats.empty_prefix_lists = optimize_stats.empty_prefix_lists;
    stats.total_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok((blacklist, stats))
}

/// Read and compile list files. `format` overrides the per-file guess.
pub fn compile_files(
    inputs: &[String],
    format: Option<ListFormat>,
    strict: bool,
    verbose: bool,
) -> Result<(Blacklist, CompileStats), String> {
    let mut sources = Vec::with_capacity(inputs.len());
    for path in inputs {
        let content = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        sources.push(Source {
            name: path,
            content,
            format: format.unwrap_or_else(|| ListFormat::for_path(path)),
        });
    }
    compile_sources(&sources, strict, verbose)
}

/// The seed blacklist: from `path` when given, otherwise the built-in list.
pub fn load_seed(path: Option<&str>) -> Result<Blacklist, String> {
    match path {
        Some(path) => {
            let (blacklist, stats) = compile_files(&[path.to_string()], None, false, false)?;
            log::info!("Loaded seed '{}': {} keys ({} lines skipped)", path, blacklist.len(), stats.skipped);
            Ok(blacklist)
        }
        None => Ok(seed_blacklist()),
    }
}

/// Serialize with keys in sorted order so output is reproducible.
pub fn blacklist_to_json(blacklist: &Blacklist) -> Result<String, String> {
    let sorted: BTreeMap<&str, &PathRule> = blacklist.iter().collect();
    serde_json::to_string_pretty(&sorted).map_err(|e| format!("Failed to serialize blacklist: {}", e))
}

pub fn write_blacklist(path: &Path, json: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
        }
    }
    fs::write(path, json).map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

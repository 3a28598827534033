//! reqfilter CLI
//!
//! Compiles blacklists, checks URLs against them and runs the filtering
//! service on a line-delimited JSON stdin/stdout port.

mod bench;
mod lists;

use std::io;
use std::path::Path;

use clap::{Parser, Subcommand};

use rf_core::Matcher;
use rf_service::{Collector, Config, FilterService, HttpCollector, InterceptionPort, JsonLinesPort};

use crate::lists::ListFormat;

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(about = "reqfilter blacklist tools and request filtering service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one URL against a blacklist
    Check {
        /// URL to evaluate
        #[arg(short, long)]
        url: String,

        /// Blacklist file (rule list or JSON); defaults to the built-in seed
        #[arg(short, long)]
        seed: Option<String>,

        /// Scheme of extension-internal resources
        #[arg(long, default_value = rf_core::DEFAULT_INTERNAL_SCHEME)]
        internal_scheme: String,
    },

    /// Compile list files into a JSON blacklist
    Compile {
        /// Input list files
        #[arg(short, long, required = true)]
        input: Vec<String>,

        /// Output blacklist file
        #[arg(short, long, default_value = "blacklist.json")]
        output: String,

        /// Input format; guessed from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<ListFormat>,

        /// Fail on the first invalid line instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Fetch the collector's blacklist and print it
    Fetch {
        /// Service configuration file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Collector base URL, overrides the configuration
        #[arg(long)]
        collector_url: Option<String>,

        /// Print the compiled JSON blacklist instead of one key per line
        #[arg(long)]
        json: bool,
    },

    /// Run the filtering service on stdin/stdout
    Serve {
        /// Service configuration file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Collector base URL, overrides the configuration
        #[arg(long)]
        collector_url: Option<String>,

        /// Seconds between blacklist reloads, overrides the configuration
        #[arg(long)]
        reload_secs: Option<u64>,

        /// Seed blacklist file; defaults to the built-in seed
        #[arg(short, long)]
        seed: Option<String>,
    },

    /// Measure matcher throughput on a synthetic workload
    Bench {
        /// Synthetic blacklist keys on top of the seed
        #[arg(long, default_value_t = 20_000)]
        domains: usize,

        /// Distinct request URLs
        #[arg(long, default_value_t = 10_000)]
        requests: usize,

        /// Passes over the request set
        #[arg(long, default_value_t = 50)]
        iterations: usize,

        /// Ops per latency sample
        #[arg(long, default_value_t = 256)]
        sample_batch_ops: usize,

        /// Workload RNG seed
        #[arg(long, default_value_t = 0xc0ffee)]
        seed: u32,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            url,
            seed,
            internal_scheme,
        } => cmd_check(&url, seed.as_deref(), &internal_scheme),
        Commands::Compile {
            input,
            output,
            format,
            strict,
            verbose,
        } => cmd_compile(&input, &output, format, strict, verbose),
        Commands::Fetch {
            config,
            collector_url,
            json,
        } => cmd_fetch(config.as_deref(), collector_url, json),
        Commands::Serve {
            config,
            collector_url,
            reload_secs,
            seed,
        } => cmd_serve(config.as_deref(), collector_url, reload_secs, seed.as_deref()),
        Commands::Bench {
            domains,
            requests,
            iterations,
            sample_batch_ops,
            seed,
        } => bench::run(bench::BenchOptions {
            domains,
            requests,
            iterations,
            sample_batch_ops,
            seed,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>, collector_url: Option<String>, reload_secs: Option<u64>) -> Result<Config, String> {
    let mut config = match path {
        Some(path) => {
            Config::from_file(Path::new(path)).map_err(|e| format!("Failed to load config '{}': {}", path, e))?
        }
        None => Config::default(),
    };
    if let Some(url) = collector_url {
        config.collector_url = url;
    }
    if let Some(secs) = reload_secs {
        config.reload_interval_secs = secs;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn cmd_check(url: &str, seed: Option<&str>, internal_scheme: &str) -> Result<(), String> {
    let blacklist = lists::load_seed(seed)?;
    let matcher = Matcher::new(internal_scheme);

    let result = matcher
        .evaluate(&blacklist, url)
        .map_err(|e| format!("Cannot evaluate '{}': {}", url, e))?;

    let json = serde_json::to_string(&result).map_err(|e| format!("Failed to serialize result: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn cmd_compile(
    inputs: &[String],
    output: &str,
    format: Option<ListFormat>,
    strict: bool,
    verbose: bool,
) -> Result<(), String> {
    let (blacklist, stats) = lists::compile_files(inputs, format, strict, verbose)?;
    let json = lists::blacklist_to_json(&blacklist)?;
    lists::write_blacklist(Path::new(output), &json)?;

    println!("Compiled {} list(s) to '{}'", inputs.len(), output);
    println!("  Lines:    {}", stats.lines);
    println!(
        "  Keys:     {} -> {} (merged {}, skipped {})",
        stats.rules_before, stats.rules_after, stats.rules_merged, stats.skipped
    );
    if stats.empty_prefix_lists > 0 {
        println!("  Empty:    {} key(s) with an empty prefix list", stats.empty_prefix_lists);
    }
    println!("  Size:     {} bytes ({:.1} KB)", json.len(), json.len() as f64 / 1024.0);
    println!("  Time:     {:.1}ms", stats.total_ms);

    Ok(())
}

fn cmd_fetch(config: Option<&str>, collector_url: Option<String>, json: bool) -> Result<(), String> {
    let config = load_config(config, collector_url, None)?;
    let collector = HttpCollector::new(&config).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    let keys = runtime
        .block_on(collector.fetch_list())
        .map_err(|e| format!("Failed to fetch '{}': {}", config.list_url(), e))?;
    log::info!("Fetched {} keys from {}", keys.len(), config.list_url());

    if json {
        let blacklist = rf_compiler::compile_domains(&keys);
        println!("{}", lists::blacklist_to_json(&blacklist)?);
    } else {
        for key in &keys {
            println!("{}", key);
        }
    }

    Ok(())
}

fn cmd_serve(
    config: Option<&str>,
    collector_url: Option<String>,
    reload_secs: Option<u64>,
    seed: Option<&str>,
) -> Result<(), String> {
    let config = load_config(config, collector_url, reload_secs)?;
    let seed = lists::load_seed(seed)?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    let _guard = runtime.enter();
    let service = FilterService::start(&config, seed).map_err(|e| e.to_string())?;

    // Requests are answered on this thread; the runtime's workers carry the
    // reloads and reports.
    let mut port = JsonLinesPort::new(io::stdin().lock(), io::stdout().lock());
    port.register(service.handler());
    port.run().map_err(|e| format!("Interception port failed: {}", e))?;

    log::info!("Request stream closed, shutting down");
    Ok(())
}

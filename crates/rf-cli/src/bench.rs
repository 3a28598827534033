use std::cmp::Ordering;
use std::hint::black_box;
use std::time::{Duration, Instant};

use rf_core::seed::seed_blacklist;
use rf_core::{Blacklist, Matcher, ParsedUrl};

pub struct BenchOptions {
    pub domains: usize,
    pub requests: usize,
    pub iterations: usize,
    pub sample_batch_ops: usize,
    pub seed: u32,
}

pub fn run(opts: BenchOptions) -> Result<(), String> {
    if opts.requests == 0 {
        return Err("--requests must be positive".to_string());
    }

    let matcher = Matcher::default();
    let blacklist = synthetic_blacklist(opts.domains, opts.seed);
    let urls = synthetic_requests(opts.requests, opts.seed.wrapping_add(1));
    let passes = opts.iterations.max(1);

    println!("reqfilter matcher benchmark");
    println!(
        "  blacklist {} keys ({} synthetic), {} urls x {} passes, seed {:#x}",
        blacklist.len(),
        opts.domains,
        urls.len(),
        passes,
        opts.seed
    );
    println!();

    // Warm caches and the allocator before timing anything.
    for url in &urls {
        let _ = matcher.evaluate(&blacklist, url);
    }

    measure(&urls, passes / 4 + 1, opts.sample_batch_ops, |url| url.is_empty()).print("Baseline (loop only)");
    println!();

    // Unparseable URLs count as blocked, as they do in the interceptor.
    measure(&urls, passes, opts.sample_batch_ops, |url| ParsedUrl::parse(url).is_err()).print("ParsedUrl::parse");
    println!();

    measure(&urls, passes, opts.sample_batch_ops, |url| {
        !matches!(matcher.evaluate(&blacklist, url), Ok(result) if result.accepted)
    })
    .print("Matcher::evaluate");
    println!();

    println!(
        "Percentiles are per-call averages over batches of {} calls.",
        opts.sample_batch_ops.max(1)
    );

    Ok(())
}

/// Per-op latencies, one sample per batch of ops.
struct Latencies {
    samples_us: Vec<f64>,
}

impl Latencies {
    fn new(mut samples_us: Vec<f64>) -> Self {
        samples_us.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Self { samples_us }
    }

    /// Nearest-rank percentile, `q` in `0.0..=1.0`.
    fn quantile(&self, q: f64) -> f64 {
        let n = self.samples_us.len();
        if n == 0 {
            return 0.0;
        }
        let rank = ((n as f64) * q).ceil() as usize;
        self.samples_us[rank.clamp(1, n) - 1]
    }
}

struct Outcome {
    ops: usize,
    blocked: usize,
    elapsed: Duration,
    latencies: Latencies,
}

impl Outcome {
    fn print(&self, label: &str) {
        let secs = self.elapsed.as_secs_f64();
        let avg_us = if self.ops == 0 { 0.0 } else { secs * 1e6 / self.ops as f64 };
        let throughput = if secs > 0.0 { self.ops as f64 / secs } else { 0.0 };
        let blocked_pct = if self.ops == 0 { 0.0 } else { self.blocked as f64 * 100.0 / self.ops as f64 };

        println!("{label}");
        println!("  ops {} in {:.2} ms ({:.0} ops/sec)", self.ops, secs * 1e3, throughput);
        println!(
            "  avg {:.3} us | p50 {:.3} us | p95 {:.3} us | p99 {:.3} us",
            avg_us,
            self.latencies.quantile(0.50),
            self.latencies.quantile(0.95),
            self.latencies.quantile(0.99)
        );
        println!("  blocked {:.1}%", blocked_pct);
    }
}

/// Run `classify` over every URL `passes` times. `classify` returns whether
/// the URL was blocked; latency is sampled per `batch` calls.
fn measure(urls: &[String], passes: usize, batch: usize, mut classify: impl FnMut(&str) -> bool) -> Outcome {
    let batch = batch.max(1);
    let mut samples_us = Vec::with_capacity(urls.len() * passes / batch + 1);
    let mut blocked = 0usize;
    let mut ops = 0usize;

    let start = Instant::now();
    let mut batch_start = start;
    for url in urls.iter().cycle().take(urls.len() * passes) {
        if black_box(classify(url)) {
            blocked += 1;
        }
        ops += 1;
        if ops % batch == 0 {
            samples_us.push(batch_start.elapsed().as_secs_f64() * 1e6 / batch as f64);
            batch_start = Instant::now();
        }
    }

    Outcome {
        ops,
        blocked,
        elapsed: start.elapsed(),
        latencies: Latencies::new(samples_us),
    }
}

// =============================================================================
// Synthetic workload
// =============================================================================

const TLDS: &[&str] = &["com", "net", "org", "de", "io", "co.uk"];
const SUBDOMAINS: &[&str] = &["www", "cdn", "static", "ads", "api", "img", "stats", "a.b"];
const PATHS: &[&str] = &["/", "/index.html", "/js/app.js", "/count.js", "/pixel.gif", "/api/v1/events?id=1"];

/// Small deterministic generator (Numerical Recipes LCG constants).
struct Lcg(u32);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(1664525).wrapping_add(1013904223);
        f64::from(self.0) / f64::from(u32::MAX)
    }

    fn below(&mut self, n: usize) -> usize {
        ((self.next_unit() * n as f64) as usize).min(n.saturating_sub(1))
    }

    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

fn synthetic_domain(n: usize, rng: &mut Lcg) -> String {
    format!("site{}.{}", n, rng.choose(TLDS))
}

/// Seed list plus `count` synthetic keys, every fourth one a suffix key.
fn synthetic_blacklist(count: usize, seed: u32) -> Blacklist {
    let mut rng = Lcg(seed);
    let mut blacklist = seed_blacklist();
    for n in 0..count {
        let domain = synthetic_domain(n, &mut rng);
        if n % 4 == 0 {
            blacklist.block(format!(".{domain}"));
        } else {
            blacklist.block(domain);
        }
    }
    blacklist
}

/// Request URLs over a domain space of 30k sites; half carry a subdomain.
fn synthetic_requests(count: usize, seed: u32) -> Vec<String> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            let site = rng.below(30_000);
            let domain = synthetic_domain(site, &mut rng);
            let host = if rng.chance(0.5) {
                format!("{}.{}", rng.choose(SUBDOMAINS), domain)
            } else {
                domain
            };
            let scheme = if rng.chance(0.9) { "https" } else { "http" };
            format!("{}://{}{}", scheme, host, rng.choose(PATHS))
        })
        .collect()
}

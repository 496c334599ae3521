//! Opt-in perf counters and logging setup.
//!
//! Perf counters are off unless `TILER_PERF` is set to a non-zero value; when
//! off, every recording call returns immediately.

pub mod logging;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

fn env_truthy(var: &str) -> Option<bool> {
    std::env::var(var).map(|v| v != "0" && !v.is_empty()).ok()
}

static PERF_ENABLED: Lazy<bool> = Lazy::new(|| env_truthy("TILER_PERF").unwrap_or(false));

static STATS: Lazy<Mutex<HashMap<&'static str, PerfStat>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

static GAUGES: Lazy<Mutex<HashMap<&'static str, GaugeStat>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

const REPORT_EVERY: u64 = 200;

#[derive(Default)]
struct GaugeStat {
    last: u64,
    peak: u64,
    samples: u64,
}

#[derive(Default)]
struct PerfStat {
    total_ns: u128,
    max_ns: u128,
    count: u64,
}

pub fn enabled() -> bool {
    *PERF_ENABLED
}

pub fn record_duration(label: &'static str, duration: Duration) {
    if !enabled() {
        return;
    }
    let Ok(mut stats) = STATS.lock() else {
        return;
    };
    let entry = stats.entry(label).or_default();
    entry.count += 1;
    let nanos = duration.as_nanos();
    entry.total_ns += nanos;
    entry.max_ns = entry.max_ns.max(nanos);
    if entry.count % REPORT_EVERY == 0 {
        print_stat(label, entry);
    }
}

pub fn record_gauge(label: &'static str, value: u64) {
    if !enabled() {
        return;
    }
    let Ok(mut gauges) = GAUGES.lock() else {
        return;
    };
    let entry = gauges.entry(label).or_default();
    entry.last = value;
    entry.peak = entry.peak.max(value);
    entry.samples = entry.samples.saturating_add(1);
    if entry.samples % REPORT_EVERY == 0 {
        eprintln!(
            "[perf] {label}: gauge={} peak={} samples={}",
            entry.last, entry.peak, entry.samples
        );
    }
}

fn print_stat(label: &'static str, stat: &PerfStat) {
    let avg_ns = if stat.count > 0 {
        stat.total_ns / stat.count as u128
    } else {
        0
    };
    let avg_us = avg_ns as f64 / 1_000.0;
    let max_us = stat.max_ns as f64 / 1_000.0;
    eprintln!(
        "[perf] {label}: count={} avg={avg_us:.2}µs max={max_us:.2}µs",
        stat.count
    );
}

/// Print every counter collected so far, sorted by label.
pub fn report() {
    if !enabled() {
        return;
    }
    if let Ok(stats) = STATS.lock() {
        let mut labels: Vec<_> = stats.keys().copied().collect();
        labels.sort_unstable();
        for label in labels {
            print_stat(label, &stats[label]);
        }
    }
    if let Ok(gauges) = GAUGES.lock() {
        let mut labels: Vec<_> = gauges.keys().copied().collect();
        labels.sort_unstable();
        for label in labels {
            let gauge = &gauges[label];
            eprintln!("[perf] {label}: gauge={} peak={}", gauge.last, gauge.peak);
        }
    }
}

/// Records the time between construction and drop under `label`.
pub struct PerfGuard {
    label: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(label: &'static str) -> Option<Self> {
        if !enabled() {
            return None;
        }
        Some(Self {
            label,
            start: Instant::now(),
        })
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        record_duration(self.label, self.start.elapsed());
    }
}

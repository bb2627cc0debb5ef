//! Aggregate statistics over a finished load test.

use std::collections::BTreeMap;

use sketches_ddsketch::DDSketch;
use yansi::Paint;

use crate::outcome::{Record, StatusKey};

/// Latency statistics and status distribution of a run.
///
/// Latencies of failed requests are included, since their time to failure is as relevant as the
/// time to a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of requests in the run.
    pub total: u64,
    /// Arithmetic mean latency in milliseconds.
    pub mean_ms: f64,
    /// Lowest latency in milliseconds.
    pub min_ms: f64,
    /// Highest latency in milliseconds.
    pub max_ms: f64,
    /// Approximate median, 90th and 99th percentile in milliseconds.
    pub percentiles_ms: [f64; 3],
    /// Number of requests per status code or failure.
    pub tally: BTreeMap<StatusKey, u64>,
}

impl Summary {
    /// Computes the summary, or `None` if no request was recorded.
    pub fn from_records(records: &[Record]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut sketch = DDSketch::default();
        let mut tally = BTreeMap::new();
        let mut sum = 0.0;
        let mut min_ms = f64::INFINITY;
        let mut max_ms = f64::NEG_INFINITY;

        for record in records {
            let latency = record.outcome.latency_ms();
            sketch.add(latency);
            sum += latency;
            min_ms = min_ms.min(latency);
            max_ms = max_ms.max(latency);
            *tally.entry(record.outcome.status_key()).or_default() += 1;
        }

        let quantile = |q| sketch.quantile(q).ok().flatten().unwrap_or_default();

        Some(Self {
            total: records.len() as u64,
            mean_ms: sum / records.len() as f64,
            min_ms,
            max_ms,
            percentiles_ms: [quantile(0.5), quantile(0.9), quantile(0.99)],
            tally,
        })
    }

    /// Prints the summary to stdout.
    pub fn print(&self) {
        let [p50, p90, p99] = self.percentiles_ms;

        println!();
        println!("{}", "## Load Test Summary".bold());
        println!("Total Requests: {}", self.total.bold());
        println!("Average Latency: {:.2} ms", self.mean_ms.bold());
        println!("Minimum Latency: {:.2} ms", self.min_ms);
        println!("Maximum Latency: {:.2} ms", self.max_ms);
        println!("  p50: {p50:.2} ms; p90: {p90:.2} ms; p99: {p99:.2} ms");

        let distribution = self
            .tally
            .iter()
            .map(|(key, count)| match key {
                StatusKey::Code(code) if *code < 400 => format!("{}: {count}", key.green()),
                _ => format!("{}: {count}", key.red()),
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("Status Code Distribution: {distribution}");
    }
}

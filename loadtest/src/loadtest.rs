//! Runs a sequential load test against a single URL.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use yansi::Paint;

use crate::http::HttpRemote;
use crate::outcome::{FailureKind, Outcome, Record};
use crate::report::{CsvSink, results_filename};
use crate::summary::Summary;

/// Default timeout for each request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause after every request that received a response.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// A builder for creating a [`LoadTest`].
#[derive(Debug)]
pub struct LoadTestBuilder {
    url: String,
    requests: u64,
    timeout: Duration,
    delay: Duration,
    output_dir: PathBuf,
}

impl LoadTestBuilder {
    /// The number of requests to send.
    pub fn requests(mut self, requests: u64) -> Self {
        self.requests = requests;
        self
    }

    /// The maximum time a single request may take before it is recorded as failed.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The pause after each request that received a response.
    ///
    /// Failed requests are followed by the next attempt immediately.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The directory in which the CSV results file is created.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Creates the load test instance.
    pub fn build(self) -> LoadTest {
        LoadTest {
            url: self.url,
            requests: self.requests,
            timeout: self.timeout,
            delay: self.delay,
            output_dir: self.output_dir,
        }
    }
}

/// A sequence of `GET` requests against one URL.
#[derive(Debug)]
pub struct LoadTest {
    url: String,
    requests: u64,
    timeout: Duration,
    delay: Duration,
    output_dir: PathBuf,
}

/// Everything a finished [`LoadTest`] produced.
#[derive(Debug)]
pub struct Report {
    /// Path of the CSV results file.
    pub path: PathBuf,
    /// One record per request, in the order they were sent.
    pub records: Vec<Record>,
    /// Aggregate statistics, absent if no request was sent.
    pub summary: Option<Summary>,
}

impl LoadTest {
    /// Returns a builder for a load test against `url`.
    ///
    /// Defaults to zero requests, a timeout of 5 seconds, a delay of 50 milliseconds and the
    /// current working directory for output. A malformed `url` does not abort the run. Every
    /// request is recorded as failed instead.
    pub fn builder(url: impl Into<String>) -> LoadTestBuilder {
        LoadTestBuilder {
            url: url.into(),
            requests: 0,
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            output_dir: PathBuf::from("."),
        }
    }

    /// Sends all requests one after another and records their outcomes.
    ///
    /// Each record is written to the CSV file before the next request is sent. Transport failures
    /// are recorded and printed, but never end the run. Only errors creating or writing the
    /// results file abort it.
    pub async fn run(self) -> Result<Report> {
        let started = Local::now().naive_local();
        let path = self.output_dir.join(results_filename(started));
        let mut sink = CsvSink::create(&path)
            .with_context(|| format!("failed to create results file {}", path.display()))?;

        let remote =
            HttpRemote::new(self.url, self.timeout).context("failed to build HTTP client")?;

        println!(
            "{} {} ({} requests)",
            "## Load testing".bold(),
            remote.url().blue(),
            self.requests.bold()
        );

        let mut records = Vec::new();
        for number in 1..=self.requests {
            let start = Instant::now();
            let result = remote.get().await;
            let latency = start.elapsed();

            let outcome = match result {
                Ok(status) => Outcome::Success { status, latency },
                Err(err) => {
                    eprintln!("{}", format!("Request {number} failed: {err}").red());
                    Outcome::Failure {
                        kind: FailureKind::classify(&err),
                        latency,
                    }
                }
            };

            let record = Record { number, outcome };
            records.push(record);
            sink.write(&record)
                .with_context(|| format!("failed to write to {}", path.display()))?;

            if outcome.is_success() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let summary = Summary::from_records(&records);
        if let Some(ref summary) = summary {
            summary.print();
        }
        println!("Results written to {}", path.display());

        Ok(Report {
            path,
            records,
            summary,
        })
    }
}

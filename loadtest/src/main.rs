//! This is a load testing binary which sends a fixed number of sequential `GET` requests to a
//! URL, records the latency and status of each in a CSV file, and prints summary statistics.
//!
//! ```text
//! load-test http://localhost:5000/unstable 500
//! ```
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::path::PathBuf;

use argh::FromArgs;
use loadtest::LoadTest;

/// Send sequential GET requests to a URL and record their latency
#[derive(Debug, FromArgs)]
pub struct Args {
    /// the URL to request
    #[argh(positional)]
    pub url: String,

    /// the number of requests to send
    #[argh(positional)]
    pub requests: u64,

    /// timeout of each request, such as `5s` or `500ms`
    #[argh(option, default = "loadtest::loadtest::DEFAULT_TIMEOUT.into()")]
    pub timeout: humantime::Duration,

    /// pause after each answered request, such as `50ms`
    #[argh(option, default = "loadtest::loadtest::DEFAULT_DELAY.into()")]
    pub delay: humantime::Duration,

    /// directory in which the CSV results file is created
    #[argh(option, default = "PathBuf::from(\".\")")]
    pub output_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    LoadTest::builder(args.url)
        .requests(args.requests)
        .timeout(args.timeout.into())
        .delay(args.delay.into())
        .output_dir(args.output_dir)
        .build()
        .run()
        .await?;

    Ok(())
}

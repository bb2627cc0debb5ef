//! Keeps one CPU core busy for a number of seconds.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::time::Duration;

use argh::FromArgs;
use resource_stress::cpu::stress_cpu;

/// Burn CPU cycles on a single core for a fixed duration
#[derive(Debug, FromArgs)]
struct Args {
    /// how long to run, in seconds
    #[argh(positional, from_str_fn(resource_stress::parse_seconds))]
    duration_in_seconds: Duration,
}

fn main() {
    let args: Args = argh::from_env();
    let duration = args.duration_in_seconds;

    resource_stress::print_start("CPU", duration);
    let report = stress_cpu(duration);
    println!("Completed {} passes in {:.2?}", report.passes, report.elapsed);
    resource_stress::print_end("CPU");
}

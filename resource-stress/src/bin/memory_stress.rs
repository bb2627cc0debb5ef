//! Grows memory usage in 10 MiB steps and holds it for a number of seconds.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::time::Duration;

use argh::FromArgs;
use bytesize::ByteSize;
use resource_stress::memory::MemoryStress;

/// Allocate memory step by step and hold it for a fixed duration
#[derive(Debug, FromArgs)]
struct Args {
    /// how long to run, in seconds
    #[argh(positional, from_str_fn(resource_stress::parse_seconds))]
    duration_in_seconds: Duration,
}

fn main() {
    let args: Args = argh::from_env();
    let duration = args.duration_in_seconds;

    resource_stress::print_start("Memory", duration);
    let report = MemoryStress::default().run(duration);
    println!(
        "Released {} in {} blocks",
        ByteSize::b(report.bytes),
        report.blocks
    );
    resource_stress::print_end("Memory");
}

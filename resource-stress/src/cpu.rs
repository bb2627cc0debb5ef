//! Keeps one CPU core busy with integer arithmetic.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Number of iterations between two checks of the clock.
pub const PASS_ITERATIONS: u64 = 1_000_000;

/// What a finished CPU stress run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuReport {
    /// Number of completed passes of [`PASS_ITERATIONS`] iterations each.
    pub passes: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Runs one pass, accumulating the squares of `0..PASS_ITERATIONS`.
///
/// Every input goes through [`black_box`] so the loop cannot be folded into a closed form.
pub fn burn_pass() -> u64 {
    (0..PASS_ITERATIONS).fold(0u64, |acc, i| {
        let i = black_box(i);
        acc.wrapping_add(i.wrapping_mul(i))
    })
}

/// Burns CPU on the calling thread until `duration` has elapsed.
///
/// The deadline is only checked between passes, never inside one. A duration too long to
/// represent as a deadline runs indefinitely.
pub fn stress_cpu(duration: Duration) -> CpuReport {
    let start = Instant::now();
    let deadline = crate::deadline(start, duration);

    let mut passes = 0;
    while !crate::expired(deadline) {
        black_box(burn_pass());
        passes += 1;
    }

    CpuReport {
        passes,
        elapsed: start.elapsed(),
    }
}

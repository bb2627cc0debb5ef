//! Tools that put a bounded amount of pressure on the host's CPU or memory.
//!
//! Both stressors are single-threaded and check the clock only between units of work, so they
//! overshoot their deadline by at most one unit. They are meant to be run as separate processes
//! (`cpu-stress` and `memory-stress`) while monitoring observes the host.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::time::{Duration, Instant};

use chrono::Local;
use yansi::Paint;

pub mod cpu;
pub mod memory;

/// Returns the instant at which a run of `duration` starting at `start` ends.
///
/// Returns `None` if the deadline lies beyond what [`Instant`] can represent. Such a run has no
/// deadline.
pub fn deadline(start: Instant, duration: Duration) -> Option<Instant> {
    start.checked_add(duration)
}

/// Returns `true` once `deadline` has passed.
fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Parses a whole number of seconds from the command line.
///
/// Rejects durations whose deadline cannot be represented on this host.
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: u64 = value
        .parse()
        .map_err(|err| format!("invalid number of seconds {value:?}: {err}"))?;
    let duration = Duration::from_secs(seconds);

    match deadline(Instant::now(), duration) {
        Some(_) => Ok(duration),
        None => Err(format!("duration of {seconds} seconds is too long")),
    }
}

/// Prints the banner announcing the start of a stress test.
pub fn print_start(resource: &str, duration: Duration) {
    println!();
    println!("{}", format!("--- {resource} Stress Test Starting ---").bold());
    println!("Start Time: {}", Local::now());
    println!(
        "Running {} stress for {} seconds...",
        resource.to_lowercase(),
        duration.as_secs().bold()
    );
    println!();
}

/// Prints the banner announcing the end of a stress test.
pub fn print_end(resource: &str) {
    println!();
    println!("{}", format!("--- {resource} Stress Test Completed ---").bold());
    println!("End Time: {}", Local::now());
    println!(
        "{}",
        format!("{resource} stress simulation finished successfully.").green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrepresentable_deadline_is_none() {
        assert_eq!(deadline(Instant::now(), Duration::MAX), None);
    }

    #[test]
    fn missing_deadline_never_expires() {
        assert!(!expired(None));
        assert!(expired(Some(Instant::now())));
    }

    #[test]
    fn parses_seconds() {
        assert_eq!(parse_seconds("3"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_seconds("0"), Ok(Duration::ZERO));
        assert!(parse_seconds("soon").is_err());
        assert!(parse_seconds("-1").is_err());
    }

    #[test]
    fn rejects_seconds_beyond_any_deadline() {
        let err = parse_seconds("18446744073709551615").unwrap_err();
        assert!(err.contains("too long"), "unexpected error: {err}");
    }
}

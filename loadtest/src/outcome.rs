//! Types describing the result of a single load test request.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Groups outcomes for the status distribution.
///
/// Numeric status codes sort before the [`StatusKey::Error`] sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusKey {
    /// The server responded with this HTTP status code.
    Code(u16),
    /// The request failed before a response was received.
    Error,
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKey::Code(code) => write!(f, "{code}"),
            StatusKey::Error => f.write_str("ERROR"),
        }
    }
}

impl Serialize for StatusKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why a request failed at the transport level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// No connection could be established.
    Connect,
    /// Any other client error, such as a broken response body.
    Other,
}

impl FailureKind {
    /// Classifies an HTTP client error.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_connect() {
            FailureKind::Connect
        } else {
            FailureKind::Other
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Other => "other",
        })
    }
}

/// The result of one request.
///
/// Both variants carry the latency: for failures this is the time until the failure surfaced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// The server responded.
    Success {
        /// HTTP status code of the response, which may well be an error status.
        status: u16,
        /// Time from sending the request until the response body was read.
        latency: Duration,
    },
    /// The request failed before a response was received.
    Failure {
        /// Classification of the failure.
        kind: FailureKind,
        /// Time from sending the request until it failed.
        latency: Duration,
    },
}

impl Outcome {
    /// Returns the latency of the request.
    pub fn latency(&self) -> Duration {
        match *self {
            Outcome::Success { latency, .. } | Outcome::Failure { latency, .. } => latency,
        }
    }

    /// Returns the latency in fractional milliseconds.
    pub fn latency_ms(&self) -> f64 {
        self.latency().as_nanos() as f64 / 1_000_000.0
    }

    /// Returns the key under which this outcome is tallied.
    pub fn status_key(&self) -> StatusKey {
        match *self {
            Outcome::Success { status, .. } => StatusKey::Code(status),
            Outcome::Failure { .. } => StatusKey::Error,
        }
    }

    /// Returns `true` if the server responded, regardless of the status code.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// An [`Outcome`] together with its 1-based position in the run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    /// Sequence number of the request, starting at 1.
    pub number: u64,
    /// What happened.
    pub outcome: Outcome,
}

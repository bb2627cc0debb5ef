//! This is a load testing library which drives a single URL with sequential `GET` requests.
//!
//! Every request is timed and classified into an [`Outcome`]: either the server answered with a
//! status code, or the request failed at the transport level (timeout, refused connection, DNS).
//! Failures never abort a run. They are recorded with their time to failure like any other
//! request.
//!
//! Each [`Record`] is appended to a CSV file as soon as it is known, and a [`Summary`] of the
//! latencies and the status distribution is printed at the end.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod http;
pub mod loadtest;
pub mod outcome;
pub mod report;
pub mod summary;

pub use crate::loadtest::{LoadTest, Report};
pub use crate::outcome::{FailureKind, Outcome, Record, StatusKey};
pub use crate::summary::Summary;

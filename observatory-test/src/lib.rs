//! Test utilities for the observatory server and the tools that target it.
//!
//! This crate provides utilities to facilitate testing of the observatory server. See the
//! modules for all available utilities.

pub mod server;
pub mod tracing;

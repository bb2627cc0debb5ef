//! The observability demo service.
//!
//! This exposes a handful of `HTTP` endpoints that succeed, fail, fail at random, or respond
//! slowly. Together with the `loadtest` and `resource-stress` tools it produces traffic and
//! resource pressure for external monitoring to pick up.

pub mod cli;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod healthcheck;
pub mod observability;
pub mod random;
pub mod state;
pub mod web;

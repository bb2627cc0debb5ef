//! Contains all HTTP endpoint handlers.
//!
//! Use [`routes`] to create a router with all endpoints.

use axum::Router;
use serde::Serialize;

use crate::state::ServiceState;

mod demo;
pub mod health;

pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(health::router())
        .merge(demo::router())
}

/// JSON body shared by all endpoints that report a status.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    /// One of `healthy`, `success` or `error`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl StatusBody {
    pub fn success(message: &'static str) -> Self {
        Self {
            status: "success",
            message: Some(message),
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            status: "error",
            message: Some(message),
        }
    }
}

//! Endpoints that succeed, fail, or slow down on purpose.

use axum::extract::State;
use axum::{Json, Router, routing};
use serde::Serialize;

use crate::endpoints::StatusBody;
use crate::error::{ApiError, ApiResult};
use crate::state::ServiceState;

/// Plain text body of the root endpoint.
pub const HOME_MESSAGE: &str = "Observability Pipeline Running";

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/", routing::get(home))
        .route("/trigger-error", routing::get(trigger_error))
        .route("/unstable", routing::get(unstable))
        .route("/slow", routing::get(slow))
}

async fn home() -> &'static str {
    tracing::info!("Root endpoint accessed successfully");
    HOME_MESSAGE
}

async fn trigger_error() -> ApiResult<Json<StatusBody>> {
    tracing::error!("Simulated error triggered via /trigger-error");
    Err(ApiError::Simulated("Simulated application failure"))
}

async fn unstable(State(state): State<ServiceState>) -> ApiResult<Json<StatusBody>> {
    let roll = state.random.next_f64();
    if roll < state.config.endpoints.unstable_failure_rate {
        tracing::error!(roll, "Unstable endpoint failed");
        return Err(ApiError::Simulated("Random failure occurred"));
    }

    tracing::info!(roll, "Unstable endpoint succeeded");
    Ok(Json(StatusBody::success("Request completed successfully")))
}

#[derive(Debug, Serialize)]
struct SlowBody {
    #[serde(flatten)]
    status: StatusBody,
    delay_ms: u64,
}

async fn slow(State(state): State<ServiceState>) -> Json<SlowBody> {
    let delay = state.config.endpoints.slow_delay;
    tracing::info!(?delay, "Slow endpoint accessed, delaying response");

    tokio::time::sleep(delay).await;

    Json(SlowBody {
        status: StatusBody::success("Delayed response"),
        delay_ms: delay.as_millis() as u64,
    })
}

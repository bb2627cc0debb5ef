use axum::{Json, Router, routing};

use crate::endpoints::StatusBody;
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new().route("/health", routing::get(health))
}

async fn health() -> Json<StatusBody> {
    tracing::info!("Health check endpoint accessed");
    Json(StatusBody {
        status: "healthy",
        message: None,
    })
}

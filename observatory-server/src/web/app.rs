use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sentry::integrations::tower::{NewSentryLayer, SentryHttpLayer};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use crate::endpoints;
use crate::state::ServiceState;
use crate::web::middleware as m;

/// The demo routes wrapped in the request middleware.
#[derive(Debug)]
pub struct App {
    router: axum::Router,
}

impl App {
    /// Creates the application for the given service state.
    pub fn new(state: ServiceState) -> Self {
        // Layers run top to bottom on requests and bottom to top on responses.
        let middleware = ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(m::handle_panic))
            .layer(m::set_server_header())
            .layer(NewSentryLayer::new_from_top())
            .layer(SentryHttpLayer::new().enable_transaction())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(m::make_http_span)
                    .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
            );

        let router = endpoints::routes().layer(middleware).with_state(state);
        App { router }
    }

    /// Serves requests on `listener` until `shutdown` resolves.
    ///
    /// Once `shutdown` resolves, no new connections are accepted and the future completes after
    /// all in-flight requests have been answered.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let service =
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(self.router);

        axum::serve(listener, service)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

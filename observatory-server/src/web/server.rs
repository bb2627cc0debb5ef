use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal::unix::SignalKind;

use crate::config::Config;
use crate::state::State;
use crate::web::app::App;

/// Binds the configured address and serves the demo routes until a termination signal arrives.
///
/// SIGTERM, SIGINT, SIGHUP and SIGQUIT stop accepting connections. In-flight requests are
/// answered before this returns.
pub async fn server(config: Config) -> Result<()> {
    let addr = config.http_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {addr}");

    let app = App::new(State::new(config));
    tracing::info!("Application initialised successfully");

    let shutdown = elegant_departure::get_shutdown_guard().wait_owned();
    let serving = tokio::spawn(app.serve(listener, shutdown));

    elegant_departure::tokio::depart()
        .on_termination()
        .on_sigint()
        .on_signal(SignalKind::hangup())
        .on_signal(SignalKind::quit())
        .await;

    serving.await.context("server task failed")??;
    tracing::info!("Shutdown complete");
    Ok(())
}

//! Exposes an in-process test server for use in integration tests.
//!
//! ```
//! use observatory_test::server::TestServer;
//!
//! #[tokio::main]
//! async fn main() {
//!    let server = TestServer::new().await;
//!    let url = server.url("/health");
//!    // use the URL in tests...
//! }
//! ```

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use observatory_server::config::Config;
use observatory_server::random::RandomSource;
use observatory_server::state::{ServiceState, State};
use observatory_server::web::App;

/// An in-process test server for use in integration tests.
///
/// This server runs the full observatory application with all middleware. It listens on a random
/// available port on localhost and stops when dropped.
#[derive(Debug)]
pub struct TestServer {
    handle: tokio::task::JoinHandle<()>,
    socket: SocketAddr,
}

impl TestServer {
    /// Starts a server with the default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Starts a server with the given configuration.
    ///
    /// The configured `http_addr` is ignored in favor of a random local port.
    pub async fn with_config(config: Config) -> Self {
        Self::with_state(State::new(config)).await
    }

    /// Starts a server that draws from the given random source.
    pub async fn with_random(config: Config, random: Arc<dyn RandomSource>) -> Self {
        Self::with_state(State::with_random(config, random)).await
    }

    async fn with_state(state: ServiceState) -> Self {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).unwrap();
        listener.set_nonblocking(true).unwrap();
        let socket = listener.local_addr().unwrap();

        let app = App::new(state);

        let handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            app.serve(listener, std::future::pending()).await.unwrap();
        });

        Self { handle, socket }
    }

    /// Returns a full URL pointing to the given path.
    ///
    /// This URL uses `localhost` as hostname.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("http://localhost:{}/{}", self.socket.port(), path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

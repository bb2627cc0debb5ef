use std::sync::Arc;

use crate::config::Config;
use crate::random::{RandomSource, SeededRandom, ThreadRandom};

/// Shared reference to the observatory [service state](State).
pub type ServiceState = Arc<State>;

/// Everything request handlers need to produce their responses.
///
/// This structure is created during server startup and shared with all HTTP request handlers.
/// In request handlers, use `axum::extract::State<ServiceState>` to retrieve a shared reference to
/// this structure.
#[derive(Debug)]
pub struct State {
    /// The server configuration.
    pub config: Config,
    /// Random source driving `/unstable`.
    pub random: Arc<dyn RandomSource>,
}

impl State {
    /// Creates the state with the random source selected by the configuration.
    ///
    /// A configured `random_seed` yields a [`SeededRandom`], otherwise [`ThreadRandom`] is used.
    pub fn new(config: Config) -> ServiceState {
        let random: Arc<dyn RandomSource> = match config.random_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };

        Self::with_random(config, random)
    }

    /// Creates the state with an explicit random source.
    pub fn with_random(config: Config, random: Arc<dyn RandomSource>) -> ServiceState {
        Arc::new(Self { config, random })
    }
}

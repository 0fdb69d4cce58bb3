use std::sync::Arc;

use crate::config::Config;
use crate::spotify::SpotifyClient;
use crate::store::{MemoryStore, SessionStore};

/// The application's state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The session store holding one access token per browser session.
    pub sessions: Arc<dyn SessionStore>,
    /// The client used for token exchange and playlist fetches.
    pub spotify: SpotifyClient,
}

impl AppState {
    /// Creates a new `AppState` backed by the in-memory session store.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    pub fn new(config: &Config) -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        tracing::info!("✅ In-memory session store initialized");

        let spotify = SpotifyClient::new(config);

        AppState {
            config: config.clone(),
            sessions,
            spotify,
        }
    }
}

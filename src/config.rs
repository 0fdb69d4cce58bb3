use std::env;
use anyhow::{Context, Result};
use reqwest::Url;
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The Spotify application client ID.
    pub client_id: String,
    /// The Spotify application client secret.
    pub client_secret: Zeroizing<String>,
    /// The OAuth redirect URL registered with Spotify.
    pub redirect_url: String,
    /// The single frontend origin allowed by CORS and used as the
    /// post-callback redirect target.
    pub frontend_origin: String,
    /// The address the HTTP server binds to.
    pub bind_addr: String,
    /// Spotify's authorization endpoint.
    pub auth_url: Url,
    /// Spotify's token exchange endpoint.
    pub token_url: String,
    /// Base URL of the Spotify Web API.
    pub api_url: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// The Spotify credentials and redirect URL are required; everything else
    /// falls back to defaults matching a local development setup.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let auth_url = env::var("SPOTIFY_AUTH_URL")
            .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string());

        Ok(Self {
            client_id: env::var("SPOTIFY_CLIENT_ID")
                .context("SPOTIFY_CLIENT_ID must be set")?,
            client_secret: Zeroizing::new(
                env::var("SPOTIFY_CLIENT_SECRET")
                    .context("SPOTIFY_CLIENT_SECRET must be set")?,
            ),
            redirect_url: env::var("SPOTIFY_REDIRECT_URL")
                .context("SPOTIFY_REDIRECT_URL must be set")?,
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            auth_url: Url::parse(&auth_url)
                .context("SPOTIFY_AUTH_URL must be a valid URL")?,
            token_url: env::var("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string()),
            api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
        })
    }
}

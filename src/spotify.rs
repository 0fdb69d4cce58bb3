//! Thin client over the Spotify accounts and Web API endpoints.
//!
//! The endpoint URLs come from [`Config`] so tests can point the client at a
//! local stand-in for Spotify.

use std::future::Future;

use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};

/// A single entry of a playlist page as Spotify returns it.
///
/// `track` is null for local or no-longer-available tracks; those entries
/// carry no usable metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

/// The track fields the aggregator cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsPage {
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The remote playlist capability used by the aggregator.
///
/// Production code talks to Spotify through [`SpotifyClient`]; tests swap in
/// a scripted source.
pub trait PlaylistSource: Send + Sync {
    /// Fetches one page of playlist items starting at `offset`.
    fn playlist_items(
        &self,
        token: &str,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<PlaylistItem>>> + Send;
}

/// HTTP client for the two Spotify surfaces this service touches: the token
/// endpoint and the playlist items endpoint.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: zeroize::Zeroizing<String>,
    redirect_url: String,
    token_url: String,
    api_url: String,
}

impl SpotifyClient {
    /// Creates a new `SpotifyClient` from the application configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            token_url: config.token_url.clone(),
            api_url: config.api_url.clone(),
        }
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// The request authenticates with HTTP basic auth using the client id and
    /// secret. Any rejection from the provider (expired, reused, or malformed
    /// code) surfaces as [`AppError::ExchangeFailed`].
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(self.client_secret.as_str()))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ExchangeFailed(e.to_string()))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExchangeFailed(e.to_string()))?;

        Ok(token.access_token)
    }
}

impl PlaylistSource for SpotifyClient {
    async fn playlist_items(
        &self,
        token: &str,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PlaylistItem>> {
        let url = format!(
            "{}/playlists/{}/tracks?offset={}&limit={}",
            self.api_url, playlist_id, offset, limit
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::RemoteFetchFailed(e.to_string()))?;

        let page: PlaylistItemsPage = response
            .json()
            .await
            .map_err(|e| AppError::RemoteFetchFailed(e.to_string()))?;

        Ok(page.items)
    }
}

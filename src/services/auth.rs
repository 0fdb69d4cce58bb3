use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use reqwest::Url;

use crate::config::Config;

/// The size of the OAuth state token in bytes.
const STATE_TOKEN_SIZE: usize = 16;

/// Generates the random anti-forgery `state` value for a login attempt.
///
/// # Returns
///
/// A URL-safe base64-encoded token with 128 bits of entropy.
pub fn generate_state() -> String {
    let mut token = [0u8; STATE_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

/// Builds the provider authorization URL for a fresh login attempt.
///
/// Embeds a newly generated state token. The token is not retained server
/// side, so the callback does not verify it against anything.
pub fn authorize_url(config: &Config) -> Url {
    let mut url = config.auth_url.clone();

    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_url)
        .append_pair("scope", "playlist-read-private")
        .append_pair("state", &generate_state());

    url
}

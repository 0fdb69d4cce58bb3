//! Backend relay between a browser frontend and the Spotify Web API.
//!
//! Handles the OAuth2 authorization-code flow, keeps the resulting access
//! token in a per-browser session, and flattens playlist tracks into the
//! compact JSON shape the frontend renders.

pub mod config;
pub mod error;
pub mod router;
pub mod spotify;
pub mod state;
pub mod store;

pub mod models {
    pub mod track;
}

pub mod services {
    pub mod auth;
    pub mod playlist;
}

pub mod handlers {
    pub mod auth;
    pub mod playlist;
}

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use http::{HeaderValue, Method, header};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::handlers;
use crate::state::AppState;

/// Builds the application router with CORS, cookie, and trace layers.
///
/// Only the configured frontend origin may make credentialed cross-origin
/// requests, restricted to GET/POST/OPTIONS and a fixed header allowlist.
pub fn router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state
        .config
        .frontend_origin
        .parse()
        .context("FRONTEND_ORIGIN must be a valid origin")?;

    let cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true);

    let app = Router::new()
        .route("/login", get(handlers::auth::login))
        .route("/callback", get(handlers::auth::callback))
        .route("/api/playlist", get(handlers::playlist::get_playlist))
        .route("/logout", post(handlers::auth::logout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

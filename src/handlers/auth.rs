use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    services::auth as auth_service,
    state::AppState,
    store::SESSION_TTL_SECS,
};

/// The name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// The session key the access token is stored under.
pub const TOKEN_KEY: &str = "spotify_token";

/// The query parameters Spotify appends to the callback redirect.
#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
}

/// The response payload for logout.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Creates the session cookie.
fn create_session_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);

    let is_production = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);
    if is_production {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(SESSION_TTL_SECS));
    cookie.set_path("/");

    cookie
}

/// A 302 redirect to the given location.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Starts the OAuth authorization-code flow by redirecting the browser to
/// Spotify's authorization page.
#[axum::debug_handler]
pub async fn login(State(state): State<AppState>) -> Response {
    let url = auth_service::authorize_url(&state.config);
    tracing::debug!("🔑 Redirecting to Spotify authorization");

    found(url.as_str())
}

/// Completes the OAuth flow: exchanges the authorization code, binds the
/// access token to the session, and sends the browser back to the frontend
/// with the token in the query string.
#[axum::debug_handler]
pub async fn callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let code = params
        .code
        .ok_or_else(|| AppError::ExchangeFailed("missing code parameter".to_string()))?;

    let token = state.spotify.exchange_code(&code).await?;

    let session_id = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    state
        .sessions
        .set(&session_id, TOKEN_KEY, token.clone())
        .map_err(|e| AppError::SessionUnavailable(e.to_string()))?;

    cookies.add(create_session_cookie(session_id.clone()));
    tracing::info!("✅ Access token bound to session {}", session_id);

    let redirect = format!("{}/?token={}", state.config.frontend_origin, token);
    Ok(found(&redirect))
}

/// Destroys the session server-side and clears its cookie.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();

        state
            .sessions
            .destroy(&session_id)
            .map_err(|e| AppError::DestroyFailed(e.to_string()))?;

        // The cookie is only removed once the server-side session is gone.
        let mut session_cookie = Cookie::new(SESSION_COOKIE, "");
        session_cookie.set_max_age(Duration::seconds(0));
        session_cookie.set_path("/");
        cookies.remove(session_cookie);

        tracing::info!("👋 Session destroyed: {}", session_id);
    }

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

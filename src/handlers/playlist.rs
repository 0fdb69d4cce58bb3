use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    handlers::auth::{SESSION_COOKIE, TOKEN_KEY},
    services::playlist as playlist_service,
    state::AppState,
};

/// The query parameters for the playlist endpoint.
#[derive(Deserialize, Debug)]
pub struct PlaylistQuery {
    pub link: Option<String>,
}

/// Returns the flattened tracks of the linked playlist as a JSON array.
///
/// The link is validated before anything else; the session token check comes
/// next, so no remote call is ever made for an invalid request.
#[axum::debug_handler]
pub async fn get_playlist(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<PlaylistQuery>,
) -> Result<Response> {
    let link = params
        .link
        .filter(|l| !l.is_empty())
        .ok_or(AppError::MissingLink)?;

    let session_id = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthenticated)?;

    let token = state
        .sessions
        .get(&session_id, TOKEN_KEY)
        .map_err(|e| AppError::SessionUnavailable(e.to_string()))?
        .ok_or(AppError::Unauthenticated)?;

    let playlist_id = playlist_service::extract_playlist_id(&link);
    tracing::debug!("🎵 Fetching playlist {}", playlist_id);

    let records = playlist_service::fetch_flattened(&state.spotify, &token, playlist_id).await?;

    tracing::info!("✅ Flattened {} tracks from playlist {}", records.len(), playlist_id);

    Ok(Json(records).into_response())
}

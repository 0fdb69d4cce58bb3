use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The session backend could not be read or written.
    #[error("Session store error: {0}")]
    SessionUnavailable(String),

    /// The provider rejected the authorization code exchange.
    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),

    /// No access token is stored in the session.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The playlist link query parameter was missing or empty.
    #[error("Playlist link is required")]
    MissingLink,

    /// A remote playlist call failed.
    #[error("Remote fetch failed: {0}")]
    RemoteFetchFailed(String),

    /// Server-side session teardown failed.
    #[error("Session destroy failed: {0}")]
    DestroyFailed(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::SessionUnavailable(ref e) => {
                tracing::error!("Session store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get session".to_string())
            }

            AppError::ExchangeFailed(ref e) => {
                tracing::warn!("Token exchange failed: {}", e);
                (StatusCode::UNAUTHORIZED, "Failed to exchange token".to_string())
            }

            AppError::Unauthenticated => {
                tracing::warn!("Request without a session token");
                (StatusCode::UNAUTHORIZED, "Please login first".to_string())
            }

            AppError::MissingLink => {
                tracing::debug!("Playlist request without a link");
                (StatusCode::BAD_REQUEST, "Playlist link is required".to_string())
            }

            AppError::RemoteFetchFailed(ref e) => {
                tracing::error!("Remote playlist fetch failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get playlist tracks".to_string())
            }

            AppError::DestroyFailed(ref e) => {
                tracing::error!("Session destroy failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to destroy session".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}

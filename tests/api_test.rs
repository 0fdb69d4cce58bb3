use std::collections::HashMap;

use axum::{
    Form, Json, Router,
    body::Body,
    response::IntoResponse,
    routing::{get, post},
};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use zeroize::Zeroizing;

use std::sync::Arc;

use tracklist::{
    config::Config,
    router::router,
    spotify::SpotifyClient,
    state::AppState,
    store::{SessionStore, StoreError},
};

/// Stands in for Spotify's token and playlist endpoints on an ephemeral port.
async fn spawn_mock_provider() -> String {
    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .route("/v1/playlists/{id}/tracks", get(tracks_endpoint));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn token_endpoint(Form(form): Form<HashMap<String, String>>) -> axum::response::Response {
    if form.get("code").map(String::as_str) == Some("good-code") {
        Json(json!({
            "access_token": "test-access-token",
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response()
    }
}

async fn tracks_endpoint() -> Json<Value> {
    Json(json!({
        "items": [
            {
                "track": {
                    "name": "First Song",
                    "artists": [{"name": "Artist A"}, {"name": "Artist B"}],
                    "album": {
                        "name": "Album One",
                        "images": [
                            {"url": "https://img/large"},
                            {"url": "https://img/medium"},
                            {"url": "https://img/small"}
                        ]
                    }
                }
            },
            {
                "track": {
                    "name": "Second Song",
                    "artists": [{"name": "Artist C"}],
                    "album": {"name": "Album Two", "images": [{"url": "https://img/only"}]}
                }
            }
        ]
    }))
}

fn test_config(provider: &str) -> Config {
    Config {
        client_id: "test-client".to_string(),
        client_secret: Zeroizing::new("test-secret".to_string()),
        redirect_url: "http://127.0.0.1:8080/callback".to_string(),
        frontend_origin: "http://localhost:5173".to_string(),
        bind_addr: "127.0.0.1:8080".to_string(),
        auth_url: "https://accounts.example/authorize".parse().unwrap(),
        token_url: format!("{}/api/token", provider),
        api_url: format!("{}/v1", provider),
    }
}

fn test_app(provider: &str) -> Router {
    let config = test_config(provider);
    router(AppState::new(&config)).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Extracts the `session_id=...` pair from a Set-Cookie header, checking the
/// cookie attributes along the way.
fn session_cookie_of(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("no session cookie set")
        .to_str()
        .unwrap();

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=3600"));

    let pair = set_cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with("session_id="));
    pair
}

#[tokio::test]
async fn login_redirects_to_provider_with_state() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let response = app
        .oneshot(get_request("/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://accounts.example/authorize?"));
    assert!(location.contains("client_id=test-client"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("scope=playlist-read-private"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn cors_allows_the_configured_frontend_origin() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let request = Request::builder()
        .uri("/login")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn playlist_without_link_is_bad_request() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let response = app
        .oneshot(get_request("/api/playlist", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Playlist link is required");
}

#[tokio::test]
async fn playlist_with_empty_link_is_bad_request() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let response = app
        .oneshot(get_request("/api/playlist?link=", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn playlist_without_session_is_unauthorized() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let response = app
        .oneshot(get_request("/api/playlist?link=abc123", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Please login first");
}

#[tokio::test]
async fn callback_with_rejected_code_is_unauthorized() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let response = app
        .oneshot(get_request("/callback?code=wrong-code", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Failed to exchange token");
}

#[tokio::test]
async fn callback_without_code_is_unauthorized() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    let response = app.oneshot(get_request("/callback", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_flow_callback_playlist_logout() {
    let provider = spawn_mock_provider().await;
    let app = test_app(&provider);

    // Callback: exchange the code, bind the token to a fresh session.
    let response = app
        .clone()
        .oneshot(get_request("/callback?code=good-code&state=whatever", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://localhost:5173/?token=test-access-token"
    );
    let cookie = session_cookie_of(&response);

    // Fetch the playlist through the stored token. The share link's id
    // segment and query string are handled by the extraction.
    let link = "https%3A%2F%2Fopen.spotify.com%2Fplaylist%2Fabc123%3Fsi%3Dxyz";
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/playlist?link={}", link),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tracks = body_json(response).await;
    assert_eq!(
        tracks,
        json!([
            {
                "name": "First Song",
                "artist": "Artist A, Artist B",
                "album": "Album One",
                "image": "https://img/medium"
            },
            {
                "name": "Second Song",
                "artist": "Artist C",
                "album": "Album Two",
                "image": ""
            }
        ])
    );

    // Logout destroys the session and expires the cookie.
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    // The destroyed session no longer authenticates playlist fetches.
    let response = app
        .oneshot(get_request("/api/playlist?link=abc123", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A store whose writes and teardown always fail.
struct BrokenStore;

impl SessionStore for BrokenStore {
    fn get(&self, _session_id: &str, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(Some("tok".to_string()))
    }

    fn set(&self, _session_id: &str, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn destroy(&self, _session_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }
}

fn broken_store_app(provider: &str) -> Router {
    let config = test_config(provider);
    let state = AppState {
        config: config.clone(),
        sessions: Arc::new(BrokenStore),
        spotify: SpotifyClient::new(&config),
    };
    router(state).unwrap()
}

#[tokio::test]
async fn callback_with_failing_store_is_server_error() {
    let provider = spawn_mock_provider().await;
    let app = broken_store_app(&provider);

    // The exchange itself succeeds; binding the token to the session fails.
    let response = app
        .oneshot(get_request("/callback?code=good-code", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to get session");
}

#[tokio::test]
async fn failed_destroy_keeps_the_cookie() {
    // The provider is never contacted here.
    let app = broken_store_app("http://127.0.0.1:1");

    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(header::COOKIE, "session_id=sid-1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // The session was not destroyed, so the cookie must survive.
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

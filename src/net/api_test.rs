use super::*;
use crate::config::HttpTimeouts;
use crate::net::test_helpers::{ScriptedTransport, alice, auth_response as auth_ok, status_response, user_response};
use crate::util::headers::RequestHeaders;

use axum::Json;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;

// =============================================================================
// pure helpers
// =============================================================================

#[test]
fn endpoint_url_joins_without_double_slash() {
    assert_eq!(endpoint_url("https://api.test/", "/users/current"), "https://api.test/users/current");
    assert_eq!(endpoint_url("https://api.test", "users/login"), "https://api.test/users/login");
}

#[test]
fn response_success_range() {
    assert!(user_response(&alice()).is_success());
    assert!(!status_response(199).is_success());
    assert!(status_response(204).is_success());
    assert!(!status_response(300).is_success());
    assert!(!status_response(401).is_success());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ApiError::Transport("x".into()).error_code(), "E_API_REQUEST");
    assert_eq!(ApiError::Status { status: 500, body: String::new() }.error_code(), "E_API_RESPONSE");
    assert_eq!(ApiError::MissingAuthorization.error_code(), "E_MISSING_AUTHORIZATION");
}

#[test]
fn unauthorized_matches_401_and_403_only() {
    assert!(ApiError::Status { status: 401, body: String::new() }.is_unauthorized());
    assert!(ApiError::Status { status: 403, body: String::new() }.is_unauthorized());
    assert!(!ApiError::Status { status: 500, body: String::new() }.is_unauthorized());
    assert!(!ApiError::Transport("down".into()).is_unauthorized());
}

#[test]
fn with_headers_copies_empty_token_verbatim() {
    let request = ApiRequest::get(CURRENT_USER_PATH).with_headers(&RequestHeaders::new(""));
    assert_eq!(request.authorization.as_deref(), Some(""));
}

// =============================================================================
// endpoint helpers over a scripted transport
// =============================================================================

#[tokio::test]
async fn fetch_current_user_sends_authorization() {
    let transport = ScriptedTransport::new(vec![Ok(user_response(&alice()))]);
    let user = fetch_current_user(&transport, &RequestHeaders::new("tok123"))
        .await
        .unwrap();
    assert_eq!(user, alice());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].path, "/users/current");
    assert_eq!(requests[0].authorization.as_deref(), Some("tok123"));
    assert_eq!(requests[0].body, None);
}

#[tokio::test]
async fn fetch_current_user_maps_status_error() {
    let transport = ScriptedTransport::new(vec![Ok(status_response(401))]);
    let err = fetch_current_user(&transport, &RequestHeaders::new(""))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Status { status: 401, body: "nope".into() });
}

#[tokio::test]
async fn fetch_current_user_rejects_bad_body() {
    let response = ApiResponse { status: 200, authorization: None, body: "{\"id\":1}".into() };
    let transport = ScriptedTransport::new(vec![Ok(response)]);
    let err = fetch_current_user(&transport, &RequestHeaders::new("t"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn login_posts_credentials_without_authorization() {
    let transport = ScriptedTransport::new(vec![Ok(auth_ok(&alice(), "tok123"))]);
    let auth = login(&transport, "alice", "secret").await.unwrap();
    assert_eq!(auth, AuthResponse { user: alice(), token: "tok123".into() });

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "/users/login");
    assert_eq!(request.authorization, None);
    assert_eq!(request.body, Some(json!({ "username": "alice", "password": "secret" })));
}

#[tokio::test]
async fn login_without_header_is_rejected() {
    let transport = ScriptedTransport::new(vec![Ok(user_response(&alice()))]);
    let err = login(&transport, "alice", "secret").await.unwrap_err();
    assert_eq!(err, ApiError::MissingAuthorization);
}

#[tokio::test]
async fn login_with_empty_header_is_rejected() {
    let transport = ScriptedTransport::new(vec![Ok(auth_ok(&alice(), ""))]);
    let err = login(&transport, "alice", "secret").await.unwrap_err();
    assert_eq!(err, ApiError::MissingAuthorization);
}

#[tokio::test]
async fn create_user_posts_name() {
    let transport = ScriptedTransport::new(vec![Ok(auth_ok(&alice(), "tok9"))]);
    let auth = create_user(&transport, "Alice", "alice", "secret").await.unwrap();
    assert_eq!(auth.token, "tok9");

    let request = &transport.requests()[0];
    assert_eq!(request.path, "/users/create");
    assert_eq!(request.body, Some(json!({ "name": "Alice", "username": "alice", "password": "secret" })));
}

#[tokio::test]
async fn transport_error_passes_through() {
    let transport = ScriptedTransport::new(vec![Err(ApiError::Transport("connection refused".into()))]);
    let err = create_user(&transport, "A", "a", "p").await.unwrap_err();
    assert_eq!(err, ApiError::Transport("connection refused".into()));
}

// =============================================================================
// HttpTransport against an in-process server
// =============================================================================

async fn current_user_handler(headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if token == "tok123" {
        Json(json!({ "id": 1, "name": "Alice", "username": "alice" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "invalid token").into_response()
    }
}

async fn login_handler(Json(body): Json<serde_json::Value>) -> Response {
    if body["username"] == "alice" && body["password"] == "secret" {
        (
            [(header::AUTHORIZATION, "tok123")],
            Json(json!({ "id": 1, "name": "Alice", "username": "alice" })),
        )
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
    }
}

async fn create_user_handler(Json(body): Json<serde_json::Value>) -> Response {
    let (Some(name), Some(username)) = (body["name"].as_str(), body["username"].as_str()) else {
        return (StatusCode::BAD_REQUEST, "missing fields").into_response();
    };
    if username == "taken" {
        return (StatusCode::CONFLICT, "username taken").into_response();
    }
    (
        [(header::AUTHORIZATION, "tok-new")],
        Json(json!({ "id": 5, "name": name, "username": username })),
    )
        .into_response()
}

async fn spawn_api() -> String {
    let app = axum::Router::new()
        .route("/users/current", get(current_user_handler))
        .route("/users/login", post(login_handler))
        .route("/users/create", post(create_user_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn http_transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(base_url, HttpTimeouts { request_secs: 5, connect_secs: 5 }).unwrap()
}

#[tokio::test]
async fn http_transport_trims_base_url() {
    let transport = http_transport("http://127.0.0.1:1/");
    assert_eq!(transport.base_url(), "http://127.0.0.1:1");
}

#[tokio::test]
async fn http_login_reads_authorization_header() {
    let base_url = spawn_api().await;
    let transport = http_transport(&base_url);
    let auth = login(&transport, "alice", "secret").await.unwrap();
    assert_eq!(auth.token, "tok123");
    assert_eq!(auth.user, alice());
}

#[tokio::test]
async fn http_login_rejection_surfaces_status() {
    let base_url = spawn_api().await;
    let transport = http_transport(&base_url);
    let err = login(&transport, "alice", "wrong").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 401, body: "bad credentials".into() });
}

#[tokio::test]
async fn http_register_reads_authorization_header() {
    let base_url = spawn_api().await;
    let transport = http_transport(&base_url);
    let auth = create_user(&transport, "Carol", "carol", "secret").await.unwrap();
    assert_eq!(auth.token, "tok-new");
    assert_eq!(auth.user, User { id: 5, name: "Carol".into(), username: "carol".into() });
}

#[tokio::test]
async fn http_register_conflict_surfaces_status() {
    let base_url = spawn_api().await;
    let transport = http_transport(&base_url);
    let err = create_user(&transport, "Someone", "taken", "secret").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 409, body: "username taken".into() });
}

#[tokio::test]
async fn http_current_user_uses_token() {
    let base_url = spawn_api().await;
    let transport = http_transport(&base_url);
    let user = fetch_current_user(&transport, &RequestHeaders::new("tok123"))
        .await
        .unwrap();
    assert_eq!(user, alice());

    let err = fetch_current_user(&transport, &RequestHeaders::new(""))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn http_unreachable_host_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = http_transport(&format!("http://{addr}"));
    let err = fetch_current_user(&transport, &RequestHeaders::new("t"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

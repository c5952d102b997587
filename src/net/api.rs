//! REST API helpers for the LanguageBooster service.
//!
//! ARCHITECTURE
//! ============
//! [`Transport`] performs a single HTTP exchange relative to the API base URL.
//! [`HttpTransport`] is the `reqwest` implementation; tests swap in mocks. The
//! typed endpoint functions below sit on top of the transport and own status
//! checking, body decoding and `authorization` header extraction.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is returned as an [`ApiError`]. Nothing here retries.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;

use super::types::{LoginRequest, RegisterRequest, User};
use crate::config::{ClientConfig, HttpTimeouts};
use crate::util::headers::RequestHeaders;

pub const CURRENT_USER_PATH: &str = "/users/current";
pub const LOGIN_PATH: &str = "/users/login";
pub const REGISTER_PATH: &str = "/users/create";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors returned by the transport and the typed endpoint helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, TLS...).
    #[error("API request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// The request body could not be encoded.
    #[error("API request encode failed: {0}")]
    Encode(String),

    /// The response body could not be decoded.
    #[error("API response parse failed: {0}")]
    Decode(String),

    /// A login/register response carried no usable `authorization` header.
    #[error("API response missing authorization header")]
    MissingAuthorization,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_API_REQUEST",
            Self::Status { .. } => "E_API_RESPONSE",
            Self::Encode(_) => "E_API_ENCODE",
            Self::Decode(_) => "E_API_PARSE",
            Self::MissingAuthorization => "E_MISSING_AUTHORIZATION",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// True for 401/403 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound request, path relative to the API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Value for the `Authorization` header. `None` sends no header at all.
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self { method: Method::Get, path: path.to_owned(), authorization: None, body: None }
    }

    #[must_use]
    pub fn post(path: &str, body: serde_json::Value) -> Self {
        Self { method: Method::Post, path: path.to_owned(), authorization: None, body: Some(body) }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: &RequestHeaders) -> Self {
        self.authorization = Some(headers.authorization().to_owned());
        self
    }
}

/// Raw response as seen by the typed helpers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// Value of the `authorization` response header, if present and ASCII.
    pub authorization: Option<String>,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP exchange against the API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed transport bound to one API base URL.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url` with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = endpoint_url(&self.base_url, &request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        if let Some(authorization) = &request.authorization {
            builder = builder.header(AUTHORIZATION, authorization.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let authorization = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(ApiResponse { status, authorization, body })
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// Decoded login/register response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: User,
    /// New session token from the `authorization` header. Never empty.
    pub token: String,
}

/// Fetch the current user via authenticated `GET /users/current`.
///
/// # Errors
///
/// Returns an [`ApiError`] on transport failure, non-2xx status or an
/// undecodable body.
pub async fn fetch_current_user(transport: &dyn Transport, headers: &RequestHeaders) -> Result<User, ApiError> {
    let request = ApiRequest::get(CURRENT_USER_PATH).with_headers(headers);
    let response = expect_success(transport.send(request).await?)?;
    decode_user(&response.body)
}

/// Exchange credentials for a session via `POST /users/login`.
///
/// # Errors
///
/// Returns an [`ApiError`] on transport failure, non-2xx status, an
/// undecodable body or a missing `authorization` header.
pub async fn login(transport: &dyn Transport, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let body = encode(&LoginRequest { username, password })?;
    let response = transport.send(ApiRequest::post(LOGIN_PATH, body)).await?;
    auth_response(response)
}

/// Create an account and a session via `POST /users/create`.
///
/// # Errors
///
/// Same as [`login`].
pub async fn create_user(
    transport: &dyn Transport,
    name: &str,
    username: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let body = encode(&RegisterRequest { name, username, password })?;
    let response = transport.send(ApiRequest::post(REGISTER_PATH, body)).await?;
    auth_response(response)
}

fn encode<T: serde::Serialize>(body: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn expect_success(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status { status: response.status, body: response.body })
    }
}

fn decode_user(body: &str) -> Result<User, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn auth_response(response: ApiResponse) -> Result<AuthResponse, ApiError> {
    let response = expect_success(response)?;
    let user = decode_user(&response.body)?;
    let token = response
        .authorization
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingAuthorization)?;
    Ok(AuthResponse { user, token })
}

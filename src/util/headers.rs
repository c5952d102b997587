//! Authorization header object for authenticated API calls.

#[cfg(test)]
#[path = "headers_test.rs"]
mod headers_test;

use serde::Serialize;

use crate::state::session::Session;

/// Request options carrying the session token, serialized as
/// `{"headers":{"Authorization":"<token>"}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestHeaders {
    headers: AuthorizationHeader,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct AuthorizationHeader {
    #[serde(rename = "Authorization")]
    authorization: String,
}

impl RequestHeaders {
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self { headers: AuthorizationHeader { authorization: token.to_owned() } }
    }

    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.headers.authorization
    }
}

/// Build the authorization header object from the current session.
/// An empty token is passed through as-is.
#[must_use]
pub fn req_headers(session: &Session) -> RequestHeaders {
    RequestHeaders::new(&session.token)
}

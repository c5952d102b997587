//! Networking modules for the LanguageBooster REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the transport seam and the typed endpoint calls, `types` defines
//! the shared resource schema.

pub mod api;
pub mod types;

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;
    use tokio::sync::{mpsc, oneshot};

    use super::api::{ApiError, ApiRequest, ApiResponse, Transport};
    use super::types::User;

    pub fn alice() -> User {
        User { id: 1, name: "Alice".into(), username: "alice".into() }
    }

    pub fn bob() -> User {
        User { id: 2, name: "Bob".into(), username: "bob".into() }
    }

    pub fn user_response(user: &User) -> ApiResponse {
        ApiResponse {
            status: 200,
            authorization: None,
            body: json!({ "id": user.id, "name": user.name, "username": user.username }).to_string(),
        }
    }

    pub fn auth_response(user: &User, token: &str) -> ApiResponse {
        ApiResponse { authorization: Some(token.to_owned()), ..user_response(user) }
    }

    pub fn status_response(status: u16) -> ApiResponse {
        ApiResponse { status, authorization: None, body: "nope".into() }
    }

    /// Replays queued results in order and records every request it sees.
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
            Self { responses: Mutex::new(responses.into()), requests: Mutex::new(Vec::new()) }
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".into())))
        }
    }

    pub type PendingReply = (ApiRequest, oneshot::Sender<Result<ApiResponse, ApiError>>);

    /// Parks every request until the test answers it through the paired
    /// receiver, so tests control resolution order.
    pub struct GatedTransport {
        pending: mpsc::UnboundedSender<PendingReply>,
    }

    impl GatedTransport {
        pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingReply>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Self { pending: tx }, rx)
        }
    }

    #[async_trait::async_trait]
    impl Transport for GatedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            let (reply_tx, reply_rx) = oneshot::channel();
            self.pending
                .send((request, reply_tx))
                .map_err(|_| ApiError::Transport("gate closed".into()))?;
            reply_rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("reply dropped".into())))
        }
    }
}

//! Session store: the current user and auth token for one client.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionStore`] per client process, created by the caller and shared by
//! `Arc`; nothing here is global. Route guards and authenticated calls read the
//! token from it; `login`, `register` and `load_user` are the only writers.
//!
//! CONCURRENCY
//! ===========
//! State lives in a `watch` channel and is written only after a remote call
//! resolves successfully, so a failed call leaves the prior state intact.
//! Concurrent calls are not coalesced or cancelled: whichever response
//! resolves last is the one that sticks. Request ids exist for log
//! correlation only.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::navigation::{Navigator, SPACES_ROUTE};
use super::token_store::{StoreError, TokenStore};
use crate::net::api::{self, ApiError, AuthResponse, Transport};
use crate::net::types::User;
use crate::util::auth::{GuardOutcome, require_token};
use crate::util::headers::{RequestHeaders, req_headers};

/// Snapshot of the session. An empty `token` means unauthenticated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SessionStore {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Session>,
    /// Held across token persist + state write so storage and memory agree.
    establish_lock: Mutex<()>,
    next_request_id: AtomicU64,
}

impl SessionStore {
    /// Create the store, restoring the token from `tokens`. An unreadable
    /// token record starts the session unauthenticated.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let token = tokens.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored token unreadable; starting unauthenticated");
            String::new()
        });
        tracing::debug!(restored = !token.is_empty(), "session initialized");
        let (state, _) = watch::channel(Session { user: None, token });
        Self {
            transport,
            tokens,
            navigator,
            state,
            establish_lock: Mutex::new(()),
            next_request_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.state.borrow().token.is_empty()
    }

    /// Authorization header object for the current token.
    #[must_use]
    pub fn request_headers(&self) -> RequestHeaders {
        req_headers(&self.state.borrow())
    }

    /// Run the route guard against the current session.
    #[must_use]
    pub fn guard(&self, to: &str, from: &str) -> GuardOutcome {
        require_token(&self.state.borrow(), to, from)
    }

    /// Receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Fetch the current user with the session token and replace `user`.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] unchanged; state is left as it was.
    pub async fn load_user(&self) -> Result<User, SessionError> {
        let request_id = self.next_request_id();
        let headers = self.request_headers();
        tracing::debug!(request_id, path = api::CURRENT_USER_PATH, "loading current user");

        let user = api::fetch_current_user(self.transport.as_ref(), &headers)
            .await
            .inspect_err(|e| tracing::warn!(request_id, error = %e, "load user failed"))?;

        tracing::debug!(request_id, user_id = user.id, "current user loaded");
        self.state.send_modify(|session| session.user = Some(user.clone()));
        Ok(user)
    }

    /// Log in with credentials, store the issued token and navigate to
    /// `/spaces`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the call fails or the token cannot be
    /// persisted; `user` and `token` keep their prior values.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let request_id = self.next_request_id();
        tracing::debug!(request_id, %username, path = api::LOGIN_PATH, "logging in");

        let auth = api::login(self.transport.as_ref(), username, password)
            .await
            .inspect_err(|e| tracing::warn!(request_id, %username, error = %e, "login failed"))?;
        self.establish(request_id, auth)
    }

    /// Create an account, store the issued token and navigate to `/spaces`.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::login`].
    pub async fn register(&self, name: &str, username: &str, password: &str) -> Result<User, SessionError> {
        let request_id = self.next_request_id();
        tracing::debug!(request_id, %username, path = api::REGISTER_PATH, "registering");

        let auth = api::create_user(self.transport.as_ref(), name, username, password)
            .await
            .inspect_err(|e| tracing::warn!(request_id, %username, error = %e, "register failed"))?;
        self.establish(request_id, auth)
    }

    fn establish(&self, request_id: u64, auth: AuthResponse) -> Result<User, SessionError> {
        let AuthResponse { user, token } = auth;
        {
            let _guard = self
                .establish_lock
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            self.tokens
                .save(&token)
                .inspect_err(|e| tracing::warn!(request_id, error = %e, "token persist failed"))?;

            self.state.send_modify(|session| {
                session.user = Some(user.clone());
                session.token = token;
            });
        }
        tracing::info!(request_id, user_id = user.id, "session established");

        self.navigator.navigate(SPACES_ROUTE);
        Ok(user)
    }

    fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }
}

//! Route guard for pages that require a session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Invoked by the routing layer before navigating to a protected route. This is
//! a presence check on the token only; the token is never validated against the
//! server here.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::state::navigation::HOME_ROUTE;
use crate::state::session::Session;

/// Result of running the guard for one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Proceed to the requested route unmodified.
    Allow,
    /// Abort and navigate here instead.
    Redirect(&'static str),
}

/// True when the visitor has no session token.
#[must_use]
pub fn should_redirect_unauth(session: &Session) -> bool {
    session.token.is_empty()
}

/// Gate navigation from `from` to `to`; unauthenticated visitors go to `/`.
#[must_use]
pub fn require_token(session: &Session, to: &str, from: &str) -> GuardOutcome {
    if should_redirect_unauth(session) {
        tracing::debug!(%to, %from, "unauthenticated navigation redirected home");
        GuardOutcome::Redirect(HOME_ROUTE)
    } else {
        GuardOutcome::Allow
    }
}

//! Helpers shared by the session store and its callers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the route guard, `headers` builds the authorization header
//! object for authenticated calls.

pub mod auth;
pub mod headers;

//! Client for the LanguageBooster translation management API.
//!
//! A [`state::session::SessionStore`] holds the current user and session token,
//! talks to the API through a [`net::api::Transport`], persists the token via a
//! [`state::token_store::TokenStore`], and reports redirects to a
//! [`state::navigation::Navigator`]. [`util::auth`] gates protected routes on
//! the token and [`util::headers`] builds the authorization header object.

pub mod config;
pub mod net;
pub mod state;
pub mod util;

pub use config::ClientConfig;
pub use net::api::{ApiError, HttpTransport, Transport};
pub use net::types::{Language, Mutation, MutationValue, Project, Space, User};
pub use state::session::{Session, SessionError, SessionStore};
pub use util::auth::GuardOutcome;

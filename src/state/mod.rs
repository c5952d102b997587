//! Client session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the user/token pair and the operations that change it,
//! `token_store` persists the token between runs, and `navigation` receives
//! the redirects those operations issue.

pub mod navigation;
pub mod session;
pub mod token_store;

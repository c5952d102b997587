//! Client-side navigation sink.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store issues a navigation after a successful login/register;
//! the route guard returns redirects to [`HOME_ROUTE`]. Whatever owns routing
//! implements [`Navigator`].

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use std::sync::Mutex;

pub const HOME_ROUTE: &str = "/";
pub const SPACES_ROUTE: &str = "/spaces";

pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str);
}

/// Navigator that records every route it was sent to, in order.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Most recent route, if any navigation happened.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.history().pop()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, to: &str) {
        tracing::info!(%to, "navigate");
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(to.to_owned());
    }
}

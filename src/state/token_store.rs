//! Persisted session token, stored like a browser cookie.
//!
//! DESIGN
//! ======
//! One record named `token` with a 30-day max age. Every save re-stamps the
//! expiry, so an active client keeps its session; a record past its expiry
//! loads as the empty string, same as a missing one.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

pub const TOKEN_COOKIE_NAME: &str = "token";
pub const TOKEN_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store record invalid: {0}")]
    Format(#[from] serde_json::Error),
}

/// Backing storage for the session token.
pub trait TokenStore: Send + Sync {
    /// Current token, or `""` when none is stored or it has expired.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the storage exists but cannot be read.
    fn load(&self) -> Result<String, StoreError>;

    /// Persist `token`, restarting its max-age window.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the token cannot be written.
    fn save(&self, token: &str) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<String>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(token.to_owned()) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<String, StoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = token.to_owned();
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CookieRecord {
    name: String,
    value: String,
    /// Unix seconds after which the record is ignored.
    expires_at: i64,
}

/// JSON-file store used by the CLI.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    max_age_secs: i64,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), max_age_secs: TOKEN_MAX_AGE_SECS }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_at(&self, now: i64) -> Result<String, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(e.into()),
        };
        let record: CookieRecord = serde_json::from_str(&raw)?;
        if record.name != TOKEN_COOKIE_NAME || record.expires_at <= now {
            tracing::debug!(path = %self.path.display(), "stored token expired or foreign; ignoring");
            return Ok(String::new());
        }
        Ok(record.value)
    }

    fn save_at(&self, token: &str, now: i64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let record = CookieRecord {
            name: TOKEN_COOKIE_NAME.to_owned(),
            value: token.to_owned(),
            expires_at: now.saturating_add(self.max_age_secs),
        };
        let tmp = self.path.with_extension("tmp");
        // A leftover temp file would keep its old mode.
        let _ = std::fs::remove_file(&tmp);
        write_private(&tmp, &serde_json::to_vec_pretty(&record)?)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Write `bytes` to a fresh file readable only by the owner.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<String, StoreError> {
        self.load_at(now_unix())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.save_at(token, now_unix())
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// How long a session stays valid, in seconds. Matches the lifetime of the
/// Spotify access token it carries, so a session never outlives its token.
pub const SESSION_TTL_SECS: i64 = 3600;

/// An error raised by a session store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The in-memory lock was poisoned by a panicking writer.
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Key-value session storage keyed by an opaque session id.
///
/// Handlers only ever touch session data through this interface; the data
/// itself stays owned by the store.
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key` for the given session, if any.
    /// An expired session behaves as if it never existed.
    fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, creating the session if needed and
    /// refreshing its expiry.
    fn set(&self, session_id: &str, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes the whole session. Destroying a missing session is not an
    /// error.
    fn destroy(&self, session_id: &str) -> Result<(), StoreError>;
}

struct SessionEntry {
    values: HashMap<String, String>,
    expires_at: DateTime<Utc>,
}

/// In-process session storage. Volatile: everything is lost on restart.
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl MemoryStore {
    /// Creates an empty `MemoryStore` with the default session TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(SESSION_TTL_SECS))
    }

    /// Creates an empty `MemoryStore` whose sessions expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;

        let expired = match sessions.get(session_id) {
            None => return Ok(None),
            Some(entry) => Utc::now() > entry.expires_at,
        };

        if expired {
            tracing::debug!("Session expired: {}", session_id);
            sessions.remove(session_id);
            return Ok(None);
        }

        Ok(sessions
            .get(session_id)
            .and_then(|entry| entry.values.get(key).cloned()))
    }

    fn set(&self, session_id: &str, key: &str, value: String) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                expires_at: Utc::now(),
            });

        entry.expires_at = Utc::now() + self.ttl;
        entry.values.insert(key.to_string(), value);

        Ok(())
    }

    fn destroy(&self, session_id: &str) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        sessions.remove(session_id);
        Ok(())
    }
}

//! Process-wide registry of active sessions.
//!
//! Sessions are stored by value and handed out as clones; callers
//! mutate their copy and write it back with [`SessionStore::save`].
//! Expiry is checked lazily on access — there is no timer thread.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, Utc};

use crate::types::session::Session;

/// Default inactivity TTL.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// Concurrency-safe key-to-session mapping with time-based expiry.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store with the default 30-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }

    /// Store with a custom inactivity TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a fresh session for `key`, replacing any prior one.
    pub fn start(&self, key: &str) -> Session {
        let session = Session::new(key);
        self.sessions
            .write()
            .unwrap()
            .insert(key.to_string(), session.clone());
        session
    }

    /// Current session for `key`, if present and not expired.
    ///
    /// An expired session is removed and treated as absent.
    pub fn get(&self, key: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get(key) {
            Some(session) if session.is_expired(self.ttl, Utc::now()) => {
                sessions.remove(key);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    /// Write a mutated session back, replacing the stored value.
    pub fn save(&self, session: Session) {
        self.sessions
            .write()
            .unwrap()
            .insert(session.conversation_key.clone(), session);
    }

    /// Remove the session for `key`, if any.
    pub fn end(&self, key: &str) {
        self.sessions.write().unwrap().remove(key);
    }

    /// Number of live (possibly expired-but-unswept) sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::session::SessionState;

    #[test]
    fn test_start_replaces_existing_session() {
        let store = SessionStore::new();
        let mut first = store.start("key");
        first.state = SessionState::Review;
        store.save(first);

        let fresh = store.start("key");
        assert_eq!(fresh.state, SessionState::Collecting);
        assert_eq!(store.get("key").unwrap().state, SessionState::Collecting);
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_expired_session_is_treated_as_absent() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let mut session = store.start("key");
        session.last_activity = Utc::now() - Duration::minutes(31);
        store.save(session);

        assert!(store.get("key").is_none());
        // The expired entry was also swept.
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_sessions_are_independent_per_key() {
        let store = SessionStore::new();
        store.start("a");
        store.start("b");
        store.end("a");

        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
    }
}

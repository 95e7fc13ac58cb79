//! Per-conversation session state.
//!
//! A `Session` is a plain value: the store hands out clones and the
//! service writes the mutated value back wholesale, so no session
//! state is ever reached through shared mutable references.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{spec_for, FieldKey, FieldMap, FIELDS};
use super::message::CollectedFields;

/// Progress of one conversation.
///
/// `Confirmed` is terminal: the session is removed from the store on
/// transition, so stored sessions are only ever `Collecting` or
/// `Review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Collecting,
    Review,
    Confirmed,
}

/// How the session expects field values to arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    /// All fields in a single free-text message (the default).
    Bulk,
    /// One field per turn; entered via an edit request.
    PerField,
}

/// One active conversation's collected state.
#[derive(Debug, Clone)]
pub struct Session {
    pub conversation_key: String,
    pub state: SessionState,
    pub mode: CollectionMode,
    pub fields: FieldMap,
    pub media: Vec<String>,
    cursor: usize,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Fresh session in `Collecting`/bulk mode.
    pub fn new(conversation_key: impl Into<String>) -> Self {
        Self {
            conversation_key: conversation_key.into(),
            state: SessionState::Collecting,
            mode: CollectionMode::Bulk,
            fields: FieldMap::new(),
            media: Vec::new(),
            cursor: 0,
            last_activity: Utc::now(),
        }
    }

    /// The field the multi-turn cursor points at, if any remain.
    pub fn current_field(&self) -> Option<FieldKey> {
        FIELDS.get(self.cursor).map(|spec| spec.key)
    }

    /// Prompt for the field at the cursor.
    pub fn current_prompt(&self) -> String {
        match self.current_field() {
            Some(key) => spec_for(key).prompt.to_string(),
            None => "All fields collected.".to_string(),
        }
    }

    /// Move the cursor forward; the end of the field list transitions
    /// to `Review`.
    pub fn advance(&mut self) {
        if self.cursor + 1 < FIELDS.len() {
            self.cursor += 1;
            self.state = SessionState::Collecting;
        } else {
            self.state = SessionState::Review;
        }
    }

    /// Point the cursor at `key` and drop back to per-field collection.
    pub fn edit_field(&mut self, key: FieldKey) {
        if let Some(index) = FIELDS.iter().position(|spec| spec.key == key) {
            self.cursor = index;
            self.state = SessionState::Collecting;
            self.mode = CollectionMode::PerField;
        }
    }

    /// Record activity for TTL purposes.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Whether the session has been inactive longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_activity > ttl
    }

    /// Snapshot for the outbound reply.
    pub fn collected(&self) -> CollectedFields {
        CollectedFields::from_fields(&self.fields, &self.media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_collecting_and_empty() {
        let session = Session::new("key");
        assert_eq!(session.state, SessionState::Collecting);
        assert_eq!(session.mode, CollectionMode::Bulk);
        assert!(session.fields.is_empty());
        assert_eq!(session.current_field(), Some(FieldKey::Title));
    }

    #[test]
    fn test_advance_reaches_review_at_end_of_template() {
        let mut session = Session::new("key");
        for _ in 0..FIELDS.len() {
            session.advance();
        }
        assert_eq!(session.state, SessionState::Review);
        // Advancing past the end stays in review.
        session.advance();
        assert_eq!(session.state, SessionState::Review);
    }

    #[test]
    fn test_edit_field_moves_cursor_and_switches_mode() {
        let mut session = Session::new("key");
        session.state = SessionState::Review;

        session.edit_field(FieldKey::PayRate);

        assert_eq!(session.state, SessionState::Collecting);
        assert_eq!(session.mode, CollectionMode::PerField);
        assert_eq!(session.current_field(), Some(FieldKey::PayRate));
    }

    #[test]
    fn test_expiry_is_based_on_inactivity() {
        let mut session = Session::new("key");
        session.last_activity = Utc::now() - Duration::minutes(31);
        assert!(session.is_expired(Duration::minutes(30), Utc::now()));

        session.touch();
        assert!(!session.is_expired(Duration::minutes(30), Utc::now()));
    }
}

use crate::essay::{Essay, EssayError, Reader};
use crate::lookup::{ClickEvent, Transition};
use parking_lot::RwLock;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const MAX_SESSION_COUNT: usize = 4096;
const SESSION_ID_LEN: usize = 24;

struct Session {
    reader: Reader,
    last_seen: u64,
}

/// Readers keyed by browser session.
///
/// Sessions are created lazily and the least recently seen one is evicted
/// once the store is full.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    clock: AtomicU64,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(MAX_SESSION_COUNT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the session's reader, or a fresh one for unknown ids.
    pub fn reader(&self, session_id: &str, essay: &Essay) -> Reader {
        self.sessions
            .read()
            .get(session_id)
            .map(|session| session.reader.clone())
            .unwrap_or_else(|| Reader::new(essay))
    }

    pub fn click(
        &self,
        session_id: &str,
        essay: &Essay,
        index: usize,
        event: ClickEvent,
    ) -> Result<Transition, EssayError> {
        essay.paragraph(index)?;
        let now = self.tick();
        let mut guard = self.sessions.write();
        if guard.len() >= self.capacity && !guard.contains_key(session_id) {
            if let Some(oldest) = oldest_session_key(&guard) {
                debug!(session = %oldest, "evicting reader session");
                guard.remove(&oldest);
            }
        }
        let session = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                reader: Reader::new(essay),
                last_seen: now,
            });
        session.last_seen = now;
        session.reader.click(index, event)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

fn oldest_session_key(sessions: &HashMap<String, Session>) -> Option<String> {
    sessions
        .iter()
        .min_by_key(|(_, session)| session.last_seen)
        .map(|(key, _)| key.clone())
}

pub fn generate_session_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_alphanumeric() {
        let id = generate_session_id();
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, generate_session_id());
    }

    #[test]
    fn sessions_are_independent() {
        let essay = Essay::default_essay();
        let store = SessionStore::new();
        store
            .click("alice", essay, 0, ClickEvent::term("kitschy"))
            .unwrap();
        assert!(store.reader("alice", essay).state(0).unwrap().is_active());
        assert!(!store.reader("bob", essay).state(0).unwrap().is_active());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn out_of_range_click_leaves_store_untouched() {
        let essay = Essay::default_essay();
        let store = SessionStore::with_capacity(1);
        store
            .click("alice", essay, 0, ClickEvent::term("kitschy"))
            .unwrap();
        let err = store
            .click("mallory", essay, 99, ClickEvent::Outside)
            .unwrap_err();
        assert!(matches!(
            err,
            EssayError::ParagraphOutOfRange { index: 99, .. }
        ));
        assert_eq!(store.len(), 1);
        assert!(store.reader("alice", essay).state(0).unwrap().is_active());
    }

    #[test]
    fn full_store_evicts_least_recent() {
        let essay = Essay::default_essay();
        let store = SessionStore::with_capacity(2);
        store.click("a", essay, 0, ClickEvent::term("kitschy")).unwrap();
        store.click("b", essay, 0, ClickEvent::term("kitschy")).unwrap();
        store.click("a", essay, 1, ClickEvent::Outside).unwrap();
        store.click("c", essay, 0, ClickEvent::term("kitschy")).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.reader("a", essay).state(0).unwrap().is_active());
        assert!(!store.reader("b", essay).state(0).unwrap().is_active());
    }
}

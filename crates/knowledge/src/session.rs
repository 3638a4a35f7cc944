//! In-memory session registry.
//!
//! Each upload becomes a session that exclusively owns its index. Sessions
//! live until deleted or until the process exits; there is no expiry and no
//! capacity bound.

use crate::index::VectorIndex;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use helper_core::{AppError, AppResult};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Session identifier (UUID v4).
pub type SessionId = Uuid;

/// An uploaded document and its index.
pub struct Session {
    id: SessionId,
    filename: String,
    created_at: DateTime<Utc>,
    index: Box<dyn VectorIndex>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.to_string(),
            filename: self.filename.clone(),
            chunk_count: self.index.len(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("chunks", &self.index.len())
            .finish()
    }
}

/// Public summary of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub filename: String,
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Concurrent map from session id to session.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully built index under a fresh identifier.
    pub fn create(&self, filename: impl Into<String>, index: Box<dyn VectorIndex>) -> Arc<Session> {
        let filename = filename.into();

        loop {
            let id = Uuid::new_v4();
            if let Entry::Vacant(slot) = self.sessions.entry(id) {
                let session = Arc::new(Session {
                    id,
                    filename,
                    created_at: Utc::now(),
                    index,
                });
                slot.insert(Arc::clone(&session));

                tracing::info!(
                    session_id = %id,
                    chunks = session.index.len(),
                    "Session created"
                );
                return session;
            }

            tracing::warn!(session_id = %id, "Session id collision, regenerating");
        }
    }

    /// Look up a session. Unparseable ids are simply unknown.
    pub fn get(&self, session_id: &str) -> AppResult<Arc<Session>> {
        let id = parse_id(session_id)?;
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::session_not_found(session_id))
    }

    /// Remove a session. In-flight chats holding the session finish normally.
    pub fn delete(&self, session_id: &str) -> AppResult<()> {
        let id = parse_id(session_id)?;
        match self.sessions.remove(&id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Session deleted");
                Ok(())
            }
            None => Err(AppError::session_not_found(session_id)),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }
}

fn parse_id(session_id: &str) -> AppResult<SessionId> {
    Uuid::parse_str(session_id.trim()).map_err(|_| AppError::session_not_found(session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::index::MemoryIndex;
    use std::collections::HashSet;

    fn index(text: &str) -> Box<dyn VectorIndex> {
        let chunk = Chunk::new(1, 0, text.to_string(), (0, text.len()), "recursive");
        Box::new(MemoryIndex::build(vec![chunk], vec![vec![1.0, 0.0]], 2).unwrap())
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let session = store.create("rules.pdf", index("setup"));

        let found = store.get(&session.id().to_string()).unwrap();
        assert_eq!(found.id(), session.id());
        assert_eq!(found.filename(), "rules.pdf");
        assert_eq!(found.index().len(), 1);
        assert_eq!(session.id().get_version_num(), 4);
    }

    #[test]
    fn test_sessions_do_not_share_indexes() {
        let store = SessionStore::new();
        let a = store.create("a.pdf", index("alpha"));
        let b = store.create("b.pdf", index("beta"));

        assert_ne!(a.id(), b.id());
        let hit_a = &a.index().search(&[1.0, 0.0], 1).unwrap()[0];
        let hit_b = &b.index().search(&[1.0, 0.0], 1).unwrap()[0];
        assert_eq!(hit_a.chunk.text, "alpha");
        assert_eq!(hit_b.chunk.text, "beta");
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let store = SessionStore::new();
        let id = store.create("rules.pdf", index("setup")).id().to_string();

        store.delete(&id).unwrap();
        assert!(matches!(store.get(&id), Err(AppError::NotFound(_))));
        assert!(matches!(store.delete(&id), Err(AppError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_and_malformed_ids() {
        let store = SessionStore::new();
        let err = store.get(&Uuid::new_v4().to_string()).unwrap_err();
        assert!(err.to_string().contains("Please upload a document first"));

        assert!(matches!(store.get("not-a-uuid"), Err(AppError::NotFound(_))));
        assert!(matches!(store.delete(""), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_info() {
        let store = SessionStore::new();
        let session = store.create("catan.pdf", index("setup"));
        let info = session.info();

        assert_eq!(info.session_id, session.id().to_string());
        assert_eq!(info.filename, "catan.pdf");
        assert_eq!(info.chunk_count, 1);
    }

    #[test]
    fn test_concurrent_creates_yield_unique_ids() {
        let store = Arc::new(SessionStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(format!("{}-{}.pdf", t, i), index("x")).id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<SessionId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().collect();

        assert_eq!(ids.len(), 400);
        assert_eq!(unique.len(), 400);
        assert_eq!(store.len(), 400);
        assert_eq!(store.ids().len(), 400);
    }
}

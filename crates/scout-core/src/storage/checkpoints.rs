//! Checkpoint persistence for session state.
//!
//! One record per session, last write wins. The store does not serialize
//! concurrent writers for the same id; callers avoid running two loops
//! for one session at once.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::agent::session::SessionState;

pub trait CheckpointStore: Send + Sync {
    fn save(&self, state: &SessionState) -> Result<()>;
    fn load(&self, session_id: &str) -> Result<Option<SessionState>>;
}

/// SQLite-backed store. The connection is mutex-guarded; each call is a
/// single statement, so contention stays negligible.
pub struct SqliteCheckpointStore {
    conn: Mutex<Connection>,
}

impl SqliteCheckpointStore {
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open checkpoint db at {}", path.display()))?;
        Self::init(conn)
    }

    /// In-memory database, mainly for tests and ephemeral runs.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                session_id TEXT PRIMARY KEY,
                state      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned mutex means a panic mid-statement; the connection
        // itself is still usable for subsequent statements.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CheckpointStore for SqliteCheckpointStore {
    fn save(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let now = Utc::now().to_rfc3339();
        self.lock().execute(
            "INSERT INTO checkpoints (session_id, state, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_id) DO UPDATE SET
                 state = excluded.state,
                 updated_at = excluded.updated_at",
            params![state.session_id, json, now],
        )?;
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionState>> {
        let json: Option<String> = self
            .lock()
            .query_row(
                "SELECT state FROM checkpoints WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

/// HashMap-backed store for tests and single-process runs.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    states: Mutex<HashMap<String, SessionState>>,
}

impl CheckpointStore for MemoryCheckpointStore {
    fn save(&self, state: &SessionState) -> Result<()> {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(state.session_id.clone(), state.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionState>> {
        Ok(self
            .states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(session_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::Message;

    fn sample_state(id: &str) -> SessionState {
        let mut state = SessionState::new(id);
        state.history.push(Message::user("hello"));
        state.history.push(Message::assistant("hi"));
        state.iteration_count = 3;
        state.tools_invoked.push("search_companies".to_string());
        state
    }

    #[test]
    fn sqlite_roundtrip() {
        let store = SqliteCheckpointStore::in_memory().unwrap();
        let state = sample_state("s-1");
        store.save(&state).unwrap();
        let loaded = store.load("s-1").unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_session_is_none() {
        let store = SqliteCheckpointStore::in_memory().unwrap();
        assert!(store.load("nope").unwrap().is_none());
    }

    #[test]
    fn save_overwrites_last_write_wins() {
        let store = SqliteCheckpointStore::in_memory().unwrap();
        let mut state = sample_state("s-2");
        store.save(&state).unwrap();
        state.iteration_count = 7;
        store.save(&state).unwrap();
        let loaded = store.load("s-2").unwrap().unwrap();
        assert_eq!(loaded.iteration_count, 7);
    }

    #[test]
    fn sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.db");
        {
            let store = SqliteCheckpointStore::new(&path).unwrap();
            store.save(&sample_state("s-3")).unwrap();
        }
        let store = SqliteCheckpointStore::new(&path).unwrap();
        assert!(store.load("s-3").unwrap().is_some());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryCheckpointStore::default();
        let state = sample_state("s-4");
        store.save(&state).unwrap();
        assert_eq!(store.load("s-4").unwrap().unwrap(), state);
    }
}

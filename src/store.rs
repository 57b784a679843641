//! Serialized access to the conversation log and knowledge facts.
//!
//! [`Store`] owns the SQLite connection behind a mutex; every operation holds
//! the lock for the duration of its statement, so reads and writes are fully
//! serialized across request handlers. Failures never escape the store
//! boundary: they are logged and converted to sentinel values (`false`,
//! `None`, empty vec) so the chat flow keeps working even when persistence
//! does not.

use rusqlite::{params, Connection};
use serde::Serialize;
use std::sync::Mutex;

/// One persisted (user message, AI response) pair.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub user_message: String,
    pub ai_response: String,
}

/// Durable store for conversation turns and knowledge facts.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Wrap an already-opened connection (see [`crate::db::open_database`]).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Append a conversation turn. Returns `false` (and logs) on failure.
    pub fn save_conversation(&self, user_message: &str, ai_response: &str) -> bool {
        match self.try_save_conversation(user_message, ai_response) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to save conversation");
                false
            }
        }
    }

    fn try_save_conversation(&self, user_message: &str, ai_response: &str) -> rusqlite::Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO conversations (user_message, ai_response) VALUES (?1, ?2)",
            params![user_message, ai_response],
        )?;
        Ok(())
    }

    /// Insert a knowledge fact, replacing any existing one with the same
    /// (category, key). Idempotent under replay. Returns `false` on failure.
    pub fn save_knowledge(&self, category: &str, key: &str, value: &str) -> bool {
        match self.try_save_knowledge(category, key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, category, key, "failed to save knowledge");
                false
            }
        }
    }

    fn try_save_knowledge(&self, category: &str, key: &str, value: &str) -> rusqlite::Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT OR REPLACE INTO knowledge (category, key, value) VALUES (?1, ?2, ?3)",
            params![category, key, value],
        )?;
        Ok(())
    }

    /// Exact-match knowledge lookup. `None` covers both "never written" and
    /// "lookup failed" — callers treat them identically.
    pub fn get_knowledge(&self, category: &str, key: &str) -> Option<String> {
        match self.try_get_knowledge(category, key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, category, key, "failed to look up knowledge");
                None
            }
        }
    }

    fn try_get_knowledge(&self, category: &str, key: &str) -> rusqlite::Result<Option<String>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare("SELECT value FROM knowledge WHERE category = ?1 AND key = ?2")?;
        let mut rows = stmt.query(params![category, key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// The most recent conversation turns, newest first, at most `limit`.
    /// Empty vec on failure or when no conversations exist.
    pub fn get_conversation_history(&self, limit: u32) -> Vec<ConversationTurn> {
        match self.try_get_conversation_history(limit) {
            Ok(turns) => turns,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load conversation history");
                Vec::new()
            }
        }
    }

    fn try_get_conversation_history(&self, limit: u32) -> rusqlite::Result<Vec<ConversationTurn>> {
        let conn = self.lock();
        // Tie-break on id: CURRENT_TIMESTAMP has second resolution, so
        // back-to-back inserts share a timestamp.
        let mut stmt = conn.prepare(
            "SELECT user_message, ai_response FROM conversations
             ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(ConversationTurn {
                user_message: row.get(0)?,
                ai_response: row.get(1)?,
            })
        })?;
        rows.collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock means another thread panicked mid-statement;
        // the connection itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

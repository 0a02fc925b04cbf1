//! SQLite-backed conversation log.
//! Append-only: rows are inserted, never updated or deleted.

use crate::HistorySink;
use chrono::{DateTime, Utc};
use minibot_core::{ConversationRecord, MiniBotError, Result};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;

/// A stored conversation row.
#[derive(Debug, Clone)]
pub struct StoredConversation {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    /// Open or create the history database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| MiniBotError::History(format!("DB open: {e}")))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| MiniBotError::History(format!("Migration: {e}")))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| MiniBotError::History(format!("Lock: {e}")))
    }

    /// Most recent conversations, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredConversation>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, question, answer, created_at FROM conversations
                 ORDER BY id DESC LIMIT ?1",
            )
            .map_err(|e| MiniBotError::History(format!("Query: {e}")))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let created: String = row.get(3)?;
                Ok(StoredConversation {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                    created_at: DateTime::parse_from_rfc3339(&created)
                        .map(|d| d.with_timezone(&Utc))
                        .unwrap_or_default(),
                })
            })
            .map_err(|e| MiniBotError::History(format!("Query: {e}")))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| MiniBotError::History(format!("Row: {e}")))
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
            .map_err(|e| MiniBotError::History(format!("Count: {e}")))?;
        Ok(n as usize)
    }
}

impl HistorySink for SqliteHistory {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn append(&self, record: &ConversationRecord) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO conversations (question, answer, created_at) VALUES (?1, ?2, ?3)",
            params![record.question, record.answer, Utc::now().to_rfc3339()],
        )
        .map_err(|e| MiniBotError::History(format!("Insert: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> SqliteHistory {
        SqliteHistory::open(Path::new(":memory:")).unwrap()
    }

    #[test]
    fn test_open_and_migrate() {
        let db = memory_db();
        assert_eq!(db.count().unwrap(), 0);
        assert!(db.recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_append_and_recent() {
        let db = memory_db();
        db.append(&ConversationRecord::new("first?", "one")).unwrap();
        db.append(&ConversationRecord::new("second?", "two")).unwrap();

        assert_eq!(db.count().unwrap(), 2);
        let recent = db.recent(10).unwrap();
        assert_eq!(recent[0].question, "second?");
        assert_eq!(recent[1].answer, "one");
        assert!(recent[0].id > recent[1].id);
    }

    #[test]
    fn test_recent_respects_limit() {
        let db = memory_db();
        for i in 0..5 {
            db.append(&ConversationRecord::new(format!("q{i}"), "a")).unwrap();
        }
        let recent = db.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].question, "q4");
    }
}

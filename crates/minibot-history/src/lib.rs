//! # MiniBot Conversation History
//!
//! Best-effort audit trail of answered questions. Not needed to answer
//! anything; a failed append is logged by the caller and the request still
//! succeeds. Files on ephemeral hosts vanish on restart, and that is fine.
//!
//! Backends:
//! - `json`   — [`JsonFileHistory`], one JSON array rewritten per append
//! - `sqlite` — [`SqliteHistory`], append-only table
//! - `none`   — [`NoHistory`]

pub mod json_file;
pub mod sqlite;

pub use json_file::JsonFileHistory;
pub use sqlite::SqliteHistory;

use minibot_core::config::{HistoryBackend, HistoryConfig};
use minibot_core::{ConversationRecord, Result};

/// Destination for conversation records.
///
/// Implementations serialize their own writers; `append` may be called from
/// many request handlers at once.
pub trait HistorySink: Send + Sync {
    fn name(&self) -> &'static str;

    fn append(&self, record: &ConversationRecord) -> Result<()>;
}

/// History disabled: every append is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl HistorySink for NoHistory {
    fn name(&self) -> &'static str {
        "none"
    }

    fn append(&self, _record: &ConversationRecord) -> Result<()> {
        Ok(())
    }
}

/// Build the sink selected by the config.
pub fn open_sink(config: &HistoryConfig) -> Result<Box<dyn HistorySink>> {
    let sink: Box<dyn HistorySink> = match config.backend()? {
        HistoryBackend::Json => Box::new(JsonFileHistory::new(&config.resolved_path())),
        HistoryBackend::Sqlite => Box::new(SqliteHistory::open(&config.resolved_path())?),
        HistoryBackend::None => Box::new(NoHistory),
    };
    tracing::info!("🗂️ History backend: {}", sink.name());
    Ok(sink)
}

/// Like [`open_sink`], but a sink that cannot be opened only disables
/// history. Answering questions does not depend on it.
pub fn open_sink_or_none(config: &HistoryConfig) -> Box<dyn HistorySink> {
    open_sink(config).unwrap_or_else(|e| {
        tracing::warn!("⚠️ History disabled, backend '{}' unavailable: {e}", config.backend);
        Box::new(NoHistory)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_history_accepts_everything() {
        assert!(NoHistory.append(&ConversationRecord::new("q", "a")).is_ok());
    }

    #[test]
    fn test_open_sink_by_backend() {
        let none = HistoryConfig {
            backend: "none".into(),
            ..HistoryConfig::default()
        };
        assert_eq!(open_sink(&none).unwrap().name(), "none");

        let sqlite = HistoryConfig {
            backend: "sqlite".into(),
            path: ":memory:".into(),
        };
        assert_eq!(open_sink(&sqlite).unwrap().name(), "sqlite");

        let json = HistoryConfig::default();
        assert_eq!(open_sink(&json).unwrap().name(), "json");

        let bad = HistoryConfig {
            backend: "redis".into(),
            ..HistoryConfig::default()
        };
        assert!(open_sink(&bad).is_err());
        assert_eq!(open_sink_or_none(&bad).name(), "none");
    }

    #[test]
    fn test_unopenable_sqlite_falls_back_to_none() {
        let dir = std::env::temp_dir().join("minibot-history-no-such-dir");
        std::fs::remove_dir_all(&dir).ok();
        let config = HistoryConfig {
            backend: "sqlite".into(),
            path: dir.join("nested").join("history.db").to_string_lossy().to_string(),
        };
        assert!(open_sink(&config).is_err());

        let sink = open_sink_or_none(&config);
        assert_eq!(sink.name(), "none");
        assert!(sink.append(&ConversationRecord::new("q", "a")).is_ok());
    }
}

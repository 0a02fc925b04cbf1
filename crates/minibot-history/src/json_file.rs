//! Whole-document JSON history — `[ {question, answer}, ... ]`.
//! Every append reads the file, pushes one record and writes it back,
//! all under one lock so concurrent appends are not lost.

use crate::HistorySink;
use minibot_core::{ConversationRecord, MiniBotError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonFileHistory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileHistory {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Load all records. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<ConversationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| MiniBotError::History(format!("Read error: {e}")))?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|e| MiniBotError::History(format!("Parse error: {e}")))
    }

    fn save(&self, records: &[ConversationRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| MiniBotError::History(format!("Create dir error: {e}")))?;
        }
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| MiniBotError::History(format!("Serialize error: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| MiniBotError::History(format!("Write error: {e}")))?;
        Ok(())
    }
}

impl HistorySink for JsonFileHistory {
    fn name(&self) -> &'static str {
        "json"
    }

    fn append(&self, record: &ConversationRecord) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| MiniBotError::History(format!("Lock: {e}")))?;
        let mut records = self.load()?;
        records.push(record.clone());
        self.save(&records)?;
        tracing::debug!("💾 Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

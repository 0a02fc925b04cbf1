//! Knowledge base loading from a JSON document.
//! `{ "questions": [ { "question": ..., "answer": ... }, ... ] }`

use minibot_core::{KnowledgeDocument, MiniBotError, QaEntry, Result};
use std::path::Path;

/// Read and parse the knowledge base.
pub fn load_knowledge_base(path: &Path) -> Result<Vec<QaEntry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MiniBotError::KnowledgeNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let doc: KnowledgeDocument =
        serde_json::from_str(&content).map_err(|e| MiniBotError::KnowledgeMalformed {
            path: path.to_path_buf(),
            reason: format!("Parse error: {e}"),
        })?;

    tracing::debug!("📚 Loaded {} entries from {}", doc.questions.len(), path.display());
    Ok(doc.questions)
}

/// Load the knowledge base, degrading to an empty corpus on any failure.
pub fn load_or_empty(path: &Path) -> Vec<QaEntry> {
    match load_knowledge_base(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("⚠️ {e} — continuing with an empty knowledge base");
            Vec::new()
        }
    }
}

//! # MiniBot Core
//!
//! Shared configuration, error type and plain data for the MiniBot workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::{HistoryBackend, MiniBotConfig};
pub use error::{MiniBotError, Result};
pub use types::{ConversationRecord, KnowledgeDocument, QaEntry};

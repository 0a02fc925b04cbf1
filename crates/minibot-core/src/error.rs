//! Error types shared across MiniBot crates.

use std::path::PathBuf;

/// Result alias used throughout MiniBot.
pub type Result<T> = std::result::Result<T, MiniBotError>;

#[derive(Debug, thiserror::Error)]
pub enum MiniBotError {
    /// Request carried no usable `question`.
    #[error("No question provided")]
    MissingInput,

    #[error("Question too long ({len} chars, max {max})")]
    QuestionTooLong { len: usize, max: usize },

    #[error("Knowledge base not found: {}", .0.display())]
    KnowledgeNotFound(PathBuf),

    #[error("Knowledge base malformed ({}): {reason}", .path.display())]
    KnowledgeMalformed { path: PathBuf, reason: String },

    /// Writing a conversation record failed. Never fatal for a request.
    #[error("History error: {0}")]
    History(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

//! MiniBot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MiniBotError, Result};

/// Default answer when no canonical question matches confidently.
pub const DEFAULT_FALLBACK_ANSWER: &str =
    "I'm sorry, I don't have an answer to that. Please try asking another question.";

/// Longest question, in chars, the matcher will score.
pub const DEFAULT_MAX_QUESTION_LEN: usize = 1000;

/// Default acceptance threshold. A match is accepted only when its score is strictly greater.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiniBotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl MiniBotConfig {
    /// Load config from `MINIBOT_CONFIG` or the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("MINIBOT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MiniBotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| MiniBotError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the MiniBot home directory (~/.minibot).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".minibot")
    }

    fn validate(&self) -> Result<()> {
        if self.knowledge.threshold > 100 {
            return Err(MiniBotError::Config(format!(
                "knowledge.threshold must be within 0..=100, got {}",
                self.knowledge.threshold
            )));
        }
        if self.knowledge.max_question_len == 0 {
            return Err(MiniBotError::Config(
                "knowledge.max_question_len must be greater than 0".into(),
            ));
        }
        self.history.backend()?;
        Ok(())
    }
}

/// Gateway (HTTP server) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 5000 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Knowledge base and matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_path")]
    pub path: String,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,
    /// Longer questions are rejected before matching.
    #[serde(default = "default_max_question_len")]
    pub max_question_len: usize,
}

fn default_knowledge_path() -> String { "knowledge_base.json".into() }
fn default_threshold() -> u8 { DEFAULT_THRESHOLD }
fn default_fallback_answer() -> String { DEFAULT_FALLBACK_ANSWER.into() }
fn default_max_question_len() -> usize { DEFAULT_MAX_QUESTION_LEN }

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
            threshold: default_threshold(),
            fallback_answer: default_fallback_answer(),
            max_question_len: default_max_question_len(),
        }
    }
}

impl KnowledgeConfig {
    /// Knowledge base path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }
}

/// Which conversation history sink to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    /// Whole-document JSON array, rewritten on every append.
    Json,
    /// Append-only SQLite table.
    Sqlite,
    None,
}

impl std::fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryBackend::Json => write!(f, "json"),
            HistoryBackend::Sqlite => write!(f, "sqlite"),
            HistoryBackend::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for HistoryBackend {
    type Err = MiniBotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(HistoryBackend::Json),
            "sqlite" => Ok(HistoryBackend::Sqlite),
            "none" | "off" | "" => Ok(HistoryBackend::None),
            other => Err(MiniBotError::Config(format!(
                "Unknown history backend '{other}' (expected json, sqlite or none)"
            ))),
        }
    }
}

/// Conversation history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_backend")]
    pub backend: String,
    #[serde(default = "default_history_path")]
    pub path: String,
}

fn default_history_backend() -> String { "json".into() }
fn default_history_path() -> String { "chat_history.json".into() }

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: default_history_backend(),
            path: default_history_path(),
        }
    }
}

impl HistoryConfig {
    pub fn backend(&self) -> Result<HistoryBackend> {
        self.backend.parse()
    }

    /// History path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

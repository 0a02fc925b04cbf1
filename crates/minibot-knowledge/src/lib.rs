//! # MiniBot Knowledge Base
//!
//! Fixed FAQ corpus with fuzzy question matching. No embeddings, no index
//! files: the corpus is loaded once from JSON and every query is scored
//! against every canonical question.
//!
//! ## How it works
//! ```text
//! User: "what r ur hours"
//!   ↓
//! Matcher scores it against each canonical question (weighted ratio, 0–100)
//!   ↓
//! Best: "What are your hours?" (88)
//!   ↓ score > threshold (80)?
//! yes → paired answer      no → fallback answer
//! ```

pub mod fuzz;
pub mod index;
pub mod loader;
pub mod matcher;
pub mod responder;

pub use index::CorpusIndex;
pub use matcher::{MatchResult, Matcher, Scorer, WeightedRatio};
pub use responder::{Answer, Responder};

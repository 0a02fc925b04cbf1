//! Turns a question into an answer: match, apply the threshold, resolve.

use crate::index::CorpusIndex;
use crate::loader;
use crate::matcher::{Matcher, Scorer, WeightedRatio};
use minibot_core::config::{
    DEFAULT_FALLBACK_ANSWER, DEFAULT_MAX_QUESTION_LEN, DEFAULT_THRESHOLD, KnowledgeConfig,
};
use minibot_core::{MiniBotError, Result};

/// Resolved answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    /// Canonical question the answer came from; `None` means fallback.
    pub matched: Option<String>,
    pub score: u8,
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        self.matched.is_none()
    }
}

/// Owns the corpus and the acceptance policy. Immutable after construction,
/// so one instance can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct Responder<S = WeightedRatio> {
    index: CorpusIndex,
    matcher: Matcher<S>,
    threshold: u8,
    fallback_answer: String,
    max_question_len: usize,
}

impl Responder<WeightedRatio> {
    pub fn new(index: CorpusIndex) -> Self {
        Self::with_matcher(index, Matcher::new())
    }

    /// Load the corpus named in the config; an unreadable file yields an empty corpus.
    pub fn from_config(config: &KnowledgeConfig) -> Self {
        let entries = loader::load_or_empty(&config.resolved_path());
        Self::new(CorpusIndex::new(entries))
            .threshold(config.threshold)
            .fallback_answer(config.fallback_answer.clone())
            .max_question_len(config.max_question_len)
    }
}

impl<S: Scorer> Responder<S> {
    pub fn with_matcher(index: CorpusIndex, matcher: Matcher<S>) -> Self {
        Self {
            index,
            matcher,
            threshold: DEFAULT_THRESHOLD,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
            max_question_len: DEFAULT_MAX_QUESTION_LEN,
        }
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn fallback_answer(mut self, answer: impl Into<String>) -> Self {
        self.fallback_answer = answer.into();
        self
    }

    /// Scoring cost grows with question length times corpus size; longer
    /// questions are refused.
    pub fn max_question_len(mut self, max: usize) -> Self {
        self.max_question_len = max;
        self
    }

    pub fn corpus(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn acceptance_threshold(&self) -> u8 {
        self.threshold
    }

    /// Strictly greater than the threshold.
    pub fn accepts(&self, score: u8) -> bool {
        score > self.threshold
    }

    /// Answer a question.
    ///
    /// Blank questions are rejected with [`MiniBotError::MissingInput`], and
    /// questions over the length cap with [`MiniBotError::QuestionTooLong`].
    pub fn answer(&self, question: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(MiniBotError::MissingInput);
        }
        let len = question.chars().count();
        if len > self.max_question_len {
            return Err(MiniBotError::QuestionTooLong {
                len,
                max: self.max_question_len,
            });
        }

        let result = self.matcher.best_match(question, self.index.questions());
        let resolved = match result.best_question {
            Some(matched) if self.accepts(result.score) => self
                .index
                .answer_of(&matched)
                .map(|answer| (answer.to_string(), matched)),
            _ => None,
        };

        tracing::debug!(
            "🔎 {:?} → {:?} (score={}, accepted={})",
            question,
            resolved.as_ref().map(|(_, q)| q.as_str()),
            result.score,
            resolved.is_some()
        );

        Ok(match resolved {
            Some((answer, matched)) => Answer {
                answer,
                matched: Some(matched),
                score: result.score,
            },
            None => Answer {
                answer: self.fallback_answer.clone(),
                matched: None,
                score: result.score,
            },
        })
    }
}

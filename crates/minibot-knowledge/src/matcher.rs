//! Best-match selection over the canonical questions.

use crate::fuzz;

/// Scores a query against one canonical question, 0–100.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> u8;
}

/// Default scorer: [`fuzz::weighted_ratio`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl Scorer for WeightedRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        fuzz::weighted_ratio(query, candidate)
    }
}

impl<F> Scorer for F
where
    F: Fn(&str, &str) -> u8 + Send + Sync,
{
    fn score(&self, query: &str, candidate: &str) -> u8 {
        self(query, candidate)
    }
}

/// Outcome of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub best_question: Option<String>,
    pub score: u8,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            best_question: None,
            score: 0,
        }
    }
}

/// Picks the highest-scoring question; the earliest one wins ties.
#[derive(Debug, Clone, Default)]
pub struct Matcher<S = WeightedRatio> {
    scorer: S,
}

impl Matcher<WeightedRatio> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Scorer> Matcher<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn best_match(&self, query: &str, questions: &[String]) -> MatchResult {
        let mut best: Option<(&String, u8)> = None;
        for question in questions {
            let score = self.scorer.score(query, question);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((question, score)),
            }
            if score == 100 {
                break;
            }
        }

        match best {
            Some((question, score)) => MatchResult {
                best_question: Some(question.clone()),
                score,
            },
            None => MatchResult::none(),
        }
    }
}

//! Read-only corpus index built once at startup.

use minibot_core::QaEntry;
use std::collections::HashMap;

/// Canonical questions in source order plus a question → answer map.
///
/// Duplicate questions keep their first occurrence: the earlier entry's
/// position and answer win, later copies are dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    questions: Vec<String>,
    answers: HashMap<String, String>,
}

impl CorpusIndex {
    pub fn new(entries: Vec<QaEntry>) -> Self {
        let mut questions = Vec::with_capacity(entries.len());
        let mut answers = HashMap::with_capacity(entries.len());

        for entry in entries {
            if answers.contains_key(&entry.question) {
                tracing::warn!("⚠️ Duplicate question ignored: {:?}", entry.question);
                continue;
            }
            questions.push(entry.question.clone());
            answers.insert(entry.question, entry.answer);
        }

        Self { questions, answers }
    }

    /// Canonical questions, in source order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Answer paired with an exact canonical question.
    pub fn answer_of(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus() {
        let index = CorpusIndex::new(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.questions().is_empty());
        assert_eq!(index.answer_of("anything"), None);
    }

    #[test]
    fn test_every_question_resolves() {
        let entries = vec![
            QaEntry::new("What are your hours?", "9am-5pm"),
            QaEntry::new("Where are you located?", "Main Street"),
            QaEntry::new("Do you ship abroad?", "Yes"),
        ];
        let index = CorpusIndex::new(entries.clone());
        assert_eq!(index.len(), entries.len());
        for entry in &entries {
            assert_eq!(index.answer_of(&entry.question), Some(entry.answer.as_str()));
        }
        let order: Vec<_> = entries.iter().map(|e| e.question.clone()).collect();
        assert_eq!(index.questions(), order.as_slice());
    }

    #[test]
    fn test_duplicate_first_wins() {
        let index = CorpusIndex::new(vec![
            QaEntry::new("Hi?", "first"),
            QaEntry::new("Bye?", "bye"),
            QaEntry::new("Hi?", "second"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.questions(), ["Hi?".to_string(), "Bye?".to_string()]);
        assert_eq!(index.answer_of("Hi?"), Some("first"));
    }
}

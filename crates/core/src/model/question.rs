use thiserror::Error;

use crate::model::{AnswerChoice, Category, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────

/// A single quiz item: a true/false statement with its expected answer.
///
/// Immutable once loaded; owned by the `QuestionBank` for the lifetime of a
/// bank load. The optional explanation is shown after the answer is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    category: Category,
    prompt: String,
    correct_answer: AnswerChoice,
    explanation: Option<String>,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is empty after trimming.
    pub fn new(
        id: QuestionId,
        category: Category,
        prompt: impl Into<String>,
        correct_answer: AnswerChoice,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let explanation = explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Self {
            id,
            category,
            prompt: trimmed.to_string(),
            correct_answer,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> AnswerChoice {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Exact value equality against the expected answer.
    #[must_use]
    pub fn is_correct(&self, answer: AnswerChoice) -> bool {
        self.correct_answer == answer
    }
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────

/// Immutable in-memory table of questions for the current load.
///
/// Supplied fully parsed by an external collaborator; the engine never adds,
/// removes, or reorders entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for question in &self.questions {
            if !seen.contains(question.category()) {
                seen.push(question.category().clone());
            }
        }
        seen
    }
}

impl From<Vec<Question>> for QuestionBank {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

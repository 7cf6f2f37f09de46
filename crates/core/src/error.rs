use thiserror::Error;

use crate::model::{AnswerParseError, CategoryError, QuestionError, SettingsError};

/// Crate-level error for question-bank construction boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Answer(#[from] AnswerParseError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

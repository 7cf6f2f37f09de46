use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per session must be > 0")]
    InvalidQuestionsPerSession,
}

/// Session sizing configuration.
///
/// Controls how many questions a selection policy draws for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    questions_per_session: u32,
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionsPerSession` if the count is zero.
    pub fn new(questions_per_session: u32) -> Result<Self, SettingsError> {
        if questions_per_session == 0 {
            return Err(SettingsError::InvalidQuestionsPerSession);
        }
        Ok(Self {
            questions_per_session,
        })
    }

    #[must_use]
    pub fn questions_per_session(&self) -> u32 {
        self.questions_per_session
    }
}

impl Default for QuizSettings {
    /// Ten questions per session, the size the bank data was authored for.
    fn default() -> Self {
        Self {
            questions_per_session: 10,
        }
    }
}

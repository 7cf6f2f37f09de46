use chrono::{DateTime, Utc};

use quiz_core::model::{AnswerChoice, Question, QuestionId};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────

/// Lifecycle of a quiz session.
///
/// Transitions are `InProgress → Revealed` on submit and `Revealed →
/// InProgress | Complete` on advance; `Complete` is terminal until a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The current question is shown and awaiting an answer.
    InProgress,
    /// The current question was answered; outcome and explanation are
    /// visible, waiting to advance.
    Revealed,
    /// The cursor has passed the last question.
    Complete,
}

/// A submitted answer and its graded outcome, kept for the reveal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub question_id: QuestionId,
    pub answer: AnswerChoice,
    pub was_correct: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────

/// Stateful sequencer over a selected, ordered subset of questions.
///
/// Walks the subset one question at a time and keeps the running score.
/// Transient by design: never persisted, discarded on completion or
/// abandonment. Ledger writes happen in the workflow layer, once per
/// submission.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    state: SessionState,
    last_submission: Option<Submission>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over an already-selected subset.
    ///
    /// An empty subset starts `Complete` immediately, without ever entering
    /// `InProgress`; callers treat that as the "nothing to ask" outcome
    /// rather than an error.
    #[must_use]
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Self {
        let (state, completed_at) = if questions.is_empty() {
            (SessionState::Complete, Some(started_at))
        } else {
            (SessionState::InProgress, None)
        };

        Self {
            questions,
            current: 0,
            score: 0,
            state,
            last_submission: None,
            started_at,
            completed_at,
        }
    }

    /// Re-initialize with a new ordered subset for retry flows.
    ///
    /// Score and cursor reset to zero; the ledger is untouched.
    pub fn reset(&mut self, questions: Vec<Question>, started_at: DateTime<Utc>) {
        *self = Self::new(questions, started_at);
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Count of correct answers in this session.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based cursor into the selected subset.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// The submission held for the reveal view, if any.
    #[must_use]
    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    /// Number of questions that have been answered so far.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        match self.state {
            SessionState::Revealed => self.current + 1,
            SessionState::InProgress | SessionState::Complete => self.current,
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.answered_count(),
            remaining: self.total().saturating_sub(self.answered_count()),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// Grade an answer against the current question.
    ///
    /// Valid only in `InProgress`: compares by exact value equality, bumps
    /// the score on a correct answer, stores the submission, and moves to
    /// `Revealed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAwaitingAnswer` when called in any other
    /// state.
    pub fn submit_answer(&mut self, answer: AnswerChoice) -> Result<Submission, SessionError> {
        if self.state != SessionState::InProgress {
            return Err(SessionError::NotAwaitingAnswer);
        }
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::NotAwaitingAnswer)?;

        let was_correct = question.is_correct(answer);
        if was_correct {
            self.score = self.score.saturating_add(1);
        }

        let submission = Submission {
            question_id: question.id(),
            answer,
            was_correct,
        };
        self.last_submission = Some(submission);
        self.state = SessionState::Revealed;
        Ok(submission)
    }

    /// Move past the revealed question.
    ///
    /// Valid only in `Revealed`: clears the stored submission, advances the
    /// cursor, and lands in `InProgress` or, past the last question,
    /// `Complete` (stamped with `now`).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` when called in any other state.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<SessionState, SessionError> {
        if self.state != SessionState::Revealed {
            return Err(SessionError::NotRevealed);
        }

        self.last_submission = None;
        self.current += 1;
        if self.current >= self.questions.len() {
            self.state = SessionState::Complete;
            self.completed_at = Some(now);
        } else {
            self.state = SessionState::InProgress;
        }
        Ok(self.state)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Category;
    use quiz_core::time::fixed_now;

    fn build_question(id: u64, correct: AnswerChoice) -> Question {
        Question::new(
            QuestionId::new(id),
            Category::new("general").unwrap(),
            format!("statement {id}"),
            correct,
            Some(format!("because {id}")),
        )
        .unwrap()
    }

    #[test]
    fn walks_two_questions_to_completion() {
        let a = build_question(1, AnswerChoice::True);
        let b = build_question(2, AnswerChoice::False);
        let mut session = QuizSession::new(vec![a, b], fixed_now());

        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.current_index(), 0);

        // A answered correctly
        let submission = session.submit_answer(AnswerChoice::True).unwrap();
        assert!(submission.was_correct);
        assert_eq!(session.state(), SessionState::Revealed);
        assert_eq!(session.score(), 1);

        assert_eq!(
            session.advance(fixed_now()).unwrap(),
            SessionState::InProgress
        );
        assert_eq!(session.current_index(), 1);
        assert!(session.last_submission().is_none());

        // B answered incorrectly
        let submission = session.submit_answer(AnswerChoice::True).unwrap();
        assert!(!submission.was_correct);
        assert_eq!(session.score(), 1);

        assert_eq!(
            session.advance(fixed_now()).unwrap(),
            SessionState::Complete
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.total(), 2);
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn empty_subset_starts_complete() {
        let session = QuizSession::new(Vec::new(), fixed_now());
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.total(), 0);
    }

    #[test]
    fn submit_outside_in_progress_is_an_error() {
        let mut session = QuizSession::new(vec![build_question(1, AnswerChoice::True)], fixed_now());
        session.submit_answer(AnswerChoice::True).unwrap();

        let err = session.submit_answer(AnswerChoice::True).unwrap_err();
        assert!(matches!(err, SessionError::NotAwaitingAnswer));

        // Score must not move on the rejected call.
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn submit_on_complete_session_is_an_error() {
        let mut session = QuizSession::new(Vec::new(), fixed_now());
        let err = session.submit_answer(AnswerChoice::False).unwrap_err();
        assert!(matches!(err, SessionError::NotAwaitingAnswer));
    }

    #[test]
    fn advance_outside_revealed_is_an_error() {
        let mut session = QuizSession::new(vec![build_question(1, AnswerChoice::True)], fixed_now());
        let err = session.advance(fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::NotRevealed));
    }

    #[test]
    fn reveal_keeps_submission_for_display() {
        let mut session =
            QuizSession::new(vec![build_question(1, AnswerChoice::False)], fixed_now());
        session.submit_answer(AnswerChoice::True).unwrap();

        let held = session.last_submission().unwrap();
        assert_eq!(held.answer, AnswerChoice::True);
        assert!(!held.was_correct);
        assert_eq!(held.question_id, QuestionId::new(1));
    }

    #[test]
    fn reset_starts_over_with_new_subset() {
        let mut session = QuizSession::new(vec![build_question(1, AnswerChoice::True)], fixed_now());
        session.submit_answer(AnswerChoice::True).unwrap();
        session.advance(fixed_now()).unwrap();
        assert!(session.is_complete());

        session.reset(
            vec![
                build_question(2, AnswerChoice::False),
                build_question(3, AnswerChoice::True),
            ],
            fixed_now(),
        );
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn progress_tracks_the_walk() {
        let mut session = QuizSession::new(
            vec![
                build_question(1, AnswerChoice::True),
                build_question(2, AnswerChoice::True),
            ],
            fixed_now(),
        );
        assert_eq!(session.progress().answered, 0);
        assert_eq!(session.progress().remaining, 2);

        session.submit_answer(AnswerChoice::True).unwrap();
        assert_eq!(session.progress().answered, 1);
        assert_eq!(session.progress().remaining, 1);
        assert_eq!(session.progress().score, 1);

        session.advance(fixed_now()).unwrap();
        assert_eq!(session.progress().answered, 1);

        session.submit_answer(AnswerChoice::False).unwrap();
        session.advance(fixed_now()).unwrap();
        let progress = session.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.remaining, 0);
        assert!(progress.is_complete);
    }
}

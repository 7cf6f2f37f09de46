use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{AnswerChoice, AnswerRecord, Category, QuestionBank, QuizSettings};
use storage::repository::LedgerRepository;

use super::service::{QuizSession, SessionState, Submission};
use crate::error::SessionError;
use crate::selection;

/// How the questions for a session are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Uniform draw from the whole bank.
    Random,
    /// Only questions whose category matches byte-exactly.
    Category(Category),
    /// Only questions answered before with accuracy below 50%.
    Weak,
    /// Only questions never answered.
    Unanswered,
}

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub submission: Submission,
    /// Cumulative ledger record for the question, including this answer;
    /// the reveal view shows its lifetime accuracy.
    pub record: AnswerRecord,
}

/// Orchestrates session start and persisted answering.
///
/// Holds the clock and the ledger handle so sessions themselves stay pure;
/// every answer is written through to the ledger exactly once.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    ledger: Arc<dyn LedgerRepository>,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, ledger: Arc<dyn LedgerRepository>) -> Self {
        Self {
            clock,
            ledger,
            settings: QuizSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    fn session_size(&self) -> usize {
        usize::try_from(self.settings.questions_per_session()).unwrap_or(usize::MAX)
    }

    /// Start a new session under the given policy.
    ///
    /// A policy that yields no questions returns an immediately-complete
    /// session; callers check `total() == 0` to present the "nothing to ask"
    /// outcome (e.g. no weak questions yet).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when loading the ledger fails for the
    /// history-based policies.
    pub async fn start(
        &self,
        bank: &QuestionBank,
        policy: &SelectionPolicy,
    ) -> Result<QuizSession, SessionError> {
        let count = self.session_size();
        let questions = match policy {
            SelectionPolicy::Random => selection::select_random(bank, count),
            SelectionPolicy::Category(category) => {
                selection::select_by_category(bank, category, count)
            }
            SelectionPolicy::Weak => {
                let ledger = self.ledger.load_ledger().await?;
                selection::select_weak(bank, &ledger, count)
            }
            SelectionPolicy::Unanswered => {
                let ledger = self.ledger.load_ledger().await?;
                selection::select_unanswered(bank, &ledger, count)
            }
        };
        Ok(QuizSession::new(questions, self.clock.now()))
    }

    /// Answer the current question and record it in the ledger.
    ///
    /// The ledger is read-modify-written as a whole: load, bump one entry,
    /// save. Safe only because there is a single writer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAwaitingAnswer` out of protocol, or
    /// `SessionError::Storage` when the ledger write fails (the session is
    /// already `Revealed` at that point; storage errors are propagated
    /// unchanged, never retried).
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        answer: AnswerChoice,
    ) -> Result<AnswerOutcome, SessionError> {
        let submission = session.submit_answer(answer)?;

        let mut ledger = self.ledger.load_ledger().await?;
        let record = ledger.record(submission.question_id, submission.was_correct);
        self.ledger.save_ledger(&ledger).await?;

        Ok(AnswerOutcome { submission, record })
    }

    /// Move past the revealed question, stamping completion with the
    /// service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` out of protocol.
    pub fn advance(&self, session: &mut QuizSession) -> Result<SessionState, SessionError> {
        session.advance(self.clock.now())
    }

    /// Retry flow: re-select under the same policy and reset the session.
    ///
    /// Does not touch the ledger beyond the read the policy may need.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when loading the ledger fails for the
    /// history-based policies.
    pub async fn restart(
        &self,
        session: &mut QuizSession,
        bank: &QuestionBank,
        policy: &SelectionPolicy,
    ) -> Result<(), SessionError> {
        let fresh = self.start(bank, policy).await?;
        *session = fresh;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

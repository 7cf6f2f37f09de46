use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::QuestionId;

//
// ─── ANSWER RECORD ────────────────────────────────────────────────────────────

/// Lifetime tally of answers for one question.
///
/// Both counters are monotonically non-decreasing; the only mutation is a
/// saturating increment of exactly one of them. Field names match the
/// persisted blob shape (`{"correct": N, "wrong": M}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub correct: u32,
    pub wrong: u32,
}

impl AnswerRecord {
    /// Total number of recorded answers.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct.saturating_add(self.wrong)
    }

    /// Historical accuracy, or `None` when nothing has been recorded yet.
    ///
    /// "No data" and "all wrong" are distinct outcomes; callers must not
    /// collapse `None` into 0.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(f64::from(self.correct) / f64::from(total))
    }

    /// A question is weak when its accuracy is defined and strictly below 50%.
    #[must_use]
    pub fn is_weak(&self) -> bool {
        self.accuracy().is_some_and(|rate| rate < 0.5)
    }

    fn bump(&mut self, was_correct: bool) {
        if was_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }
    }
}

//
// ─── ANSWER LEDGER ────────────────────────────────────────────────────────────

/// Persisted per-question answer history, keyed by question id.
///
/// Keys are present only for questions answered at least once. The ledger is
/// created empty on first use and mutated exclusively through [`record`];
/// entries are never removed.
///
/// [`record`]: AnswerLedger::record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLedger {
    entries: BTreeMap<QuestionId, AnswerRecord>,
}

impl AnswerLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answer for a question, creating a zero-valued entry first
    /// when the question has never been answered.
    ///
    /// NOT idempotent: calling twice for the same logical answer double
    /// counts. The session workflow is responsible for calling exactly once
    /// per submitted answer.
    pub fn record(&mut self, id: QuestionId, was_correct: bool) -> AnswerRecord {
        let entry = self.entries.entry(id).or_default();
        entry.bump(was_correct);
        *entry
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&AnswerRecord> {
        self.entries.get(&id)
    }

    /// True when the question has at least one recorded answer.
    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &AnswerRecord)> {
        self.entries.iter().map(|(id, record)| (*id, record))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

//! Stats Aggregator: overall and per-category accuracy/coverage summaries
//! derived from the ledger and the full question bank.
//!
//! The pure functions work on borrowed data; `StatsService` wraps them over
//! the persisted ledger. Independent of any active session.

use std::sync::Arc;

use quiz_core::model::{AnswerLedger, Category, QuestionBank};
use storage::repository::LedgerRepository;

use crate::error::StatsError;

//
// ─── SUMMARY TYPES ─────────────────────────────────────────────────────────────

/// Accuracy across every ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallStats {
    /// Rounded percentage 0–100; zero when nothing was answered, by
    /// convention rather than as an error.
    pub rate: u32,
    pub correct: u32,
    pub total: u32,
}

/// Fraction of the bank answered at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub answered: usize,
    pub total: usize,
}

impl Coverage {
    /// Coverage as a fraction in `[0, 1]`; zero for an empty bank.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64
    }
}

/// Aggregated accuracy for one category of the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: Category,
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    /// `None` when no question in this category has been answered — "no
    /// data" is a sentinel, distinct from 0 ("all wrong").
    pub rate: Option<u32>,
    pub coverage: Coverage,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(correct: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some((100.0 * f64::from(correct) / f64::from(total)).round() as u32)
}

//
// ─── AGGREGATION ───────────────────────────────────────────────────────────────

/// Accuracy across every ledger entry, bank-independent.
#[must_use]
pub fn overall(ledger: &AnswerLedger) -> OverallStats {
    let mut correct = 0_u32;
    let mut total = 0_u32;
    for (_, record) in ledger.iter() {
        correct = correct.saturating_add(record.correct);
        total = total.saturating_add(record.total());
    }

    OverallStats {
        rate: percentage(correct, total).unwrap_or(0),
        correct,
        total,
    }
}

/// Fraction of distinct bank questions with at least one ledger entry.
#[must_use]
pub fn coverage(bank: &QuestionBank, ledger: &AnswerLedger) -> Coverage {
    let answered = bank
        .iter()
        .filter(|question| ledger.contains(question.id()))
        .count();
    Coverage {
        answered,
        total: bank.len(),
    }
}

/// Per-category aggregates for every category present in the bank.
///
/// Ordered by chapter ordinal ascending where the label carries one;
/// unlabelled categories sort last. The sort is stable, so first-seen bank
/// order breaks ties.
#[must_use]
pub fn by_category(bank: &QuestionBank, ledger: &AnswerLedger) -> Vec<CategoryStats> {
    let mut categories = bank.categories();
    categories.sort_by_key(|category| match category.chapter() {
        Some(chapter) => (0_u8, chapter),
        None => (1_u8, 0),
    });

    categories
        .into_iter()
        .map(|category| {
            let mut correct = 0_u32;
            let mut wrong = 0_u32;
            let mut answered = 0_usize;
            let mut question_count = 0_usize;

            for question in bank.iter().filter(|q| q.category() == &category) {
                question_count += 1;
                if let Some(record) = ledger.get(question.id()) {
                    answered += 1;
                    correct = correct.saturating_add(record.correct);
                    wrong = wrong.saturating_add(record.wrong);
                }
            }

            let total = correct.saturating_add(wrong);
            CategoryStats {
                category,
                correct,
                wrong,
                total,
                rate: percentage(correct, total),
                coverage: Coverage {
                    answered,
                    total: question_count,
                },
            }
        })
        .collect()
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────

/// Stats facade that hides the ledger repository from callers.
#[derive(Clone)]
pub struct StatsService {
    ledger: Arc<dyn LedgerRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    /// Overall accuracy over the persisted ledger.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` when the ledger cannot be loaded.
    pub async fn overall(&self) -> Result<OverallStats, StatsError> {
        let ledger = self.ledger.load_ledger().await?;
        Ok(overall(&ledger))
    }

    /// Bank coverage over the persisted ledger.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` when the ledger cannot be loaded.
    pub async fn coverage(&self, bank: &QuestionBank) -> Result<Coverage, StatsError> {
        let ledger = self.ledger.load_ledger().await?;
        Ok(coverage(bank, &ledger))
    }

    /// Per-category aggregates over the persisted ledger.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` when the ledger cannot be loaded.
    pub async fn by_category(&self, bank: &QuestionBank) -> Result<Vec<CategoryStats>, StatsError> {
        let ledger = self.ledger.load_ledger().await?;
        Ok(by_category(bank, &ledger))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerChoice, Question, QuestionId};

    fn build_question(id: u64, category: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            Category::new(category).unwrap(),
            format!("statement {id}"),
            AnswerChoice::True,
            None,
        )
        .unwrap()
    }

    fn record_n(ledger: &mut AnswerLedger, id: u64, correct: u32, wrong: u32) {
        for _ in 0..correct {
            ledger.record(QuestionId::new(id), true);
        }
        for _ in 0..wrong {
            ledger.record(QuestionId::new(id), false);
        }
    }

    #[test]
    fn overall_rounds_to_whole_percent() {
        let mut ledger = AnswerLedger::new();
        record_n(&mut ledger, 1, 3, 1);
        record_n(&mut ledger, 2, 0, 2);

        let stats = overall(&ledger);
        assert_eq!(stats, OverallStats { rate: 50, correct: 3, total: 6 });
    }

    #[test]
    fn overall_of_empty_ledger_is_zero_by_convention() {
        let stats = overall(&AnswerLedger::new());
        assert_eq!(stats, OverallStats { rate: 0, correct: 0, total: 0 });
    }

    #[test]
    fn overall_rounds_two_thirds_up() {
        let mut ledger = AnswerLedger::new();
        record_n(&mut ledger, 1, 2, 1);
        assert_eq!(overall(&ledger).rate, 67);
    }

    #[test]
    fn coverage_counts_bank_questions_with_history() {
        let bank = QuestionBank::new(vec![
            build_question(1, "a"),
            build_question(2, "a"),
            build_question(3, "b"),
        ]);
        let mut ledger = AnswerLedger::new();
        record_n(&mut ledger, 1, 1, 0);
        // An entry for a question no longer in the bank must not count.
        record_n(&mut ledger, 99, 1, 0);

        let cov = coverage(&bank, &ledger);
        assert_eq!(cov, Coverage { answered: 1, total: 3 });
        assert!((cov.fraction() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn coverage_of_empty_bank_is_zero() {
        let cov = coverage(&QuestionBank::default(), &AnswerLedger::new());
        assert_eq!(cov, Coverage { answered: 0, total: 0 });
        assert_eq!(cov.fraction(), 0.0);
    }

    #[test]
    fn by_category_orders_chapters_first_then_unlabelled() {
        let bank = QuestionBank::new(vec![
            build_question(1, "misc"),
            build_question(2, "【3章】safety"),
            build_question(3, "【1章】basics"),
            build_question(4, "extra"),
        ]);

        let stats = by_category(&bank, &AnswerLedger::new());
        let labels: Vec<_> = stats.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(labels, vec!["【1章】basics", "【3章】safety", "misc", "extra"]);
    }

    #[test]
    fn by_category_aggregates_counts_and_coverage() {
        let bank = QuestionBank::new(vec![
            build_question(1, "a"),
            build_question(2, "a"),
            build_question(3, "b"),
        ]);
        let mut ledger = AnswerLedger::new();
        record_n(&mut ledger, 1, 2, 1);
        record_n(&mut ledger, 2, 0, 1);

        let stats = by_category(&bank, &ledger);

        let a = &stats[0];
        assert_eq!(a.category.as_str(), "a");
        assert_eq!((a.correct, a.wrong, a.total), (2, 2, 4));
        assert_eq!(a.rate, Some(50));
        assert_eq!(a.coverage, Coverage { answered: 2, total: 2 });

        let b = &stats[1];
        assert_eq!(b.rate, None, "unanswered category reports no rate");
        assert_eq!(b.coverage, Coverage { answered: 0, total: 1 });
    }

    #[test]
    fn all_wrong_category_is_zero_not_undefined() {
        let bank = QuestionBank::new(vec![build_question(1, "a")]);
        let mut ledger = AnswerLedger::new();
        record_n(&mut ledger, 1, 0, 3);

        let stats = by_category(&bank, &ledger);
        assert_eq!(stats[0].rate, Some(0));
    }
}

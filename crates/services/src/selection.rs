//! Selection Engine: pure functions that derive a bounded, shuffled subset
//! of questions under a policy.
//!
//! Every function borrows the bank and ledger immutably and returns owned
//! questions in uniformly random order. When fewer than `count` questions
//! qualify, all qualifying questions are returned without further signal;
//! callers that care compare the result length against `count`. An empty
//! result is a valid outcome, never an error.

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{AnswerLedger, AnswerRecord, Category, Question, QuestionBank};

/// Uniformly shuffle the candidates and keep at most `count`.
///
/// Fisher–Yates via [`SliceRandom::shuffle`]; shuffling first and truncating
/// after is an unbiased draw without replacement.
fn shuffle_and_take(mut candidates: Vec<Question>, count: usize) -> Vec<Question> {
    let mut rng = rng();
    candidates.as_mut_slice().shuffle(&mut rng);
    candidates.truncate(count);
    candidates
}

/// Up to `count` questions drawn from the whole bank without replacement,
/// in randomized order.
#[must_use]
pub fn select_random(bank: &QuestionBank, count: usize) -> Vec<Question> {
    shuffle_and_take(bank.iter().cloned().collect(), count)
}

/// Up to `count` questions whose category equals `category` byte-exactly.
#[must_use]
pub fn select_by_category(bank: &QuestionBank, category: &Category, count: usize) -> Vec<Question> {
    let candidates = bank
        .iter()
        .filter(|question| question.category() == category)
        .cloned()
        .collect();
    shuffle_and_take(candidates, count)
}

/// Up to `count` questions answered at least once with accuracy strictly
/// below 50%.
///
/// Questions without a ledger entry never qualify; the empty result means
/// "no weak questions", which callers present as its own outcome.
#[must_use]
pub fn select_weak(bank: &QuestionBank, ledger: &AnswerLedger, count: usize) -> Vec<Question> {
    let candidates = bank
        .iter()
        .filter(|question| {
            ledger
                .get(question.id())
                .is_some_and(AnswerRecord::is_weak)
        })
        .cloned()
        .collect();
    shuffle_and_take(candidates, count)
}

/// Up to `count` questions with no ledger entry at all.
#[must_use]
pub fn select_unanswered(
    bank: &QuestionBank,
    ledger: &AnswerLedger,
    count: usize,
) -> Vec<Question> {
    let candidates = bank
        .iter()
        .filter(|question| !ledger.contains(question.id()))
        .cloned()
        .collect();
    shuffle_and_take(candidates, count)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerChoice, QuestionId};
    use std::collections::BTreeSet;

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

    fn build_bank(count: u64) -> QuestionBank {
        QuestionBank::new((1..=count).map(|id| build_question(id, "general")).collect())
    }

    fn ids(questions: &[Question]) -> BTreeSet<u64> {
        questions.iter().map(|q| q.id().value()).collect()
    }

    #[test]
    fn random_with_large_count_is_a_permutation() {
        let bank = build_bank(8);
        let picked = select_random(&bank, 100);
        assert_eq!(picked.len(), 8);
        assert_eq!(ids(&picked), (1..=8).collect());
    }

    #[test]
    fn random_caps_at_count_with_distinct_ids() {
        let bank = build_bank(20);
        let picked = select_random(&bank, 5);
        assert_eq!(picked.len(), 5);
        // distinct, and all drawn from the bank
        assert_eq!(ids(&picked).len(), 5);
        assert!(ids(&picked).iter().all(|id| (1..=20).contains(id)));
    }

    #[test]
    fn random_from_empty_bank_is_empty() {
        let picked = select_random(&QuestionBank::default(), 10);
        assert!(picked.is_empty());
    }

    #[test]
    fn zero_count_is_empty() {
        let bank = build_bank(4);
        assert!(select_random(&bank, 0).is_empty());
    }

    #[test]
    fn category_matches_are_byte_exact() {
        let bank = QuestionBank::new(vec![
            build_question(1, "networking"),
            build_question(2, "Networking"),
            build_question(3, "networking"),
        ]);
        let category = Category::new("networking").unwrap();
        let picked = select_by_category(&bank, &category, 10);
        assert_eq!(ids(&picked), [1, 3].into());
        assert!(picked.iter().all(|q| q.category() == &category));
    }

    #[test]
    fn category_without_matches_is_empty() {
        let bank = build_bank(3);
        let category = Category::new("missing").unwrap();
        assert!(select_by_category(&bank, &category, 10).is_empty());
    }

    #[test]
    fn weak_requires_defined_accuracy_below_half() {
        let bank = build_bank(4);
        let mut ledger = AnswerLedger::new();
        // q1: 1/3 correct -> weak
        ledger.record(QuestionId::new(1), true);
        ledger.record(QuestionId::new(1), false);
        ledger.record(QuestionId::new(1), false);
        // q2: exactly 50% -> not weak
        ledger.record(QuestionId::new(2), true);
        ledger.record(QuestionId::new(2), false);
        // q3: all wrong -> weak
        ledger.record(QuestionId::new(3), false);
        // q4 has no entry and must never appear.

        let picked = select_weak(&bank, &ledger, 10);
        assert_eq!(ids(&picked), [1, 3].into());
    }

    #[test]
    fn weak_with_no_history_is_empty_not_an_error() {
        let bank = build_bank(5);
        let picked = select_weak(&bank, &AnswerLedger::new(), 10);
        assert!(picked.is_empty());
    }

    #[test]
    fn weak_is_capped_at_count() {
        let bank = build_bank(6);
        let mut ledger = AnswerLedger::new();
        for id in 1..=6 {
            ledger.record(QuestionId::new(id), false);
        }
        assert_eq!(select_weak(&bank, &ledger, 2).len(), 2);
    }

    #[test]
    fn unanswered_excludes_any_recorded_question() {
        let bank = build_bank(4);
        let mut ledger = AnswerLedger::new();
        ledger.record(QuestionId::new(2), true);
        ledger.record(QuestionId::new(4), false);

        let picked = select_unanswered(&bank, &ledger, 10);
        assert_eq!(ids(&picked), [1, 3].into());
    }

    #[test]
    fn selection_does_not_mutate_inputs() {
        let bank = build_bank(5);
        let mut ledger = AnswerLedger::new();
        ledger.record(QuestionId::new(1), false);
        let bank_before = bank.clone();
        let ledger_before = ledger.clone();

        let _ = select_random(&bank, 3);
        let _ = select_weak(&bank, &ledger, 3);
        let _ = select_unanswered(&bank, &ledger, 3);

        assert_eq!(bank, bank_before);
        assert_eq!(ledger, ledger_before);
    }
}

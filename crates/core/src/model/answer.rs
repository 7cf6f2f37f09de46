use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────

/// Errors that can occur when parsing an answer value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerParseError {
    #[error("invalid answer value: {0:?}")]
    InvalidAnswer(String),
}

//
// ─── ANSWER CHOICE ────────────────────────────────────────────────────────────

/// The fixed answer alphabet for the question bank.
///
/// Every question is a true/false statement; an answer either affirms or
/// rejects it. Localized glyphs (`正`/`誤`, `○`/`×`) are mapped to this
/// alphabet at the bank-loading boundary, so the core only ever compares
/// these two values. Correctness is exact value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerChoice {
    /// The statement is correct.
    True,
    /// The statement is wrong.
    False,
}

impl AnswerChoice {
    /// Canonical text form, used in the bank file and the terminal surface.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerChoice::True => "true",
            AnswerChoice::False => "false",
        }
    }

    /// The opposite choice.
    #[must_use]
    pub fn negated(self) -> Self {
        match self {
            AnswerChoice::True => AnswerChoice::False,
            AnswerChoice::False => AnswerChoice::True,
        }
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerChoice {
    type Err = AnswerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "true" => Ok(AnswerChoice::True),
            "false" => Ok(AnswerChoice::False),
            other => Err(AnswerParseError::InvalidAnswer(other.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_forms() {
        assert_eq!("true".parse::<AnswerChoice>().unwrap(), AnswerChoice::True);
        assert_eq!(
            "false".parse::<AnswerChoice>().unwrap(),
            AnswerChoice::False
        );
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "maybe".parse::<AnswerChoice>().unwrap_err();
        assert!(matches!(err, AnswerParseError::InvalidAnswer(_)));
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(AnswerChoice::True.to_string(), "true");
        assert_eq!(AnswerChoice::False.to_string(), "false");
    }

    #[test]
    fn negated_flips() {
        assert_eq!(AnswerChoice::True.negated(), AnswerChoice::False);
        assert_eq!(AnswerChoice::False.negated(), AnswerChoice::True);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated category label (trimmed, non-empty).
///
/// Labels in the bank data may carry an ordinal chapter prefix of the form
/// `【3章】…`; when present it drives the ordering of per-category stats.
/// Equality and matching are always byte-exact on the full label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a validated category label.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyLabel` if the label is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CategoryError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::EmptyLabel);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chapter ordinal extracted from a `【N章】` prefix, if the label has one.
    #[must_use]
    pub fn chapter(&self) -> Option<u32> {
        let rest = self.0.strip_prefix('【')?;
        let marker = rest.find('章')?;
        let digits = &rest[..marker];
        let after = &rest[marker + '章'.len_utf8()..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !after.starts_with('】') {
            return None;
        }
        digits.parse().ok()
    }

    /// Label text without the chapter prefix; the whole label when there is none.
    #[must_use]
    pub fn title(&self) -> &str {
        match self.chapter() {
            Some(_) => {
                let closing = self.0.find('】').map_or(0, |i| i + '】'.len_utf8());
                &self.0[closing..]
            }
            None => &self.0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category label cannot be empty")]
    EmptyLabel,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────

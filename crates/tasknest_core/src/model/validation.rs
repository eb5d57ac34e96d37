//! Validation errors shared by category and task models.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected field values detected before any write is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entity id is the nil UUID.
    NilId,
    /// Category name is empty after trim.
    BlankCategoryName,
    /// Task goal is empty after trim.
    BlankTaskGoal,
    /// Color encoding is not six hex digits.
    InvalidColorEncoding(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "entity id must not be nil"),
            Self::BlankCategoryName => write!(f, "category name must not be blank"),
            Self::BlankTaskGoal => write!(f, "task goal must not be blank"),
            Self::InvalidColorEncoding(value) => {
                write!(f, "invalid color encoding `{value}`; expected six hex digits")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it with `error` when nothing is left.
pub(crate) fn require_text(value: String, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    if trimmed.len() == value.len() {
        return Ok(value);
    }
    Ok(trimmed.to_string())
}

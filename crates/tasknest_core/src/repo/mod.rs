//! Entity store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define create / fetch-with-sort / fetch-by-id / update contracts.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `validate()` before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Fetch order always ends with `created_at ASC, uuid ASC`, matching
//!   `model::ordering::compare_with`.

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::ordering::{SortDescriptor, SortKey};
use crate::model::task::TaskId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for category and task persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    CategoryNotFound(CategoryId),
    TaskNotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Renders `descriptors` as an `ORDER BY` clause with deterministic tie-breakers.
///
/// Empty input falls back to the default ordering.
pub(crate) fn order_by_clause(descriptors: &[SortDescriptor]) -> String {
    let default = [SortDescriptor::default_ordering()];
    let descriptors = if descriptors.is_empty() {
        &default[..]
    } else {
        descriptors
    };

    let mut terms: Vec<String> = descriptors
        .iter()
        .map(|descriptor| {
            let column = match descriptor.key {
                SortKey::Order => "sort_order",
                SortKey::CreatedAt => "created_at",
            };
            let direction = if descriptor.ascending { "ASC" } else { "DESC" };
            format!("{column} {direction}")
        })
        .collect();
    terms.push("created_at ASC".to_string());
    terms.push("uuid ASC".to_string());

    format!(" ORDER BY {}", terms.join(", "))
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::order_by_clause;
    use crate::model::ordering::SortDescriptor;

    #[test]
    fn order_by_clause_appends_tie_breakers() {
        assert_eq!(
            order_by_clause(&[]),
            " ORDER BY sort_order ASC, created_at ASC, uuid ASC"
        );
        assert_eq!(
            order_by_clause(&[SortDescriptor::by_created_at(false)]),
            " ORDER BY created_at DESC, created_at ASC, uuid ASC"
        );
    }
}

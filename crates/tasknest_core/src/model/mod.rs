//! Domain model for categories and tasks.
//!
//! # Responsibility
//! - Define canonical entities and their derived state.
//! - Keep ordering, color encoding and identifier rules in one place.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned at creation.
//! - Task deletion is a soft-delete flag, never a hard delete.
//! - Timestamps are Unix epoch milliseconds.

pub mod category;
pub mod color;
pub mod identifier;
pub mod ordering;
pub mod task;
pub mod validation;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

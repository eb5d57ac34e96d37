//! Task domain model.
//!
//! # Responsibility
//! - Define the to-do record owned by exactly one category.
//! - Derive lifecycle status and reminder eligibility from the stored flags.
//!
//! # Invariants
//! - `category_id` is taken from a real `Category` at construction.
//! - `goal` is never blank once validated.
//! - Status is derived, never stored: `trashed` dominates `completed`.

use crate::model::category::{Category, CategoryId};
use crate::model::identifier::Identifiable;
use crate::model::now_epoch_ms;
use crate::model::ordering::{Positioned, Sortable};
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one task.
pub type TaskId = Uuid;

/// Lifecycle state derived from `completed` and `trashed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Neither completed nor trashed.
    Active,
    /// Completed and still visible in history.
    Completed,
    /// Moved to trash (soft-deleted), regardless of completion.
    Trashed,
}

impl TaskStatus {
    pub fn from_flags(completed: bool, trashed: bool) -> Self {
        match (completed, trashed) {
            (_, true) => Self::Trashed,
            (true, false) => Self::Completed,
            (false, false) => Self::Active,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) category_id: CategoryId,
    pub(crate) goal: String,
    /// Position inside the owning category.
    pub(crate) order: i32,
    /// Unix epoch milliseconds.
    pub(crate) created_at: i64,
    /// Unix epoch milliseconds.
    pub(crate) remind_at: Option<i64>,
    pub(crate) completed: bool,
    /// Soft-delete flag. There is no hard delete in core.
    pub(crate) trashed: bool,
}

impl Task {
    /// Creates an active task without reminder inside `category`.
    ///
    /// # Errors
    /// - `BlankTaskGoal` when `goal` is blank.
    pub fn new(category: &Category, goal: impl Into<String>) -> Result<Self, ValidationError> {
        let goal = require_text(goal.into(), ValidationError::BlankTaskGoal)?;
        Ok(Self {
            id: Uuid::new_v4(),
            category_id: category.id(),
            goal,
            order: 0,
            created_at: now_epoch_ms(),
            remind_at: None,
            completed: false,
            trashed: false,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn remind_at(&self) -> Option<i64> {
        self.remind_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_trashed(&self) -> bool {
        self.trashed
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_flags(self.completed, self.trashed)
    }

    /// Neither completed nor trashed.
    pub fn is_active(&self) -> bool {
        self.status().is_active()
    }

    /// Has a remind time and is still active.
    pub fn is_reminder_eligible(&self) -> bool {
        self.remind_at.is_some() && self.is_active()
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) -> Result<(), ValidationError> {
        self.goal = require_text(goal.into(), ValidationError::BlankTaskGoal)?;
        Ok(())
    }

    pub fn set_remind_at(&mut self, remind_at: Option<i64>) {
        self.remind_at = remind_at;
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn set_trashed(&mut self, trashed: bool) {
        self.trashed = trashed;
    }

    pub fn set_order(&mut self, position: i32) {
        self.order = position;
    }

    /// Re-parents this task under `category`.
    pub fn move_to(&mut self, category: &Category) {
        self.category_id = category.id();
    }

    /// Checks invariants that may be broken by deserialized input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() || self.category_id.is_nil() {
            return Err(ValidationError::NilId);
        }
        if self.goal.trim().is_empty() {
            return Err(ValidationError::BlankTaskGoal);
        }
        Ok(())
    }
}

impl Identifiable for Task {
    const ENTITY_NAME: &'static str = "Task";

    fn uuid(&self) -> Uuid {
        self.id
    }
}

impl Sortable for Task {
    fn sort_order(&self) -> i32 {
        self.order
    }

    fn created_at_ms(&self) -> i64 {
        self.created_at
    }

    fn sort_id(&self) -> Uuid {
        self.id
    }
}

impl Positioned for Task {
    fn set_sort_order(&mut self, position: i32) {
        self.order = position;
    }
}

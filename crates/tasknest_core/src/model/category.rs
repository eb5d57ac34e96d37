//! Category domain model.
//!
//! # Responsibility
//! - Group tasks and own their display order, color and icon.
//! - Filter owned tasks down to the active ones.
//!
//! # Invariants
//! - `id` is generated once at creation and never changes or gets reused.
//! - `name` is never blank once validated.
//! - `color` is either unset or a canonical six-digit uppercase hex encoding.

use crate::model::color::{default_color, normalize_color_encoding, Color};
use crate::model::identifier::Identifiable;
use crate::model::now_epoch_ms;
use crate::model::ordering::{Positioned, Sortable};
use crate::model::task::Task;
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one category.
pub type CategoryId = Uuid;

const ICON_ASSET_PREFIX: &str = "category-icon-";

/// User-defined task group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub(crate) id: CategoryId,
    pub(crate) name: String,
    /// `None` means "use the first palette color".
    pub(crate) color: Option<String>,
    pub(crate) icon: String,
    /// Display position. Not necessarily contiguous.
    pub(crate) order: i32,
    /// Unix epoch milliseconds.
    pub(crate) created_at: i64,
}

impl Category {
    /// Creates a category with a fresh id and `created_at = now`.
    ///
    /// `order` is left at the storage default `0`; callers or the ordering
    /// policy assign the real position. An empty `color_encoding` leaves the
    /// color unset.
    ///
    /// # Errors
    /// - `BlankCategoryName` when `name` is blank.
    /// - `InvalidColorEncoding` when `color_encoding` is not six hex digits.
    pub fn new(
        name: impl Into<String>,
        color_encoding: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = require_text(name.into(), ValidationError::BlankCategoryName)?;
        let color_encoding = color_encoding.into();
        let color = if color_encoding.trim().is_empty() {
            None
        } else {
            Some(normalize_color_encoding(color_encoding.as_str())?)
        };

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            color,
            icon: icon.into().trim().to_string(),
            order: 0,
            created_at: now_epoch_ms(),
        })
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored color encoding, if any.
    pub fn color_encoding(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Renames this category.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = require_text(name.into(), ValidationError::BlankCategoryName)?;
        Ok(())
    }

    /// Decoded color, falling back to the first palette entry when unset.
    pub fn color_value(&self) -> Color {
        self.color
            .as_deref()
            .and_then(|encoding| Color::from_hex(encoding).ok())
            .unwrap_or_else(default_color)
    }

    /// Stores the encoding of `color`.
    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color.to_hex());
    }

    /// Stores a raw color encoding after validating it.
    pub fn set_color_encoding(&mut self, encoding: &str) -> Result<(), ValidationError> {
        self.color = Some(normalize_color_encoding(encoding)?);
        Ok(())
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.icon = icon.into().trim().to_string();
    }

    /// Asset name of the icon image, `None` when no icon is set.
    pub fn icon_asset_name(&self) -> Option<String> {
        if self.icon.is_empty() {
            return None;
        }
        Some(format!("{ICON_ASSET_PREFIX}{}", self.icon))
    }

    /// Sets the display position. No bounds validation is performed.
    pub fn set_order(&mut self, position: i32) {
        self.order = position;
    }

    /// Tasks owned by this category that are neither completed nor trashed.
    ///
    /// Keeps the input order and recomputes on every call.
    pub fn active_tasks<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks
            .into_iter()
            .filter(|task| task.category_id() == self.id && task.is_active())
            .collect()
    }

    /// Checks invariants that may be broken by deserialized input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankCategoryName);
        }
        if let Some(encoding) = self.color.as_deref() {
            if normalize_color_encoding(encoding)? != encoding {
                return Err(ValidationError::InvalidColorEncoding(encoding.to_string()));
            }
        }
        Ok(())
    }
}

impl Identifiable for Category {
    const ENTITY_NAME: &'static str = "Category";

    fn uuid(&self) -> Uuid {
        self.id
    }
}

impl Sortable for Category {
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

impl Positioned for Category {
    fn set_sort_order(&mut self, position: i32) {
        self.order = position;
    }
}

//! Category use-case service.
//!
//! # Responsibility
//! - Create, rename, recolor and reorder categories.
//! - Resolve the default category and a category's active tasks.
//!
//! # Invariants
//! - New categories are appended after the current last position.
//! - Validation runs before any repository write.

use crate::model::category::{Category, CategoryId};
use crate::model::color::Color;
use crate::model::ordering::{assign_positions, next_order, SortDescriptor};
use crate::model::task::Task;
use crate::model::validation::ValidationError;
use crate::repo::category_repo::{CategoryListQuery, CategoryRepository};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from category use-cases.
#[derive(Debug)]
pub enum CategoryServiceError {
    Validation(ValidationError),
    CategoryNotFound(CategoryId),
    Repo(RepoError),
}

impl Display for CategoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::CategoryNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for CategoryServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CategoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Category service facade over repository implementations.
pub struct CategoryService<C: CategoryRepository, T: TaskRepository> {
    categories: C,
    tasks: T,
}

impl<C: CategoryRepository, T: TaskRepository> CategoryService<C, T> {
    pub fn new(categories: C, tasks: T) -> Self {
        Self { categories, tasks }
    }

    /// Creates a category positioned after every existing one.
    pub fn create_category(
        &self,
        name: impl Into<String>,
        color_encoding: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = Category::new(name, color_encoding, icon)?;
        let existing = self.categories.list_categories(&CategoryListQuery::default())?;
        category.set_order(next_order(&existing));

        self.categories.create_category(&category)?;
        info!(
            "event=category_create module=service status=ok id={} order={}",
            category.id(),
            category.order()
        );
        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.categories.get_category(id)
    }

    /// Lists categories; empty `sorted_by` means default ordering.
    pub fn list_categories(&self, sorted_by: &[SortDescriptor]) -> RepoResult<Vec<Category>> {
        self.categories.list_categories(&CategoryListQuery {
            sorted_by: sorted_by.to_vec(),
            limit: None,
        })
    }

    /// Category with the smallest order; `None` when there are none.
    pub fn default_category(&self) -> RepoResult<Option<Category>> {
        self.categories.default_category()
    }

    pub fn rename_category(
        &self,
        id: CategoryId,
        name: impl Into<String>,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self.require_category(id)?;
        category.rename(name)?;
        self.categories.update_category(&category)?;
        Ok(category)
    }

    pub fn set_category_color(
        &self,
        id: CategoryId,
        color: Color,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self.require_category(id)?;
        category.set_color(color);
        self.categories.update_category(&category)?;
        Ok(category)
    }

    pub fn set_category_icon(
        &self,
        id: CategoryId,
        icon: impl Into<String>,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self.require_category(id)?;
        category.set_icon(icon);
        self.categories.update_category(&category)?;
        Ok(category)
    }

    /// Stores `position` as-is. Callers keep positions consistent.
    pub fn set_order(
        &self,
        id: CategoryId,
        position: i32,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self.require_category(id)?;
        category.set_order(position);
        self.categories.update_category(&category)?;
        Ok(category)
    }

    /// Rewrites positions so categories follow `ordered_ids` (`0..len`).
    ///
    /// Every id is resolved before the first write.
    pub fn reorder(
        &self,
        ordered_ids: &[CategoryId],
    ) -> Result<Vec<Category>, CategoryServiceError> {
        let mut categories = ordered_ids
            .iter()
            .map(|id| self.require_category(*id))
            .collect::<Result<Vec<_>, _>>()?;

        assign_positions(&mut categories);
        for category in &categories {
            self.categories.update_category(category)?;
        }
        info!(
            "event=category_reorder module=service status=ok count={}",
            categories.len()
        );
        Ok(categories)
    }

    /// Active tasks of one category in their stored order.
    pub fn active_tasks(&self, id: CategoryId) -> Result<Vec<Task>, CategoryServiceError> {
        let category = self.require_category(id)?;
        let tasks = self.tasks.list_tasks(&TaskListQuery::for_category(id))?;
        Ok(category
            .active_tasks(&tasks)
            .into_iter()
            .cloned()
            .collect())
    }

    fn require_category(&self, id: CategoryId) -> Result<Category, CategoryServiceError> {
        self.categories
            .get_category(id)?
            .ok_or(CategoryServiceError::CategoryNotFound(id))
    }
}

//! Core domain logic for TaskNest.
//! This crate is the single source of truth for category, task and reminder
//! invariants.

pub mod config;
pub mod db;
pub mod event;
pub mod l10n;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, ReminderSettings};
pub use event::{AppEvent, EventBus, SubscriptionId};
pub use l10n::{BundledLocalizer, Localizer};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::color::Color;
pub use model::identifier::Identifiable;
pub use model::ordering::{SortDescriptor, SortKey};
pub use model::task::{Task, TaskId, TaskStatus};
pub use model::validation::ValidationError;
pub use reminder::alarm::{AlarmFacility, AlarmRequest, InMemoryAlarmFacility, RegistrationError};
pub use reminder::scheduler::{ReminderPlan, ReminderScheduler};
pub use repo::category_repo::{CategoryListQuery, CategoryRepository, SqliteCategoryRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::{CategoryService, CategoryServiceError};
pub use service::seed::{seed_defaults, seed_defaults_if_empty, DefaultSeed};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! First-launch default data.
//!
//! # Responsibility
//! - Build the two default categories and the starter task.
//! - Persist them atomically.
//!
//! # Invariants
//! - The "personal" category gets order 0 and is therefore the default.
//! - The starter task is owned by the "personal" category.
//! - Either all three rows are written or none.

use crate::l10n::{Localizer, KEY_DEFAULT_CATEGORY, KEY_DEFAULT_CATEGORY_ALT, KEY_GET_STARTED};
use crate::model::category::Category;
use crate::model::color::DEFAULT_PALETTE;
use crate::model::task::Task;
use crate::model::validation::ValidationError;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;

pub const PERSONAL_ICON: &str = "progress";
pub const WORK_ICON: &str = "briefcase";

/// Entities written on first launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSeed {
    pub personal: Category,
    pub work: Category,
    pub starter_task: Task,
}

/// Builds the default entities without touching storage.
pub fn build_default_seed(localizer: &dyn Localizer) -> Result<DefaultSeed, ValidationError> {
    let mut personal = Category::new(
        localizer.localized_string(KEY_DEFAULT_CATEGORY),
        DEFAULT_PALETTE[0].to_hex(),
        PERSONAL_ICON,
    )?;
    personal.set_order(0);

    let mut work = Category::new(
        localizer.localized_string(KEY_DEFAULT_CATEGORY_ALT),
        DEFAULT_PALETTE[1].to_hex(),
        WORK_ICON,
    )?;
    work.set_order(1);

    let starter_task = Task::new(&personal, localizer.localized_string(KEY_GET_STARTED))?;

    Ok(DefaultSeed {
        personal,
        work,
        starter_task,
    })
}

/// Writes the default entities in one transaction.
pub fn seed_defaults(conn: &mut Connection, localizer: &dyn Localizer) -> RepoResult<DefaultSeed> {
    let seed = build_default_seed(localizer)?;

    let tx = conn.transaction()?;
    {
        let categories = SqliteCategoryRepository::new(&tx);
        let tasks = SqliteTaskRepository::new(&tx);
        categories.create_category(&seed.personal)?;
        tasks.create_task(&seed.starter_task)?;
        categories.create_category(&seed.work)?;
    }
    tx.commit()?;

    info!(
        "event=seed_defaults module=service status=ok personal={} work={} task={}",
        seed.personal.id(),
        seed.work.id(),
        seed.starter_task.id()
    );
    Ok(seed)
}

/// Seeds only when no category exists yet. Returns `None` when skipped.
pub fn seed_defaults_if_empty(
    conn: &mut Connection,
    localizer: &dyn Localizer,
) -> RepoResult<Option<DefaultSeed>> {
    let existing = SqliteCategoryRepository::new(conn).count_categories()?;
    if existing > 0 {
        info!("event=seed_defaults module=service status=skip categories={existing}");
        return Ok(None);
    }
    seed_defaults(conn, localizer).map(Some)
}

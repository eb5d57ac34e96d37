//! Task use-case service.
//!
//! # Responsibility
//! - Create and edit tasks inside their owning category.
//! - Drive the reminder scheduler from task state transitions.
//!
//! # Invariants
//! - The task write is committed before the scheduler is touched; scheduler
//!   failures never roll it back.
//! - Setting or clearing `remind_at` re-plans the reminder.
//! - Completing or trashing cancels the reminder.
//! - Un-completing or restoring never re-registers a reminder; callers do that
//!   explicitly through `set_remind_at` or `resync_reminders`.

use crate::model::category::{Category, CategoryId};
use crate::model::ordering::next_order;
use crate::model::task::{Task, TaskId};
use crate::model::validation::ValidationError;
use crate::reminder::alarm::AlarmFacility;
use crate::reminder::scheduler::ReminderScheduler;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::{Local, TimeZone};
use log::{debug, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(ValidationError),
    TaskNotFound(TaskId),
    CategoryNotFound(CategoryId),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for TaskServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repositories and the reminder scheduler.
pub struct TaskService<T, C, A, Tz = Local>
where
    T: TaskRepository,
    C: CategoryRepository,
    A: AlarmFacility,
    Tz: TimeZone,
{
    tasks: T,
    categories: C,
    scheduler: ReminderScheduler<A, Tz>,
}

impl<T, C, A, Tz> TaskService<T, C, A, Tz>
where
    T: TaskRepository,
    C: CategoryRepository,
    A: AlarmFacility,
    Tz: TimeZone,
{
    pub fn new(tasks: T, categories: C, scheduler: ReminderScheduler<A, Tz>) -> Self {
        Self {
            tasks,
            categories,
            scheduler,
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler<A, Tz> {
        &self.scheduler
    }

    /// Creates an active task at the end of `category_id`.
    pub fn create_task(
        &self,
        category_id: CategoryId,
        goal: impl Into<String>,
    ) -> Result<Task, TaskServiceError> {
        let category = self.require_category(category_id)?;
        let mut task = Task::new(&category, goal)?;
        let siblings = self
            .tasks
            .list_tasks(&TaskListQuery::for_category(category_id))?;
        task.set_order(next_order(&siblings));

        self.tasks.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok id={} category={}",
            task.id(),
            category_id
        );
        Ok(task)
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.tasks.get_task(id)
    }

    /// Lists tasks matching `query`.
    pub fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        self.tasks.list_tasks(query)
    }

    /// Replaces the goal; a scheduled reminder is re-registered with the new body.
    pub fn update_goal(
        &self,
        id: TaskId,
        goal: impl Into<String>,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(id)?;
        task.set_goal(goal)?;
        self.tasks.update_task(&task)?;

        if task.is_reminder_eligible() {
            let category = self.require_category(task.category_id())?;
            self.scheduler.sync(&task, &category);
        }
        Ok(task)
    }

    /// Sets or clears the remind time and re-plans the reminder.
    pub fn set_remind_at(
        &self,
        id: TaskId,
        remind_at: Option<i64>,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(id)?;
        let category = self.require_category(task.category_id())?;
        task.set_remind_at(remind_at);
        self.tasks.update_task(&task)?;

        let plan = self.scheduler.sync(&task, &category);
        info!(
            "event=task_remind_at module=service status=ok id={} scheduled={}",
            task.id(),
            plan.is_register()
        );
        Ok(task)
    }

    /// Marks the task completed (cancelling its reminder) or not completed.
    pub fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(id)?;
        task.set_completed(completed);
        self.tasks.update_task(&task)?;
        self.after_status_change(&task, completed);
        Ok(task)
    }

    /// Moves the task to trash (cancelling its reminder) or restores it.
    pub fn set_trashed(&self, id: TaskId, trashed: bool) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(id)?;
        task.set_trashed(trashed);
        self.tasks.update_task(&task)?;
        self.after_status_change(&task, trashed);
        Ok(task)
    }

    /// Re-parents the task at the end of `category_id`.
    pub fn move_task(
        &self,
        id: TaskId,
        category_id: CategoryId,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(id)?;
        let category = self.require_category(category_id)?;
        let siblings = self
            .tasks
            .list_tasks(&TaskListQuery::for_category(category_id))?;

        task.move_to(&category);
        task.set_order(next_order(siblings.iter().filter(|other| other.id() != id)));
        self.tasks.update_task(&task)?;

        if task.is_reminder_eligible() {
            self.scheduler.sync(&task, &category);
        }
        Ok(task)
    }

    /// Re-plans reminders for every task with a remind time.
    ///
    /// Returns how many registrations were requested.
    pub fn resync_reminders(&self) -> Result<usize, TaskServiceError> {
        let tasks = self.tasks.list_tasks(&TaskListQuery {
            with_reminder: true,
            ..TaskListQuery::default()
        })?;

        let mut owners: HashMap<CategoryId, Category> = HashMap::new();
        let mut registered = 0;
        for task in &tasks {
            let category_id = task.category_id();
            if !owners.contains_key(&category_id) {
                let category = self.require_category(category_id)?;
                owners.insert(category_id, category);
            }
            if let Some(category) = owners.get(&category_id) {
                if self.scheduler.sync(task, category).is_register() {
                    registered += 1;
                }
            }
        }

        info!(
            "event=reminder_resync module=service status=ok scanned={} registered={}",
            tasks.len(),
            registered
        );
        Ok(registered)
    }

    fn after_status_change(&self, task: &Task, flag_set: bool) {
        if flag_set {
            self.scheduler.cancel(task);
        } else if task.remind_at().is_some() {
            debug!(
                "event=reminder_restore module=service status=skip id={} reason=explicit_reregistration_required",
                task.id()
            );
        }
    }

    fn require_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.tasks
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    fn require_category(&self, id: CategoryId) -> Result<Category, TaskServiceError> {
        self.categories
            .get_category(id)?
            .ok_or(TaskServiceError::CategoryNotFound(id))
    }
}

//! Task repository contract and SQLite implementation.

use crate::model::category::CategoryId;
use crate::model::ordering::SortDescriptor;
use crate::model::task::{Task, TaskId};
use crate::repo::{bool_to_int, order_by_clause, parse_flag, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    category_uuid,
    goal,
    sort_order,
    created_at,
    remind_at,
    is_completed,
    is_trashed
FROM tasks";

/// Fetch options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    /// Restrict to one owning category.
    pub category_id: Option<CategoryId>,
    /// Exclude completed and trashed tasks.
    pub active_only: bool,
    /// Only tasks with a remind time set.
    pub with_reminder: bool,
    /// Sort criteria; empty means default ordering.
    pub sorted_by: Vec<SortDescriptor>,
    pub limit: Option<u32>,
}

impl TaskListQuery {
    /// All tasks of one category in default order.
    pub fn for_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }
}

/// Entity store contract for tasks.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;
        self.ensure_category_exists(task)?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                category_uuid,
                goal,
                sort_order,
                created_at,
                remind_at,
                is_completed,
                is_trashed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.category_id.to_string(),
                task.goal.as_str(),
                task.order,
                task.created_at,
                task.remind_at,
                bool_to_int(task.completed),
                bool_to_int(task.trashed),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        self.ensure_category_exists(task)?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                category_uuid = ?1,
                goal = ?2,
                sort_order = ?3,
                remind_at = ?4,
                is_completed = ?5,
                is_trashed = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                task.category_id.to_string(),
                task.goal.as_str(),
                task.order,
                task.remind_at,
                bool_to_int(task.completed),
                bool_to_int(task.trashed),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.id));
        }
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_uuid = ?");
            bind_values.push(Value::Text(category_id.to_string()));
        }
        if query.active_only {
            sql.push_str(" AND is_completed = 0 AND is_trashed = 0");
        }
        if query.with_reminder {
            sql.push_str(" AND remind_at IS NOT NULL");
        }

        sql.push_str(&order_by_clause(&query.sorted_by));
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl SqliteTaskRepository<'_> {
    fn ensure_category_exists(&self, task: &Task) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE uuid = ?1);",
            [task.category_id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::CategoryNotFound(task.category_id));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let category_text: String = row.get("category_uuid")?;

    let task = Task {
        id: parse_uuid(&uuid_text, "tasks.uuid")?,
        category_id: parse_uuid(&category_text, "tasks.category_uuid")?,
        goal: row.get("goal")?,
        order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        remind_at: row.get("remind_at")?,
        completed: parse_flag(row.get("is_completed")?, "tasks.is_completed")?,
        trashed: parse_flag(row.get("is_trashed")?, "tasks.is_trashed")?,
    };
    task.validate()?;
    Ok(task)
}

//! Category repository contract and SQLite implementation.

use crate::model::category::{Category, CategoryId};
use crate::model::ordering::SortDescriptor;
use crate::repo::{order_by_clause, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    color,
    icon,
    sort_order,
    created_at
FROM categories";

/// Fetch options for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Sort criteria; empty means default ordering.
    pub sorted_by: Vec<SortDescriptor>,
    pub limit: Option<u32>,
}

/// Entity store contract for categories.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn list_categories(&self, query: &CategoryListQuery) -> RepoResult<Vec<Category>>;
    fn count_categories(&self) -> RepoResult<u64>;

    /// Category with the smallest order. `None` when no category exists.
    fn default_category(&self) -> RepoResult<Option<Category>> {
        let query = CategoryListQuery {
            sorted_by: vec![SortDescriptor::default_ordering()],
            limit: Some(1),
        };
        Ok(self.list_categories(&query)?.into_iter().next())
    }
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        self.conn.execute(
            "INSERT INTO categories (
                uuid,
                name,
                color,
                icon,
                sort_order,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                category.color.as_deref(),
                category.icon.as_str(),
                category.order,
                category.created_at,
            ],
        )?;

        Ok(category.id)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?1,
                color = ?2,
                icon = ?3,
                sort_order = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                category.name.as_str(),
                category.color.as_deref(),
                category.icon.as_str(),
                category.order,
                category.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(category.id));
        }
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self, query: &CategoryListQuery) -> RepoResult<Vec<Category>> {
        let mut sql = CATEGORY_SELECT_SQL.to_string();
        sql.push_str(&order_by_clause(&query.sorted_by));

        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn count_categories(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative category count {count}")))
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let uuid_text: String = row.get("uuid")?;
    let category = Category {
        id: parse_uuid(&uuid_text, "categories.uuid")?,
        name: row.get("name")?,
        color: row.get("color")?,
        icon: row.get("icon")?,
        order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
    };
    category.validate()?;
    Ok(category)
}

//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `categories`.
//! - Report how many blogs reference a category.
//!
//! # Invariants
//! - Listing order is `name ASC, id ASC`.
//! - `delete_category` does not look at blog usage; callers check
//!   `blog_count` first.
//! - Name uniqueness comes from the schema and surfaces as `Duplicate`.

use crate::model::category::{Category, CategoryId, CreateCategoryRequest, UpdateCategoryRequest};
use crate::model::now_millis;
use crate::repo::error::{EntityKind, RepoError, RepoResult};
use crate::repo::support::{
    ensure_connection_ready, is_unique_violation, timestamp_from_db, timestamp_to_db,
};
use rusqlite::{params, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    created_at
FROM categories";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("categories", &["id", "name", "description", "created_at"]),
    ("blogs", &["category_id"]),
];

/// Repository interface for category operations.
pub trait CategoryRepository {
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn create_category(&self, request: &CreateCategoryRequest) -> RepoResult<Category>;
    fn update_category(
        &self,
        id: CategoryId,
        request: &UpdateCategoryRequest,
    ) -> RepoResult<Category>;
    /// Removes the row without checking blog usage.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
    /// Number of blogs whose `category_id` is `id`.
    fn blog_count(&self, id: CategoryId) -> RepoResult<i64>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }

    fn load_required(&self, id: CategoryId) -> RepoResult<Category> {
        self.get_category(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Category,
            id,
        })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn create_category(&self, request: &CreateCategoryRequest) -> RepoResult<Category> {
        request.validate()?;

        self.conn
            .execute(
                "INSERT INTO categories (name, description, created_at)
                 VALUES (?1, ?2, ?3);",
                params![
                    request.name.as_str(),
                    request.description.as_deref(),
                    timestamp_to_db(now_millis()),
                ],
            )
            .map_err(map_name_conflict)?;

        self.load_required(self.conn.last_insert_rowid())
    }

    fn update_category(
        &self,
        id: CategoryId,
        request: &UpdateCategoryRequest,
    ) -> RepoResult<Category> {
        request.validate()?;

        let description = request.description.as_set();
        let changed = self
            .conn
            .execute(
                "UPDATE categories
                 SET
                    name = COALESCE(?2, name),
                    description = CASE WHEN ?3 = 1 THEN ?4 ELSE description END
                 WHERE id = ?1;",
                params![
                    id,
                    request.name.as_set().map(String::as_str),
                    description.is_some(),
                    description.and_then(|value| value.as_deref()),
                ],
            )
            .map_err(map_name_conflict)?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Category,
                id,
            });
        }

        self.load_required(id)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Category,
                id,
            });
        }
        Ok(())
    }

    fn blog_count(&self, id: CategoryId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM blogs WHERE category_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_name_conflict(err: rusqlite::Error) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::Duplicate {
            entity: EntityKind::Category,
            field: "name",
        };
    }
    err.into()
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: timestamp_from_db(row.get("created_at")?, "categories.created_at")?,
    })
}

//! Todo repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths validate the request before any SQL mutation.
//! - Listing order is `created_at DESC, id DESC`.
//! - Every update refreshes `updated_at`, even when no field is provided.

use crate::model::now_millis;
use crate::model::todo::{CreateTodoRequest, Todo, TodoId, UpdateTodoRequest};
use crate::repo::error::{EntityKind, RepoError, RepoResult};
use crate::repo::support::{
    bool_to_int, ensure_connection_ready, int_to_bool, timestamp_from_db, timestamp_to_db,
};
use rusqlite::{params, Connection, Row};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at,
    updated_at
FROM todos";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[(
    "todos",
    &[
        "id",
        "title",
        "description",
        "completed",
        "created_at",
        "updated_at",
    ],
)];

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn list_todos(&self) -> RepoResult<Vec<Todo>>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    fn create_todo(&self, request: &CreateTodoRequest) -> RepoResult<Todo>;
    fn update_todo(&self, id: TodoId, request: &UpdateTodoRequest) -> RepoResult<Todo>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }

    fn load_required(&self, id: TodoId) -> RepoResult<Todo> {
        self.get_todo(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Todo,
            id,
        })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn list_todos(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY created_at DESC, id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn create_todo(&self, request: &CreateTodoRequest) -> RepoResult<Todo> {
        request.validate()?;

        let now = timestamp_to_db(now_millis());
        self.conn.execute(
            "INSERT INTO todos (
                title,
                description,
                completed,
                created_at,
                updated_at
            ) VALUES (?1, ?2, 0, ?3, ?3);",
            params![request.title.as_str(), request.description.as_str(), now],
        )?;

        self.load_required(self.conn.last_insert_rowid())
    }

    fn update_todo(&self, id: TodoId, request: &UpdateTodoRequest) -> RepoResult<Todo> {
        request.validate()?;

        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = COALESCE(?2, title),
                description = COALESCE(?3, description),
                completed = COALESCE(?4, completed),
                updated_at = ?5
             WHERE id = ?1;",
            params![
                id,
                request.title.as_set().map(String::as_str),
                request.description.as_set().map(String::as_str),
                request.completed.as_set().copied().map(bool_to_int),
                timestamp_to_db(now_millis()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Todo,
                id,
            });
        }

        self.load_required(id)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Todo,
                id,
            });
        }
        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: int_to_bool(row.get("completed")?, "todos.completed")?,
        created_at: timestamp_from_db(row.get("created_at")?, "todos.created_at")?,
        updated_at: timestamp_from_db(row.get("updated_at")?, "todos.updated_at")?,
    })
}

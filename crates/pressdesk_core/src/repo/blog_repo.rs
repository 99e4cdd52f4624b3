//! Blog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `blogs`, with every read joined to its category snapshot.
//! - Own the publish transition and the view counter.
//! - Serve the listing modes: all, by category, by author, published, search.
//!
//! # Invariants
//! - `published_at` is written only while it is `NULL` (first publish wins).
//!   The check lives in the `UPDATE` predicate, not in a prior read.
//! - `views` is touched only by `increment_views`, as `views = views + 1`.
//! - `category_id` is trusted as given; callers resolve it beforehand.
//! - Listings order by `created_at DESC, id DESC`; published listings order by
//!   `published_at DESC, id DESC`.
//! - Author and search matching is a literal, case-insensitive substring match.
//!   Both sides are lowered with `unicode_lower`, so non-ASCII letters fold too.

use crate::db::functions::{functions_registered, UNICODE_LOWER};
use crate::model::blog::{Blog, BlogId, BlogStatus, CreateBlogRequest, UpdateBlogRequest};
use crate::model::category::{Category, CategoryId};
use crate::model::now_millis;
use crate::repo::error::{EntityKind, RepoError, RepoResult, StoreFailure};
use crate::repo::support::{
    ensure_connection_ready, like_contains_pattern, timestamp_from_db, timestamp_to_db,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const BLOG_SELECT_SQL: &str = "SELECT
    b.id AS id,
    b.title AS title,
    b.content AS content,
    b.author AS author,
    b.category_id AS category_id,
    b.status AS status,
    b.views AS views,
    b.created_at AS created_at,
    b.updated_at AS updated_at,
    b.published_at AS published_at,
    c.id AS category_ref_id,
    c.name AS category_name,
    c.description AS category_description,
    c.created_at AS category_created_at
FROM blogs b
LEFT JOIN categories c ON c.id = b.category_id";

const NEWEST_FIRST: &str = " ORDER BY b.created_at DESC, b.id DESC;";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "blogs",
        &[
            "id",
            "title",
            "content",
            "author",
            "category_id",
            "status",
            "views",
            "created_at",
            "updated_at",
            "published_at",
        ],
    ),
    ("categories", &["id", "name", "description", "created_at"]),
];

/// Repository interface for blog operations.
pub trait BlogRepository {
    fn list_blogs(&self) -> RepoResult<Vec<Blog>>;
    fn list_blogs_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Blog>>;
    /// Case-insensitive substring match on `author`.
    fn list_blogs_by_author(&self, author: &str) -> RepoResult<Vec<Blog>>;
    /// Published blogs, most recently published first.
    fn list_published_blogs(&self) -> RepoResult<Vec<Blog>>;
    /// Case-insensitive substring match on `title` or `content`.
    fn search_blogs(&self, term: &str) -> RepoResult<Vec<Blog>>;
    fn get_blog(&self, id: BlogId) -> RepoResult<Option<Blog>>;
    /// Adds one view and returns the new count.
    fn increment_views(&self, id: BlogId) -> RepoResult<i64>;
    fn create_blog(&self, request: &CreateBlogRequest) -> RepoResult<Blog>;
    fn update_blog(&self, id: BlogId, request: &UpdateBlogRequest) -> RepoResult<Blog>;
    /// Forces `Published`; keeps an existing `published_at`.
    fn publish_blog(&self, id: BlogId) -> RepoResult<Blog>;
    fn delete_blog(&self, id: BlogId) -> RepoResult<()>;
}

/// SQLite-backed blog repository.
pub struct SqliteBlogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlogRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        if !functions_registered(conn) {
            return Err(RepoError::StoreUnavailable(
                StoreFailure::MissingRequiredFunction(UNICODE_LOWER),
            ));
        }
        Ok(Self { conn })
    }

    fn query_blogs(&self, filter_sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Blog>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOG_SELECT_SQL}{filter_sql}"))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut blogs = Vec::new();
        while let Some(row) = rows.next()? {
            blogs.push(parse_blog_row(row)?);
        }
        Ok(blogs)
    }

    fn load_required(&self, id: BlogId) -> RepoResult<Blog> {
        self.get_blog(id)?.ok_or(not_found(id))
    }
}

impl BlogRepository for SqliteBlogRepository<'_> {
    fn list_blogs(&self) -> RepoResult<Vec<Blog>> {
        self.query_blogs(NEWEST_FIRST, Vec::new())
    }

    fn list_blogs_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Blog>> {
        self.query_blogs(
            &format!(" WHERE b.category_id = ?1{NEWEST_FIRST}"),
            vec![Value::Integer(category_id)],
        )
    }

    fn list_blogs_by_author(&self, author: &str) -> RepoResult<Vec<Blog>> {
        self.query_blogs(
            &format!(" WHERE unicode_lower(b.author) LIKE ?1 ESCAPE '\\'{NEWEST_FIRST}"),
            vec![Value::Text(folded_contains_pattern(author))],
        )
    }

    fn list_published_blogs(&self) -> RepoResult<Vec<Blog>> {
        self.query_blogs(
            " WHERE b.status = 'published' ORDER BY b.published_at DESC, b.id DESC;",
            Vec::new(),
        )
    }

    fn search_blogs(&self, term: &str) -> RepoResult<Vec<Blog>> {
        self.query_blogs(
            &format!(
                " WHERE unicode_lower(b.title) LIKE ?1 ESCAPE '\\'
                    OR unicode_lower(b.content) LIKE ?1 ESCAPE '\\'{NEWEST_FIRST}"
            ),
            vec![Value::Text(folded_contains_pattern(term))],
        )
    }

    fn get_blog(&self, id: BlogId) -> RepoResult<Option<Blog>> {
        let mut blogs = self.query_blogs(" WHERE b.id = ?1;", vec![Value::Integer(id)])?;
        Ok(blogs.pop())
    }

    fn increment_views(&self, id: BlogId) -> RepoResult<i64> {
        let views = self
            .conn
            .query_row(
                "UPDATE blogs SET views = views + 1 WHERE id = ?1 RETURNING views;",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        views.ok_or(not_found(id))
    }

    fn create_blog(&self, request: &CreateBlogRequest) -> RepoResult<Blog> {
        request.validate()?;

        let now = timestamp_to_db(now_millis());
        let status = request.effective_status();
        let published_at = (status == BlogStatus::Published).then_some(now);
        self.conn.execute(
            "INSERT INTO blogs (
                title,
                content,
                author,
                category_id,
                status,
                views,
                created_at,
                updated_at,
                published_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6, ?7);",
            params![
                request.title.as_str(),
                request.content.as_str(),
                request.author.as_str(),
                request.category_id,
                blog_status_to_db(status),
                now,
                published_at,
            ],
        )?;

        self.load_required(self.conn.last_insert_rowid())
    }

    fn update_blog(&self, id: BlogId, request: &UpdateBlogRequest) -> RepoResult<Blog> {
        request.validate()?;

        let category_id = request.category_id.as_set();
        let changed = self.conn.execute(
            "UPDATE blogs
             SET
                title = COALESCE(?2, title),
                content = COALESCE(?3, content),
                author = COALESCE(?4, author),
                category_id = CASE WHEN ?5 = 1 THEN ?6 ELSE category_id END,
                status = COALESCE(?7, status),
                updated_at = ?8,
                published_at = CASE
                    WHEN published_at IS NULL AND COALESCE(?7, status) = 'published' THEN ?8
                    ELSE published_at
                END
             WHERE id = ?1;",
            params![
                id,
                request.title.as_set().map(String::as_str),
                request.content.as_set().map(String::as_str),
                request.author.as_set().map(String::as_str),
                category_id.is_some(),
                category_id.copied().flatten(),
                request.status.as_set().copied().map(blog_status_to_db),
                timestamp_to_db(now_millis()),
            ],
        )?;

        if changed == 0 {
            return Err(not_found(id));
        }

        self.load_required(id)
    }

    fn publish_blog(&self, id: BlogId) -> RepoResult<Blog> {
        let changed = self.conn.execute(
            "UPDATE blogs
             SET
                status = 'published',
                updated_at = ?2,
                published_at = COALESCE(published_at, ?2)
             WHERE id = ?1;",
            params![id, timestamp_to_db(now_millis())],
        )?;

        if changed == 0 {
            return Err(not_found(id));
        }

        self.load_required(id)
    }

    fn delete_blog(&self, id: BlogId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM blogs WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

// Matches the `unicode_lower` side of author and search predicates.
fn folded_contains_pattern(term: &str) -> String {
    like_contains_pattern(&term.to_lowercase())
}

fn not_found(id: BlogId) -> RepoError {
    RepoError::NotFound {
        entity: EntityKind::Blog,
        id,
    }
}

fn parse_blog_row(row: &Row<'_>) -> RepoResult<Blog> {
    let status_text: String = row.get("status")?;
    let status = parse_blog_status(&status_text).ok_or_else(|| {
        RepoError::invalid_data(format!("invalid blog status `{status_text}` in blogs.status"))
    })?;

    let views: i64 = row.get("views")?;
    if views < 0 {
        return Err(RepoError::invalid_data(format!(
            "negative view count `{views}` in blogs.views"
        )));
    }

    let published_at = match row.get::<_, Option<i64>>("published_at")? {
        Some(millis) => Some(timestamp_from_db(millis, "blogs.published_at")?),
        None => None,
    };

    Ok(Blog {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        author: row.get("author")?,
        category_id: row.get("category_id")?,
        category: parse_category_snapshot(row)?,
        status,
        views,
        created_at: timestamp_from_db(row.get("created_at")?, "blogs.created_at")?,
        updated_at: timestamp_from_db(row.get("updated_at")?, "blogs.updated_at")?,
        published_at,
    })
}

fn parse_category_snapshot(row: &Row<'_>) -> RepoResult<Option<Category>> {
    let Some(id) = row.get::<_, Option<CategoryId>>("category_ref_id")? else {
        return Ok(None);
    };

    Ok(Some(Category {
        id,
        name: row.get("category_name")?,
        description: row.get("category_description")?,
        created_at: timestamp_from_db(row.get("category_created_at")?, "categories.created_at")?,
    }))
}

fn blog_status_to_db(status: BlogStatus) -> &'static str {
    match status {
        BlogStatus::Draft => "draft",
        BlogStatus::Published => "published",
    }
}

fn parse_blog_status(value: &str) -> Option<BlogStatus> {
    match value {
        "draft" => Some(BlogStatus::Draft),
        "published" => Some(BlogStatus::Published),
        _ => None,
    }
}

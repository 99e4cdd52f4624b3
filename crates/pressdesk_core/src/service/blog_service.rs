//! Blog use-case service.
//!
//! # Responsibility
//! - Validate requests and resolve `category_id` before the blog store writes.
//! - Dispatch the single listing mode chosen by the caller.
//! - Count a view on every detail read without letting the counter fail the read.
//!
//! # Invariants
//! - A create/update naming a missing category fails `InvalidReference` and
//!   writes nothing.
//! - `view_blog` never returns an error caused by the view counter.

use crate::model::blog::{Blog, BlogId, BlogListFilter, CreateBlogRequest, UpdateBlogRequest};
use crate::model::category::CategoryId;
use crate::repo::blog_repo::BlogRepository;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::error::{RepoError, RepoResult};
use crate::validation::ValidationErrors;
use log::{debug, info, warn};

/// Use-case service over the blog store, with category lookups for
/// reference checks.
pub struct BlogService<B: BlogRepository, C: CategoryRepository> {
    blogs: B,
    categories: C,
}

impl<B: BlogRepository, C: CategoryRepository> BlogService<B, C> {
    pub fn new(blogs: B, categories: C) -> Self {
        Self { blogs, categories }
    }

    /// Lists blogs for exactly one listing mode.
    pub fn list_blogs(&self, filter: &BlogListFilter) -> RepoResult<Vec<Blog>> {
        match filter {
            BlogListFilter::All => self.blogs.list_blogs(),
            BlogListFilter::Category(category_id) => {
                self.blogs.list_blogs_by_category(*category_id)
            }
            BlogListFilter::Author(author) => self.blogs.list_blogs_by_author(author),
            BlogListFilter::Published => self.blogs.list_published_blogs(),
        }
    }

    /// Substring search over title and content.
    ///
    /// # Errors
    /// - `Validation` when `term` is blank.
    pub fn search_blogs(&self, term: &str) -> RepoResult<Vec<Blog>> {
        if term.trim().is_empty() {
            return Err(ValidationErrors::single("q", "search query is required").into());
        }
        self.blogs.search_blogs(term)
    }

    /// Reads one blog without counting a view.
    pub fn get_blog(&self, id: BlogId) -> RepoResult<Option<Blog>> {
        self.blogs.get_blog(id)
    }

    /// Counts one view, then reads the blog.
    ///
    /// A failing view increment is logged and dropped; only the read decides
    /// the outcome.
    pub fn view_blog(&self, id: BlogId) -> RepoResult<Option<Blog>> {
        record_view(self.blogs.increment_views(id), id);
        self.blogs.get_blog(id)
    }

    pub fn create_blog(&self, request: &CreateBlogRequest) -> RepoResult<Blog> {
        request.validate()?;
        if let Some(category_id) = request.category_id {
            self.ensure_category_exists(category_id)?;
        }

        let blog = self.blogs.create_blog(request)?;
        if blog.is_published() {
            info!(
                "event=blog_publish module=service status=ok blog_id={} via=create",
                blog.id
            );
        }
        Ok(blog)
    }

    /// Applies the provided fields; a new non-null category must exist.
    pub fn update_blog(&self, id: BlogId, request: &UpdateBlogRequest) -> RepoResult<Blog> {
        request.validate()?;
        if let Some(category_id) = request.new_category_id() {
            self.ensure_category_exists(category_id)?;
        }
        self.blogs.update_blog(id, request)
    }

    /// Publishes the blog; `published_at` keeps its first value.
    pub fn publish_blog(&self, id: BlogId) -> RepoResult<Blog> {
        let blog = self.blogs.publish_blog(id)?;
        info!(
            "event=blog_publish module=service status=ok blog_id={} via=publish",
            blog.id
        );
        Ok(blog)
    }

    pub fn delete_blog(&self, id: BlogId) -> RepoResult<()> {
        self.blogs.delete_blog(id)
    }

    fn ensure_category_exists(&self, category_id: CategoryId) -> RepoResult<()> {
        if self.categories.get_category(category_id)?.is_none() {
            return Err(RepoError::InvalidReference {
                field: "category_id",
                id: category_id,
            });
        }
        Ok(())
    }
}

/// Logs the outcome of a best-effort view increment.
///
/// Accepts the raw result so callers can hand it over and move on.
pub fn record_view(outcome: RepoResult<i64>, id: BlogId) {
    match outcome {
        Ok(views) => debug!(
            "event=blog_view_increment module=service status=ok blog_id={} views={}",
            id, views
        ),
        Err(err) if err.is_not_found() => debug!(
            "event=blog_view_increment module=service status=skipped blog_id={} error_code={}",
            id,
            err.code()
        ),
        Err(err) => warn!(
            "event=blog_view_increment module=service status=error blog_id={} error_code={} error={}",
            id,
            err.code(),
            err
        ),
    }
}

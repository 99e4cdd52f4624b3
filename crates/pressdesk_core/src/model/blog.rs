//! Blog post entity, publish status and request shapes.
//!
//! # Invariants
//! - `published_at` is set on the first transition into `Published` and is
//!   never cleared afterwards, even when status returns to `Draft`.
//! - `views` only grows.
//! - `category` is a read-side snapshot; writes go through `category_id` only.

use crate::model::category::{Category, CategoryId};
use crate::model::patch::Patch;
use crate::model::Timestamp;
use crate::validation::{ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub type BlogId = i64;

pub const BLOG_TITLE_MIN_CHARS: usize = 3;
pub const BLOG_TITLE_MAX_CHARS: usize = 255;
pub const BLOG_CONTENT_MIN_CHARS: usize = 10;
pub const BLOG_AUTHOR_MIN_CHARS: usize = 2;

/// Publication state of a blog post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
}

/// Blog post as returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Joined snapshot of the referenced category, if it still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub status: BlogStatus,
    pub views: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
}

impl Blog {
    pub fn is_published(&self) -> bool {
        self.status == BlogStatus::Published
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Defaults to `Draft` when absent.
    #[serde(default)]
    pub status: Option<BlogStatus>,
}

impl CreateBlogRequest {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            category_id: None,
            status: None,
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_status(mut self, status: BlogStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Status the new row is stored with.
    pub fn effective_status(&self) -> BlogStatus {
        self.status.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validate_title(&mut validator, &self.title);
        validate_content(&mut validator, &self.content);
        validate_author(&mut validator, &self.author);
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateBlogRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub author: Patch<String>,
    /// `Set(None)` detaches the blog from its category.
    #[serde(default)]
    pub category_id: Patch<Option<CategoryId>>,
    #[serde(default)]
    pub status: Patch<BlogStatus>,
}

impl UpdateBlogRequest {
    /// Category id the update points the blog at, when it names one.
    pub fn new_category_id(&self) -> Option<CategoryId> {
        self.category_id.as_set().copied().flatten()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(title) = self.title.as_set() {
            validate_title(&mut validator, title);
        }
        if let Some(content) = self.content.as_set() {
            validate_content(&mut validator, content);
        }
        if let Some(author) = self.author.as_set() {
            validate_author(&mut validator, author);
        }
        validator.finish()
    }
}

/// One listing mode for blog queries. Modes never combine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlogListFilter {
    #[default]
    All,
    Category(CategoryId),
    /// Case-insensitive substring of the author name.
    Author(String),
    Published,
}

impl BlogListFilter {
    /// Picks the listing mode from loosely provided criteria.
    ///
    /// Precedence: category, then author, then `status == Published`, then all.
    /// A blank author counts as absent.
    pub fn select(
        category_id: Option<CategoryId>,
        author: Option<&str>,
        status: Option<BlogStatus>,
    ) -> Self {
        if let Some(category_id) = category_id {
            return Self::Category(category_id);
        }
        if let Some(author) = author.filter(|value| !value.trim().is_empty()) {
            return Self::Author(author.to_string());
        }
        if status == Some(BlogStatus::Published) {
            return Self::Published;
        }
        Self::All
    }
}

fn validate_title(validator: &mut Validator, title: &str) {
    validator
        .required("title", title)
        .min_chars("title", title, BLOG_TITLE_MIN_CHARS)
        .max_chars("title", title, BLOG_TITLE_MAX_CHARS);
}

fn validate_content(validator: &mut Validator, content: &str) {
    validator
        .required("content", content)
        .min_chars("content", content, BLOG_CONTENT_MIN_CHARS);
}

fn validate_author(validator: &mut Validator, author: &str) {
    validator
        .required("author", author)
        .min_chars("author", author, BLOG_AUTHOR_MIN_CHARS);
}

//! Core data layer for the pressdesk content backend.
//! This crate is the single source of truth for todo, category and blog
//! invariants; transport layers call into its services.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{load_config, AppConfig, ConfigError, DatabaseConfig, LoggingConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::blog::{
    Blog, BlogId, BlogListFilter, BlogStatus, CreateBlogRequest, UpdateBlogRequest,
};
pub use model::category::{
    Category, CategoryDetail, CategoryId, CreateCategoryRequest, UpdateCategoryRequest,
};
pub use model::patch::Patch;
pub use model::todo::{CreateTodoRequest, Todo, TodoId, UpdateTodoRequest};
pub use model::Timestamp;
pub use repo::blog_repo::{BlogRepository, SqliteBlogRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::error::{EntityKind, RepoError, RepoResult, StoreFailure};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use service::blog_service::BlogService;
pub use service::category_service::CategoryService;
pub use service::todo_service::TodoService;
pub use validation::{FieldError, ValidationErrors, Validator};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

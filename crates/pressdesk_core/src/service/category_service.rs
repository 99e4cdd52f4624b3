//! Category use-case service.
//!
//! # Invariants
//! - A category referenced by any blog is never deleted; the blog count is
//!   checked before the delete statement is issued.

use crate::model::category::{
    Category, CategoryDetail, CategoryId, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::error::{RepoError, RepoResult};
use log::info;

/// Use-case service wrapper for category operations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists categories by name.
    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.get_category(id)
    }

    /// Gets one category together with the number of blogs filed under it.
    pub fn get_category_detail(&self, id: CategoryId) -> RepoResult<Option<CategoryDetail>> {
        let Some(category) = self.repo.get_category(id)? else {
            return Ok(None);
        };
        let blog_count = self.repo.blog_count(id)?;
        Ok(Some(CategoryDetail {
            category,
            blog_count,
        }))
    }

    pub fn create_category(&self, request: &CreateCategoryRequest) -> RepoResult<Category> {
        request.validate()?;
        self.repo.create_category(request)
    }

    pub fn update_category(
        &self,
        id: CategoryId,
        request: &UpdateCategoryRequest,
    ) -> RepoResult<Category> {
        request.validate()?;
        self.repo.update_category(id, request)
    }

    /// Deletes an unused category.
    ///
    /// # Errors
    /// - `ConflictInUse` when blogs still reference the category.
    /// - `NotFound` when no such category exists.
    pub fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let blog_count = self.repo.blog_count(id)?;
        if blog_count > 0 {
            info!(
                "event=category_delete module=service status=blocked category_id={} blog_count={}",
                id, blog_count
            );
            return Err(RepoError::ConflictInUse {
                category_id: id,
                blog_count,
            });
        }

        self.repo.delete_category(id)?;
        info!(
            "event=category_delete module=service status=ok category_id={}",
            id
        );
        Ok(())
    }
}

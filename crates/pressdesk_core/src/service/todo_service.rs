//! Todo use-case service.
//!
//! Thin wrapper: validation first, then the repository call.

use crate::model::todo::{CreateTodoRequest, Todo, TodoId, UpdateTodoRequest};
use crate::repo::error::RepoResult;
use crate::repo::todo_repo::TodoRepository;

/// Use-case service wrapper for todo CRUD operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists todos, newest first.
    pub fn list_todos(&self) -> RepoResult<Vec<Todo>> {
        self.repo.list_todos()
    }

    pub fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        self.repo.get_todo(id)
    }

    /// Creates an open (not completed) todo.
    pub fn create_todo(&self, request: &CreateTodoRequest) -> RepoResult<Todo> {
        request.validate()?;
        self.repo.create_todo(request)
    }

    /// Applies the provided fields only.
    pub fn update_todo(&self, id: TodoId, request: &UpdateTodoRequest) -> RepoResult<Todo> {
        request.validate()?;
        self.repo.update_todo(id, request)
    }

    pub fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        self.repo.delete_todo(id)
    }
}

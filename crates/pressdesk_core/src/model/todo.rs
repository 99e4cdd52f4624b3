//! Todo entity and request shapes.

use crate::model::patch::Patch;
use crate::model::Timestamp;
use crate::validation::{ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub type TodoId = i64;

pub const TODO_TITLE_MIN_CHARS: usize = 1;
pub const TODO_TITLE_MAX_CHARS: usize = 255;

/// One task in the todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTodoRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validate_title(&mut validator, &self.title);
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub completed: Patch<bool>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(title) = self.title.as_set() {
            validate_title(&mut validator, title);
        }
        validator.finish()
    }
}

fn validate_title(validator: &mut Validator, title: &str) {
    validator
        .required("title", title)
        .min_chars("title", title, TODO_TITLE_MIN_CHARS)
        .max_chars("title", title, TODO_TITLE_MAX_CHARS);
}

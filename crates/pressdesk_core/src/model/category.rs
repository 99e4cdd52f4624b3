//! Category entity and request shapes.

use crate::model::patch::Patch;
use crate::model::Timestamp;
use crate::validation::{ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

pub const CATEGORY_NAME_MIN_CHARS: usize = 2;
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// Blog category. Referenced by blogs, never owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    /// Unique across categories.
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Category read model with the number of blogs referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub blog_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validate_name(&mut validator, &self.name);
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Patch<String>,
    /// `Set(None)` clears the description.
    #[serde(default)]
    pub description: Patch<Option<String>>,
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(name) = self.name.as_set() {
            validate_name(&mut validator, name);
        }
        validator.finish()
    }
}

fn validate_name(validator: &mut Validator, name: &str) {
    validator
        .required("name", name)
        .min_chars("name", name, CATEGORY_NAME_MIN_CHARS)
        .max_chars("name", name, CATEGORY_NAME_MAX_CHARS);
}

//! Field-level request validation.
//!
//! # Responsibility
//! - Collect every violated field rule of one request into a single error.
//!
//! # Invariants
//! - Lengths are counted in Unicode scalar values, not bytes.
//! - A field whose `required` rule failed gets no further length messages.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One violated rule on one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Non-empty list of field violations for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Builds an error carrying a single field message.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns whether any message concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: ")?;
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Accumulating rule checker used by every request `validate()`.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
    missing: Vec<&'static str>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when `value` is empty after trimming.
    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.missing.push(field);
            self.push(field, format!("{field} is required"));
        }
        self
    }

    pub fn min_chars(&mut self, field: &'static str, value: &str, min: usize) -> &mut Self {
        if !self.is_missing(field) && value.chars().count() < min {
            self.push(field, format!("{field} must be at least {min} characters"));
        }
        self
    }

    pub fn max_chars(&mut self, field: &'static str, value: &str, max: usize) -> &mut Self {
        if !self.is_missing(field) && value.chars().count() > max {
            self.push(field, format!("{field} must be at most {max} characters"));
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }

    fn is_missing(&self, field: &str) -> bool {
        self.missing.iter().any(|missing| *missing == field)
    }

    fn push(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }
}

#[cfg(test)]
mod tests {
    use super::Validator;

    #[test]
    fn blank_value_reports_required_only() {
        let mut validator = Validator::new();
        validator
            .required("title", "   ")
            .min_chars("title", "   ", 3)
            .max_chars("title", "   ", 10);
        let errors = validator.finish().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].message, "title is required");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut validator = Validator::new();
        validator.min_chars("author", "éé", 2).max_chars("author", "éé", 2);
        assert!(validator.is_valid());
    }

    #[test]
    fn collects_messages_across_fields() {
        let mut validator = Validator::new();
        validator
            .required("title", "ab")
            .min_chars("title", "ab", 3)
            .required("content", "")
            .min_chars("content", "", 10);
        let errors = validator.finish().unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("content"));
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(
            errors.to_string(),
            "validation failed: title must be at least 3 characters; content is required"
        );
    }
}

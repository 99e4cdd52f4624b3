//! Store error kinds shared by every repository and service.
//!
//! Backend errors are classified into [`StoreFailure`] at the repository
//! boundary; `rusqlite` types never reach callers.

use crate::db::DbError;
use crate::validation::ValidationErrors;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity addressed by a failing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Todo,
    Category,
    Blog,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Category => "category",
            Self::Blog => "blog",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum RepoError {
    /// No row with `id` exists.
    NotFound { entity: EntityKind, id: i64 },
    /// A supplied reference does not resolve to an existing row.
    InvalidReference { field: &'static str, id: i64 },
    Validation(ValidationErrors),
    /// Category still referenced by blogs; nothing was deleted.
    ConflictInUse { category_id: i64, blog_count: i64 },
    /// Unique field already taken by another row.
    Duplicate {
        entity: EntityKind,
        field: &'static str,
    },
    StoreUnavailable(StoreFailure),
}

/// Infrastructure-level failure behind [`RepoError::StoreUnavailable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    Backend(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Connection was not opened through `db::open_db*`.
    MissingRequiredFunction(&'static str),
    InvalidData(String),
}

impl RepoError {
    /// Stable snake_case code for transport mapping and log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidReference { .. } => "invalid_reference",
            Self::Validation(_) => "validation_failed",
            Self::ConflictInUse { .. } => "conflict_in_use",
            Self::Duplicate { .. } => "duplicate",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(StoreFailure::InvalidData(message.into()))
    }
}

impl Display for StoreFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "{message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::MissingRequiredFunction(name) => {
                write!(f, "missing required SQL function `{name}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidReference { field, id } => {
                write!(f, "invalid reference: {field} {id} does not exist")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConflictInUse {
                category_id,
                blog_count,
            } => write!(
                f,
                "category {category_id} is used by {blog_count} blog(s) and cannot be deleted"
            ),
            Self::Duplicate { entity, field } => {
                write!(f, "{entity} with the same {field} already exists")
            }
            Self::StoreUnavailable(failure) => write!(f, "store unavailable: {failure}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::StoreUnavailable(StoreFailure::Backend(value.to_string()))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StoreUnavailable(StoreFailure::Backend(value.to_string()))
    }
}

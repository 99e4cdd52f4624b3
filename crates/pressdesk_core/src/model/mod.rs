//! Entity and request model for todos, categories and blog posts.
//!
//! # Responsibility
//! - Define canonical entity shapes returned by stores.
//! - Define create/update request shapes and their field rules.
//!
//! # Invariants
//! - Ids are assigned by storage and are always positive.
//! - Timestamps carry millisecond precision so stored and returned values match.
//! - Update requests express "absent" through `Patch::Keep`, never through
//!   default values.

pub mod blog;
pub mod category;
pub mod patch;
pub mod todo;

use chrono::{DateTime, SubsecRound, Utc};

/// Server-assigned timestamp type shared by every entity.
pub type Timestamp = DateTime<Utc>;

/// Returns the current instant truncated to millisecond precision.
///
/// Storage keeps epoch milliseconds, so every write path takes its `now`
/// through this function.
pub fn now_millis() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

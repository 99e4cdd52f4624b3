//! Repository layer: store contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Define one data-access contract per entity (todo, category, blog).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate their request before any SQL mutation.
//! - Every single-row write is one SQL statement; `changes() == 0` is reported
//!   as `NotFound`.
//! - Backend errors surface only as `RepoError::StoreUnavailable`.
//! - Stores enforce no cross-entity rules; services do.

pub mod blog_repo;
pub mod category_repo;
pub mod error;
mod support;
pub mod todo_repo;

//! Core use-case services.
//!
//! # Responsibility
//! - Run request validation before any store call.
//! - Enforce rules that span entities (category references, delete guard).
//! - Keep transport layers decoupled from storage details.

pub mod blog_service;
pub mod category_service;
pub mod todo_service;

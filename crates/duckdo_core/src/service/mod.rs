//! Use-case services for the UI layer.
//!
//! # Responsibility
//! - Orchestrate load, transition and save for each user-facing operation.
//! - Keep UI callers away from store keys and transition internals.

pub mod session_service;
pub mod task_query;

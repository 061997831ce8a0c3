//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Namespace persisted records per user identity.
//! - Encode records as JSON and repair legacy fields on load.
//!
//! # Invariants
//! - Missing records load as their documented defaults.
//! - Unparseable records are reported as `RepoError::InvalidData`, never
//!   silently replaced.

pub mod user_repo;

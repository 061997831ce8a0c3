//! Domain model for tasks, collectibles and the reward economy.
//!
//! # Responsibility
//! - Define canonical records persisted per user.
//! - Keep serde defaults in one place so legacy blobs load cleanly.
//!
//! # Invariants
//! - Every task and collectible instance is identified by a stable UUID.
//! - Collectible identity inside one collection is the template `name`.

pub mod collectible;
pub mod economy;
mod lenient;
pub mod task;

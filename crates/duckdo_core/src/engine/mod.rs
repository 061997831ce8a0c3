//! Reward economy transitions.
//!
//! # Responsibility
//! - Convert task completion into currency and incubation progress once.
//! - Gate draws on currency and hatches on incubation progress.
//!
//! # Invariants
//! - Transitions are synchronous and all-or-nothing: a refused transition
//!   returns an error and leaves caller state untouched.
//! - Persistence happens outside this module.

pub mod error;
pub mod hatch;
pub mod purchase;
pub mod reward;

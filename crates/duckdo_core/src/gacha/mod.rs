//! Gacha reward engine: catalog, random source, draws and collection merge.
//!
//! # Responsibility
//! - Resolve rarity tiers with pity guarantees.
//! - Sample collectible templates and reconcile them into a collection.
//!
//! # Invariants
//! - Draw functions are pure given their random source and timestamp.
//! - Currency debit and pity persistence belong to callers.

pub mod draw;
pub mod merge;
pub mod pool;
pub mod rng;

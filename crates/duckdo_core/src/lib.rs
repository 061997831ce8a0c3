//! Core domain logic for DuckDo, a task tracker that pays out in ducks.
//! This crate is the single source of truth for reward-economy invariants.

pub mod advisory;
pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod gacha;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use advisory::{AdvisoryError, AdvisoryProvider, AdvisoryService, OfflineProvider};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use engine::error::EconomyError;
pub use engine::hatch::HatchOutcome;
pub use engine::purchase::{DrawPurchase, DrawnItem, DRAW_COST};
pub use engine::reward::{RewardGrant, ToggleOutcome};
pub use gacha::draw::{BatchDraw, DrawOutcome, PITY_GUARANTEE_THRESHOLD};
pub use gacha::merge::{collection_stats, merge_collection, CollectionStats, MergeOutcome};
pub use gacha::pool::{PoolError, RewardPool};
pub use gacha::rng::{RandomSource, StdRandomSource};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collectible::{CollectibleInstance, CollectibleTemplate, RarityTier};
pub use model::economy::EconomyState;
pub use model::task::{Task, TaskId, TaskStatus, TaskValidationError};
pub use repo::user_repo::{RepoError, RepoResult, UserDataRepository};
pub use service::session_service::{
    DuckSession, SessionError, SessionResult, TaskToggle, DELETE_CONFIRMATION_PHRASE,
};
pub use service::task_query::{TaskFilter, TaskQuery, TaskSort};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError};

/// Minimal health-check API for integration smoke tests.
pub fn ping() -> &'static str {
    "quack"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_quack() {
        assert_eq!(ping(), "quack");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

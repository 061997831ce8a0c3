//! Per-user persisted state: economy, tasks and collection.

use crate::model::collectible::CollectibleInstance;
use crate::model::economy::EconomyState;
use crate::model::task::Task;
use crate::store::{KvStore, StoreError};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const KEY_PREFIX: &str = "duckdo";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persisted user state.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    /// Stored value exists but is not valid JSON for its record type.
    InvalidData { key: String, message: String },
    /// A record could not be encoded.
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted data at `{key}`: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode record: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidData { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Store keys for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserKeys {
    pub economy: String,
    pub tasks: String,
    pub collection: String,
}

impl UserKeys {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            economy: format!("{KEY_PREFIX}:{user_id}:economy"),
            tasks: format!("{KEY_PREFIX}:{user_id}:tasks"),
            collection: format!("{KEY_PREFIX}:{user_id}:collection"),
        }
    }
}

/// Loads and saves one user's records.
pub struct UserDataRepository<S: KvStore> {
    store: S,
    user_id: String,
    keys: UserKeys,
}

impl<S: KvStore> UserDataRepository<S> {
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let keys = UserKeys::for_user(&user_id);
        Self {
            store,
            user_id,
            keys,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn keys(&self) -> &UserKeys {
        &self.keys
    }

    /// Loads balances; a user with none gets the starter economy.
    pub fn load_economy(&self) -> RepoResult<EconomyState> {
        Ok(self
            .read::<EconomyState>(&self.keys.economy)?
            .map(EconomyState::normalize)
            .unwrap_or_else(EconomyState::starter))
    }

    pub fn save_economy(&self, economy: &EconomyState) -> RepoResult<()> {
        self.write(&self.keys.economy, economy)
    }

    /// Loads tasks in stored order.
    ///
    /// Completion times that disagree with status are repaired in memory.
    /// Tasks that remain invalid (blank content) are kept and logged.
    pub fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut tasks = self.read::<Vec<Task>>(&self.keys.tasks)?.unwrap_or_default();
        for task in &mut tasks {
            if task.repair_completion() {
                info!(
                    "event=repo_load module=repo status=repaired record=tasks task_id={} field=completed_at",
                    task.id
                );
            }
            if let Err(err) = task.validate() {
                warn!(
                    "event=repo_load module=repo status=degraded record=tasks task_id={} error={}",
                    task.id, err
                );
            }
        }
        Ok(tasks)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        self.write(&self.keys.tasks, tasks)
    }

    /// Loads the collection, newest first, with star levels repaired.
    pub fn load_collection(&self) -> RepoResult<Vec<CollectibleInstance>> {
        Ok(self
            .read::<Vec<CollectibleInstance>>(&self.keys.collection)?
            .unwrap_or_default()
            .into_iter()
            .map(CollectibleInstance::normalize)
            .collect())
    }

    pub fn save_collection(&self, collection: &[CollectibleInstance]) -> RepoResult<()> {
        self.write(&self.keys.collection, collection)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| RepoError::InvalidData {
                key: key.to_string(),
                message: err.to_string(),
            })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> RepoResult<()> {
        let encoded = serde_json::to_string(value).map_err(RepoError::Encode)?;
        self.store.set(key, &encoded)?;
        Ok(())
    }
}

//! Cached, failure-tolerant advisory facade.

use super::prompt::{coach_prompt, parse_subtask_lines, subtask_prompt};
use super::{AdvisoryError, AdvisoryProvider};
use crate::clock::Clock;
use crate::config::CoreConfig;
use crate::model::task::Task;
use crate::store::KvStore;
use log::{debug, warn};

pub const COACH_CACHE_KEY: &str = "duckdo:advisory:message";
pub const COACH_CACHE_TIMESTAMP_KEY: &str = "duckdo:advisory:timestamp";
/// Five minutes.
pub const DEFAULT_COACH_CACHE_TTL_MS: i64 = 5 * 60 * 1000;

const SLEEPING_MESSAGE: &str = "AI Coach is sleeping (Missing API Key).";
const EMPTY_RESPONSE_MESSAGE: &str = "Quack! Keep going!";
const RATE_LIMITED_MESSAGE: &str =
    "Quack! I need a quick nap (Quota Exceeded). I'll be back later!";
const UNAVAILABLE_MESSAGE: &str = "Quack! I'm having trouble connecting to the hive mind right now.";

const OFFLINE_STEPS: &[&str] = &["Plan step 1", "Plan step 2"];
const RATE_LIMITED_STEPS: &[&str] = &[
    "Break it down",
    "Take a deep breath",
    "Start small (Quota Limit)",
];
const UNAVAILABLE_STEPS: &[&str] = &["Check details", "Start working", "Review"];

struct CachedMessage {
    text: String,
    stored_at: Option<i64>,
}

/// Advisory facade. Every call resolves to display data.
pub struct AdvisoryService<P, S, C> {
    provider: P,
    store: S,
    clock: C,
    cache_ttl_ms: i64,
    /// Cleared when the host configuration carries no API key.
    api_key_configured: bool,
}

impl<P: AdvisoryProvider, S: KvStore, C: Clock> AdvisoryService<P, S, C> {
    pub fn new(provider: P, store: S, clock: C) -> Self {
        Self::with_cache_ttl(provider, store, clock, DEFAULT_COACH_CACHE_TTL_MS)
    }

    pub fn with_cache_ttl(provider: P, store: S, clock: C, cache_ttl_ms: i64) -> Self {
        Self {
            provider,
            store,
            clock,
            cache_ttl_ms,
            api_key_configured: true,
        }
    }

    /// Applies `advisory_cache_ttl_ms` and `advisory_api_key` from `config`.
    pub fn from_config(provider: P, store: S, clock: C, config: &CoreConfig) -> Self {
        Self {
            api_key_configured: config
                .advisory_api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty()),
            ..Self::with_cache_ttl(provider, store, clock, config.advisory_cache_ttl_ms)
        }
    }

    /// Returns a short coaching message for the current task list.
    ///
    /// # Contract
    /// - A cached message younger than the TTL is served without calling the
    ///   provider.
    /// - On provider failure, any cached message (even stale) wins over
    ///   fallback text.
    pub fn get_advisory_message(&self, tasks: &[Task], user_name: &str) -> String {
        if !self.has_credentials() {
            return SLEEPING_MESSAGE.to_string();
        }

        let now = self.clock.now_ms();
        let cached = self.read_cache();
        if let Some(entry) = &cached {
            if let Some(stored_at) = entry.stored_at {
                if now.saturating_sub(stored_at) < self.cache_ttl_ms {
                    debug!("event=advisory_message module=advisory status=ok source=cache");
                    return entry.text.clone();
                }
            }
        }

        match self.provider.generate(&coach_prompt(tasks, user_name, now)) {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    EMPTY_RESPONSE_MESSAGE.to_string()
                } else {
                    text
                };
                self.write_cache(&text, now);
                debug!("event=advisory_message module=advisory status=ok source=provider");
                text
            }
            Err(err) => {
                warn!(
                    "event=advisory_message module=advisory status=degraded rate_limited={} has_cache={}",
                    err.is_rate_limited(),
                    cached.is_some()
                );
                match cached {
                    Some(entry) => entry.text,
                    None => fallback_message(&err).to_string(),
                }
            }
        }
    }

    /// Returns 3-5 suggested sub-steps, or a generic list on failure.
    pub fn get_subtask_suggestions(&self, task_text: &str) -> Vec<String> {
        if !self.has_credentials() {
            return to_owned_steps(OFFLINE_STEPS);
        }

        match self.provider.generate(&subtask_prompt(task_text)) {
            Ok(text) => parse_subtask_lines(&text),
            Err(err) => {
                warn!(
                    "event=advisory_subtasks module=advisory status=degraded rate_limited={}",
                    err.is_rate_limited()
                );
                if err.is_rate_limited() {
                    to_owned_steps(RATE_LIMITED_STEPS)
                } else {
                    to_owned_steps(UNAVAILABLE_STEPS)
                }
            }
        }
    }

    fn has_credentials(&self) -> bool {
        self.api_key_configured && self.provider.has_credentials()
    }

    fn read_cache(&self) -> Option<CachedMessage> {
        let text = match self.store.get(COACH_CACHE_KEY) {
            Ok(value) => value?,
            Err(err) => {
                warn!("event=advisory_cache module=advisory status=error op=read error={err}");
                return None;
            }
        };
        let stored_at = self
            .store
            .get(COACH_CACHE_TIMESTAMP_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        Some(CachedMessage { text, stored_at })
    }

    fn write_cache(&self, text: &str, now: i64) {
        let result = self
            .store
            .set(COACH_CACHE_KEY, text)
            .and_then(|()| self.store.set(COACH_CACHE_TIMESTAMP_KEY, &now.to_string()));
        if let Err(err) = result {
            warn!("event=advisory_cache module=advisory status=error op=write error={err}");
        }
    }
}

fn fallback_message(err: &AdvisoryError) -> &'static str {
    if err.is_rate_limited() {
        RATE_LIMITED_MESSAGE
    } else {
        UNAVAILABLE_MESSAGE
    }
}

fn to_owned_steps(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|step| (*step).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{AdvisoryService, COACH_CACHE_KEY, COACH_CACHE_TIMESTAMP_KEY};
    use crate::advisory::{AdvisoryError, AdvisoryProvider, OfflineProvider};
    use crate::clock::ManualClock;
    use crate::config::CoreConfig;
    use crate::store::{KvStore, MemoryKvStore};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    const MINUTE: i64 = 60 * 1000;

    struct ScriptedProvider {
        responses: RefCell<VecDeque<Result<String, AdvisoryError>>>,
        calls: Cell<usize>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String, AdvisoryError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl AdvisoryProvider for ScriptedProvider {
        fn has_credentials(&self) -> bool {
            true
        }

        fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(AdvisoryError::Unavailable("exhausted".to_string())))
        }
    }

    #[test]
    fn fresh_cache_skips_provider() {
        let provider = ScriptedProvider::new(vec![Ok("Waddle on!".to_string())]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(10 * MINUTE);
        let service = AdvisoryService::new(&provider, &store, &clock);

        assert_eq!(service.get_advisory_message(&[], "Ann"), "Waddle on!");
        clock.advance(4 * MINUTE);
        assert_eq!(service.get_advisory_message(&[], "Ann"), "Waddle on!");
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(
            store.get(COACH_CACHE_TIMESTAMP_KEY).unwrap().as_deref(),
            Some("600000")
        );
    }

    #[test]
    fn expired_cache_refreshes_from_provider() {
        let provider = ScriptedProvider::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let service = AdvisoryService::new(&provider, &store, &clock);

        service.get_advisory_message(&[], "Ann");
        clock.advance(5 * MINUTE);
        assert_eq!(service.get_advisory_message(&[], "Ann"), "second");
        assert_eq!(provider.calls.get(), 2);
    }

    #[test]
    fn stale_cache_beats_fallback_on_failure() {
        let provider = ScriptedProvider::new(vec![
            Ok("cached pep talk".to_string()),
            Err(AdvisoryError::RateLimited),
            Err(AdvisoryError::Unavailable("boom".to_string())),
        ]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let service = AdvisoryService::new(&provider, &store, &clock);

        service.get_advisory_message(&[], "Ann");
        clock.advance(60 * MINUTE);
        assert_eq!(service.get_advisory_message(&[], "Ann"), "cached pep talk");
        assert_eq!(service.get_advisory_message(&[], "Ann"), "cached pep talk");
    }

    #[test]
    fn failures_without_cache_pick_fallback_by_kind() {
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);

        let limited = ScriptedProvider::new(vec![Err(AdvisoryError::RateLimited)]);
        let message = AdvisoryService::new(&limited, &store, &clock).get_advisory_message(&[], "A");
        assert!(message.contains("Quota Exceeded"));

        let broken = ScriptedProvider::new(vec![Err(AdvisoryError::Unavailable("x".into()))]);
        let message = AdvisoryService::new(&broken, &store, &clock).get_advisory_message(&[], "A");
        assert!(message.contains("hive mind"));
        assert!(store.get(COACH_CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn blank_response_becomes_default_cheer() {
        let provider = ScriptedProvider::new(vec![Ok("  ".to_string())]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let service = AdvisoryService::new(&provider, &store, &clock);
        assert_eq!(service.get_advisory_message(&[], "Ann"), "Quack! Keep going!");
    }

    #[test]
    fn missing_credentials_short_circuit() {
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let service = AdvisoryService::new(OfflineProvider, &store, &clock);

        assert!(service.get_advisory_message(&[], "Ann").contains("Missing API Key"));
        assert_eq!(
            service.get_subtask_suggestions("taxes"),
            vec!["Plan step 1", "Plan step 2"]
        );
    }

    #[test]
    fn subtask_suggestions_parse_or_fall_back() {
        let provider = ScriptedProvider::new(vec![
            Ok("- Find forms\n- Fill forms\n".to_string()),
            Err(AdvisoryError::RateLimited),
            Err(AdvisoryError::Unavailable("down".to_string())),
        ]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let service = AdvisoryService::new(&provider, &store, &clock);

        assert_eq!(
            service.get_subtask_suggestions("taxes"),
            vec!["Find forms", "Fill forms"]
        );
        assert_eq!(
            service.get_subtask_suggestions("taxes")[2],
            "Start small (Quota Limit)"
        );
        assert_eq!(
            service.get_subtask_suggestions("taxes"),
            vec!["Check details", "Start working", "Review"]
        );
    }

    #[test]
    fn from_config_applies_cache_ttl() {
        let provider = ScriptedProvider::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let config = CoreConfig {
            advisory_cache_ttl_ms: MINUTE,
            advisory_api_key: Some("key".to_string()),
            ..CoreConfig::default()
        };
        let service = AdvisoryService::from_config(&provider, &store, &clock, &config);

        assert_eq!(service.get_advisory_message(&[], "Ann"), "first");
        clock.advance(2 * MINUTE);
        assert_eq!(service.get_advisory_message(&[], "Ann"), "second");
        assert_eq!(provider.calls.get(), 2);
    }

    #[test]
    fn from_config_without_api_key_sleeps() {
        let provider = ScriptedProvider::new(vec![Ok("unused".to_string())]);
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(0);
        let config = CoreConfig {
            advisory_api_key: Some("  ".to_string()),
            ..CoreConfig::default()
        };
        let service = AdvisoryService::from_config(&provider, &store, &clock, &config);

        assert!(service.get_advisory_message(&[], "Ann").contains("Missing API Key"));
        assert_eq!(service.get_subtask_suggestions("taxes").len(), 2);
        assert_eq!(provider.calls.get(), 0);
    }
}

//! Advisory text collaborator ("Quack Coach").
//!
//! # Responsibility
//! - Define the provider seam for an external text-generation service.
//! - Turn provider results into display-only strings with caching and
//!   fallbacks.
//!
//! # Invariants
//! - Advisory calls never return errors to callers and never touch economy
//!   state.
//! - Advisory text, task content and user names are never logged.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod prompt;
mod service;

pub use prompt::{coach_prompt, parse_subtask_lines, subtask_prompt};
pub use service::{
    AdvisoryService, COACH_CACHE_KEY, COACH_CACHE_TIMESTAMP_KEY, DEFAULT_COACH_CACHE_TTL_MS,
};

/// Provider failure classes. Only used to pick fallback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryError {
    /// Quota exhausted (HTTP 429 / `RESOURCE_EXHAUSTED`).
    RateLimited,
    /// Any other transport or service failure.
    Unavailable(String),
}

impl AdvisoryError {
    /// Classifies a provider status code and message.
    pub fn from_status(status: Option<u16>, message: &str) -> Self {
        if status == Some(429) || message.contains("429") || message.contains("RESOURCE_EXHAUSTED")
        {
            Self::RateLimited
        } else {
            Self::Unavailable(message.to_string())
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl Display for AdvisoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "advisory provider rate limited"),
            Self::Unavailable(message) => write!(f, "advisory provider unavailable: {message}"),
        }
    }
}

impl Error for AdvisoryError {}

/// External text-generation service.
pub trait AdvisoryProvider {
    /// Returns `false` when no API key is configured.
    fn has_credentials(&self) -> bool;
    /// Generates text for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

impl<P: AdvisoryProvider + ?Sized> AdvisoryProvider for &P {
    fn has_credentials(&self) -> bool {
        (**self).has_credentials()
    }

    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        (**self).generate(prompt)
    }
}

/// Provider used when no service is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl AdvisoryProvider for OfflineProvider {
    fn has_credentials(&self) -> bool {
        false
    }

    fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::Unavailable("offline".to_string()))
    }
}

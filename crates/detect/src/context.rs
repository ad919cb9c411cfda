//! Inputs a detector needs besides the text itself.

use chrono::{DateTime, Utc};

/// Clock and entropy injected into detectors so they stay deterministic.
#[derive(Debug, Clone)]
pub struct DetectContext {
    /// Current instant, used by timezone and date detectors.
    pub now: DateTime<Utc>,
    /// Seed for the random detector.
    pub seed: u64,
    /// Target language used when focused translator input omits one.
    pub default_target_lang: String,
}

impl DetectContext {
    pub fn new(now: DateTime<Utc>, seed: u64) -> Self {
        Self {
            now,
            seed,
            default_target_lang: "en".to_string(),
        }
    }

    /// Context for the wall clock with a fresh seed.
    pub fn now() -> Self {
        Self::new(Utc::now(), rand::random())
    }

    pub fn with_default_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_target_lang = lang.into();
        self
    }
}

impl Default for DetectContext {
    fn default() -> Self {
        Self::now()
    }
}

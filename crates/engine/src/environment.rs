//! Clock and entropy abstraction for testability.

use chrono::{DateTime, Utc};
use contour_detect::DetectContext;

/// Source of the inputs detectors need besides the text.
pub trait Environment: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Seed for the random module, drawn once per analysis.
    fn seed(&self) -> u64;

    fn detect_context(&self, default_target_lang: &str) -> DetectContext {
        DetectContext::new(self.now(), self.seed()).with_default_target_lang(default_target_lang)
    }
}

/// Wall clock and thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn seed(&self) -> u64 {
        rand::random()
    }
}

/// Frozen clock and seed.
#[derive(Debug, Clone, Copy)]
pub struct FixedEnvironment {
    pub now: DateTime<Utc>,
    pub seed: u64,
}

impl Environment for FixedEnvironment {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

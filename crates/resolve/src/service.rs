//! Lookup services consumed by the resolvers.

use crate::Result;
use async_trait::async_trait;
use contour_detect::Meaning;
use std::sync::Arc;

/// Exchange-rate lookup: ISO code pair to a numeric rate.
#[async_trait]
pub trait CurrencyRates: Send + Sync {
    /// Units of `to` per one unit of `from`.
    async fn rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Text translation between ISO-639-1 languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// `source` is `None` when the user did not name one.
    async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String>;
}

/// Headword lookup.
#[async_trait]
pub trait Dictionary: Send + Sync {
    async fn define(&self, word: &str) -> Result<Definition>;
}

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Definition {
    pub phonetic: Option<String>,
    pub meanings: Vec<Meaning>,
}

/// The three services the engine resolves against.
#[derive(Clone)]
pub struct Resolvers {
    pub currency: Arc<dyn CurrencyRates>,
    pub translator: Arc<dyn Translator>,
    pub dictionary: Arc<dyn Dictionary>,
}

impl Resolvers {
    pub fn new(
        currency: Arc<dyn CurrencyRates>,
        translator: Arc<dyn Translator>,
        dictionary: Arc<dyn Dictionary>,
    ) -> Self {
        Self {
            currency,
            translator,
            dictionary,
        }
    }
}

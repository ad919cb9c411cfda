//! Async completion of detector results that need remote data.
//!
//! Currency rates, translations and dictionary entries are fetched through
//! the [`CurrencyRates`], [`Translator`] and [`Dictionary`] traits. HTTP
//! implementations live in [`http`]; tests substitute their own.

mod cache;
mod error;
pub mod http;
mod resolve;
mod service;

pub use cache::{CachedRates, RateCache, RATE_CACHE_TTL};
pub use error::{ResolveError, Result};
pub use http::{Endpoints, HttpCurrencyRates, HttpDictionary, HttpTranslator, DEFAULT_USER_AGENT};
pub use resolve::{resolve, resolve_currency, resolve_dictionary, resolve_translation};
pub use service::{CurrencyRates, Definition, Dictionary, Resolvers, Translator};

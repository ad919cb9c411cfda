use async_trait::async_trait;
use contour_detect::{currency, dictionary, translator, Meaning, ModuleResult};
use contour_resolve::{
    resolve, resolve_currency, resolve_dictionary, resolve_translation, CurrencyRates,
    Definition, Dictionary, ResolveError, Resolvers, Translator,
};
use std::sync::Arc;

struct FixedRates(f64);

#[async_trait]
impl CurrencyRates for FixedRates {
    async fn rate(&self, _from: &str, _to: &str) -> Result<f64, ResolveError> {
        Ok(self.0)
    }
}

struct FailingRates;

#[async_trait]
impl CurrencyRates for FailingRates {
    async fn rate(&self, _from: &str, _to: &str) -> Result<f64, ResolveError> {
        Err(ResolveError::Status(503))
    }
}

struct PanickingRates;

#[async_trait]
impl CurrencyRates for PanickingRates {
    async fn rate(&self, _from: &str, _to: &str) -> Result<f64, ResolveError> {
        panic!("rate service exploded");
    }
}

struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: Option<&str>,
        target: &str,
    ) -> Result<String, ResolveError> {
        Ok(format!("{text} [{target}]"))
    }
}

struct TinyDictionary;

#[async_trait]
impl Dictionary for TinyDictionary {
    async fn define(&self, word: &str) -> Result<Definition, ResolveError> {
        if word != "cat" {
            return Err(ResolveError::NotFound(word.to_string()));
        }
        Ok(Definition {
            phonetic: Some("/kæt/".to_string()),
            meanings: vec![Meaning {
                part_of_speech: "noun".to_string(),
                definitions: vec!["A small domesticated carnivorous mammal.".to_string()],
                example: None,
            }],
        })
    }
}

#[tokio::test]
async fn test_currency_resolves_with_rate() {
    let partial = currency::detect("50 usd to eur").unwrap();
    let resolved = resolve_currency(&FixedRates(0.9), partial).await;
    assert!(!resolved.is_partial);
    assert_eq!(resolved.rate, Some(0.9));
    assert_eq!(resolved.display, "50 USD = 45.00 EUR");
}

#[tokio::test]
async fn test_currency_failure_becomes_error_field() {
    let partial = currency::detect("50 usd to eur").unwrap();
    let resolved = resolve_currency(&FailingRates, partial).await;
    assert!(resolved.is_partial);
    assert!(!resolved.is_loading);
    assert_eq!(
        resolved.error.as_deref(),
        Some("Rate unavailable: service returned HTTP 503")
    );
}

#[tokio::test]
async fn test_panicking_service_is_contained() {
    let partial = currency::detect("50 usd to eur").unwrap();
    let resolved = resolve_currency(&PanickingRates, partial).await;
    assert_eq!(
        resolved.error.as_deref(),
        Some("Rate unavailable: lookup failed unexpectedly")
    );
}

#[tokio::test]
async fn test_incomplete_pair_is_not_resolved() {
    let partial = currency::detect("50 usd to").unwrap();
    let resolved = resolve_currency(&PanickingRates, partial.clone()).await;
    assert_eq!(resolved, partial);
}

#[tokio::test]
async fn test_translation_and_dictionary() {
    let partial = translator::detect("translate cat to spanish").unwrap();
    let resolved = resolve_translation(&EchoTranslator, partial).await;
    assert_eq!(resolved.translated.as_deref(), Some("cat [es]"));

    let cat = dictionary::detect("define cat").unwrap();
    let resolved = resolve_dictionary(&TinyDictionary, cat).await;
    assert_eq!(resolved.phonetic.as_deref(), Some("/kæt/"));
    assert!(!resolved.is_partial);

    let dog = dictionary::detect("define dog").unwrap();
    let missing = resolve_dictionary(&TinyDictionary, dog).await;
    assert_eq!(missing.error.as_deref(), Some("No definition found for \"dog\""));
}

#[tokio::test]
async fn test_dispatch_by_module() {
    let resolvers = Resolvers::new(
        Arc::new(FixedRates(2.0)),
        Arc::new(EchoTranslator),
        Arc::new(TinyDictionary),
    );
    let resolved = resolve(
        &resolvers,
        ModuleResult::Currency(currency::detect("10 eur to usd").unwrap()),
    )
    .await;
    assert!(!resolved.is_partial());
    assert_eq!(resolved.display(), "10 EUR = 20.00 USD");
}

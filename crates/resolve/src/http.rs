//! HTTP-backed lookup services.
//!
//! - currency: Frankfurter `GET {base}/latest?from=USD&to=EUR`
//! - translation: MyMemory `GET {base}/get?q=..&langpair=en|es`
//! - dictionary: Free Dictionary `GET {base}/entries/{lang}/{word}`

use crate::{
    CachedRates, CurrencyRates, Definition, Dictionary, ResolveError, Resolvers, Result,
    Translator,
};
use async_trait::async_trait;
use contour_detect::Meaning;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "contour/0.3 (https://github.com/contour-dev/contour)";

/// Base URLs of the lookup services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub currency_base_url: String,
    pub translate_base_url: String,
    pub dictionary_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            currency_base_url: "https://api.frankfurter.app".to_string(),
            translate_base_url: "https://api.mymemory.translated.net".to_string(),
            dictionary_base_url: "https://api.dictionaryapi.dev/api/v2".to_string(),
        }
    }
}

/// Build a client that sends our User-Agent on every request.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(ResolveError::from)
}

fn endpoint(base: &str, segments: &[&str]) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base.trim_end_matches('/'))
        .map_err(|e| ResolveError::Request(format!("invalid base url '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ResolveError::Request(format!("base url '{base}' cannot have a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn check_status(status: StatusCode, key: &str) -> Result<()> {
    if status == StatusCode::NOT_FOUND {
        return Err(ResolveError::NotFound(key.to_string()));
    }
    if !status.is_success() {
        return Err(ResolveError::Status(status.as_u16()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Exchange rates from a Frankfurter-compatible API.
pub struct HttpCurrencyRates {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCurrencyRates {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CurrencyRates for HttpCurrencyRates {
    async fn rate(&self, from: &str, to: &str) -> Result<f64> {
        let url = endpoint(&self.base_url, &["latest"])?;
        debug!(from, to, "Fetching exchange rate");
        let resp = self
            .client
            .get(url)
            .query(&[("from", from), ("to", to)])
            .send()
            .await?;
        check_status(resp.status(), &format!("{from}:{to}"))?;

        let body = resp.json::<RatesResponse>().await?;
        parse_rate(&body, to)
    }
}

fn parse_rate(body: &RatesResponse, to: &str) -> Result<f64> {
    match body.rates.get(to) {
        Some(rate) if rate.is_finite() && *rate > 0.0 => Ok(*rate),
        Some(rate) => Err(ResolveError::InvalidResponse(format!("rate {rate} for {to}"))),
        None => Err(ResolveError::NotFound(to.to_string())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    response_data: Option<TranslateData>,
    #[serde(default)]
    response_status: serde_json::Value,
    #[serde(default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateData {
    translated_text: String,
}

/// Translations from a MyMemory-compatible API.
pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranslator {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// The service requires a source language; English is assumed when the
/// user gave none.
const FALLBACK_SOURCE: &str = "en";

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String> {
        let source = source.unwrap_or(FALLBACK_SOURCE);
        if !is_valid_lang(source) {
            return Err(ResolveError::UnsupportedLanguage(source.to_string()));
        }
        if !is_valid_lang(target) {
            return Err(ResolveError::UnsupportedLanguage(target.to_string()));
        }

        let url = endpoint(&self.base_url, &["get"])?;
        let langpair = format!("{source}|{target}");
        debug!(source, target, "Requesting translation");
        let resp = self
            .client
            .get(url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;
        check_status(resp.status(), text)?;

        let body = resp.json::<TranslateResponse>().await?;
        parse_translation(body)
    }
}

fn parse_translation(body: TranslateResponse) -> Result<String> {
    // The status arrives as either a number or a string.
    let status = match &body.response_status {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    if let Some(code) = status.filter(|code| *code != 200) {
        return Err(match body.response_details {
            Some(details) if !details.is_empty() => ResolveError::InvalidResponse(details),
            _ => ResolveError::Status(code as u16),
        });
    }

    let translated = body
        .response_data
        .map(|data| data.translated_text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ResolveError::InvalidResponse("empty translation".to_string()))?;
    Ok(translated)
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<PhoneticResponse>,
    #[serde(default)]
    meanings: Vec<MeaningResponse>,
}

#[derive(Debug, Deserialize)]
struct PhoneticResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeaningResponse {
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<DefinitionResponse>,
}

#[derive(Debug, Deserialize)]
struct DefinitionResponse {
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// Definitions from a dictionaryapi.dev-compatible API.
pub struct HttpDictionary {
    client: reqwest::Client,
    base_url: String,
    lang: String,
}

impl HttpDictionary {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            lang: lang.into(),
        }
    }
}

/// Definitions kept per part of speech.
const MAX_DEFINITIONS: usize = 3;

#[async_trait]
impl Dictionary for HttpDictionary {
    async fn define(&self, word: &str) -> Result<Definition> {
        if !is_valid_lang(&self.lang) {
            return Err(ResolveError::UnsupportedLanguage(self.lang.clone()));
        }
        let url = endpoint(&self.base_url, &["entries", &self.lang, word])?;
        debug!(word, lang = %self.lang, "Looking up definition");
        let resp = self.client.get(url).send().await?;
        check_status(resp.status(), word)?;

        let entries = resp.json::<Vec<EntryResponse>>().await?;
        parse_definition(entries, word)
    }
}

fn parse_definition(entries: Vec<EntryResponse>, word: &str) -> Result<Definition> {
    let phonetic = entries.iter().find_map(|entry| {
        entry
            .phonetic
            .clone()
            .or_else(|| entry.phonetics.iter().find_map(|p| p.text.clone()))
            .filter(|p| !p.is_empty())
    });

    let meanings: Vec<Meaning> = entries
        .into_iter()
        .flat_map(|entry| entry.meanings)
        .filter(|m| !m.definitions.is_empty())
        .map(|m| Meaning {
            example: m.definitions.iter().find_map(|d| d.example.clone()),
            definitions: m
                .definitions
                .into_iter()
                .take(MAX_DEFINITIONS)
                .map(|d| d.definition)
                .collect(),
            part_of_speech: m.part_of_speech,
        })
        .collect();

    if meanings.is_empty() {
        return Err(ResolveError::NotFound(word.to_string()));
    }
    Ok(Definition { phonetic, meanings })
}

fn is_valid_lang(lang: &str) -> bool {
    let lang = lang.trim();
    !lang.is_empty()
        && lang.len() <= 12
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Resolvers {
    /// HTTP services sharing one client, with cached exchange rates.
    pub fn http(
        endpoints: &Endpoints,
        user_agent: &str,
        dictionary_lang: &str,
        rate_ttl: Duration,
    ) -> Result<Self> {
        let client = build_client(user_agent)?;
        Ok(Self::new(
            Arc::new(CachedRates::new(
                HttpCurrencyRates::new(client.clone(), endpoints.currency_base_url.clone()),
                rate_ttl,
            )),
            Arc::new(HttpTranslator::new(
                client.clone(),
                endpoints.translate_base_url.clone(),
            )),
            Arc::new(HttpDictionary::new(
                client,
                endpoints.dictionary_base_url.clone(),
                dictionary_lang,
            )),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let url = endpoint(
            "https://api.dictionaryapi.dev/api/v2/",
            &["entries", "en", "hello world"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/hello%20world"
        );
        let url = endpoint("https://api.frankfurter.app", &["latest"]).unwrap();
        assert_eq!(url.as_str(), "https://api.frankfurter.app/latest");
    }

    #[test]
    fn test_parse_rate() {
        let body: RatesResponse = serde_json::from_str(
            r#"{"amount":1.0,"base":"USD","date":"2026-10-16","rates":{"EUR":0.9213}}"#,
        )
        .unwrap();
        assert_eq!(parse_rate(&body, "EUR"), Ok(0.9213));
        assert_eq!(
            parse_rate(&body, "GBP"),
            Err(ResolveError::NotFound("GBP".to_string()))
        );
    }

    #[test]
    fn test_parse_translation() {
        let body: TranslateResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":"Hola","match":1},"responseStatus":200}"#,
        )
        .unwrap();
        assert_eq!(parse_translation(body), Ok("Hola".to_string()));

        let body: TranslateResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":""},"responseStatus":"403","responseDetails":"INVALID LANGUAGE PAIR"}"#,
        )
        .unwrap();
        assert_eq!(
            parse_translation(body),
            Err(ResolveError::InvalidResponse("INVALID LANGUAGE PAIR".to_string()))
        );
    }

    #[test]
    fn test_parse_definition() {
        let entries: Vec<EntryResponse> = serde_json::from_str(
            r#"[{
                "word": "hello",
                "phonetics": [{"text": "/həˈləʊ/"}],
                "meanings": [
                    {"partOfSpeech": "noun", "definitions": [
                        {"definition": "\"Hello!\" or an equivalent greeting.", "example": "she was getting polite nods and hellos"}
                    ]},
                    {"partOfSpeech": "verb", "definitions": []}
                ]
            }]"#,
        )
        .unwrap();
        let definition = parse_definition(entries, "hello").unwrap();
        assert_eq!(definition.phonetic.as_deref(), Some("/həˈləʊ/"));
        assert_eq!(definition.meanings.len(), 1);
        assert_eq!(definition.meanings[0].part_of_speech, "noun");
        assert!(definition.meanings[0].example.is_some());
    }

    #[test]
    fn test_empty_definition_is_not_found() {
        assert_eq!(
            parse_definition(Vec::new(), "zzxq"),
            Err(ResolveError::NotFound("zzxq".to_string()))
        );
    }

    #[test]
    fn test_lang_validation() {
        assert!(is_valid_lang("en"));
        assert!(is_valid_lang("zh-CN"));
        assert!(!is_valid_lang(""));
        assert!(!is_valid_lang("en/../x"));
    }
}

//! Translation detector. Always partial: the translated text comes from
//! the translation resolver.

use crate::DetectContext;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static FROM_TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)translate\s+(.+?)\s+from\s+([a-z]+)\s+(?:to|into|in)\s+([a-z]+)$")
        .expect("from-to regex")
});

static TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)translate\s+(.+?)\s+(?:to|into|in)\s+([a-z]+)$").expect("to regex")
});

static BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)translate(?::|\s+(.+?))?(?:\s+(?:to|into|in))?$")
        .expect("bare translate regex")
});

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)([a-z]{2})\s*(?:>|->|→)\s*([a-z]{2}):?\s+(.+)$").expect("pair regex")
});

static TR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)tr:?\s+([a-z]{2,})\s+(.+)$").expect("tr regex")
});

static TRAILING_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)(.+?)\s+(?:to|into|in)\s+([a-z]+)$").expect("trailing target regex")
});

/// ISO 639-1 codes with English names.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("ca", "Catalan"),
    ("ru", "Russian"),
    ("uk", "Ukrainian"),
    ("pl", "Polish"),
    ("cs", "Czech"),
    ("ro", "Romanian"),
    ("hu", "Hungarian"),
    ("el", "Greek"),
    ("tr", "Turkish"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("fi", "Finnish"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("id", "Indonesian"),
    ("vi", "Vietnamese"),
    ("th", "Thai"),
];

/// Resolve a language name or code to its ISO 639-1 code.
pub fn language_code(raw: &str) -> Option<&'static str> {
    let key = raw.trim().to_lowercase();
    LANGUAGES
        .iter()
        .find(|(code, name)| *code == key || name.to_lowercase() == key)
        .map(|(code, _)| *code)
}

pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    pub display: String,
    pub is_partial: bool,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslatorResult {
    fn request(text: &str, source: Option<&str>, target: &str) -> Self {
        let text = unquote(text);
        Self {
            display: format!("{text} → {}", language_name(target)),
            text,
            source: source.map(str::to_string),
            target: Some(target.to_string()),
            translated: None,
            is_partial: true,
            is_loading: false,
            error: None,
        }
    }

    fn incomplete(text: &str, display: String) -> Self {
        Self {
            text: unquote(text),
            source: None,
            target: None,
            translated: None,
            display,
            is_partial: true,
            is_loading: false,
            error: None,
        }
    }

    pub fn needs_resolution(&self) -> bool {
        self.target.is_some()
            && !self.text.is_empty()
            && self.translated.is_none()
            && self.error.is_none()
    }

    pub fn with_translation(mut self, translated: impl Into<String>) -> Self {
        let translated = translated.into();
        let target = self.target.as_deref().map(language_name).unwrap_or("");
        self.display = format!("{translated} ({target})");
        self.translated = Some(translated);
        self.is_partial = false;
        self.is_loading = false;
        self.error = None;
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self.is_loading = false;
        self
    }
}

pub fn detect(text: &str) -> Option<TranslatorResult> {
    let text = text.trim();

    if let Some(caps) = FROM_TO_RE.captures(text) {
        let body = caps.get(1)?.as_str();
        let source = language_code(caps.get(2)?.as_str());
        let target_raw = caps.get(3)?.as_str();
        return Some(match (source, language_code(target_raw)) {
            (Some(source), Some(target)) => TranslatorResult::request(body, Some(source), target),
            _ => TranslatorResult::incomplete(body, format!("Unknown language in \"{text}\"")),
        });
    }

    if let Some(caps) = TO_RE.captures(text) {
        let body = caps.get(1)?.as_str();
        let target_raw = caps.get(2)?.as_str();
        return Some(match language_code(target_raw) {
            Some(target) => TranslatorResult::request(body, None, target),
            None => TranslatorResult::incomplete(body, format!("Unknown language: {target_raw}")),
        });
    }

    if let Some(caps) = PAIR_RE.captures(text) {
        let source = language_code(caps.get(1)?.as_str())?;
        let target = language_code(caps.get(2)?.as_str())?;
        return Some(TranslatorResult::request(caps.get(3)?.as_str(), Some(source), target));
    }

    if let Some(caps) = TR_RE.captures(text) {
        let target = language_code(caps.get(1)?.as_str())?;
        return Some(TranslatorResult::request(caps.get(2)?.as_str(), None, target));
    }

    if let Some(caps) = BARE_RE.captures(text) {
        let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let display = if body.is_empty() {
            "translate <text> to <language>".to_string()
        } else {
            format!("{} → …", unquote(body))
        };
        return Some(TranslatorResult::incomplete(body, display));
    }

    None
}

/// Focused input: any text, with an optional `to <language>` suffix.
pub fn detect_focused(text: &str, ctx: &DetectContext) -> Option<TranslatorResult> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(result) = detect(text).filter(|r| r.target.is_some()) {
        return Some(result);
    }

    if let Some(caps) = TRAILING_TARGET_RE.captures(text) {
        if let Some(target) = caps.get(2).and_then(|m| language_code(m.as_str())) {
            return Some(TranslatorResult::request(caps.get(1)?.as_str(), None, target));
        }
    }

    let target = language_code(&ctx.default_target_lang).unwrap_or("en");
    let body = text
        .strip_prefix("translate ")
        .or_else(|| text.strip_prefix("Translate "))
        .unwrap_or(text);
    Some(TranslatorResult::request(body, None, target))
}

fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    let stripped = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .or_else(|| trimmed.strip_prefix('“').and_then(|s| s.strip_suffix('”')))
        .unwrap_or(trimmed);
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_translate_to_language_name() {
        let result = detect("translate good morning to Spanish").unwrap();
        assert_eq!(result.text, "good morning");
        assert_eq!(result.target.as_deref(), Some("es"));
        assert!(result.is_partial);
        assert!(result.needs_resolution());
    }

    #[test]
    fn test_translate_from_to() {
        let result = detect("translate \"bonjour\" from french to en").unwrap();
        assert_eq!(result.text, "bonjour");
        assert_eq!(result.source.as_deref(), Some("fr"));
        assert_eq!(result.target.as_deref(), Some("en"));
    }

    #[test]
    fn test_language_pair_syntax() {
        let result = detect("en>de: where is the station").unwrap();
        assert_eq!(result.source.as_deref(), Some("en"));
        assert_eq!(result.target.as_deref(), Some("de"));
        assert_eq!(result.text, "where is the station");

        let result = detect("tr ja thank you").unwrap();
        assert_eq!(result.target.as_deref(), Some("ja"));
    }

    #[test]
    fn test_incomplete_requests_stay_partial() {
        let result = detect("translate hello").unwrap();
        assert!(result.target.is_none());
        assert!(!result.needs_resolution());

        let result = detect("translate hello to klingon").unwrap();
        assert!(result.target.is_none());
        assert!(result.display.contains("klingon"));
    }

    #[test]
    fn test_with_translation() {
        let result = detect("translate cat to spanish").unwrap().with_translation("gato");
        assert!(!result.is_partial);
        assert_eq!(result.display, "gato (Spanish)");
    }

    #[test]
    fn test_focused_uses_default_target() {
        let ctx = DetectContext::new(Utc::now(), 0).with_default_target_lang("fr");
        let result = detect_focused("good night", &ctx).unwrap();
        assert_eq!(result.target.as_deref(), Some("fr"));
        assert_eq!(result.text, "good night");

        let result = detect_focused("good night to german", &ctx).unwrap();
        assert_eq!(result.target.as_deref(), Some("de"));
        assert_eq!(result.text, "good night");
    }

    #[test]
    fn test_plain_text_is_not_a_translation() {
        assert!(detect("hello world").is_none());
        assert!(detect("define cat").is_none());
    }
}

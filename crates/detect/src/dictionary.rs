//! Dictionary lookup detector. Every match is partial until the dictionary
//! resolver returns a definition or "not found".

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:define|def|dict|dictionary|definition of|meaning of|what is the meaning of)(?:\s*:?\s+(.+?))?\??$")
        .expect("define regex")
});

static WHAT_DOES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)what\s+does\s+(.+?)\s+mean\??$").expect("what does regex")
});

/// Multi-word phrases longer than this are treated as prose, not a headword.
const MAX_WORDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    pub part_of_speech: String,
    pub definitions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryResult {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meanings: Vec<Meaning>,
    pub display: String,
    pub is_partial: bool,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DictionaryResult {
    fn lookup(word: &str) -> Self {
        Self {
            word: word.to_string(),
            phonetic: None,
            meanings: Vec::new(),
            display: if word.is_empty() {
                "define <word>".to_string()
            } else {
                format!("Define \"{word}\"")
            },
            is_partial: true,
            is_loading: false,
            error: None,
        }
    }

    pub fn needs_resolution(&self) -> bool {
        !self.word.is_empty() && self.meanings.is_empty() && self.error.is_none()
    }

    pub fn with_definition(mut self, phonetic: Option<String>, meanings: Vec<Meaning>) -> Self {
        let first = meanings
            .iter()
            .find_map(|m| m.definitions.first().map(|d| (m.part_of_speech.as_str(), d.as_str())));
        self.display = match first {
            Some((pos, definition)) => format!("{} ({pos}): {definition}", self.word),
            None => format!("{}: no definition", self.word),
        };
        self.phonetic = phonetic;
        self.meanings = meanings;
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

pub fn detect(text: &str) -> Option<DictionaryResult> {
    let text = text.trim();
    let raw = if let Some(caps) = TRIGGER_RE.captures(text) {
        caps.get(1).map(|m| m.as_str()).unwrap_or("")
    } else if let Some(caps) = WHAT_DOES_RE.captures(text) {
        caps.get(1)?.as_str()
    } else {
        return None;
    };
    headword(raw).map(|word| DictionaryResult::lookup(&word))
}

/// Focused input: the whole text is the headword.
pub fn detect_focused(text: &str) -> Option<DictionaryResult> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    detect(text).or_else(|| headword(text).map(|word| DictionaryResult::lookup(&word)))
}

fn headword(raw: &str) -> Option<String> {
    let word = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '“' || c == '”')
        .trim();
    if word.split_whitespace().count() > MAX_WORDS {
        return None;
    }
    let valid = word
        .chars()
        .all(|c| c.is_alphabetic() || c == '-' || c == '\'' || c == ' ');
    valid.then(|| word.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_trigger() {
        let result = detect("define serendipity").unwrap();
        assert_eq!(result.word, "serendipity");
        assert!(result.is_partial);
        assert!(result.needs_resolution());
    }

    #[test]
    fn test_question_forms() {
        assert_eq!(detect("what does ephemeral mean?").unwrap().word, "ephemeral");
        assert_eq!(detect("meaning of Ubiquitous").unwrap().word, "ubiquitous");
    }

    #[test]
    fn test_bare_trigger_does_not_look_up() {
        let result = detect("define").unwrap();
        assert!(result.word.is_empty());
        assert!(!result.needs_resolution());
    }

    #[test]
    fn test_with_definition() {
        let result = detect("define cat").unwrap().with_definition(
            Some("/kæt/".to_string()),
            vec![Meaning {
                part_of_speech: "noun".to_string(),
                definitions: vec!["A small domesticated carnivorous mammal.".to_string()],
                example: None,
            }],
        );
        assert!(!result.is_partial);
        assert_eq!(result.display, "cat (noun): A small domesticated carnivorous mammal.");
    }

    #[test]
    fn test_rejects_prose_and_symbols() {
        assert!(detect("define the way we used to talk about things").is_none());
        assert!(detect("define 2+2").is_none());
        assert!(detect("cat").is_none());
    }

    #[test]
    fn test_focused_takes_whole_text() {
        assert_eq!(detect_focused("Petrichor").unwrap().word, "petrichor");
        assert!(detect_focused("").is_none());
    }
}

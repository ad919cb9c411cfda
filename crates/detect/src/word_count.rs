//! Word count. Needs an explicit marker (`wc:`, `word count`, `count words`)
//! so ordinary prose never triggers it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)(?:wc|word\s*count|count\s+words)(?:\s*:\s*|\s+|$)(.*)$").expect("wc regex")
});

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex"));

/// Average silent reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCountResult {
    pub words: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_minutes: usize,
    pub display: String,
    pub is_partial: bool,
}

pub fn detect(text: &str) -> Option<WordCountResult> {
    let caps = MARKER_RE.captures(text.trim())?;
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    Some(count(body))
}

/// Focused input: everything typed is counted.
pub fn detect_focused(text: &str) -> Option<WordCountResult> {
    if text.trim().is_empty() {
        return None;
    }
    detect(text).or_else(|| Some(count(text)))
}

pub fn count(body: &str) -> WordCountResult {
    let body = body.trim();
    if body.is_empty() {
        return WordCountResult {
            words: 0,
            characters: 0,
            characters_no_spaces: 0,
            sentences: 0,
            paragraphs: 0,
            reading_minutes: 0,
            display: "Type text after wc: to count it".to_string(),
            is_partial: true,
        };
    }

    let words = body.split_whitespace().count();
    let characters = body.chars().count();
    let characters_no_spaces = body.chars().filter(|c| !c.is_whitespace()).count();
    let sentences = body
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count();
    let paragraphs = PARAGRAPH_RE
        .split(body)
        .filter(|p| !p.trim().is_empty())
        .count();
    let reading_minutes = words.div_ceil(WORDS_PER_MINUTE);

    let display = format!(
        "{words} {} · {characters} {} · {sentences} {} · {} read",
        plural(words, "word"),
        plural(characters, "character"),
        plural(sentences, "sentence"),
        if reading_minutes <= 1 {
            "<1 min".to_string()
        } else {
            format!("{reading_minutes} min")
        }
    );

    WordCountResult {
        words,
        characters,
        characters_no_spaces,
        sentences,
        paragraphs,
        reading_minutes,
        display,
        is_partial: false,
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_required() {
        assert!(detect("the quick brown fox").is_none());
        assert!(detect("wc: the quick brown fox").is_some());
        assert!(detect("word count the quick brown fox").is_some());
    }

    #[test]
    fn test_counts() {
        let result = detect("wc: Hello there. How are you?\n\nFine!").unwrap();
        assert_eq!(result.words, 6);
        assert_eq!(result.sentences, 3);
        assert_eq!(result.paragraphs, 2);
        assert_eq!(result.reading_minutes, 1);
        assert!(!result.is_partial);
    }

    #[test]
    fn test_characters_without_spaces() {
        let result = count("ab cd");
        assert_eq!(result.characters, 5);
        assert_eq!(result.characters_no_spaces, 4);
        assert_eq!(result.display, "2 words · 5 characters · 1 sentence · <1 min read");
    }

    #[test]
    fn test_bare_marker_is_partial() {
        let result = detect("wc").unwrap();
        assert!(result.is_partial);
        assert_eq!(result.words, 0);
    }

    #[test]
    fn test_focused_counts_everything() {
        let result = detect_focused("one two three").unwrap();
        assert_eq!(result.words, 3);
        assert!(detect_focused("   ").is_none());
    }
}

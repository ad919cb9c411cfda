//! Timer duration detector: `5m`, `1h30m`, `90s`, `10:00`, `25 minutes tea`.
//!
//! Only reachable through the focused timer module; free text is never
//! auto-detected as a timer.

use contour_timer::TimerState;
use regex::Regex;
use std::sync::LazyLock;

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("clock regex")
});

/// Longest timer accepted, in seconds (99 hours).
pub const MAX_TIMER_SECONDS: u64 = 99 * 3600;

pub fn detect(text: &str) -> Option<TimerState> {
    let (seconds, label) = parse_timer(text)?;
    Some(TimerState::new(seconds, label))
}

/// Parse a duration with an optional free-text label before or after it.
pub fn parse_timer(text: &str) -> Option<(u64, Option<String>)> {
    let text = text.trim();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    // Duration first, label after.
    for split in (1..=tokens.len()).rev() {
        if let Some(seconds) = parse_duration(&tokens[..split].join(" ")) {
            return finish(seconds, &tokens[split..]);
        }
    }

    // Label first, duration at the end.
    for split in 1..tokens.len() {
        if let Some(seconds) = parse_duration(&tokens[split..].join(" ")) {
            return finish(seconds, &tokens[..split]);
        }
    }

    None
}

fn finish(seconds: u64, label: &[&str]) -> Option<(u64, Option<String>)> {
    if seconds == 0 || seconds > MAX_TIMER_SECONDS {
        return None;
    }
    let label = label.join(" ");
    let label = (!label.is_empty()).then_some(label);
    Some((seconds, label))
}

/// Parse a duration expression that must consume the whole input.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim().to_lowercase();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = CLOCK_RE.captures(&raw) {
        let a: u64 = caps.get(1)?.as_str().parse().ok()?;
        let b: u64 = caps.get(2)?.as_str().parse().ok()?;
        return match caps.get(3) {
            Some(c) => {
                let c: u64 = c.as_str().parse().ok()?;
                if b >= 60 || c >= 60 {
                    return None;
                }
                a.checked_mul(3600)?.checked_add(b * 60 + c)
            }
            None if b < 60 => a.checked_mul(60)?.checked_add(b),
            None => None,
        };
    }

    // A bare integer means minutes.
    if raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse::<u64>().ok().and_then(|m| m.checked_mul(60));
    }

    let mut scanner = Scanner::new(&raw);
    let mut total = 0.0;
    let mut parts = 0;
    loop {
        scanner.eat_ws();
        if scanner.done() {
            break;
        }
        if parts > 0 && scanner.consume_word("and") {
            continue;
        }
        let value = scanner.take_number()?;
        scanner.eat_ws();
        let unit = scanner.take_word()?;
        total += value * unit_seconds(&unit)?;
        parts += 1;
    }

    if parts == 0 || total < 0.0 {
        return None;
    }
    Some(total.round() as u64)
}

fn unit_seconds(unit: &str) -> Option<f64> {
    match unit {
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(3600.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        _ => None,
    }
}

struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    fn done(&self) -> bool {
        self.i >= self.s.len()
    }

    fn eat_ws(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == ',' {
                self.i += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.i;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.i += ch.len_utf8();
        }
        &self.s[start..self.i]
    }

    fn take_number(&mut self) -> Option<f64> {
        let token = self.take_while(|c| c.is_ascii_digit() || c == '.');
        token.parse::<f64>().ok()
    }

    fn take_word(&mut self) -> Option<String> {
        let word = self.take_while(|c| c.is_ascii_alphabetic());
        (!word.is_empty()).then(|| word.to_string())
    }

    fn consume_word(&mut self, word: &str) -> bool {
        let rest = &self.s[self.i..];
        if !rest.starts_with(word) {
            return false;
        }
        let boundary = rest[word.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_alphabetic());
        if boundary {
            self.i += word.len();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_units() {
        assert_eq!(parse_duration("5m"), Some(300));
        assert_eq!(parse_duration("1h30m"), Some(5400));
        assert_eq!(parse_duration("90s"), Some(90));
        assert_eq!(parse_duration("1h 30m 10s"), Some(5410));
        assert_eq!(parse_duration("1.5h"), Some(5400));
    }

    #[test]
    fn test_long_units() {
        assert_eq!(parse_duration("25 minutes"), Some(1500));
        assert_eq!(parse_duration("1 hour and 5 minutes"), Some(3900));
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(parse_duration("10:00"), Some(600));
        assert_eq!(parse_duration("1:30:00"), Some(5400));
        assert_eq!(parse_duration("1:75"), None);
    }

    #[test]
    fn test_bare_number_is_minutes() {
        assert_eq!(parse_duration("3"), Some(180));
    }

    #[test]
    fn test_oversized_durations_are_rejected() {
        assert_eq!(parse_duration("999999999999999999"), None);
        assert_eq!(parse_duration("9999999999999999:00:00"), None);
        assert!(detect("999999999999999999").is_none());
        assert!(detect("6000").is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(parse_timer("5m tea"), Some((300, Some("tea".to_string()))));
        assert_eq!(
            parse_timer("pizza in oven 12 min"),
            Some((720, Some("pizza in oven".to_string())))
        );
    }

    #[test]
    fn test_rejects_malformed_and_zero() {
        assert!(detect("0s").is_none());
        assert!(detect("abc").is_none());
        assert!(detect("five minutes").is_none());
        assert!(detect("").is_none());
    }

    #[test]
    fn test_detect_builds_idle_timer() {
        let timer = detect("1h30m").unwrap();
        assert_eq!(timer.total_seconds, 5400);
        assert_eq!(timer.display, "1:30:00");
        assert!(!timer.is_running);
    }
}

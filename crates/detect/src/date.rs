//! Date arithmetic detector: "days until X", "X days from now".

use crate::DetectContext;
use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static UNTIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:how many\s+)?days\s+(until|till|til|to|since)(?:\s+(.+?))?\??$")
        .expect("until regex")
});

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(\d{1,5})\s+(days?|weeks?|months?|years?)\s+(from now|from today|later|ago|after|before|from)(?:\s+(.+))?$")
        .expect("relative regex")
});

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("iso regex"));

static SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("slash regex"));

static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?$")
        .expect("month day regex")
});

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?([a-z]+)\.?(?:,?\s+(\d{4}))?$")
        .expect("day month regex")
});

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Fixed-date holidays: (aliases, month, day).
const HOLIDAYS: &[(&[&str], u32, u32)] = &[
    (&["christmas", "xmas", "christmas day"], 12, 25),
    (&["christmas eve"], 12, 24),
    (&["new year", "new years", "new year's", "new year's day", "new years day"], 1, 1),
    (&["new year's eve", "new years eve"], 12, 31),
    (&["halloween"], 10, 31),
    (&["valentine's day", "valentines day", "valentine's", "valentines"], 2, 14),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NaiveDate>,
    /// Signed distance in days from today to `target`.
    #[serde(default)]
    pub days: i64,
    pub display: String,
    pub is_partial: bool,
}

pub fn detect(text: &str, ctx: &DetectContext) -> Option<DateResult> {
    let text = text.trim();
    let today = ctx.now.date_naive();

    if let Some(caps) = UNTIL_RE.captures(text) {
        let direction = caps.get(1)?.as_str().to_lowercase();
        let since = direction == "since";
        let Some(raw) = caps.get(2).map(|m| m.as_str().trim()).filter(|s| !s.is_empty()) else {
            return Some(DateResult {
                target: None,
                days: 0,
                display: format!("days {direction} <date>"),
                is_partial: true,
            });
        };

        let target = parse_date(raw, today, !since)?;
        let days = (target - today).num_days();
        let display = if since {
            format!("{} {} since {}", -days, plural(-days, "day"), long_date(target))
        } else {
            format!("{} {} until {}", days, plural(days, "day"), long_date(target))
        };
        return Some(DateResult {
            target: Some(target),
            days,
            display,
            is_partial: false,
        });
    }

    let caps = RELATIVE_RE.captures(text)?;
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    let direction = caps.get(3)?.as_str().to_lowercase();
    let anchor_raw = caps.get(4).map(|m| m.as_str().trim());

    let (anchor, backwards, suffix) = match (direction.as_str(), anchor_raw) {
        ("from now" | "from today" | "later", None) => (today, false, "from now".to_string()),
        ("ago", None) => (today, true, "ago".to_string()),
        ("after" | "from", Some(raw)) => {
            let anchor = parse_date(raw, today, false)?;
            (anchor, false, format!("after {}", short_date(anchor)))
        }
        ("before", Some(raw)) => {
            let anchor = parse_date(raw, today, false)?;
            (anchor, true, format!("before {}", short_date(anchor)))
        }
        _ => return None,
    };

    let target = shift(anchor, amount, &unit, backwards)?;
    let days = (target - today).num_days();
    Some(DateResult {
        target: Some(target),
        days,
        display: format!(
            "{} ({amount} {} {suffix})",
            long_date(target),
            unit_label(&unit, amount)
        ),
        is_partial: false,
    })
}

fn shift(anchor: NaiveDate, amount: u32, unit: &str, backwards: bool) -> Option<NaiveDate> {
    let unit = unit.trim_end_matches('s');
    match (unit, backwards) {
        ("day", false) => anchor.checked_add_days(Days::new(u64::from(amount))),
        ("day", true) => anchor.checked_sub_days(Days::new(u64::from(amount))),
        ("week", false) => anchor.checked_add_days(Days::new(u64::from(amount) * 7)),
        ("week", true) => anchor.checked_sub_days(Days::new(u64::from(amount) * 7)),
        ("month", false) => anchor.checked_add_months(Months::new(amount)),
        ("month", true) => anchor.checked_sub_months(Months::new(amount)),
        ("year", false) => anchor.checked_add_months(Months::new(amount.checked_mul(12)?)),
        ("year", true) => anchor.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    }
}

/// Parse a user-typed date. Dates without a year roll forward to the next
/// occurrence when `prefer_future` is set.
fn parse_date(raw: &str, today: NaiveDate, prefer_future: bool) -> Option<NaiveDate> {
    let key = raw.trim().trim_end_matches('?').trim().to_lowercase();

    match key.as_str() {
        "today" | "now" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        _ => {}
    }

    if let Some((_, month, day)) = HOLIDAYS
        .iter()
        .find(|(aliases, _, _)| aliases.contains(&key.as_str()))
    {
        return with_rolled_year(*month, *day, None, today, prefer_future);
    }

    if let Some(caps) = ISO_RE.captures(&key) {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = SLASH_RE.captures(&key) {
        let month = caps.get(1)?.as_str().parse().ok()?;
        let day = caps.get(2)?.as_str().parse().ok()?;
        let year = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let (month, day, year) = if let Some(caps) = MONTH_DAY_RE.captures(&key) {
        (
            month_number(caps.get(1)?.as_str())?,
            caps.get(2)?.as_str().parse().ok()?,
            caps.get(3).and_then(|m| m.as_str().parse().ok()),
        )
    } else if let Some(caps) = DAY_MONTH_RE.captures(&key) {
        (
            month_number(caps.get(2)?.as_str())?,
            caps.get(1)?.as_str().parse().ok()?,
            caps.get(3).and_then(|m| m.as_str().parse().ok()),
        )
    } else {
        return None;
    };

    with_rolled_year(month, day, year, today, prefer_future)
}

fn with_rolled_year(
    month: u32,
    day: u32,
    year: Option<i32>,
    today: NaiveDate,
    prefer_future: bool,
) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if prefer_future && this_year < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

fn month_number(raw: &str) -> Option<u32> {
    let raw = raw.to_lowercase();
    if raw.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(raw.as_str()))
        .map(|i| i as u32 + 1)
}

fn plural(n: i64, word: &str) -> String {
    if n.abs() == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn unit_label(unit: &str, amount: u32) -> String {
    plural(i64::from(amount), unit.trim_end_matches('s'))
}

fn long_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

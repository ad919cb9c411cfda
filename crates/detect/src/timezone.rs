//! Timezone detector: `<time> <ZONE> in <ZONE>` and `now in <CITY>`.
//!
//! Zones resolve to fixed UTC offsets. Daylight saving is not modeled, so
//! summer abbreviations (EDT, CEST, ...) are listed as separate zones.

use crate::DetectContext;
use chrono::{FixedOffset, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:now|time|what time is it|current time)\s+in\s+(.+?)\??$")
        .expect("now regex")
});

static CONVERT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s+([a-z][a-z .]*?)\s+(?:in|to|into)(?:\s+(.+))?$",
    )
    .expect("timezone regex")
});

/// Zone abbreviations and cities with their offset from UTC in minutes.
const ZONES: &[(&str, &str, i32)] = &[
    ("utc", "UTC", 0),
    ("gmt", "GMT", 0),
    ("wet", "WET", 0),
    ("bst", "BST", 60),
    ("cet", "CET", 60),
    ("cest", "CEST", 120),
    ("eet", "EET", 120),
    ("eest", "EEST", 180),
    ("msk", "MSK", 180),
    ("gst", "GST", 240),
    ("pkt", "PKT", 300),
    ("ist", "IST", 330),
    ("ict", "ICT", 420),
    ("sgt", "SGT", 480),
    ("hkt", "HKT", 480),
    ("awst", "AWST", 480),
    ("jst", "JST", 540),
    ("kst", "KST", 540),
    ("acst", "ACST", 570),
    ("aest", "AEST", 600),
    ("aedt", "AEDT", 660),
    ("nzst", "NZST", 720),
    ("nzdt", "NZDT", 780),
    ("brt", "BRT", -180),
    ("art", "ART", -180),
    ("nst", "NST", -210),
    ("ast", "AST", -240),
    ("edt", "EDT", -240),
    ("est", "EST", -300),
    ("cdt", "CDT", -300),
    ("cst", "CST", -360),
    ("mdt", "MDT", -360),
    ("mst", "MST", -420),
    ("pdt", "PDT", -420),
    ("pst", "PST", -480),
    ("akst", "AKST", -540),
    ("hst", "HST", -600),
    ("new york", "New York", -300),
    ("nyc", "New York", -300),
    ("boston", "Boston", -300),
    ("toronto", "Toronto", -300),
    ("miami", "Miami", -300),
    ("chicago", "Chicago", -360),
    ("mexico city", "Mexico City", -360),
    ("denver", "Denver", -420),
    ("los angeles", "Los Angeles", -480),
    ("la", "Los Angeles", -480),
    ("san francisco", "San Francisco", -480),
    ("sf", "San Francisco", -480),
    ("seattle", "Seattle", -480),
    ("vancouver", "Vancouver", -480),
    ("anchorage", "Anchorage", -540),
    ("honolulu", "Honolulu", -600),
    ("sao paulo", "São Paulo", -180),
    ("são paulo", "São Paulo", -180),
    ("buenos aires", "Buenos Aires", -180),
    ("london", "London", 0),
    ("dublin", "Dublin", 0),
    ("lisbon", "Lisbon", 0),
    ("paris", "Paris", 60),
    ("berlin", "Berlin", 60),
    ("madrid", "Madrid", 60),
    ("barcelona", "Barcelona", 60),
    ("rome", "Rome", 60),
    ("amsterdam", "Amsterdam", 60),
    ("brussels", "Brussels", 60),
    ("zurich", "Zurich", 60),
    ("vienna", "Vienna", 60),
    ("stockholm", "Stockholm", 60),
    ("oslo", "Oslo", 60),
    ("copenhagen", "Copenhagen", 60),
    ("warsaw", "Warsaw", 60),
    ("prague", "Prague", 60),
    ("lagos", "Lagos", 60),
    ("athens", "Athens", 120),
    ("helsinki", "Helsinki", 120),
    ("cairo", "Cairo", 120),
    ("johannesburg", "Johannesburg", 120),
    ("istanbul", "Istanbul", 180),
    ("moscow", "Moscow", 180),
    ("nairobi", "Nairobi", 180),
    ("dubai", "Dubai", 240),
    ("karachi", "Karachi", 300),
    ("mumbai", "Mumbai", 330),
    ("delhi", "Delhi", 330),
    ("new delhi", "New Delhi", 330),
    ("bangalore", "Bangalore", 330),
    ("kolkata", "Kolkata", 330),
    ("bangkok", "Bangkok", 420),
    ("jakarta", "Jakarta", 420),
    ("singapore", "Singapore", 480),
    ("hong kong", "Hong Kong", 480),
    ("beijing", "Beijing", 480),
    ("shanghai", "Shanghai", 480),
    ("taipei", "Taipei", 480),
    ("manila", "Manila", 480),
    ("perth", "Perth", 480),
    ("seoul", "Seoul", 540),
    ("tokyo", "Tokyo", 540),
    ("adelaide", "Adelaide", 570),
    ("sydney", "Sydney", 600),
    ("melbourne", "Melbourne", 600),
    ("brisbane", "Brisbane", 600),
    ("auckland", "Auckland", 720),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_time: Option<String>,
    /// Calendar day shift of the converted time relative to the source.
    #[serde(default)]
    pub day_offset: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    pub display: String,
    pub is_partial: bool,
}

struct Zone {
    name: &'static str,
    offset_minutes: i32,
}

fn lookup(raw: &str) -> Option<Zone> {
    let key = raw.trim().trim_end_matches('?').trim().to_lowercase();
    ZONES
        .iter()
        .find(|(alias, _, _)| *alias == key)
        .map(|(_, name, offset)| Zone {
            name,
            offset_minutes: *offset,
        })
}

pub fn detect(text: &str, ctx: &DetectContext) -> Option<TimezoneResult> {
    let text = text.trim();

    if let Some(caps) = NOW_RE.captures(text) {
        return detect_now(caps.get(1)?.as_str(), ctx);
    }

    let caps = CONVERT_RE.captures(text)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    if minute > 59 {
        return None;
    }
    match caps.get(3).map(|m| m.as_str().to_lowercase()) {
        Some(meridiem) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            hour %= 12;
            if meridiem == "pm" {
                hour += 12;
            }
        }
        None if hour > 23 => return None,
        None => {}
    }

    let from = lookup(caps.get(4)?.as_str())?;
    let source = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let source_time = format_time(source);

    let target = caps.get(5).map(|m| m.as_str().trim()).filter(|t| !t.is_empty());
    let Some(target) = target else {
        return Some(TimezoneResult {
            source_time: Some(source_time.clone()),
            from: Some(from.name.to_string()),
            to: None,
            converted_time: None,
            day_offset: 0,
            utc_offset: None,
            display: format!("{source_time} {} → …", from.name),
            is_partial: true,
        });
    };
    let to = lookup(target)?;

    let utc_minutes = (hour * 60 + minute) as i32 - from.offset_minutes;
    let target_minutes = utc_minutes + to.offset_minutes;
    let day_offset = target_minutes.div_euclid(24 * 60);
    let minutes_of_day = target_minutes.rem_euclid(24 * 60) as u32;
    let converted = NaiveTime::from_hms_opt(minutes_of_day / 60, minutes_of_day % 60, 0)?;
    let converted_time = format_time(converted);

    let shift = match day_offset {
        0 => String::new(),
        1 => " (+1 day)".to_string(),
        -1 => " (-1 day)".to_string(),
        n => format!(" ({n:+} days)"),
    };

    Some(TimezoneResult {
        display: format!(
            "{source_time} {} = {converted_time} {}{shift}",
            from.name, to.name
        ),
        source_time: Some(source_time),
        from: Some(from.name.to_string()),
        to: Some(to.name.to_string()),
        converted_time: Some(converted_time),
        day_offset,
        utc_offset: Some(format_offset(to.offset_minutes)),
        is_partial: false,
    })
}

fn detect_now(target: &str, ctx: &DetectContext) -> Option<TimezoneResult> {
    let zone = lookup(target)?;
    let offset = FixedOffset::east_opt(zone.offset_minutes * 60)?;
    let local = ctx.now.with_timezone(&offset);
    let converted_time = format_time(local.time());
    let utc_offset = format_offset(zone.offset_minutes);

    Some(TimezoneResult {
        display: format!(
            "{converted_time} in {} ({}, {utc_offset})",
            zone.name,
            local.format("%a %b %-d")
        ),
        source_time: None,
        from: None,
        to: Some(zone.name.to_string()),
        converted_time: Some(converted_time),
        day_offset: 0,
        utc_offset: Some(utc_offset),
        is_partial: false,
    })
}

fn format_time(time: NaiveTime) -> String {
    let (pm, hour12) = time.hour12();
    format!(
        "{hour12}:{:02} {}",
        time.minute(),
        if pm { "PM" } else { "AM" }
    )
}

fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.abs();
    if abs % 60 == 0 {
        format!("UTC{sign}{}", abs / 60)
    } else {
        format!("UTC{sign}{}:{:02}", abs / 60, abs % 60)
    }
}

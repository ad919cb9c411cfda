//! Unit conversion detector: `<number> <unit> to <unit>`.

use crate::number::{format_number, parse_number};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static UNITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(-?\d[\d,]*(?:\.\d+)?|-?\.\d+)\s*(.+?)\s+(?:to|in|into|as)(?:\s+(.+))?$")
        .expect("units regex")
});

/// Physical dimension a unit belongs to. Conversions never cross categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Mass,
    Temperature,
    Volume,
    Time,
    Data,
    Speed,
    Area,
}

struct UnitDef {
    symbol: &'static str,
    aliases: &'static [&'static str],
    category: UnitCategory,
    /// Multiplier to the category's base unit. Unused for temperature.
    factor: f64,
}

const fn unit(
    symbol: &'static str,
    aliases: &'static [&'static str],
    category: UnitCategory,
    factor: f64,
) -> UnitDef {
    UnitDef {
        symbol,
        aliases,
        category,
        factor,
    }
}

use UnitCategory::*;

const UNITS: &[UnitDef] = &[
    // Length (m)
    unit("mm", &["millimeter", "millimeters", "millimetre", "millimetres"], Length, 0.001),
    unit("cm", &["centimeter", "centimeters", "centimetre", "centimetres"], Length, 0.01),
    unit("m", &["meter", "meters", "metre", "metres"], Length, 1.0),
    unit("km", &["kms", "kilometer", "kilometers", "kilometre", "kilometres"], Length, 1000.0),
    unit("in", &["inch", "inches", "\""], Length, 0.0254),
    unit("ft", &["foot", "feet", "'"], Length, 0.3048),
    unit("yd", &["yard", "yards", "yds"], Length, 0.9144),
    unit("mi", &["mile", "miles"], Length, 1609.344),
    unit("nmi", &["nautical mile", "nautical miles"], Length, 1852.0),
    // Mass (kg)
    unit("mg", &["milligram", "milligrams"], Mass, 1e-6),
    unit("g", &["gram", "grams", "gr"], Mass, 0.001),
    unit("kg", &["kgs", "kilo", "kilos", "kilogram", "kilograms"], Mass, 1.0),
    unit("t", &["tonne", "tonnes", "metric ton", "metric tons"], Mass, 1000.0),
    unit("oz", &["ounce", "ounces"], Mass, 0.028_349_523_125),
    unit("lb", &["lbs", "pound", "pounds"], Mass, 0.453_592_37),
    unit("st", &["stone", "stones"], Mass, 6.350_293_18),
    // Temperature
    unit("°C", &["c", "°c", "celsius", "degc"], Temperature, 1.0),
    unit("°F", &["f", "°f", "fahrenheit", "degf"], Temperature, 1.0),
    unit("K", &["k", "kelvin", "kelvins"], Temperature, 1.0),
    // Volume (l)
    unit("ml", &["milliliter", "milliliters", "millilitre", "millilitres"], Volume, 0.001),
    unit("l", &["liter", "liters", "litre", "litres"], Volume, 1.0),
    unit("gal", &["gallon", "gallons"], Volume, 3.785_411_784),
    unit("qt", &["quart", "quarts"], Volume, 0.946_352_946),
    unit("pt", &["pint", "pints"], Volume, 0.473_176_473),
    unit("cup", &["cups"], Volume, 0.236_588_236_5),
    unit("fl oz", &["floz", "fluid ounce", "fluid ounces"], Volume, 0.029_573_529_562_5),
    unit("tbsp", &["tablespoon", "tablespoons"], Volume, 0.014_786_764_781_25),
    unit("tsp", &["teaspoon", "teaspoons"], Volume, 0.004_928_921_593_75),
    // Time (s)
    unit("ms", &["millisecond", "milliseconds"], Time, 0.001),
    unit("s", &["sec", "secs", "second", "seconds"], Time, 1.0),
    unit("min", &["mins", "minute", "minutes"], Time, 60.0),
    unit("h", &["hr", "hrs", "hour", "hours"], Time, 3600.0),
    unit("day", &["d", "days"], Time, 86_400.0),
    unit("week", &["wk", "wks", "weeks"], Time, 604_800.0),
    unit("month", &["months"], Time, 2_629_746.0),
    unit("year", &["yr", "yrs", "years"], Time, 31_556_952.0),
    // Data (bytes)
    unit("bit", &["bits"], Data, 0.125),
    unit("B", &["b", "byte", "bytes"], Data, 1.0),
    unit("KB", &["kb", "kilobyte", "kilobytes"], Data, 1e3),
    unit("MB", &["mb", "megabyte", "megabytes"], Data, 1e6),
    unit("GB", &["gb", "gigabyte", "gigabytes"], Data, 1e9),
    unit("TB", &["tb", "terabyte", "terabytes"], Data, 1e12),
    unit("KiB", &["kib", "kibibyte", "kibibytes"], Data, 1024.0),
    unit("MiB", &["mib", "mebibyte", "mebibytes"], Data, 1_048_576.0),
    unit("GiB", &["gib", "gibibyte", "gibibytes"], Data, 1_073_741_824.0),
    // Speed (m/s)
    unit("m/s", &["mps", "meters per second"], Speed, 1.0),
    unit("km/h", &["kmh", "kph", "kmph", "kilometers per hour"], Speed, 1.0 / 3.6),
    unit("mph", &["miles per hour"], Speed, 0.44704),
    unit("kn", &["knot", "knots", "kt"], Speed, 0.514_444),
    unit("ft/s", &["fps", "feet per second"], Speed, 0.3048),
    // Area (m²)
    unit("cm²", &["cm2", "sq cm", "square centimeters"], Area, 1e-4),
    unit("m²", &["m2", "sq m", "square meter", "square meters"], Area, 1.0),
    unit("km²", &["km2", "sq km", "square kilometer", "square kilometers"], Area, 1e6),
    unit("ft²", &["ft2", "sq ft", "square foot", "square feet"], Area, 0.092_903_04),
    unit("mi²", &["mi2", "sq mi", "square mile", "square miles"], Area, 2_589_988.110_336),
    unit("ha", &["hectare", "hectares"], Area, 10_000.0),
    unit("acre", &["acres", "ac"], Area, 4_046.856_422_4),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsResult {
    pub value: f64,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub category: UnitCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted: Option<f64>,
    /// Compatible targets, offered while the target is missing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub display: String,
    pub is_partial: bool,
}

pub fn detect(text: &str) -> Option<UnitsResult> {
    let normalized = text.trim().replace("->", " to ").replace("=>", " to ");
    let caps = UNITS_RE.captures(normalized.trim())?;

    let value = parse_number(caps.get(1)?.as_str())?;
    let from = lookup(caps.get(2)?.as_str())?;

    let Some(target) = caps.get(3).map(|m| m.as_str().trim()).filter(|t| !t.is_empty()) else {
        let suggestions = UNITS
            .iter()
            .filter(|u| u.category == from.category && u.symbol != from.symbol)
            .map(|u| u.symbol.to_string())
            .collect();
        return Some(UnitsResult {
            value,
            from: from.symbol.to_string(),
            to: None,
            category: from.category,
            converted: None,
            suggestions,
            display: format!("{} {} → …", format_number(value), from.symbol),
            is_partial: true,
        });
    };

    let to = lookup(target)?;
    if to.category != from.category {
        return None;
    }

    let converted = convert(value, from, to);
    Some(UnitsResult {
        value,
        from: from.symbol.to_string(),
        to: Some(to.symbol.to_string()),
        category: from.category,
        converted: Some(converted),
        suggestions: Vec::new(),
        display: format!(
            "{} {} = {} {}",
            format_number(value),
            from.symbol,
            format_number(round_sig(converted)),
            to.symbol
        ),
        is_partial: false,
    })
}

fn lookup(raw: &str) -> Option<&'static UnitDef> {
    let key = raw.trim().to_lowercase();
    let key = key
        .strip_prefix("degrees ")
        .or_else(|| key.strip_prefix("degree "))
        .unwrap_or(&key)
        .trim();
    UNITS.iter().find(|u| {
        u.symbol.to_lowercase() == key || u.aliases.iter().any(|alias| *alias == key)
    })
}

fn convert(value: f64, from: &UnitDef, to: &UnitDef) -> f64 {
    if from.category == Temperature {
        let celsius = match from.symbol {
            "°F" => (value - 32.0) * 5.0 / 9.0,
            "K" => value - 273.15,
            _ => value,
        };
        return match to.symbol {
            "°F" => celsius * 9.0 / 5.0 + 32.0,
            "K" => celsius + 273.15,
            _ => celsius,
        };
    }
    value * from.factor / to.factor
}

/// Keep six significant digits so long fractions stay readable.
fn round_sig(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(5 - magnitude);
    (value * scale).round() / scale
}

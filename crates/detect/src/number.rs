//! Number parsing and display shared by detectors.

/// Parse a number as typed by a user: `42`, `-3.5`, `.5`, `1,000`.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number without float noise (`0.1 + 0.2` shows `0.3`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let abs = value.abs();
    if abs != 0.0 && (abs >= 1e15 || abs < 1e-9) {
        return format!("{value:e}");
    }

    let rounded = (value * 1e10).round() / 1e10;
    let mut text = format!("{rounded:.10}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Round to a fixed number of decimals for money-like values.
pub(crate) fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("1,000.5"), Some(1000.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_format_number_trims_noise() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(3.10686), "3.10686");
        assert_eq!(format_number(1e20), "1e20");
    }
}

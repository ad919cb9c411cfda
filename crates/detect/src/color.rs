//! Color detector: hex, `rgb()`, `hsl()` and CSS color names.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("hex regex")
});

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(0|1|0?\.\d+|1\.0+)\s*)?\)$",
    )
    .expect("rgb regex")
});

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)hsl\(\s*(\d{1,3}(?:\.\d+)?)\s*,\s*(\d{1,3}(?:\.\d+)?)%?\s*,\s*(\d{1,3}(?:\.\d+)?)%?\s*\)$")
        .expect("hsl regex")
});

/// CSS named colors recognized without a prefix.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("aqua", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("fuchsia", (255, 0, 255)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("purple", (128, 0, 128)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("gold", (255, 215, 0)),
    ("indigo", (75, 0, 130)),
    ("violet", (238, 130, 238)),
    ("coral", (255, 127, 80)),
    ("salmon", (250, 128, 114)),
    ("crimson", (220, 20, 60)),
    ("turquoise", (64, 224, 208)),
    ("tomato", (255, 99, 71)),
    ("orchid", (218, 112, 214)),
    ("khaki", (240, 230, 140)),
    ("lavender", (230, 230, 250)),
    ("beige", (245, 245, 220)),
    ("ivory", (255, 255, 240)),
    ("chocolate", (210, 105, 30)),
    ("tan", (210, 180, 140)),
    ("skyblue", (135, 206, 235)),
    ("steelblue", (70, 130, 180)),
    ("slategray", (112, 128, 144)),
    ("rebeccapurple", (102, 51, 153)),
];

/// A parsed color in every notation the overlay offers for copying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorResult {
    pub input: String,
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub display: String,
    pub is_partial: bool,
}

pub fn detect(text: &str) -> Option<ColorResult> {
    let text = text.trim();

    if let Some(caps) = HEX_RE.captures(text) {
        let digits = caps.get(1)?.as_str();
        let (r, g, b, alpha) = parse_hex(digits)?;
        return Some(build(text, r, g, b, alpha, None));
    }

    if let Some(caps) = RGB_RE.captures(text) {
        let r = channel(caps.get(1)?.as_str())?;
        let g = channel(caps.get(2)?.as_str())?;
        let b = channel(caps.get(3)?.as_str())?;
        let alpha = caps.get(4).and_then(|m| m.as_str().parse::<f64>().ok());
        return Some(build(text, r, g, b, alpha, None));
    }

    if let Some(caps) = HSL_RE.captures(text) {
        let h: f64 = caps.get(1)?.as_str().parse().ok()?;
        let s: f64 = caps.get(2)?.as_str().parse().ok()?;
        let l: f64 = caps.get(3)?.as_str().parse().ok()?;
        if h > 360.0 || s > 100.0 || l > 100.0 {
            return None;
        }
        let (r, g, b) = hsl_to_rgb(h, s / 100.0, l / 100.0);
        return Some(build(text, r, g, b, None, None));
    }

    let lowered = text.to_lowercase().replace(' ', "");
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(name, (r, g, b))| build(text, *r, *g, *b, None, Some(name.to_string())))
}

fn channel(raw: &str) -> Option<u8> {
    raw.parse::<u16>().ok().filter(|v| *v <= 255).map(|v| v as u8)
}

fn parse_hex(digits: &str) -> Option<(u8, u8, u8, Option<f64>)> {
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let byte = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    let alpha = if expanded.len() == 8 {
        Some(f64::from(byte(6)?) / 255.0)
    } else {
        None
    };
    Some((byte(0)?, byte(2)?, byte(4)?, alpha))
}

fn build(
    input: &str,
    r: u8,
    g: u8,
    b: u8,
    alpha: Option<f64>,
    name: Option<String>,
) -> ColorResult {
    let (h, s, l) = rgb_to_hsl(r, g, b);
    let hex = format!("#{r:02x}{g:02x}{b:02x}");
    let rgb = match alpha {
        Some(a) => format!("rgba({r}, {g}, {b}, {})", round2(a)),
        None => format!("rgb({r}, {g}, {b})"),
    };
    let hsl = format!("hsl({h}, {s}%, {l}%)");
    let display = format!("{hex} · {rgb} · {hsl}");
    ColorResult {
        input: input.to_string(),
        hex,
        rgb,
        hsl,
        r,
        g,
        b,
        alpha,
        name,
        display,
        is_partial: false,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Returns hue in degrees, saturation and lightness in whole percent.
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return (0, 0, (l * 100.0).round() as u8);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if (max - r).abs() < f64::EPSILON {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) * 60.0
    } else if (max - g).abs() < f64::EPSILON {
        ((b - r) / d + 2.0) * 60.0
    } else {
        ((r - g) / d + 4.0) * 60.0
    };

    (
        (h.round() as u16) % 360,
        (s * 100.0).round() as u8,
        (l * 100.0).round() as u8,
    )
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h / 360.0;
    let to_channel = |t: f64| (hue_to_rgb(p, q, t) * 255.0).round() as u8;
    (
        to_channel(h + 1.0 / 3.0),
        to_channel(h),
        to_channel(h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_hex() {
        let color = detect("#123456").unwrap();
        assert_eq!((color.r, color.g, color.b), (0x12, 0x34, 0x56));
        assert_eq!(color.rgb, "rgb(18, 52, 86)");
        assert!(!color.is_partial);
    }

    #[test]
    fn test_short_hex_expands() {
        let color = detect("#F80").unwrap();
        assert_eq!(color.hex, "#ff8800");
    }

    #[test]
    fn test_hex_with_alpha() {
        let color = detect("#ff000080").unwrap();
        assert_eq!(color.hex, "#ff0000");
        assert_eq!(color.rgb, "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn test_rgb_function() {
        let color = detect("rgb(255, 136, 0)").unwrap();
        assert_eq!(color.hex, "#ff8800");
        assert_eq!(color.hsl, "hsl(32, 100%, 50%)");
    }

    #[test]
    fn test_rgb_out_of_range_is_not_a_color() {
        assert!(detect("rgb(300, 0, 0)").is_none());
    }

    #[test]
    fn test_hsl_function() {
        let color = detect("hsl(0, 100%, 50%)").unwrap();
        assert_eq!(color.hex, "#ff0000");
    }

    #[test]
    fn test_named_color() {
        let color = detect("Teal").unwrap();
        assert_eq!(color.hex, "#008080");
        assert_eq!(color.name.as_deref(), Some("teal"));
    }

    #[test]
    fn test_rejects_other_text() {
        assert!(detect("#12").is_none());
        assert!(detect("#gggggg").is_none());
        assert!(detect("hello").is_none());
    }
}

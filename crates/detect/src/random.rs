//! Random generation: dice, coin flips and number ranges.

use crate::DetectContext;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:roll\s+)?(?:an?\s+)?(\d{0,3})d(\d{1,4})(?:\s*([+-])\s*(\d{1,4}))?$")
        .expect("dice regex")
});

static ROLL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)roll(?:\s+(?:an?|the))?(?:\s+(?:die|dice))?$").expect("roll regex")
});

static COIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:(?:flip|toss)(?:\s+an?)?\s+coin|coin\s*(?:flip|toss)|heads\s+or\s+tails\??)$")
        .expect("coin regex")
});

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)(?:random|rand|pick)(?:\s+(?:a\s+)?number)?(?:\s+(?:between|from))?\s+(-?\d{1,9})\s*(?:-|to|and|\.\.)\s*(-?\d{1,9})$",
    )
    .expect("range regex")
});

static BARE_RANDOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:random|rand)(?:\s+number)?$").expect("bare random regex")
});

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomKind {
    Dice,
    Coin,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomResult {
    pub kind: RandomKind,
    /// Individual outcomes (each die, or the single number; coin is 1/0).
    pub values: Vec<i64>,
    pub total: i64,
    pub display: String,
    pub is_partial: bool,
}

pub fn detect(text: &str, ctx: &DetectContext) -> Option<RandomResult> {
    let text = text.trim();
    let mut rng = StdRng::seed_from_u64(ctx.seed);

    if let Some(caps) = DICE_RE.captures(text) {
        let count = match caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<u32>().ok()?,
            None => 1,
        };
        let sides: u32 = caps.get(2)?.as_str().parse().ok()?;
        let modifier = match (caps.get(3), caps.get(4)) {
            (Some(sign), Some(value)) => {
                let value: i64 = value.as_str().parse().ok()?;
                if sign.as_str() == "-" {
                    -value
                } else {
                    value
                }
            }
            _ => 0,
        };
        return roll(&mut rng, count, sides, modifier);
    }

    if ROLL_RE.is_match(text) {
        return roll(&mut rng, 1, 6, 0);
    }

    if COIN_RE.is_match(text) {
        let heads = rng.gen_bool(0.5);
        return Some(RandomResult {
            kind: RandomKind::Coin,
            values: vec![i64::from(heads)],
            total: i64::from(heads),
            display: if heads { "Heads" } else { "Tails" }.to_string(),
            is_partial: false,
        });
    }

    let (low, high) = if let Some(caps) = RANGE_RE.captures(text) {
        let a: i64 = caps.get(1)?.as_str().parse().ok()?;
        let b: i64 = caps.get(2)?.as_str().parse().ok()?;
        (a.min(b), a.max(b))
    } else if BARE_RANDOM_RE.is_match(text) {
        (1, 100)
    } else {
        return None;
    };

    let value = rng.gen_range(low..=high);
    Some(RandomResult {
        kind: RandomKind::Number,
        values: vec![value],
        total: value,
        display: format!("{value} ({low}–{high})"),
        is_partial: false,
    })
}

fn roll(rng: &mut StdRng, count: u32, sides: u32, modifier: i64) -> Option<RandomResult> {
    if count == 0 || count > MAX_DICE || !(2..=MAX_SIDES).contains(&sides) {
        return None;
    }

    let values: Vec<i64> = (0..count)
        .map(|_| i64::from(rng.gen_range(1..=sides)))
        .collect();
    let sum: i64 = values.iter().sum();
    let total = sum + modifier;

    let notation = match modifier {
        0 => format!("{count}d{sides}"),
        m if m > 0 => format!("{count}d{sides}+{m}"),
        m => format!("{count}d{sides}{m}"),
    };
    let display = if values.len() == 1 && modifier == 0 {
        format!("{notation}: {total}")
    } else {
        let rolls: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        format!("{notation}: [{}] = {total}", rolls.join(", "))
    };

    Some(RandomResult {
        kind: RandomKind::Dice,
        values,
        total,
        display,
        is_partial: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ctx(seed: u64) -> DetectContext {
        DetectContext::new(Utc::now(), seed)
    }

    #[test]
    fn test_dice_in_range() {
        for seed in 0..50 {
            let result = detect("roll 2d6", &ctx(seed)).unwrap();
            assert_eq!(result.kind, RandomKind::Dice);
            assert_eq!(result.values.len(), 2);
            assert!(result.values.iter().all(|v| (1..=6).contains(v)));
            assert!((2..=12).contains(&result.total));
        }
    }

    #[test]
    fn test_dice_modifier() {
        let result = detect("d20+5", &ctx(3)).unwrap();
        assert_eq!(result.total, result.values[0] + 5);
        assert!(result.display.starts_with("1d20+5: "));
    }

    #[test]
    fn test_same_seed_same_roll() {
        let a = detect("roll 3d8", &ctx(42)).unwrap();
        let b = detect("roll 3d8", &ctx(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_coin() {
        let result = detect("flip a coin", &ctx(1)).unwrap();
        assert_eq!(result.kind, RandomKind::Coin);
        assert!(result.display == "Heads" || result.display == "Tails");
        assert!(detect("heads or tails?", &ctx(1)).is_some());
    }

    #[test]
    fn test_number_range_swaps_bounds() {
        for seed in 0..20 {
            let result = detect("random number between 10 and 1", &ctx(seed)).unwrap();
            assert!((1..=10).contains(&result.total));
        }
        let result = detect("random", &ctx(9)).unwrap();
        assert!((1..=100).contains(&result.total));
    }

    #[test]
    fn test_rejects_degenerate_dice() {
        assert!(detect("0d6", &ctx(1)).is_none());
        assert!(detect("d1", &ctx(1)).is_none());
        assert!(detect("roll the bones tonight", &ctx(1)).is_none());
    }
}

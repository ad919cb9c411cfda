//! Auto-detection priority and focused re-detection.

use crate::{
    calculator, color, currency, date, dictionary, random, timer, timezone, translator, units,
    word_count, DetectContext, ModuleId, ModuleResult,
};
use tracing::debug;

/// A detector adapted to the common result type.
pub type Detector = fn(&str, &DetectContext) -> Option<ModuleResult>;

/// Auto-detect chain, tried in order until the first match.
///
/// Narrow grammars come before broad ones. The calculator accepts almost
/// anything numeric, so it is last. The timer is absent: it is only
/// reachable by focusing it from the command palette.
pub const AUTO_DETECT_ORDER: &[(ModuleId, Detector)] = &[
    (ModuleId::Color, detect_color),
    (ModuleId::Units, detect_units),
    (ModuleId::Currency, detect_currency),
    (ModuleId::Timezone, detect_timezone),
    (ModuleId::Date, detect_date),
    (ModuleId::Random, detect_random),
    (ModuleId::Translator, detect_translator),
    (ModuleId::Dictionary, detect_dictionary),
    (ModuleId::WordCount, detect_word_count),
    (ModuleId::Calculator, detect_calculator),
];

/// First match along [`AUTO_DETECT_ORDER`].
pub fn auto_detect(text: &str, ctx: &DetectContext) -> Option<ModuleResult> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (id, result) = AUTO_DETECT_ORDER
        .iter()
        .find_map(|(id, detector)| detector(text, ctx).map(|result| (*id, result)))?;
    debug!(module = %id, partial = result.is_partial(), "Auto-detected module");
    Some(result)
}

/// Run only the focused module's detector, with relaxed triggers.
///
/// `None` means the caller should show a bare placeholder for `id`, not
/// hide the module.
pub fn focused_detect(id: ModuleId, text: &str, ctx: &DetectContext) -> Option<ModuleResult> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match id {
        ModuleId::Timer => timer::detect(text).map(ModuleResult::Timer),
        ModuleId::WordCount => word_count::detect_focused(text).map(ModuleResult::WordCount),
        ModuleId::Dictionary => dictionary::detect_focused(text).map(ModuleResult::Dictionary),
        ModuleId::Translator => {
            translator::detect_focused(text, ctx).map(ModuleResult::Translator)
        }
        other => AUTO_DETECT_ORDER
            .iter()
            .find(|(candidate, _)| *candidate == other)
            .and_then(|(_, detector)| detector(text, ctx)),
    }
}

fn detect_color(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    color::detect(text).map(ModuleResult::Color)
}

fn detect_units(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    units::detect(text).map(ModuleResult::Units)
}

fn detect_currency(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    currency::detect(text).map(ModuleResult::Currency)
}

fn detect_timezone(text: &str, ctx: &DetectContext) -> Option<ModuleResult> {
    timezone::detect(text, ctx).map(ModuleResult::Timezone)
}

fn detect_date(text: &str, ctx: &DetectContext) -> Option<ModuleResult> {
    date::detect(text, ctx).map(ModuleResult::Date)
}

fn detect_random(text: &str, ctx: &DetectContext) -> Option<ModuleResult> {
    random::detect(text, ctx).map(ModuleResult::Random)
}

fn detect_translator(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    translator::detect(text).map(ModuleResult::Translator)
}

fn detect_dictionary(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    dictionary::detect(text).map(ModuleResult::Dictionary)
}

fn detect_word_count(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    word_count::detect(text).map(ModuleResult::WordCount)
}

fn detect_calculator(text: &str, _: &DetectContext) -> Option<ModuleResult> {
    calculator::detect(text).map(ModuleResult::Calculator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> DetectContext {
        DetectContext::new(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(), 7)
    }

    fn detected(text: &str) -> Option<ModuleId> {
        auto_detect(text, &ctx()).map(|r| r.id())
    }

    #[test]
    fn test_order_is_fixed() {
        let order: Vec<ModuleId> = AUTO_DETECT_ORDER.iter().map(|(id, _)| *id).collect();
        assert_eq!(
            order,
            vec![
                ModuleId::Color,
                ModuleId::Units,
                ModuleId::Currency,
                ModuleId::Timezone,
                ModuleId::Date,
                ModuleId::Random,
                ModuleId::Translator,
                ModuleId::Dictionary,
                ModuleId::WordCount,
                ModuleId::Calculator,
            ]
        );
        assert!(!order.contains(&ModuleId::Timer));
    }

    #[test]
    fn test_color_beats_calculator() {
        assert_eq!(detected("#123456"), Some(ModuleId::Color));
        assert_eq!(detected("#123"), Some(ModuleId::Color));
    }

    #[test]
    fn test_routes_each_grammar() {
        assert_eq!(detected("5km to miles"), Some(ModuleId::Units));
        assert_eq!(detected("50 usd to eur"), Some(ModuleId::Currency));
        assert_eq!(detected("3pm est in pst"), Some(ModuleId::Timezone));
        assert_eq!(detected("days until christmas"), Some(ModuleId::Date));
        assert_eq!(detected("roll 2d6"), Some(ModuleId::Random));
        assert_eq!(detected("translate hello to spanish"), Some(ModuleId::Translator));
        assert_eq!(detected("define serendipity"), Some(ModuleId::Dictionary));
        assert_eq!(detected("wc: the quick brown fox"), Some(ModuleId::WordCount));
        assert_eq!(detected("2+2"), Some(ModuleId::Calculator));
    }

    #[test]
    fn test_plain_prose_and_numbers_do_not_match() {
        assert_eq!(detected("hello there"), None);
        assert_eq!(detected("42"), None);
        assert_eq!(detected("   "), None);
        assert_eq!(detected("5m"), None);
    }

    #[test]
    fn test_focused_timer_parses_durations() {
        let result = focused_detect(ModuleId::Timer, "1h30m", &ctx()).unwrap();
        match result {
            ModuleResult::Timer(state) => assert_eq!(state.total_seconds, 5400),
            other => panic!("expected timer, got {other:?}"),
        }
        assert!(focused_detect(ModuleId::Timer, "soon", &ctx()).is_none());
        assert!(focused_detect(ModuleId::Timer, "999999999999999999", &ctx()).is_none());
    }

    #[test]
    fn test_deeply_nested_input_is_no_match() {
        let deep = format!("{}1+1", "(".repeat(3_000));
        assert_eq!(detected(&deep), None);
    }

    #[test]
    fn test_focused_bypasses_chain() {
        // "#123456" would auto-detect as a color.
        assert!(focused_detect(ModuleId::Calculator, "#123456", &ctx()).is_none());
        let result = focused_detect(ModuleId::WordCount, "two words", &ctx()).unwrap();
        assert_eq!(result.id(), ModuleId::WordCount);
        let result = focused_detect(ModuleId::Dictionary, "ephemeral", &ctx()).unwrap();
        assert_eq!(result.id(), ModuleId::Dictionary);
        assert!(result.needs_resolution());
    }

    #[test]
    fn test_focused_translator_uses_default_target() {
        let ctx = ctx().with_default_target_lang("de");
        match focused_detect(ModuleId::Translator, "good morning", &ctx).unwrap() {
            ModuleResult::Translator(r) => {
                assert_eq!(r.target.as_deref(), Some("de"));
                assert_eq!(r.text, "good morning");
            }
            other => panic!("expected translator, got {other:?}"),
        }
    }
}

use crate::{
    CalculatorResult, ColorResult, CurrencyResult, DateResult, DictionaryResult, ModuleId,
    RandomResult, TimezoneResult, TranslatorResult, UnitsResult, WordCountResult,
};
use contour_timer::TimerState;
use serde::{Deserialize, Serialize};

/// A detection result. The variant always matches the module that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module", content = "result", rename_all = "kebab-case")]
pub enum ModuleResult {
    Calculator(CalculatorResult),
    Units(UnitsResult),
    Currency(CurrencyResult),
    Timezone(TimezoneResult),
    Color(ColorResult),
    Date(DateResult),
    Timer(TimerState),
    Random(RandomResult),
    WordCount(WordCountResult),
    Translator(TranslatorResult),
    Dictionary(DictionaryResult),
}

impl ModuleResult {
    pub fn id(&self) -> ModuleId {
        match self {
            ModuleResult::Calculator(_) => ModuleId::Calculator,
            ModuleResult::Units(_) => ModuleId::Units,
            ModuleResult::Currency(_) => ModuleId::Currency,
            ModuleResult::Timezone(_) => ModuleId::Timezone,
            ModuleResult::Color(_) => ModuleId::Color,
            ModuleResult::Date(_) => ModuleId::Date,
            ModuleResult::Timer(_) => ModuleId::Timer,
            ModuleResult::Random(_) => ModuleId::Random,
            ModuleResult::WordCount(_) => ModuleId::WordCount,
            ModuleResult::Translator(_) => ModuleId::Translator,
            ModuleResult::Dictionary(_) => ModuleId::Dictionary,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            ModuleResult::Calculator(r) => &r.display,
            ModuleResult::Units(r) => &r.display,
            ModuleResult::Currency(r) => &r.display,
            ModuleResult::Timezone(r) => &r.display,
            ModuleResult::Color(r) => &r.display,
            ModuleResult::Date(r) => &r.display,
            ModuleResult::Timer(r) => &r.display,
            ModuleResult::Random(r) => &r.display,
            ModuleResult::WordCount(r) => &r.display,
            ModuleResult::Translator(r) => &r.display,
            ModuleResult::Dictionary(r) => &r.display,
        }
    }

    /// Recognized shape without a final value. Partial results are hints,
    /// not copy targets.
    pub fn is_partial(&self) -> bool {
        match self {
            ModuleResult::Calculator(r) => r.is_partial,
            ModuleResult::Units(r) => r.is_partial,
            ModuleResult::Currency(r) => r.is_partial,
            ModuleResult::Timezone(r) => r.is_partial,
            ModuleResult::Color(r) => r.is_partial,
            ModuleResult::Date(r) => r.is_partial,
            ModuleResult::Timer(_) => false,
            ModuleResult::Random(r) => r.is_partial,
            ModuleResult::WordCount(r) => r.is_partial,
            ModuleResult::Translator(r) => r.is_partial,
            ModuleResult::Dictionary(r) => r.is_partial,
        }
    }

    /// True when the result is complete enough to hand to a resolver.
    pub fn needs_resolution(&self) -> bool {
        match self {
            ModuleResult::Currency(r) => r.needs_resolution(),
            ModuleResult::Translator(r) => r.needs_resolution(),
            ModuleResult::Dictionary(r) => r.needs_resolution(),
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            ModuleResult::Currency(r) => r.is_loading,
            ModuleResult::Translator(r) => r.is_loading,
            ModuleResult::Dictionary(r) => r.is_loading,
            _ => false,
        }
    }

    /// Flag a result that is about to be resolved.
    pub fn mark_loading(&mut self) {
        match self {
            ModuleResult::Currency(r) => r.is_loading = true,
            ModuleResult::Translator(r) => r.is_loading = true,
            ModuleResult::Dictionary(r) => r.is_loading = true,
            _ => {}
        }
    }

    /// Record a failed resolution on resolvable results.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        match self {
            ModuleResult::Currency(r) => ModuleResult::Currency(r.with_error(message)),
            ModuleResult::Translator(r) => ModuleResult::Translator(r.with_error(message)),
            ModuleResult::Dictionary(r) => ModuleResult::Dictionary(r.with_error(message)),
            other => other,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModuleResult::Currency(r) => r.error.as_deref(),
            ModuleResult::Translator(r) => r.error.as_deref(),
            ModuleResult::Dictionary(r) => r.error.as_deref(),
            _ => None,
        }
    }

    /// The value a host would put on the clipboard, if the result has one.
    pub fn copy_value(&self) -> Option<String> {
        if self.is_partial() {
            return None;
        }
        let value = match self {
            ModuleResult::Calculator(r) => crate::format_number(r.value),
            ModuleResult::Color(r) => r.hex.clone(),
            ModuleResult::Translator(r) => r.translated.clone()?,
            ModuleResult::Timer(_) => return None,
            other => other.display().to_string(),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_matches_variant() {
        let result = ModuleResult::Color(crate::color::detect("#ff0000").unwrap());
        assert_eq!(result.id(), ModuleId::Color);
        assert!(!result.is_partial());
        assert_eq!(result.copy_value().as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_mark_loading_only_touches_resolvable_results() {
        let mut currency =
            ModuleResult::Currency(crate::currency::detect("50 usd to eur").unwrap());
        assert!(currency.needs_resolution());
        currency.mark_loading();
        assert!(currency.is_loading());

        let mut calc = ModuleResult::Calculator(crate::calculator::detect("2+2").unwrap());
        calc.mark_loading();
        assert!(!calc.is_loading());
        assert!(!calc.needs_resolution());
    }

    #[test]
    fn test_serializes_with_module_tag() {
        let result = ModuleResult::Timer(TimerState::new(60, None));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["module"], "timer");
        assert_eq!(json["result"]["total_seconds"], 60);
    }
}

//! Module identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the embedded tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleId {
    Calculator,
    Units,
    Currency,
    Timezone,
    Color,
    Date,
    Timer,
    Random,
    WordCount,
    Translator,
    Dictionary,
}

impl ModuleId {
    pub const ALL: [ModuleId; 11] = [
        ModuleId::Calculator,
        ModuleId::Units,
        ModuleId::Currency,
        ModuleId::Timezone,
        ModuleId::Color,
        ModuleId::Date,
        ModuleId::Timer,
        ModuleId::Random,
        ModuleId::WordCount,
        ModuleId::Translator,
        ModuleId::Dictionary,
    ];

    /// Stable identifier, also used as the command handler id.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModuleId::Calculator => "calculator",
            ModuleId::Units => "units",
            ModuleId::Currency => "currency",
            ModuleId::Timezone => "timezone",
            ModuleId::Color => "color",
            ModuleId::Date => "date",
            ModuleId::Timer => "timer",
            ModuleId::Random => "random",
            ModuleId::WordCount => "word-count",
            ModuleId::Translator => "translator",
            ModuleId::Dictionary => "dictionary",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleId::Calculator => "Calculator",
            ModuleId::Units => "Unit Converter",
            ModuleId::Currency => "Currency Converter",
            ModuleId::Timezone => "Timezone Converter",
            ModuleId::Color => "Color",
            ModuleId::Date => "Date Calculator",
            ModuleId::Timer => "Timer",
            ModuleId::Random => "Random",
            ModuleId::WordCount => "Word Count",
            ModuleId::Translator => "Translator",
            ModuleId::Dictionary => "Dictionary",
        }
    }

    /// Placeholder shown by a focused module with no usable input yet.
    pub fn hint(&self) -> &'static str {
        match self {
            ModuleId::Calculator => "Type an expression, e.g. 2 * (3 + 4)",
            ModuleId::Units => "Try 5 km to miles",
            ModuleId::Currency => "Try 50 USD to EUR",
            ModuleId::Timezone => "Try 3pm EST in PST or now in Tokyo",
            ModuleId::Color => "Try #ff8800, rgb(255, 136, 0) or teal",
            ModuleId::Date => "Try days until christmas or 10 days from now",
            ModuleId::Timer => "Type a duration: 5m, 1h30m, 90s or 10:00",
            ModuleId::Random => "Try roll 2d6, flip a coin or random 1-100",
            ModuleId::WordCount => "Type or paste text to count",
            ModuleId::Translator => "Type text, optionally followed by to <language>",
            ModuleId::Dictionary => "Type a word to define",
        }
    }

    /// Whether results from this module are completed asynchronously.
    pub fn needs_resolver(&self) -> bool {
        matches!(
            self,
            ModuleId::Currency | ModuleId::Translator | ModuleId::Dictionary
        )
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a handler id names no module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModule(pub String);

impl std::fmt::Display for UnknownModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown module: {}", self.0)
    }
}

impl std::error::Error for UnknownModule {}

impl FromStr for ModuleId {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ModuleId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

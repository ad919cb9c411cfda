//! Input detectors for Contour.
//!
//! Each module has one pure detector: trimmed composer text in, typed result
//! or `None` out. Detectors never perform I/O. Results that need network
//! data (currency, translation, dictionary) come back partial and are
//! completed by `contour-resolve`.
//!
//! # Priority
//!
//! Auto-detection walks [`AUTO_DETECT_ORDER`] and returns the first match.
//! Narrow grammars come first so that the catch-all calculator never
//! shadows them (a hex color like `#123456` looks numeric).
//!
//! ```ignore
//! use contour_detect::{auto_detect, DetectContext, ModuleId};
//!
//! let ctx = DetectContext::now();
//! let result = auto_detect("5km to miles", &ctx).unwrap();
//! assert_eq!(result.id(), ModuleId::Units);
//! ```

mod context;
mod module;
mod number;
mod pipeline;
mod result;

pub mod calculator;
pub mod color;
pub mod currency;
pub mod date;
pub mod dictionary;
pub mod random;
pub mod timer;
pub mod timezone;
pub mod translator;
pub mod units;
pub mod word_count;

pub use context::DetectContext;
pub use module::{ModuleId, UnknownModule};
pub use number::format_number;
pub use pipeline::{auto_detect, focused_detect, Detector, AUTO_DETECT_ORDER};
pub use result::ModuleResult;

pub use calculator::CalculatorResult;
pub use color::ColorResult;
pub use currency::CurrencyResult;
pub use date::DateResult;
pub use dictionary::{DictionaryResult, Meaning};
pub use random::{RandomKind, RandomResult};
pub use timezone::TimezoneResult;
pub use translator::TranslatorResult;
pub use units::{UnitCategory, UnitsResult};
pub use word_count::WordCountResult;

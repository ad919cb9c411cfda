//! The Contour engine: input classification and embedded tools for a chat
//! composer.
//!
//! The host calls [`Contour::analyze`] on every composer change and renders
//! the returned [`ContourState`]. Network-backed modules resolve in the
//! background; the countdown timer ticks on its own interval. Both report
//! back through the injected event bus.
//!
//! ```ignore
//! let contour = Contour::builder(ContourConfig::default(), resolvers)
//!     .event_bus(bus)
//!     .build();
//! let state = contour.analyze("5km to miles");
//! assert_eq!(state.mode, ContourMode::Module);
//! ```

mod clipboard;
mod config;
mod contour;
mod environment;
mod error;
pub mod generation;
mod state;

pub use clipboard::{ClipboardSink, MemoryClipboard, NullClipboard};
pub use config::{ContourConfig, DEFAULT_COMMAND_TRIGGER, DEFAULT_TIMER_TICK_MS};
pub use contour::{CommandOutcome, Contour, ContourBuilder};
pub use environment::{Environment, FixedEnvironment, SystemEnvironment};
pub use error::{ClipboardError, ConfigError};
pub use state::{ContourMode, ContourState, ModuleData};

pub use contour_commands::{Command, CommandAction, CommandCategory, CommandHandler};
pub use contour_detect::{ModuleId, ModuleResult};
pub use contour_resolve::{Endpoints, Resolvers};
pub use contour_timer::{TimerPhase, TimerState};

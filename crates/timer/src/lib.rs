//! Countdown timer for the embedded timer module.
//!
//! The state transitions (`tick`, `start`, `toggle`, `reset`) are pure and
//! live in [`state`]. Interval registration is kept apart in [`scheduler`]
//! so the transition logic can be tested without a clock.

mod scheduler;
mod state;

pub use scheduler::{TickControl, TimerScheduler, DEFAULT_TICK_PERIOD};
pub use state::{format_duration, tick, Tick, TimerPhase, TimerState};

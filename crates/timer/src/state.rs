//! Timer state and pure transitions.

use serde::{Deserialize, Serialize};

/// Lifecycle phase derived from a [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Snapshot of a countdown.
///
/// `progress` is `remaining_seconds / total_seconds` and only ever moves
/// towards zero while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub is_running: bool,
    /// Started and then paused. Cleared by resume and reset.
    #[serde(default)]
    pub is_paused: bool,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub display: String,
    pub progress: f64,
}

/// Result of applying one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub state: TimerState,
    /// True only on the tick that reached zero.
    pub completed: bool,
}

impl TimerState {
    /// Create an idle timer. A zero duration is immediately complete.
    pub fn new(total_seconds: u64, label: Option<String>) -> Self {
        let mut state = Self {
            total_seconds,
            remaining_seconds: total_seconds,
            is_running: false,
            is_paused: false,
            is_complete: total_seconds == 0,
            label,
            display: String::new(),
            progress: 0.0,
        };
        state.refresh();
        state
    }

    pub fn phase(&self) -> TimerPhase {
        if self.is_complete {
            TimerPhase::Complete
        } else if self.is_running {
            TimerPhase::Running
        } else if self.is_paused {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    /// Replace the duration. Only honored while idle and for positive values.
    pub fn set_duration(&mut self, seconds: u64) -> bool {
        if seconds == 0 || self.phase() != TimerPhase::Idle {
            return false;
        }
        self.total_seconds = seconds;
        self.remaining_seconds = seconds;
        self.refresh();
        true
    }

    /// `idle -> running`. Returns false when the timer was not idle.
    pub fn start(&mut self) -> bool {
        if self.phase() != TimerPhase::Idle {
            return false;
        }
        self.is_running = true;
        true
    }

    /// `running -> paused` or `paused -> running`.
    pub fn toggle(&mut self) -> bool {
        match self.phase() {
            TimerPhase::Running => {
                self.is_running = false;
                self.is_paused = true;
                true
            }
            TimerPhase::Paused => {
                self.is_running = true;
                self.is_paused = false;
                true
            }
            TimerPhase::Idle | TimerPhase::Complete => false,
        }
    }

    /// Back to idle with the full duration remaining.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.is_running = false;
        self.is_paused = false;
        self.is_complete = self.total_seconds == 0;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.display = format_duration(self.remaining_seconds);
        self.progress = if self.total_seconds == 0 {
            0.0
        } else {
            self.remaining_seconds as f64 / self.total_seconds as f64
        };
    }
}

/// Apply one second to a running timer.
///
/// Non-running and already complete timers come back unchanged.
pub fn tick(state: &TimerState) -> Tick {
    let mut next = state.clone();
    if !state.is_running || state.is_complete {
        return Tick {
            state: next,
            completed: false,
        };
    }

    next.remaining_seconds = state.remaining_seconds.saturating_sub(1);
    let completed = next.remaining_seconds == 0;
    if completed {
        next.is_running = false;
        next.is_complete = true;
    }
    next.refresh();

    Tick {
        state: next,
        completed,
    }
}

/// `MM:SS` below an hour, `H:MM:SS` above.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_idle() {
        let timer = TimerState::new(90, None);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_seconds, 90);
        assert_eq!(timer.display, "01:30");
        assert_eq!(timer.progress, 1.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let timer = TimerState::new(0, None);
        assert!(timer.is_complete);
        assert_eq!(timer.phase(), TimerPhase::Complete);
        assert_eq!(timer.progress, 0.0);
    }

    #[test]
    fn test_set_duration_rejects_zero_and_non_idle() {
        let mut timer = TimerState::new(60, None);
        assert!(!timer.set_duration(0));
        assert_eq!(timer.total_seconds, 60);

        timer.start();
        assert!(!timer.set_duration(30));
        assert_eq!(timer.total_seconds, 60);
    }

    #[test]
    fn test_reset_set_reset_is_idempotent() {
        let mut timer = TimerState::new(60, None);
        timer.start();
        let timer_after = tick(&timer).state;
        let mut timer = timer_after;

        timer.reset();
        assert!(timer.set_duration(45));
        timer.reset();

        assert_eq!(timer.remaining_seconds, 45);
        assert_eq!(timer.total_seconds, 45);
        assert!(!timer.is_running);
        assert!(!timer.is_complete);
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let mut timer = TimerState::new(10, None);
        assert!(!timer.toggle());
        timer.start();
        timer = tick(&timer).state;

        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert_eq!(timer.remaining_seconds, 9);

        let paused = tick(&timer);
        assert_eq!(paused.state.remaining_seconds, 9);

        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_pause_before_first_tick_can_resume() {
        let mut timer = TimerState::new(60, None);
        assert!(timer.start());

        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert_eq!(timer.remaining_seconds, 60);
        assert!(!timer.set_duration(30));
        assert!(!timer.start());

        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert!(timer.is_running);

        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert!(timer.set_duration(30));
    }

    #[test]
    fn test_completion_raised_exactly_once() {
        let mut timer = TimerState::new(3, Some("tea".to_string()));
        timer.start();

        let mut completions = 0;
        let mut last_progress = timer.progress;
        for _ in 0..(3 + 5) {
            let step = tick(&timer);
            if step.completed {
                completions += 1;
                assert!(!step.state.is_running);
            }
            assert!(step.state.progress <= last_progress);
            last_progress = step.state.progress;
            timer = step.state;
        }

        assert_eq!(completions, 1);
        assert!(timer.is_complete);
        assert_eq!(timer.remaining_seconds, 0);
        assert_eq!(timer.display, "00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(5400), "1:30:00");
    }
}

//! Interval registration for the countdown.
//!
//! Holds at most one tokio task. Starting always aborts the previous task
//! before spawning the next one.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default cadence of the countdown.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Returned by the tick callback to keep or end the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Owner of the single interval handle.
#[derive(Debug)]
pub struct TimerScheduler {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

impl TimerScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the interval. The first tick fires one period from now.
    ///
    /// Returns false, and registers nothing, outside a tokio runtime.
    pub fn start<F>(&mut self, mut on_tick: F) -> bool
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        self.clear();

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime, timer interval not started");
            return false;
        };

        let period = self.period;
        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if on_tick() == TickControl::Stop {
                    break;
                }
            }
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "timer interval started");
        self.handle = Some(handle);
        true
    }

    /// Abort the interval if one is registered.
    pub fn clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("timer interval cleared");
        }
    }

    /// Forget the handle without aborting.
    ///
    /// Used from inside the tick callback, where the task is about to return
    /// on its own.
    pub fn release(&mut self) {
        self.handle = None;
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let mut scheduler = TimerScheduler::default();
        let started = scheduler.start(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });
        assert!(started);
        assert!(scheduler.is_active());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        scheduler.clear();
        assert!(!scheduler.is_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_supersedes_previous_interval() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut scheduler = TimerScheduler::default();
        let first_clone = Arc::clone(&first);
        scheduler.start(move || {
            first_clone.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });
        let second_clone = Arc::clone(&second);
        scheduler.start(move || {
            second_clone.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let mut scheduler = TimerScheduler::default();
        scheduler.start(move || {
            let n = count_clone.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 2 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!scheduler.is_active());
    }

    #[test]
    fn test_start_outside_runtime_is_refused() {
        let mut scheduler = TimerScheduler::default();
        assert!(!scheduler.start(|| TickControl::Continue));
        assert!(!scheduler.is_active());
    }
}

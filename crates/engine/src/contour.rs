//! The Contour state machine.
//!
//! [`Contour`] owns the [`ContourState`] and is the only thing that writes
//! it. Keystrokes arrive through [`Contour::analyze`]; resolver results and
//! timer ticks re-enter through private continuations that take the same
//! lock. Every call returns a fresh snapshot and emits
//! `contour:state_changed` when something visible changed.

use crate::generation::{apply_resolution, Channel, Generations, Ticket};
use crate::{
    ClipboardSink, ContourConfig, ContourMode, ContourState, Environment, ModuleData,
    NullClipboard, SystemEnvironment,
};
use contour_commands::{flatten, search_commands, Command, CommandAction, CommandHandler};
use contour_detect::{auto_detect, focused_detect, DetectContext, ModuleId, ModuleResult};
use contour_events::{
    emit_serialized, event_names, CommandActionEvent, CopiedEvent, EventBusRef, NullEventBus,
    TimerCompletedEvent,
};
use contour_resolve::{resolve, Resolvers};
use contour_timer::{tick, Tick, TickControl, TimerPhase, TimerScheduler, TimerState};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, warn};

/// What [`Contour::execute_selected`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The module is now open in focused mode.
    Focused(ModuleId),
    /// The host should perform this action. The palette was dismissed.
    Action(CommandAction),
}

/// Handle to the engine. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct Contour {
    inner: Arc<Inner>,
}

pub struct ContourBuilder {
    config: ContourConfig,
    resolvers: Resolvers,
    bus: Option<EventBusRef>,
    clipboard: Option<Arc<dyn ClipboardSink>>,
    environment: Option<Arc<dyn Environment>>,
}

impl ContourBuilder {
    pub fn event_bus(mut self, bus: EventBusRef) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn build(self) -> Contour {
        let scheduler = TimerScheduler::new(self.config.timer_tick());
        Contour {
            inner: Arc::new(Inner {
                config: self.config,
                resolvers: self.resolvers,
                bus: self.bus.unwrap_or_else(|| Arc::new(NullEventBus)),
                clipboard: self.clipboard.unwrap_or_else(|| Arc::new(NullClipboard)),
                environment: self
                    .environment
                    .unwrap_or_else(|| Arc::new(SystemEnvironment)),
                core: Mutex::new(Core {
                    state: ContourState::hidden(),
                    generations: Generations::default(),
                    timer_generation: 0,
                    scheduler,
                }),
            }),
        }
    }
}

struct Inner {
    config: ContourConfig,
    resolvers: Resolvers,
    bus: EventBusRef,
    clipboard: Arc<dyn ClipboardSink>,
    environment: Arc<dyn Environment>,
    core: Mutex<Core>,
}

struct Core {
    state: ContourState,
    generations: Generations,
    /// Bumped whenever the interval is cleared; ticks from an older
    /// interval are ignored.
    timer_generation: u64,
    scheduler: TimerScheduler,
}

/// Events collected under the lock and emitted after it is released.
#[derive(Default)]
struct Outbox(Vec<(&'static str, serde_json::Value)>);

impl Outbox {
    fn push<T: Serialize + ?Sized>(&mut self, topic: &'static str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.0.push((topic, value)),
            Err(e) => warn!(topic, error = %e, "Failed to serialize event payload"),
        }
    }

    fn state(&mut self, state: &ContourState) {
        self.push(event_names::STATE_CHANGED, state);
    }
}

impl Contour {
    pub fn builder(config: ContourConfig, resolvers: Resolvers) -> ContourBuilder {
        ContourBuilder {
            config,
            resolvers,
            bus: None,
            clipboard: None,
            environment: None,
        }
    }

    pub fn new(config: ContourConfig, resolvers: Resolvers) -> Self {
        Self::builder(config, resolvers).build()
    }

    pub fn config(&self) -> &ContourConfig {
        &self.inner.config
    }

    /// Current snapshot.
    pub fn state(&self) -> ContourState {
        self.inner.lock().state.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lock().state.is_visible()
    }

    pub fn is_focused(&self) -> bool {
        self.inner.lock().state.is_focused()
    }

    pub fn selected_command(&self) -> Option<Command> {
        self.inner.lock().state.selected_command().copied()
    }

    /// Re-classify the composer contents.
    ///
    /// Called by the host on every content change. Detection is synchronous;
    /// a result that needs remote data is returned in its loading state and
    /// completed later.
    pub fn analyze(&self, text: &str) -> ContourState {
        let text = text.trim();
        let ctx = self
            .inner
            .environment
            .detect_context(&self.inner.config.default_target_lang);
        let trigger = self.inner.config.command_trigger;

        let mut pending = None;
        let snapshot = self.update(|core, _| {
            if core.timer_is_running() {
                debug!("Timer running, ignoring input");
                return false;
            }
            core.generations.invalidate_all();
            core.stop_timer();
            core.state = next_state(&core.state, text, trigger, &ctx);
            pending = core.begin_resolution();
            true
        });

        if let Some((ticket, partial)) = pending {
            self.spawn_resolution(ticket, partial);
        }
        snapshot
    }

    pub fn select_up(&self) -> ContourState {
        self.update(|core, _| step(core, -1))
    }

    pub fn select_down(&self) -> ContourState {
        self.update(|core, _| step(core, 1))
    }

    /// Select a palette entry directly. Out-of-range indices are ignored.
    pub fn select_index(&self, index: usize) -> ContourState {
        self.update(|core, _| {
            if core.state.mode != ContourMode::Commands || index >= core.state.commands.len() {
                return false;
            }
            core.state.selected_index = index;
            true
        })
    }

    /// Run the selected palette entry.
    pub fn execute_selected(&self) -> Option<CommandOutcome> {
        let command = self.selected_command()?;
        match command.handler {
            CommandHandler::Module(id) => {
                self.focus_module(id);
                Some(CommandOutcome::Focused(id))
            }
            CommandHandler::Action(action) => {
                info!(command = command.id, action = action.as_str(), "Command action");
                self.dismiss();
                emit_serialized(
                    self.inner.bus.as_ref(),
                    event_names::COMMAND_ACTION,
                    &CommandActionEvent {
                        command_id: command.id.to_string(),
                        action: action.as_str().to_string(),
                    },
                );
                Some(CommandOutcome::Action(action))
            }
        }
    }

    /// Open a module in focused mode by its handler id, e.g. `"timer"`.
    /// Unknown ids leave the state untouched.
    pub fn focus_on_module(&self, handler_id: &str) -> ContourState {
        match handler_id.parse::<ModuleId>() {
            Ok(id) => self.focus_module(id),
            Err(e) => {
                warn!(handler_id, error = %e, "Cannot focus unknown module");
                self.state()
            }
        }
    }

    pub fn focus_module(&self, id: ModuleId) -> ContourState {
        self.update(|core, _| {
            core.stop_timer();
            core.generations.invalidate_all();
            core.state = ContourState::with_module(ModuleData::focused(id, None));
            info!(module = %id, "Focused module");
            true
        })
    }

    /// Back to hidden. Clears any running interval and supersedes pending
    /// resolutions.
    pub fn dismiss(&self) -> ContourState {
        self.update(|core, _| {
            core.stop_timer();
            core.generations.invalidate_all();
            core.state = ContourState::hidden();
            info!("Dismissed");
            true
        })
    }

    /// `idle -> running`.
    pub fn start_timer(&self) -> ContourState {
        self.update(|core, inner| {
            let Some(timer) = core.state.timer_mut() else {
                debug!("No timer to start");
                return false;
            };
            if !timer.start() {
                debug!(phase = ?timer.phase(), "Timer is not idle");
                return false;
            }
            info!(total_seconds = timer.total_seconds, label = ?timer.label, "Timer started");
            core.run_timer(inner, TimerState::reset);
            true
        })
    }

    /// `running -> paused` or `paused -> running`.
    pub fn toggle_timer(&self) -> ContourState {
        self.update(|core, inner| {
            let Some(phase) = core.state.timer().map(TimerState::phase) else {
                debug!("No timer to toggle");
                return false;
            };
            match phase {
                TimerPhase::Running => {
                    core.stop_timer();
                    if let Some(timer) = core.state.timer_mut() {
                        timer.toggle();
                        info!(remaining_seconds = timer.remaining_seconds, "Timer paused");
                    }
                }
                TimerPhase::Paused => {
                    if let Some(timer) = core.state.timer_mut() {
                        timer.toggle();
                        info!(remaining_seconds = timer.remaining_seconds, "Timer resumed");
                    }
                    core.run_timer(inner, |timer| {
                        timer.toggle();
                    });
                }
                TimerPhase::Idle | TimerPhase::Complete => {
                    debug!(?phase, "Timer toggle ignored");
                    return false;
                }
            }
            true
        })
    }

    pub fn reset_timer(&self) -> ContourState {
        self.update(|core, _| {
            core.stop_timer();
            let Some(timer) = core.state.timer_mut() else {
                return false;
            };
            timer.reset();
            info!(total_seconds = timer.total_seconds, "Timer reset");
            true
        })
    }

    /// Set the duration of an idle timer, creating one on a bare focused
    /// timer module. Zero is ignored.
    pub fn set_timer_duration(&self, seconds: u64) -> ContourState {
        self.update(|core, _| {
            let Some(module) = core
                .state
                .module
                .as_mut()
                .filter(|m| m.id == ModuleId::Timer)
            else {
                debug!("No timer module");
                return false;
            };
            if seconds == 0 {
                debug!("Ignoring zero timer duration");
                return false;
            }
            if module.timer().is_none() {
                module.result = Some(ModuleResult::Timer(TimerState::new(seconds, None)));
                return true;
            }
            module.timer_mut().is_some_and(|timer| timer.set_duration(seconds))
        })
    }

    /// Hand a value to the host clipboard.
    pub fn on_copy_value(&self, text: &str) -> bool {
        match self.inner.clipboard.set_text(text) {
            Ok(()) => {
                debug!(chars = text.chars().count(), "Copied value");
                emit_serialized(
                    self.inner.bus.as_ref(),
                    event_names::COPIED,
                    &CopiedEvent {
                        text: text.to_string(),
                    },
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Copy failed");
                false
            }
        }
    }

    /// Copy the active module's value, if it has a final one.
    pub fn copy_current(&self) -> Option<String> {
        let value = self.state().result().and_then(ModuleResult::copy_value)?;
        self.on_copy_value(&value).then_some(value)
    }

    fn update<F>(&self, f: F) -> ContourState
    where
        F: FnOnce(&mut Core, &Weak<Inner>) -> bool,
    {
        let weak = Arc::downgrade(&self.inner);
        let mut outbox = Outbox::default();
        let snapshot = {
            let mut guard = self.inner.lock();
            let core = &mut *guard;
            if f(core, &weak) {
                outbox.state(&core.state);
            }
            core.state.clone()
        };
        self.inner.flush(outbox);
        snapshot
    }

    fn spawn_resolution(&self, ticket: Ticket, partial: ModuleResult) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(channel = ?ticket.channel, "No async runtime, cannot resolve");
            self.inner
                .apply_resolved(ticket, partial.with_error("Lookup unavailable"));
            return;
        };

        debug!(channel = ?ticket.channel, generation = ticket.generation, "Resolution started");
        let inner = Arc::clone(&self.inner);
        runtime.spawn(async move {
            let resolved = resolve(&inner.resolvers, partial).await;
            inner.apply_resolved(ticket, resolved);
        });
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, outbox: Outbox) {
        for (topic, payload) in outbox.0 {
            self.bus.emit(topic, payload);
        }
    }

    fn apply_resolved(&self, ticket: Ticket, resolved: ModuleResult) {
        let mut outbox = Outbox::default();
        {
            let mut guard = self.lock();
            let core = &mut *guard;
            match apply_resolution(&core.state, &core.generations, ticket, resolved) {
                Some(next) => {
                    debug!(
                        channel = ?ticket.channel,
                        generation = ticket.generation,
                        "Applied resolution"
                    );
                    core.state = next;
                    outbox.state(&core.state);
                }
                None => warn!(
                    channel = ?ticket.channel,
                    generation = ticket.generation,
                    current = core.generations.current(ticket.channel),
                    "Discarding stale resolution"
                ),
            }
        }
        self.flush(outbox);
    }

    fn on_tick(&self, generation: u64) -> TickControl {
        let mut outbox = Outbox::default();
        let control = {
            let mut guard = self.lock();
            let core = &mut *guard;
            if core.timer_generation != generation {
                return TickControl::Stop;
            }
            let Some(current) = core.state.timer().filter(|t| t.is_running) else {
                core.scheduler.release();
                return TickControl::Stop;
            };

            let Tick { state: next, completed } = tick(current);
            outbox.push(event_names::TIMER_TICK, &next);
            if completed {
                core.scheduler.release();
                info!(label = ?next.label, total_seconds = next.total_seconds, "Timer complete");
                outbox.push(
                    event_names::TIMER_COMPLETED,
                    &TimerCompletedEvent {
                        label: next.label.clone(),
                        total_seconds: next.total_seconds,
                    },
                );
            }
            if let Some(slot) = core.state.timer_mut() {
                *slot = next;
            }
            outbox.state(&core.state);

            if completed {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        };
        self.flush(outbox);
        control
    }
}

impl Core {
    fn timer_is_running(&self) -> bool {
        self.state.is_focused() && self.state.timer().is_some_and(|t| t.is_running)
    }

    /// Clear the interval and orphan any tick already in flight.
    fn stop_timer(&mut self) {
        self.scheduler.clear();
        self.timer_generation += 1;
    }

    /// Start the interval for a timer already marked running. `undo` puts
    /// the timer back if no interval could be started.
    fn run_timer(&mut self, inner: &Weak<Inner>, undo: fn(&mut TimerState)) {
        self.timer_generation += 1;
        let generation = self.timer_generation;
        let inner = Weak::clone(inner);
        let started = self.scheduler.start(move || match inner.upgrade() {
            Some(inner) => inner.on_tick(generation),
            None => TickControl::Stop,
        });
        if !started {
            if let Some(timer) = self.state.timer_mut() {
                undo(timer);
            }
        }
    }

    /// Flag the active result as loading and capture a ticket for it.
    fn begin_resolution(&mut self) -> Option<(Ticket, ModuleResult)> {
        let module = self.state.module.as_mut()?;
        let channel = Channel::for_module(module.id)?;
        let result = module.result.as_mut()?;
        if !result.needs_resolution() {
            return None;
        }
        result.mark_loading();
        let partial = result.clone();
        Some((self.generations.begin(channel), partial))
    }
}

fn step(core: &mut Core, delta: isize) -> bool {
    if core.state.mode != ContourMode::Commands || core.state.commands.is_empty() {
        return false;
    }
    core.state.step_selection(delta);
    true
}

/// The synchronous part of `analyze`.
fn next_state(
    current: &ContourState,
    text: &str,
    trigger: char,
    ctx: &DetectContext,
) -> ContourState {
    if let Some(module) = current.module.as_ref().filter(|m| m.focused) {
        let result = focused_detect(module.id, text, ctx);
        return ContourState::with_module(ModuleData::focused(module.id, result));
    }
    if text.is_empty() {
        return ContourState::hidden();
    }
    if let Some(query) = text.strip_prefix(trigger) {
        let query = query.trim();
        return ContourState::with_commands(query, flatten(&search_commands(query)));
    }
    match auto_detect(text, ctx) {
        Some(result) => ContourState::with_module(ModuleData::detected(result)),
        None => ContourState::hidden(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> DetectContext {
        DetectContext::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(), 1)
    }

    #[test]
    fn test_next_state_routes_by_shape() {
        let hidden = ContourState::hidden();

        let state = next_state(&hidden, "/", '/', &ctx());
        assert_eq!(state.mode, ContourMode::Commands);
        assert_eq!(state.selected_index, 0);

        let state = next_state(&hidden, "2+2", '/', &ctx());
        assert_eq!(state.module_id(), Some(ModuleId::Calculator));
        assert!(!state.is_focused());

        assert_eq!(next_state(&hidden, "", '/', &ctx()), ContourState::hidden());
        assert_eq!(next_state(&hidden, "hello", '/', &ctx()), ContourState::hidden());
    }

    #[test]
    fn test_focused_is_sticky() {
        let focused = ContourState::with_module(ModuleData::focused(ModuleId::Calculator, None));

        let state = next_state(&focused, "#123456", '/', &ctx());
        assert_eq!(state.module_id(), Some(ModuleId::Calculator));
        assert!(state.result().is_none());

        let state = next_state(&focused, "", '/', &ctx());
        assert!(state.is_focused());
        assert_eq!(state.mode, ContourMode::Module);

        let state = next_state(&focused, "/", '/', &ctx());
        assert!(state.is_focused());
    }

    #[test]
    fn test_custom_trigger() {
        let state = next_state(&ContourState::hidden(), ">tim", '>', &ctx());
        assert_eq!(state.mode, ContourMode::Commands);
        assert_eq!(state.command_query, "tim");
    }
}

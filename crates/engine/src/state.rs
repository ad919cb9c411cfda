//! Externally visible engine state.

use contour_commands::Command;
use contour_detect::{ModuleId, ModuleResult};
use contour_timer::TimerState;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContourMode {
    #[default]
    Hidden,
    Commands,
    Module,
}

/// The active module. `result` is `None` for a focused module whose input
/// does not (yet) match, which renders as a placeholder hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleData {
    pub id: ModuleId,
    pub focused: bool,
    pub result: Option<ModuleResult>,
}

impl ModuleData {
    pub fn detected(result: ModuleResult) -> Self {
        Self {
            id: result.id(),
            focused: false,
            result: Some(result),
        }
    }

    pub fn focused(id: ModuleId, result: Option<ModuleResult>) -> Self {
        Self {
            id,
            focused: true,
            result,
        }
    }

    pub fn timer(&self) -> Option<&TimerState> {
        match &self.result {
            Some(ModuleResult::Timer(timer)) => Some(timer),
            _ => None,
        }
    }

    pub fn timer_mut(&mut self) -> Option<&mut TimerState> {
        match &mut self.result {
            Some(ModuleResult::Timer(timer)) => Some(timer),
            _ => None,
        }
    }
}

/// Snapshot handed to the host after every operation.
///
/// `module` is meaningful in [`ContourMode::Module`], `commands`,
/// `command_query` and `selected_index` in [`ContourMode::Commands`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContourState {
    pub mode: ContourMode,
    pub module: Option<ModuleData>,
    /// Matching commands, flattened in grouped order.
    pub commands: Vec<Command>,
    pub command_query: String,
    pub selected_index: usize,
}

impl ContourState {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn with_module(module: ModuleData) -> Self {
        Self {
            mode: ContourMode::Module,
            module: Some(module),
            ..Self::default()
        }
    }

    pub fn with_commands(query: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            mode: ContourMode::Commands,
            module: None,
            commands,
            command_query: query.into(),
            selected_index: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.mode != ContourMode::Hidden
    }

    pub fn is_focused(&self) -> bool {
        self.mode == ContourMode::Module && self.module.as_ref().is_some_and(|m| m.focused)
    }

    pub fn selected_command(&self) -> Option<&Command> {
        if self.mode != ContourMode::Commands {
            return None;
        }
        self.commands.get(self.selected_index)
    }

    pub fn module_id(&self) -> Option<ModuleId> {
        self.module.as_ref().map(|m| m.id)
    }

    pub fn result(&self) -> Option<&ModuleResult> {
        self.module.as_ref().and_then(|m| m.result.as_ref())
    }

    pub fn timer(&self) -> Option<&TimerState> {
        self.module.as_ref().and_then(ModuleData::timer)
    }

    pub(crate) fn timer_mut(&mut self) -> Option<&mut TimerState> {
        self.module.as_mut().and_then(ModuleData::timer_mut)
    }

    /// Move the selection by `delta` with wraparound. No-op on an empty list.
    pub(crate) fn step_selection(&mut self, delta: isize) {
        let len = self.commands.len();
        if len == 0 {
            return;
        }
        let current = self.selected_index.min(len - 1) as isize;
        self.selected_index = (current + delta).rem_euclid(len as isize) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_commands::{flatten, search_commands};

    fn palette() -> ContourState {
        ContourState::with_commands("", flatten(&search_commands("")))
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut state = palette();
        let len = state.commands.len();

        state.step_selection(-1);
        assert_eq!(state.selected_index, len - 1);
        state.step_selection(1);
        assert_eq!(state.selected_index, 0);

        for _ in 0..len {
            state.step_selection(1);
        }
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_selection_on_empty_list_is_noop() {
        let mut state = ContourState::with_commands("zzz", Vec::new());
        state.step_selection(1);
        state.step_selection(-1);
        assert_eq!(state.selected_index, 0);
        assert!(state.selected_command().is_none());
    }

    #[test]
    fn test_focus_flags() {
        let state = ContourState::with_module(ModuleData::focused(ModuleId::Timer, None));
        assert!(state.is_visible());
        assert!(state.is_focused());
        assert!(state.timer().is_none());
        assert!(!ContourState::hidden().is_visible());
    }

    #[test]
    fn test_serializes_mode_lowercase() {
        let json = serde_json::to_value(palette()).unwrap();
        assert_eq!(json["mode"], "commands");
        assert_eq!(json["selected_index"], 0);
    }
}

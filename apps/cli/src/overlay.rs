//! Plain-text rendering of the engine state.

use contour_engine::{ContourMode, ContourState, ModuleData, ModuleResult, TimerPhase, TimerState};
use std::fmt::Write;

const BAR_WIDTH: usize = 24;

pub fn render(state: &ContourState) -> String {
    match state.mode {
        ContourMode::Hidden => String::new(),
        ContourMode::Commands => render_commands(state),
        ContourMode::Module => state.module.as_ref().map(render_module).unwrap_or_default(),
    }
}

fn render_commands(state: &ContourState) -> String {
    let mut out = String::new();
    if state.commands.is_empty() {
        let _ = writeln!(out, "No commands match \"{}\"", state.command_query);
        return out;
    }

    let mut category = None;
    for (index, command) in state.commands.iter().enumerate() {
        if category != Some(command.category) {
            category = Some(command.category);
            let _ = writeln!(out, "{}", command.category.label());
        }
        let marker = if index == state.selected_index { '>' } else { ' ' };
        let _ = writeln!(out, " {marker} {:<20} {}", command.name, command.description);
    }
    out
}

fn render_module(module: &ModuleData) -> String {
    let mut out = String::new();
    let focus = if module.focused { " (focused)" } else { "" };
    let _ = writeln!(out, "[{}]{focus}", module.id.label());

    let Some(result) = &module.result else {
        let _ = writeln!(out, "  {}", module.id.hint());
        return out;
    };

    if let ModuleResult::Timer(timer) = result {
        render_timer(&mut out, timer);
        return out;
    }

    let prefix = if result.is_partial() { "  … " } else { "  = " };
    let _ = write!(out, "{prefix}{}", result.display());
    if result.is_loading() {
        out.push_str("  (loading)");
    }
    out.push('\n');
    if let Some(error) = result.error() {
        let _ = writeln!(out, "  ! {error}");
    }

    match result {
        ModuleResult::Units(r) if !r.suggestions.is_empty() => {
            let _ = writeln!(out, "  to: {}", r.suggestions.join(", "));
        }
        ModuleResult::Dictionary(r) if !r.meanings.is_empty() => {
            if let Some(phonetic) = &r.phonetic {
                let _ = writeln!(out, "  {phonetic}");
            }
            for meaning in &r.meanings {
                let _ = writeln!(out, "  {}", meaning.part_of_speech);
                for (n, definition) in meaning.definitions.iter().enumerate() {
                    let _ = writeln!(out, "    {}. {definition}", n + 1);
                }
            }
        }
        ModuleResult::Random(r) if r.values.len() > 1 => {
            let values: Vec<String> = r.values.iter().map(i64::to_string).collect();
            let _ = writeln!(out, "  rolls: {}", values.join(" "));
        }
        _ => {}
    }
    out
}

fn render_timer(out: &mut String, timer: &TimerState) {
    let filled = ((1.0 - timer.progress) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let status = match timer.phase() {
        TimerPhase::Idle => "ready, :start to begin",
        TimerPhase::Running => "running",
        TimerPhase::Paused => "paused",
        TimerPhase::Complete => "done",
    };
    let label = timer.label.as_deref().map(|l| format!(" {l}")).unwrap_or_default();
    let _ = writeln!(out, "  {}{label}  [{bar}]  {status}", timer.display);
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_engine::ModuleId;

    #[test]
    fn test_hidden_renders_nothing() {
        assert_eq!(render(&ContourState::hidden()), "");
    }

    #[test]
    fn test_focused_placeholder_shows_hint() {
        let state = ContourState::with_module(ModuleData::focused(ModuleId::Timer, None));
        let text = render(&state);
        assert!(text.starts_with("[Timer] (focused)"));
        assert!(text.contains(ModuleId::Timer.hint()));
    }

    #[test]
    fn test_timer_bar() {
        let mut timer = TimerState::new(4, Some("tea".into()));
        timer.start();
        let state = ContourState::with_module(ModuleData::focused(
            ModuleId::Timer,
            Some(ModuleResult::Timer(timer)),
        ));
        let text = render(&state);
        assert!(text.contains("00:04 tea"));
        assert!(text.contains(&"-".repeat(BAR_WIDTH)));
        assert!(text.contains("running"));
    }
}

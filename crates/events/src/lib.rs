//! Event contracts between the Contour engine and its host.
//!
//! Payload DTOs live here so that producers and consumers agree on field
//! names. The `contour:state_changed` and `contour:timer_tick` payloads are
//! the serialized engine state and timer state respectively.

mod bus;

pub use bus::{emit_serialized, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use serde::{Deserialize, Serialize};

/// Emitted exactly once when a countdown reaches zero.
///
/// Producers: engine timer
/// Consumers: host (local notification)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerCompletedEvent {
    #[serde(default)]
    pub label: Option<String>,
    pub total_seconds: u64,
}

/// Emitted after a value was handed to the clipboard sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopiedEvent {
    pub text: String,
}

/// Emitted when the palette selection is a direct action rather than a module.
///
/// Producers: engine command palette
/// Consumers: host (navigation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandActionEvent {
    /// Command id from the registry.
    pub command_id: String,
    /// Action identifier, e.g. `new-chat`.
    pub action: String,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Engine state changed. Payload: serialized `ContourState`.
    pub const STATE_CHANGED: &str = "contour:state_changed";
    /// Timer advanced one tick. Payload: serialized `TimerState`.
    pub const TIMER_TICK: &str = "contour:timer_tick";
    /// Timer reached zero.
    pub const TIMER_COMPLETED: &str = "contour:timer_completed";
    /// Value copied.
    pub const COPIED: &str = "contour:copied";
    /// Palette action requested.
    pub const COMMAND_ACTION: &str = "contour:command_action";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_completed_deserialize_minimal() {
        let json = r#"{"total_seconds": 300}"#;
        let event: TimerCompletedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.total_seconds, 300);
        assert_eq!(event.label, None);
    }

    #[test]
    fn test_command_action_roundtrip_names() {
        let event = CommandActionEvent {
            command_id: "new-chat".into(),
            action: "new-chat".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["command_id"], "new-chat");
    }
}

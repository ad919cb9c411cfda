//! Event bus abstraction for notifying the host.
//!
//! The engine never talks to a UI directly. It emits named JSON events
//! through an [`EventBus`], which a host forwards however it likes and
//! tests capture with [`InMemoryEventBus`].

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Sink for engine notifications.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name, one of [`crate::event_names`]
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// Serialize `payload` and emit it. Serialization failures are logged and
/// the event is dropped.
pub fn emit_serialized<T: Serialize + ?Sized>(bus: &dyn EventBus, topic: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => bus.emit(topic, value),
        Err(e) => warn!(topic, error = %e, "Failed to serialize event payload"),
    }
}

/// A captured event from [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// In-memory event bus for tests and headless hosts.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<EmittedEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All captured events, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.guard().clone()
    }

    /// Captured events for one topic.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.guard()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Most recent payload for a topic.
    pub fn last_for(&self, topic: &str) -> Option<serde_json::Value> {
        self.guard()
            .iter()
            .rev()
            .find(|e| e.topic == topic)
            .map(|e| e.payload.clone())
    }

    pub fn count_for(&self, topic: &str) -> usize {
        self.guard().iter().filter(|e| e.topic == topic).count()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.guard().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// Event bus that discards everything.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_event_bus() {
        let bus = InMemoryEventBus::new();

        bus.emit("contour:a", json!({"n": 1}));
        bus.emit("contour:b", json!({"n": 2}));
        bus.emit("contour:a", json!({"n": 3}));

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.count_for("contour:a"), 2);
        assert_eq!(bus.events_for("contour:b").len(), 1);
        assert_eq!(bus.count_for("contour:missing"), 0);
        assert_eq!(bus.last_for("contour:a"), Some(json!({"n": 3})));
    }

    #[test]
    fn test_clear() {
        let bus = InMemoryEventBus::new();
        bus.emit("contour:a", json!({}));
        assert!(!bus.is_empty());

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_emit_serialized() {
        #[derive(Serialize)]
        struct Payload {
            text: &'static str,
        }

        let bus = InMemoryEventBus::new();
        emit_serialized(&bus, "contour:copied", &Payload { text: "42" });
        assert_eq!(bus.last_for("contour:copied"), Some(json!({"text": "42"})));
    }

    #[test]
    fn test_null_event_bus() {
        NullEventBus.emit("contour:a", json!({"data": "ignored"}));
    }
}

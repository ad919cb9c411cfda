//! Event bus that forwards engine events into the input loop.

use contour_events::EventBus;
use tokio::sync::mpsc;

pub struct ChannelEventBus {
    tx: mpsc::UnboundedSender<(String, serde_json::Value)>,
}

impl ChannelEventBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, serde_json::Value)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventBus for ChannelEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        // The receiver is gone only during shutdown.
        let _ = self.tx.send((topic.to_string(), payload));
    }
}

//! Host clipboard seam.

use crate::ClipboardError;
use std::sync::Mutex;

/// Where copied values go. Provided by the host.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Drops everything. Used when the host has no clipboard.
pub struct NullClipboard;

impl ClipboardSink for NullClipboard {
    fn set_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Ok(())
    }
}

/// Keeps every copied value, for tests and headless hosts.
#[derive(Default)]
pub struct MemoryClipboard {
    copied: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.copied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }

    pub fn all(&self) -> Vec<String> {
        self.copied.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.copied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(text.to_string());
        Ok(())
    }
}

//! ClipboardSink implementation using arboard.

use contour_engine::{ClipboardError, ClipboardSink};

pub struct PlatformClipboard;

impl ClipboardSink for PlatformClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

//! Clipboard writes backed by the `arboard` crate.
//!
//! A short-lived [`arboard::Clipboard`] handle is created per call rather than
//! shared, because `arboard::Clipboard` is not `Send` on all platforms.

use arboard::Clipboard;

use super::OutputError;

/// Something that can receive the "copy result" action.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), OutputError>;
}

/// The OS clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// [`OutputError::ClipboardAccess`] if the clipboard cannot be opened,
    /// [`OutputError::ClipboardSet`] if writing fails.
    fn write_text(&self, text: &str) -> Result<(), OutputError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| OutputError::ClipboardAccess(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| OutputError::ClipboardSet(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clipboard_is_object_safe() {
        let writer: Box<dyn ClipboardWriter> = Box::new(SystemClipboard);
        drop(writer);
    }
}

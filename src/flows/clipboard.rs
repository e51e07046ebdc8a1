use crate::error::ClipboardError;

/// Text clipboard the vote link is copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Last text written, when the backend can report it.
    fn contents(&self) -> Option<&str> {
        None
    }
}

/// Process-local clipboard; the terminal UI shows its contents.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

//! Clipboard collaborator. The framework only reads and writes strings;
//! environments without a clipboard fall back to an in-process buffer.

use anyhow::Result;

pub trait Clipboard {
    fn read(&mut self) -> Result<String>;
    fn write(&mut self, text: &str) -> Result<()>;
}

/// OS clipboard via `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Fails on headless/clipboard-less environments; callers fall back to
    /// [`MemoryClipboard`].
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new()?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn read(&mut self) -> Result<String> {
        Ok(self.inner.get_text()?)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }
}

/// In-process clipboard used in tests and as the headless fallback.
#[derive(Default)]
pub struct MemoryClipboard {
    buffer: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Result<String> {
        Ok(self.buffer.clone())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.buffer = text.to_string();
        Ok(())
    }
}

/// System clipboard when available, otherwise in-memory.
pub fn open_clipboard() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(clip) => Box::new(clip),
        Err(err) => {
            log::warn!("system clipboard unavailable ({err}); using in-memory fallback");
            Box::new(MemoryClipboard::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips() {
        let mut clip = MemoryClipboard::new();
        assert_eq!(clip.read().unwrap(), "");
        clip.write("copied").unwrap();
        assert_eq!(clip.read().unwrap(), "copied");
        clip.write("again").unwrap();
        assert_eq!(clip.read().unwrap(), "again");
    }
}

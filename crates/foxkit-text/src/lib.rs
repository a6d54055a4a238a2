//! foxkit-text: font caching, text measurement, caret motion, clipboard.

mod caret;
mod clipboard;
mod font;
mod measure;

pub use caret::{next_grapheme_boundary, prev_grapheme_boundary};
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard, open_clipboard};
pub use font::{FontError, FontHandle, FontManager, SYSTEM_FONT_CANDIDATES, register_system_fallback};
pub use measure::{MonoMeasure, TextMeasure};

pub use foxkit_core::FontStyle;

//! Width measurement seam between widgets and the font cache.

use unicode_segmentation::UnicodeSegmentation;

use crate::font::FontManager;
use foxkit_core::FontStyle;

/// Measures rendered text width in logical pixels. Widgets depend on this
/// trait rather than on [`FontManager`] directly so layout logic stays
/// testable without font files.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32) -> f32;

    /// Caret byte index nearest to `x`, half-advance rule.
    fn caret_index_for_x(&self, text: &str, size: f32, x: f32) -> usize {
        let mut acc = 0.0f32;
        for (idx, g) in text.grapheme_indices(true) {
            let w = self.width(g, size);
            if x < acc + w * 0.5 {
                return idx;
            }
            acc += w;
        }
        text.len()
    }
}

impl TextMeasure for FontManager {
    fn width(&self, text: &str, size: f32) -> f32 {
        match self.get("sans", size, FontStyle::Regular) {
            Ok(handle) => handle.measure_width(text),
            // Measurement degrades to an estimate rather than failing a frame.
            Err(_) => MonoMeasure::default().width(text, size),
        }
    }

    fn caret_index_for_x(&self, text: &str, size: f32, x: f32) -> usize {
        match self.get("sans", size, FontStyle::Regular) {
            Ok(handle) => handle.caret_index_for_x(text, x),
            Err(_) => MonoMeasure::default().caret_index_for_x(text, size, x),
        }
    }
}

/// Fixed-advance measurement: every grapheme is `factor * size` wide.
/// Used in tests and as the degraded path when no font is registered.
#[derive(Clone, Copy, Debug)]
pub struct MonoMeasure {
    pub factor: f32,
}

impl Default for MonoMeasure {
    fn default() -> Self {
        Self { factor: 0.55 }
    }
}

impl TextMeasure for MonoMeasure {
    fn width(&self, text: &str, size: f32) -> f32 {
        text.graphemes(true).count() as f32 * self.factor * size
    }
}

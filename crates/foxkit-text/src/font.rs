//! Rendered-font cache keyed by (family, size, style).
//!
//! Entries are created lazily on first request and live for the process
//! lifetime (the scene set uses a finite handful of fonts); `clear` exists
//! for explicit invalidation, e.g. a UI-scale change.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use fontdue::{Font, FontSettings};
use unicode_segmentation::UnicodeSegmentation;

use foxkit_core::FontStyle;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("invalid font data for family `{family}`: {reason}")]
    InvalidFont { family: String, reason: String },
    #[error("no font registered for family `{family}`")]
    UnknownFamily { family: String },
    #[error("failed to read font file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    // Size quantized to quarter pixels so f32 sizes hash cleanly.
    size_q: u32,
    style: FontStyle,
}

impl FontKey {
    fn new(family: &str, size: f32, style: FontStyle) -> Self {
        Self {
            family: family.to_string(),
            size_q: (size.max(1.0) * 4.0).round() as u32,
            style,
        }
    }
}

/// A font fixed at one pixel size. Cheap to clone via `Arc`; measurement
/// helpers are what the widget layer uses for caret math.
pub struct FontHandle {
    font: Arc<Font>,
    family: String,
    style: FontStyle,
    size: f32,
    ascent: f32,
    line_height: f32,
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("style", &self.style)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl FontHandle {
    fn new(font: Arc<Font>, family: String, style: FontStyle, size: f32) -> Self {
        let (ascent, line_height) = match font.horizontal_line_metrics(size) {
            Some(m) => (m.ascent, m.new_line_size),
            // Degenerate fonts: fall back to size-derived estimates.
            None => (size * 0.8, size * 1.2),
        };
        Self {
            font,
            family,
            style,
            size,
            ascent,
            line_height,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Advance width of a string at this handle's size.
    pub fn measure_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, self.size).advance_width)
            .sum()
    }

    /// Map an x offset (relative to the text origin) to the nearest caret
    /// byte index, using the half-advance rule per grapheme cluster.
    pub fn caret_index_for_x(&self, text: &str, x: f32) -> usize {
        let mut acc = 0.0f32;
        for (idx, g) in text.grapheme_indices(true) {
            let w: f32 = g
                .chars()
                .map(|ch| self.font.metrics(ch, self.size).advance_width)
                .sum();
            if x < acc + w * 0.5 {
                return idx;
            }
            acc += w;
        }
        text.len()
    }
}

/// Process-wide cache of [`FontHandle`]s. All mutation goes through `&self`
/// methods so the single-threaded draw phase observes a consistent snapshot.
pub struct FontManager {
    sources: Mutex<HashMap<(String, FontStyle), Arc<Font>>>,
    cache: Mutex<HashMap<FontKey, Arc<FontHandle>>>,
    fallback: Mutex<Option<String>>,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            sources: Mutex::new(HashMap::new()),
            cache: Mutex::new(HashMap::new()),
            fallback: Mutex::new(None),
        }
    }

    /// Parse and register raw font bytes under a family/style. The first
    /// registered family becomes the fallback unless one was set explicitly.
    pub fn register(
        &self,
        family: &str,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<(), FontError> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|reason| {
            FontError::InvalidFont {
                family: family.to_string(),
                reason: reason.to_string(),
            }
        })?;
        let mut sources = self.sources.lock().expect("font sources lock");
        sources.insert((family.to_string(), style), Arc::new(font));

        let mut fallback = self.fallback.lock().expect("font fallback lock");
        if fallback.is_none() {
            *fallback = Some(family.to_string());
        }
        Ok(())
    }

    pub fn register_file(
        &self,
        family: &str,
        style: FontStyle,
        path: &Path,
    ) -> Result<(), FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.register(family, style, data)
    }

    /// Family used when a requested family has no registration.
    pub fn set_fallback_family(&self, family: &str) {
        *self.fallback.lock().expect("font fallback lock") = Some(family.to_string());
    }

    /// Cached handle for (family, size, style); inserted on first miss.
    /// Identical keys return the same `Arc`, never re-rasterizing.
    pub fn get(
        &self,
        family: &str,
        size: f32,
        style: FontStyle,
    ) -> Result<Arc<FontHandle>, FontError> {
        let key = FontKey::new(family, size, style);
        {
            let cache = self.cache.lock().expect("font cache lock");
            if let Some(handle) = cache.get(&key) {
                return Ok(handle.clone());
            }
        }

        let font = self.resolve(family, style)?;
        let handle = Arc::new(FontHandle::new(
            font,
            family.to_string(),
            style,
            size.max(1.0),
        ));
        let mut cache = self.cache.lock().expect("font cache lock");
        // Another caller may have inserted while we parsed; keep the first.
        Ok(cache.entry(key).or_insert(handle).clone())
    }

    /// Drop all cached handles. Registered sources stay.
    pub fn clear(&self) {
        self.cache.lock().expect("font cache lock").clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().expect("font cache lock").len()
    }

    /// Resolution order: exact (family, style) → (family, Regular) →
    /// fallback family with the same two steps.
    fn resolve(&self, family: &str, style: FontStyle) -> Result<Arc<Font>, FontError> {
        let sources = self.sources.lock().expect("font sources lock");
        let lookup = |fam: &str| -> Option<Arc<Font>> {
            sources
                .get(&(fam.to_string(), style))
                .or_else(|| sources.get(&(fam.to_string(), FontStyle::Regular)))
                .cloned()
        };

        if let Some(font) = lookup(family) {
            return Ok(font);
        }
        let fallback = self.fallback.lock().expect("font fallback lock");
        if let Some(fb) = fallback.as_deref() {
            if fb != family {
                if let Some(font) = lookup(fb) {
                    log::debug!("font family `{family}` not registered, using `{fb}`");
                    return Ok(font);
                }
            }
        }
        Err(FontError::UnknownFamily {
            family: family.to_string(),
        })
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Well-known system font locations, tried in order. Mirrors the candidate
/// list approach used for CJK-capable UI fonts.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register the first system font that parses under the given family.
pub fn register_system_fallback(fonts: &FontManager, family: &str) -> Result<(), FontError> {
    for candidate in SYSTEM_FONT_CANDIDATES {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match fonts.register_file(family, FontStyle::Regular, path) {
            Ok(()) => {
                log::info!("registered system font {candidate} as `{family}`");
                return Ok(());
            }
            Err(err) => log::debug!("skipping font candidate {candidate}: {err}"),
        }
    }
    Err(FontError::UnknownFamily {
        family: family.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_system_font() -> Option<FontManager> {
        let fonts = FontManager::new();
        register_system_fallback(&fonts, "sans").ok()?;
        Some(fonts)
    }

    #[test]
    fn unknown_family_without_fallback_errors() {
        let fonts = FontManager::new();
        let err = fonts.get("nope", 16.0, FontStyle::Regular).unwrap_err();
        assert!(matches!(err, FontError::UnknownFamily { .. }));
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let fonts = FontManager::new();
        let err = fonts
            .register("bad", FontStyle::Regular, vec![0u8; 16])
            .unwrap_err();
        assert!(matches!(err, FontError::InvalidFont { .. }));
    }

    #[test]
    fn identical_keys_share_one_handle() {
        let Some(fonts) = manager_with_system_font() else {
            // No system fonts in this environment; nothing to rasterize.
            return;
        };
        let a = fonts.get("sans", 16.0, FontStyle::Regular).unwrap();
        let b = fonts.get("sans", 16.0, FontStyle::Regular).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fonts.cached_len(), 1);

        let c = fonts.get("sans", 18.0, FontStyle::Regular).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(fonts.cached_len(), 2);
    }

    #[test]
    fn unregistered_family_falls_back() {
        let Some(fonts) = manager_with_system_font() else {
            return;
        };
        let handle = fonts.get("made-up", 14.0, FontStyle::Bold).unwrap();
        assert_eq!(handle.family(), "made-up");
        assert!(handle.measure_width("hello") > 0.0);
    }

    #[test]
    fn clear_drops_cache_but_not_sources() {
        let Some(fonts) = manager_with_system_font() else {
            return;
        };
        fonts.get("sans", 16.0, FontStyle::Regular).unwrap();
        fonts.clear();
        assert_eq!(fonts.cached_len(), 0);
        assert!(fonts.get("sans", 16.0, FontStyle::Regular).is_ok());
    }

    #[test]
    fn caret_index_uses_half_advance() {
        let Some(fonts) = manager_with_system_font() else {
            return;
        };
        let handle = fonts.get("sans", 16.0, FontStyle::Regular).unwrap();
        assert_eq!(handle.caret_index_for_x("abc", -5.0), 0);
        let full = handle.measure_width("abc");
        assert_eq!(handle.caret_index_for_x("abc", full + 10.0), 3);
    }
}

//! Theme palettes and the manager that swaps between them.
//!
//! Widgets never cache colors. They read the palette each draw, so a theme
//! switch takes effect on the very next frame. The manager keeps a revision
//! counter so scenes that do precompute something theme-derived (background
//! gradients, cached layouts) can detect the change cheaply.

use foxkit_core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeId {
    Dark,
    Light,
}

impl ThemeId {
    pub fn from_name(name: &str) -> Option<ThemeId> {
        match name {
            "dark" => Some(ThemeId::Dark),
            "light" => Some(ThemeId::Light),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeId::Dark => "dark",
            ThemeId::Light => "light",
        }
    }
}

/// Button fill per interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonColors {
    pub normal: Color,
    pub hover: Color,
    pub active: Color,
    pub disabled: Color,
}

/// Full color set for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub panel_border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub selection: Color,
    pub button: ButtonColors,
}

impl Palette {
    pub fn dark() -> Palette {
        Palette {
            bg: Color::rgba(18, 18, 24, 255),
            panel: Color::rgba(30, 30, 40, 255),
            panel_border: Color::rgba(70, 70, 90, 255),
            text: Color::rgba(235, 235, 245, 255),
            text_muted: Color::rgba(150, 150, 165, 255),
            accent: Color::rgba(110, 160, 255, 255),
            selection: Color::rgba(110, 160, 255, 90),
            button: ButtonColors {
                normal: Color::rgba(52, 52, 70, 255),
                hover: Color::rgba(68, 68, 92, 255),
                active: Color::rgba(90, 120, 200, 255),
                disabled: Color::rgba(40, 40, 50, 255),
            },
        }
    }

    pub fn light() -> Palette {
        Palette {
            bg: Color::rgba(240, 240, 245, 255),
            panel: Color::rgba(255, 255, 255, 255),
            panel_border: Color::rgba(190, 190, 205, 255),
            text: Color::rgba(25, 25, 35, 255),
            text_muted: Color::rgba(110, 110, 125, 255),
            accent: Color::rgba(40, 90, 200, 255),
            selection: Color::rgba(40, 90, 200, 70),
            button: ButtonColors {
                normal: Color::rgba(225, 225, 232, 255),
                hover: Color::rgba(210, 210, 222, 255),
                active: Color::rgba(170, 195, 245, 255),
                disabled: Color::rgba(235, 235, 238, 255),
            },
        }
    }

    pub fn for_theme(id: ThemeId) -> Palette {
        match id {
            ThemeId::Dark => Palette::dark(),
            ThemeId::Light => Palette::light(),
        }
    }
}

/// Owns the active palette. `set_theme` is the only mutation path; every
/// actual change bumps the revision.
pub struct ThemeManager {
    current: ThemeId,
    palette: Palette,
    revision: u64,
}

impl ThemeManager {
    pub fn new(id: ThemeId) -> ThemeManager {
        ThemeManager {
            current: id,
            palette: Palette::for_theme(id),
            revision: 0,
        }
    }

    pub fn current(&self) -> ThemeId {
        self.current
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_theme(&mut self, id: ThemeId) {
        if id == self.current {
            return;
        }
        log::info!("theme switched to `{}`", id.name());
        self.current = id;
        self.palette = Palette::for_theme(id);
        self.revision += 1;
    }

    pub fn toggle(&mut self) {
        let next = match self.current {
            ThemeId::Dark => ThemeId::Light,
            ThemeId::Light => ThemeId::Dark,
        };
        self.set_theme(next);
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        ThemeManager::new(ThemeId::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_theme_bumps_revision_only_on_change() {
        let mut themes = ThemeManager::new(ThemeId::Dark);
        assert_eq!(themes.revision(), 0);
        themes.set_theme(ThemeId::Dark);
        assert_eq!(themes.revision(), 0);
        themes.set_theme(ThemeId::Light);
        assert_eq!(themes.revision(), 1);
        assert_eq!(themes.palette().bg, Palette::light().bg);
    }

    #[test]
    fn toggle_cycles_between_themes() {
        let mut themes = ThemeManager::new(ThemeId::Light);
        themes.toggle();
        assert_eq!(themes.current(), ThemeId::Dark);
        themes.toggle();
        assert_eq!(themes.current(), ThemeId::Light);
        assert_eq!(themes.revision(), 2);
    }

    #[test]
    fn theme_names_round_trip() {
        for id in [ThemeId::Dark, ThemeId::Light] {
            assert_eq!(ThemeId::from_name(id.name()), Some(id));
        }
        assert_eq!(ThemeId::from_name("solarized"), None);
    }
}

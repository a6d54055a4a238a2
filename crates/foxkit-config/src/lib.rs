//! Foxkit configuration system
//!
//! Loads settings from `foxkit.toml` with environment-variable overrides,
//! and persists mutable user state (username, theme, recents, window
//! preferences) as JSON under the platform data directory.

mod state;

pub use state::{UserState, UserStateStore, WindowPreferences};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for the Foxkit app.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub theme: ThemeConfig,
    pub assets: AssetConfig,
    pub extract: ExtractConfig,
}

/// Window and frame-loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Logical design resolution; scenes lay out against this.
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    /// 1.0 = 100%, 1.25 = 125%, etc.
    pub ui_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Initial theme name ("dark", "light").
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Root directory for images/fonts/sounds.
    pub dir: PathBuf,
    /// Optional explicit UI font file; system candidates are tried otherwise.
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Where completed extractions are written.
    pub output_dir: PathBuf,
    /// Scene shown first; "login" unless overridden.
    pub initial_scene: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Foxkit".to_string(),
            resizable: false,
            ui_scale: 1.0,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "dark".to_string(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            font: None,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            initial_scene: "login".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from `foxkit.toml` in the current directory, or defaults if the
    /// file doesn't exist.
    pub fn load_or_default() -> Self {
        match Self::load_from_file("foxkit.toml") {
            Ok(config) => config,
            Err(err) => {
                log::debug!("no usable foxkit.toml ({err}); using defaults");
                Self::default()
            }
        }
    }

    /// Environment variables take precedence over file values, allowing
    /// temporary overrides without editing the config file.
    pub fn merge_with_env(&mut self) {
        if let Ok(name) = std::env::var("FOXKIT_THEME") {
            self.theme.name = name;
        }
        if let Ok(scene) = std::env::var("FOXKIT_SCENE") {
            self.extract.initial_scene = scene;
        }
        if let Ok(dir) = std::env::var("FOXKIT_ASSET_DIR") {
            self.assets.dir = PathBuf::from(dir);
        }
        if let Ok(font) = std::env::var("FOXKIT_FONT") {
            self.assets.font = Some(PathBuf::from(font));
        }
        if let Ok(dir) = std::env::var("FOXKIT_OUTPUT_DIR") {
            self.extract.output_dir = PathBuf::from(dir);
        }
        if let Ok(val) = std::env::var("FOXKIT_RESIZABLE") {
            self.window.resizable = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("FOXKIT_UI_SCALE") {
            if let Ok(scale) = val.parse::<f32>() {
                if scale.is_finite() && scale > 0.0 {
                    self.window.ui_scale = scale;
                }
            }
        }
    }

    /// Recommended entry point: file (or defaults), then env overrides.
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.theme.name, "dark");
        assert_eq!(config.extract.initial_scene, "login");
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.window.title, "Foxkit");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: AppConfig = toml::from_str("[theme]\nname = \"light\"\n").unwrap();
        assert_eq!(parsed.theme.name, "light");
        assert_eq!(parsed.window.width, 1280);
    }

    #[test]
    fn merge_with_env() {
        unsafe {
            std::env::set_var("FOXKIT_THEME", "light");
            std::env::set_var("FOXKIT_UI_SCALE", "1.25");
        }

        let mut config = AppConfig::default();
        config.merge_with_env();

        assert_eq!(config.theme.name, "light");
        assert_eq!(config.window.ui_scale, 1.25);

        unsafe {
            std::env::remove_var("FOXKIT_THEME");
            std::env::remove_var("FOXKIT_UI_SCALE");
        }
    }

    #[test]
    fn bad_ui_scale_is_ignored() {
        unsafe {
            std::env::set_var("FOXKIT_UI_SCALE", "-3");
        }
        let mut config = AppConfig::default();
        config.merge_with_env();
        assert_eq!(config.window.ui_scale, 1.0);
        unsafe {
            std::env::remove_var("FOXKIT_UI_SCALE");
        }
    }
}

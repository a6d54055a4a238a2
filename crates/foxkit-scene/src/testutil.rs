//! Shared fixtures for scene-level tests.

use foxkit_config::{AppConfig, UserStateStore};
use foxkit_core::Viewport;
use foxkit_io::{AssetLoader, ThreadExtractor};
use foxkit_text::{FontManager, MemoryClipboard};

use crate::scene::{SceneRequests, SceneServices};
use crate::theme::{ThemeId, ThemeManager};

/// Owns every collaborator a [`SceneServices`] borrows. Tests create one
/// harness and borrow services from it per call.
pub struct Harness {
    pub viewport: Viewport,
    pub config: AppConfig,
    pub fonts: FontManager,
    pub theme: ThemeManager,
    pub clipboard: MemoryClipboard,
    pub assets: AssetLoader,
    pub user_state: UserStateStore,
    pub extractor: ThreadExtractor,
    pub requests: SceneRequests,
    _state_dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Harness {
        let state_dir = tempfile::tempdir().expect("tempdir");
        let user_state = UserStateStore::load_from(state_dir.path().join("userdata.json"))
            .expect("state store");
        Harness {
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            config: AppConfig::default(),
            fonts: FontManager::new(),
            theme: ThemeManager::new(ThemeId::Dark),
            clipboard: MemoryClipboard::new(),
            assets: AssetLoader::new("assets"),
            extractor: ThreadExtractor::new(|_request, feed| {
                feed.done(std::path::PathBuf::from("out"));
            }),
            requests: SceneRequests::default(),
            user_state,
            _state_dir: state_dir,
        }
    }

    pub fn services(&mut self) -> SceneServices<'_> {
        SceneServices {
            viewport: self.viewport,
            config: &self.config,
            fonts: &self.fonts,
            theme: &mut self.theme,
            clipboard: &mut self.clipboard,
            assets: &self.assets,
            user_state: &mut self.user_state,
            extractor: &self.extractor,
            requests: &mut self.requests,
        }
    }
}

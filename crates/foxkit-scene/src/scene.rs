//! The scene contract and the service bundle scenes operate through.

use anyhow::Result;
use foxkit_config::{AppConfig, UserStateStore};
use foxkit_core::{Canvas, Viewport};
use foxkit_io::{AssetLoader, Extractor};
use foxkit_text::{Clipboard, FontManager, TextMeasure};

use crate::input::{EventResult, InputEvent};
use crate::theme::ThemeManager;

/// Requests a scene raises during a frame. Applied at the frame boundary,
/// never mid-dispatch.
#[derive(Default)]
pub struct SceneRequests {
    pub transition: Option<String>,
    pub quit: bool,
}

impl SceneRequests {
    pub fn take_transition(&mut self) -> Option<String> {
        self.transition.take()
    }
}

/// Everything a scene can reach while it runs. Borrowed fresh from the app
/// for each call into the scene.
pub struct SceneServices<'a> {
    pub viewport: Viewport,
    pub config: &'a AppConfig,
    pub fonts: &'a FontManager,
    pub theme: &'a mut ThemeManager,
    pub clipboard: &'a mut dyn Clipboard,
    pub assets: &'a AssetLoader,
    pub user_state: &'a mut UserStateStore,
    pub extractor: &'a dyn Extractor,
    pub requests: &'a mut SceneRequests,
}

impl SceneServices<'_> {
    pub fn measure(&self) -> &dyn TextMeasure {
        self.fonts
    }

    /// Queue a transition for the end of this frame. A later request in the
    /// same frame wins.
    pub fn request_transition(&mut self, name: impl Into<String>) {
        self.requests.transition = Some(name.into());
    }

    pub fn quit(&mut self) {
        self.requests.quit = true;
    }
}

/// A named screen of the application: its widgets, background, and logic.
///
/// Scenes are constructed fresh by their [`crate::scene_db::SceneDB`]
/// factory on every activation and dropped on transition out, so `on_enter`
/// is where all layout happens.
pub trait Scene {
    fn on_enter(&mut self, _services: &mut SceneServices<'_>) -> Result<()> {
        Ok(())
    }

    fn on_exit(&mut self, _services: &mut SceneServices<'_>) -> Result<()> {
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        services: &mut SceneServices<'_>,
    ) -> Result<EventResult>;

    fn update(&mut self, dt: f32, services: &mut SceneServices<'_>) -> Result<()>;

    fn draw(&mut self, canvas: &mut Canvas, services: &mut SceneServices<'_>) -> Result<()>;
}

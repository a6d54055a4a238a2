//! The shipped scenes: login, main menu, and the extraction screen.

mod extract;
mod login;
mod main_menu;

pub use extract::{ExtractScene, simulated_extractor};
pub use login::LoginScene;
pub use main_menu::MainMenuScene;

use foxkit_text::TextMeasure;

use crate::input::{EventResult, InputEvent};
use crate::scene::SceneServices;
use crate::scene_db::{SceneDB, SceneError};
use crate::widget::{EventCtx, PaintCtx, Signal};
use crate::widget_set::WidgetSet;

pub const LOGIN_SCENE: &str = "login";
pub const MAIN_SCENE: &str = "main";
pub const EXTRACT_SCENE: &str = "extract";

/// Wire every shipped scene into a registry.
pub fn register_scenes(db: &mut SceneDB) -> Result<(), SceneError> {
    db.register(LOGIN_SCENE, || Box::new(LoginScene::new()))?;
    db.register(MAIN_SCENE, || Box::new(MainMenuScene::new()))?;
    db.register(EXTRACT_SCENE, || Box::new(ExtractScene::new()))?;
    Ok(())
}

/// Route one event through a widget set using the services' measurement and
/// clipboard, returning the routing result and any signals widgets raised.
pub(crate) fn route_widgets(
    widgets: &mut WidgetSet,
    event: &InputEvent,
    services: &mut SceneServices<'_>,
) -> (EventResult, Vec<Signal>) {
    let measure: &dyn TextMeasure = services.fonts;
    let mut ctx = EventCtx::new(measure, &mut *services.clipboard);
    let result = widgets.route_event(event, &mut ctx);
    let signals = ctx.drain_signals();
    (result, signals)
}

/// Paint context borrowed from scene services for a draw pass.
pub(crate) fn paint_ctx<'a>(services: &'a SceneServices<'_>) -> PaintCtx<'a> {
    PaintCtx {
        palette: services.theme.palette(),
        measure: services.fonts,
    }
}

//! foxkit-scene: the retained scene and widget framework.
//!
//! Scenes own widget sets and backgrounds; the [`SceneManager`] owns the
//! active scene and applies transitions at frame boundaries; [`App`] drives
//! everything from the winit event loop and emits display lists through a
//! `FrameSink`.

pub mod app;
pub mod background;
pub mod input;
pub mod scene;
pub mod scene_db;
pub mod scene_manager;
pub mod scenes;
pub mod theme;
pub mod widget;
pub mod widget_set;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testutil;

pub use app::App;
pub use input::{EventResult, InputEvent, Key, Modifiers, MouseButton};
pub use scene::{Scene, SceneRequests, SceneServices};
pub use scene_db::{SceneDB, SceneError};
pub use scene_manager::SceneManager;
pub use theme::{Palette, ThemeId, ThemeManager};
pub use widget::{EventCtx, PaintCtx, Signal, SignalKind, Widget, WidgetId};
pub use widget_set::WidgetSet;

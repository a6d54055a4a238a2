use anyhow::Result;
use foxkit_core::{Canvas, Rect};

use crate::background::{BackgroundSystem, GradientLayer, SolidLayer};
use crate::input::{EventResult, InputEvent};
use crate::scene::{Scene, SceneServices};
use crate::scenes::{self, MAIN_SCENE};
use crate::widget::{SignalKind, WidgetId};
use crate::widget_set::WidgetSet;
use crate::widgets::{Button, LabelBox, TextAlign, TextBox};

/// First scene: asks for a username and moves on to the main menu.
pub struct LoginScene {
    widgets: WidgetSet,
    background: BackgroundSystem,
    username: WidgetId,
    password: WidgetId,
    login: WidgetId,
    status: WidgetId,
}

impl LoginScene {
    pub fn new() -> LoginScene {
        LoginScene {
            widgets: WidgetSet::new(),
            background: BackgroundSystem::new(),
            username: WidgetId::DETACHED,
            password: WidgetId::DETACHED,
            login: WidgetId::DETACHED,
            status: WidgetId::DETACHED,
        }
    }

    fn try_login(&mut self, services: &mut SceneServices<'_>) {
        let name = self
            .widgets
            .get::<TextBox>(self.username)
            .map(|tb| tb.text().trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            if let Some(status) = self.widgets.get_mut::<LabelBox>(self.status) {
                status.set_text("Enter a username to continue");
            }
            return;
        }
        services.user_state.set_username(&name);
        services.request_transition(MAIN_SCENE);
    }
}

impl Scene for LoginScene {
    fn on_enter(&mut self, services: &mut SceneServices<'_>) -> Result<()> {
        self.background.push(SolidLayer::themed());
        self.background.push(GradientLayer::themed());

        let cx = services.viewport.width as f32 * 0.5;
        let top = services.viewport.height as f32 * 0.28;
        let field_w = 320.0;
        let field_h = 36.0;
        let x = cx - field_w * 0.5;

        self.widgets.insert(
            LabelBox::new(Rect::new(x, top - 80.0, field_w, 40.0), "Foxkit")
                .with_text_size(32.0)
                .with_align(TextAlign::Center),
        );
        self.widgets.insert(
            LabelBox::new(Rect::new(x, top - 28.0, field_w, 20.0), "Sign in to continue")
                .with_text_size(14.0)
                .with_align(TextAlign::Center)
                .muted(),
        );
        self.username = self.widgets.insert(
            TextBox::new(Rect::new(x, top + 10.0, field_w, field_h))
                .with_placeholder("Username")
                .with_max_graphemes(32),
        );
        self.password = self.widgets.insert(
            TextBox::new(Rect::new(x, top + 56.0, field_w, field_h))
                .with_placeholder("Password")
                .password(),
        );
        self.login = self
            .widgets
            .insert(Button::new(Rect::new(x, top + 108.0, field_w, 38.0), "Log in"));
        self.status = self.widgets.insert(
            LabelBox::new(Rect::new(x, top + 156.0, field_w, 20.0), "")
                .with_text_size(13.0)
                .with_align(TextAlign::Center)
                .muted(),
        );

        // Pre-fill the last username so returning users only press enter.
        let last = services.user_state.state().username.clone();
        if last != "Guest" {
            if let Some(tb) = self.widgets.get_mut::<TextBox>(self.username) {
                tb.set_text(last);
            }
        }
        self.widgets.set_focus(self.username);
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        services: &mut SceneServices<'_>,
    ) -> Result<EventResult> {
        let (result, signals) = scenes::route_widgets(&mut self.widgets, event, services);
        for signal in signals {
            match signal.kind {
                SignalKind::Clicked if signal.source == self.login => {
                    self.try_login(services);
                }
                SignalKind::Submitted
                    if signal.source == self.username || signal.source == self.password =>
                {
                    self.try_login(services);
                }
                _ => {}
            }
        }
        Ok(result)
    }

    fn update(&mut self, dt: f32, _services: &mut SceneServices<'_>) -> Result<()> {
        self.background.update(dt);
        self.widgets.update_all(dt);
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas, services: &mut SceneServices<'_>) -> Result<()> {
        let ctx = scenes::paint_ctx(services);
        canvas.clear(ctx.palette.bg);
        self.background
            .draw(canvas, services.viewport, ctx.palette, 0);
        self.widgets.draw_all(canvas, &ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers, MouseButton};
    use crate::testutil::Harness;
    use crate::widget::Widget;

    fn typed(text: &str) -> Vec<InputEvent> {
        text.chars()
            .map(|ch| InputEvent::KeyPressed {
                key: Key::Char(ch),
                modifiers: Modifiers::NONE,
            })
            .collect()
    }

    #[test]
    fn submitting_a_username_requests_main() {
        let mut harness = Harness::new();
        let mut scene = LoginScene::new();
        scene.on_enter(&mut harness.services()).unwrap();
        for ev in typed("fox") {
            scene.handle_event(&ev, &mut harness.services()).unwrap();
        }
        scene
            .handle_event(
                &InputEvent::KeyPressed {
                    key: Key::Enter,
                    modifiers: Modifiers::NONE,
                },
                &mut harness.services(),
            )
            .unwrap();
        assert_eq!(harness.requests.transition.as_deref(), Some("main"));
        assert_eq!(harness.user_state.state().username, "fox");
    }

    #[test]
    fn empty_username_shows_status_and_stays() {
        let mut harness = Harness::new();
        let mut scene = LoginScene::new();
        scene.on_enter(&mut harness.services()).unwrap();
        let login_rect = scene.widgets.widget(scene.login).unwrap().rect();
        let [cx, cy] = login_rect.center();
        for ev in [
            InputEvent::PointerPressed {
                x: cx,
                y: cy,
                button: MouseButton::Left,
            },
            InputEvent::PointerReleased {
                x: cx,
                y: cy,
                button: MouseButton::Left,
            },
        ] {
            scene.handle_event(&ev, &mut harness.services()).unwrap();
        }
        assert!(harness.requests.transition.is_none());
        let status = scene.widgets.get::<LabelBox>(scene.status).unwrap();
        assert!(!status.text().is_empty());
    }

    #[test]
    fn theme_switch_shows_up_in_the_next_frame() {
        use foxkit_core::{Brush, Command};

        use crate::theme::{Palette, ThemeId};

        fn background_fills(scene: &mut LoginScene, harness: &mut Harness) -> Vec<Brush> {
            let mut canvas = Canvas::new(harness.viewport);
            scene.draw(&mut canvas, &mut harness.services()).unwrap();
            canvas
                .finish()
                .commands
                .iter()
                .filter_map(|c| match c {
                    Command::DrawRect { brush, .. } => Some(brush.clone()),
                    _ => None,
                })
                .collect()
        }

        let mut harness = Harness::new();
        let mut scene = LoginScene::new();
        scene.on_enter(&mut harness.services()).unwrap();

        let dark = Palette::dark();
        let fills = background_fills(&mut scene, &mut harness);
        assert_eq!(fills[0], Brush::Solid(dark.bg));

        harness.theme.set_theme(ThemeId::Light);
        let light = Palette::light();
        let fills = background_fills(&mut scene, &mut harness);
        assert_eq!(fills[0], Brush::Solid(light.bg));
        let Brush::LinearGradient { stops, .. } = &fills[1] else {
            panic!("expected the gradient layer");
        };
        assert_eq!(stops[0].1, light.bg);
        assert_eq!(stops[1].1, light.panel);
    }

    #[test]
    fn username_field_starts_focused() {
        let mut harness = Harness::new();
        let mut scene = LoginScene::new();
        scene.on_enter(&mut harness.services()).unwrap();
        assert_eq!(scene.widgets.focused(), Some(scene.username));
    }
}

use anyhow::Result;
use foxkit_core::{Canvas, Rect};

use crate::background::{BackgroundSystem, SolidLayer};
use crate::input::{EventResult, InputEvent};
use crate::scene::{Scene, SceneServices};
use crate::scenes::{self, EXTRACT_SCENE, LOGIN_SCENE};
use crate::theme::ThemeId;
use crate::widget::{SignalKind, WidgetId};
use crate::widget_set::WidgetSet;
use crate::widgets::{Button, LabelBox, ListBox, ListContainer, TabBar, TextAlign};

const TAB_LIBRARY: usize = 0;
const TAB_SETTINGS: usize = 1;

/// Hub scene: greeting, tabbed library/settings panes.
pub struct MainMenuScene {
    widgets: WidgetSet,
    background: BackgroundSystem,
    greeting: WidgetId,
    tabs: WidgetId,
    // Library pane.
    recents: WidgetId,
    recents_hint: WidgetId,
    open_extractor: WidgetId,
    /// Labels mirroring the recents list, so a removed row can be mapped
    /// back to the persisted entry.
    recent_labels: Vec<String>,
    // Settings pane.
    theme_toggle: WidgetId,
    logout: WidgetId,
    quit: WidgetId,
}

impl MainMenuScene {
    pub fn new() -> MainMenuScene {
        MainMenuScene {
            widgets: WidgetSet::new(),
            background: BackgroundSystem::new(),
            greeting: WidgetId::DETACHED,
            tabs: WidgetId::DETACHED,
            recents: WidgetId::DETACHED,
            recents_hint: WidgetId::DETACHED,
            open_extractor: WidgetId::DETACHED,
            recent_labels: Vec::new(),
            theme_toggle: WidgetId::DETACHED,
            logout: WidgetId::DETACHED,
            quit: WidgetId::DETACHED,
        }
    }

    fn library_widgets(&self) -> [WidgetId; 3] {
        [self.recents, self.recents_hint, self.open_extractor]
    }

    fn settings_widgets(&self) -> [WidgetId; 3] {
        [self.theme_toggle, self.logout, self.quit]
    }

    fn show_pane(&mut self, pane: usize) {
        for id in self.library_widgets() {
            self.widgets.set_visible(id, pane == TAB_LIBRARY);
        }
        for id in self.settings_widgets() {
            self.widgets.set_visible(id, pane == TAB_SETTINGS);
        }
    }

    fn theme_label(theme: ThemeId) -> &'static str {
        match theme {
            ThemeId::Dark => "Switch to light theme",
            ThemeId::Light => "Switch to dark theme",
        }
    }

    fn toggle_theme(&mut self, services: &mut SceneServices<'_>) {
        services.theme.toggle();
        let current = services.theme.current();
        services.user_state.set_theme(current.name());
        if let Some(button) = self.widgets.get_mut::<Button>(self.theme_toggle) {
            button.set_label(Self::theme_label(current));
        }
    }
}

impl Scene for MainMenuScene {
    fn on_enter(&mut self, services: &mut SceneServices<'_>) -> Result<()> {
        self.background.push(SolidLayer::themed());

        let w = services.viewport.width as f32;
        let margin = 48.0;
        let content_w = w - margin * 2.0;

        let username = services.user_state.state().username.clone();
        self.greeting = self.widgets.insert(
            LabelBox::new(
                Rect::new(margin, 28.0, content_w, 36.0),
                format!("Welcome back, {username}"),
            )
            .with_text_size(24.0),
        );

        self.tabs = self.widgets.insert(TabBar::new(
            Rect::new(margin, 84.0, 300.0, 34.0),
            vec!["Library".into(), "Settings".into()],
        ));

        // Library pane.
        self.recents = self.widgets.insert(
            ListContainer::new(Rect::new(margin, 140.0, content_w * 0.6, 360.0))
                .with_row_height(30.0),
        );
        self.recents_hint = self.widgets.insert(
            LabelBox::new(
                Rect::new(margin, 510.0, content_w * 0.6, 20.0),
                "Recent extractions appear here",
            )
            .with_text_size(13.0)
            .muted(),
        );
        self.open_extractor = self.widgets.insert(Button::new(
            Rect::new(margin + content_w * 0.6 + 24.0, 140.0, 220.0, 40.0),
            "Open extractor",
        ));

        self.recent_labels = services.user_state.state().recent.clone();
        if let Some(list) = self.widgets.get_mut::<ListContainer>(self.recents) {
            for label in &self.recent_labels {
                list.add(ListBox::new(label.clone()).removable());
            }
        }

        // Settings pane.
        let theme = services.theme.current();
        self.theme_toggle = self.widgets.insert(Button::new(
            Rect::new(margin, 140.0, 260.0, 40.0),
            Self::theme_label(theme),
        ));
        self.logout = self
            .widgets
            .insert(Button::new(Rect::new(margin, 192.0, 260.0, 40.0), "Log out"));
        self.quit = self
            .widgets
            .insert(Button::new(Rect::new(margin, 244.0, 260.0, 40.0), "Quit"));

        self.show_pane(TAB_LIBRARY);
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
                SignalKind::TabChanged(pane) if signal.source == self.tabs => {
                    self.show_pane(pane);
                }
                SignalKind::Clicked if signal.source == self.open_extractor => {
                    services.request_transition(EXTRACT_SCENE);
                }
                SignalKind::Clicked if signal.source == self.theme_toggle => {
                    self.toggle_theme(services);
                }
                SignalKind::Clicked if signal.source == self.logout => {
                    services.request_transition(LOGIN_SCENE);
                }
                SignalKind::Clicked if signal.source == self.quit => {
                    services.quit();
                }
                SignalKind::RowRemoved(index) if signal.source == self.recents => {
                    if index < self.recent_labels.len() {
                        let label = self.recent_labels.remove(index);
                        services.user_state.remove_recent(&label);
                    }
                }
                SignalKind::RowSelected(index) if signal.source == self.recents => {
                    if let Some(label) = self.recent_labels.get(index).cloned() {
                        if let Some(hint) = self.widgets.get_mut::<LabelBox>(self.recents_hint) {
                            hint.set_text(label);
                        }
                    }
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
    use crate::input::MouseButton;
    use crate::testutil::Harness;
    use crate::widget::Widget;

    fn click(scene: &mut MainMenuScene, harness: &mut Harness, x: f32, y: f32) {
        for ev in [
            InputEvent::PointerPressed {
                x,
                y,
                button: MouseButton::Left,
            },
            InputEvent::PointerReleased {
                x,
                y,
                button: MouseButton::Left,
            },
        ] {
            scene.handle_event(&ev, &mut harness.services()).unwrap();
        }
    }

    fn click_widget(scene: &mut MainMenuScene, harness: &mut Harness, id: WidgetId) {
        let [cx, cy] = scene.widgets.widget(id).unwrap().rect().center();
        click(scene, harness, cx, cy);
    }

    #[test]
    fn tab_switch_swaps_pane_visibility() {
        let mut harness = Harness::new();
        let mut scene = MainMenuScene::new();
        scene.on_enter(&mut harness.services()).unwrap();
        assert!(scene.widgets.widget(scene.recents).unwrap().visible());
        assert!(!scene.widgets.widget(scene.quit).unwrap().visible());

        // Second of two 150px tab cells starting at x=48.
        click(&mut scene, &mut harness, 48.0 + 225.0, 100.0);
        assert!(!scene.widgets.widget(scene.recents).unwrap().visible());
        assert!(scene.widgets.widget(scene.quit).unwrap().visible());
    }

    #[test]
    fn greeting_uses_persisted_username() {
        let mut harness = Harness::new();
        harness.user_state.set_username("vix");
        let mut scene = MainMenuScene::new();
        scene.on_enter(&mut harness.services()).unwrap();
        let greeting = scene.widgets.get::<LabelBox>(scene.greeting).unwrap();
        assert!(greeting.text().contains("vix"));
    }

    #[test]
    fn logout_and_extractor_buttons_request_transitions() {
        let mut harness = Harness::new();
        let mut scene = MainMenuScene::new();
        scene.on_enter(&mut harness.services()).unwrap();

        let open_extractor = scene.open_extractor;
        click_widget(&mut scene, &mut harness, open_extractor);
        assert_eq!(harness.requests.transition.as_deref(), Some("extract"));

        scene.show_pane(TAB_SETTINGS);
        let logout = scene.logout;
        click_widget(&mut scene, &mut harness, logout);
        assert_eq!(harness.requests.transition.as_deref(), Some("login"));

        let quit = scene.quit;
        click_widget(&mut scene, &mut harness, quit);
        assert!(harness.requests.quit);
    }

    #[test]
    fn theme_toggle_updates_manager_and_state() {
        let mut harness = Harness::new();
        let mut scene = MainMenuScene::new();
        scene.on_enter(&mut harness.services()).unwrap();
        scene.show_pane(TAB_SETTINGS);

        let theme_toggle = scene.theme_toggle;
        click_widget(&mut scene, &mut harness, theme_toggle);
        assert_eq!(harness.theme.current(), ThemeId::Light);
        assert_eq!(harness.user_state.state().theme, "light");
        let button = scene.widgets.get::<Button>(scene.theme_toggle).unwrap();
        assert_eq!(button.label(), "Switch to dark theme");
    }

    #[test]
    fn removing_a_recent_row_updates_persisted_state() {
        let mut harness = Harness::new();
        harness.user_state.push_recent("clip-a");
        harness.user_state.push_recent("clip-b");
        let mut scene = MainMenuScene::new();
        scene.on_enter(&mut harness.services()).unwrap();

        let list = scene.widgets.get::<ListContainer>(scene.recents).unwrap();
        assert_eq!(list.len(), 2);
        let x_rect = list.rows()[0].remove_rect(
            // First row of the freshly laid-out list.
            Rect::new(
                list.rect().x + 6.0,
                list.rect().y + 6.0,
                list.rect().w - 12.0,
                30.0,
            ),
        );
        let [cx, cy] = x_rect.unwrap().center();
        scene
            .handle_event(
                &InputEvent::PointerPressed {
                    x: cx,
                    y: cy,
                    button: MouseButton::Left,
                },
                &mut harness.services(),
            )
            .unwrap();
        assert_eq!(
            scene.widgets.get::<ListContainer>(scene.recents).unwrap().len(),
            1
        );
        // Most recent first, so row 0 was clip-b.
        assert_eq!(harness.user_state.state().recent, vec!["clip-a"]);
    }
}

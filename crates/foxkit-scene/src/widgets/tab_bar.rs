use std::any::Any;

use foxkit_core::{Brush, Canvas, Rect, RoundedRect};

use crate::input::{EventResult, InputEvent, MouseButton};
use crate::widget::{EventCtx, PaintCtx, SignalKind, Widget};

/// Horizontal row of labeled tabs with exactly one active index.
///
/// Clicking a tab emits [`SignalKind::TabChanged`]; the bar holds no
/// reference to whatever content the owning scene swaps.
pub struct TabBar {
    rect: Rect,
    tabs: Vec<String>,
    active: usize,
    hovered: Option<usize>,
    text_size: f32,
    visible: bool,
    enabled: bool,
}

impl TabBar {
    pub fn new(rect: Rect, tabs: Vec<String>) -> TabBar {
        TabBar {
            rect,
            tabs,
            active: 0,
            hovered: None,
            text_size: 14.0,
            visible: true,
            enabled: true,
        }
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    /// Replace the tab labels. The active index is clamped into the new
    /// bounds and resets to 0 when the bar goes from empty to non-empty.
    pub fn set_tabs(&mut self, tabs: Vec<String>) {
        let was_empty = self.tabs.is_empty();
        self.tabs = tabs;
        self.hovered = None;
        if self.tabs.is_empty() {
            self.active = 0;
        } else if was_empty || self.active >= self.tabs.len() {
            self.active = if was_empty {
                0
            } else {
                self.tabs.len() - 1
            };
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Programmatic activation. Out-of-bounds indices are ignored. Does not
    /// emit a notification; only user clicks do.
    pub fn set_active(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active = index;
        }
    }

    fn tab_rect(&self, index: usize) -> Rect {
        let n = self.tabs.len().max(1) as f32;
        let w = self.rect.w / n;
        Rect::new(self.rect.x + index as f32 * w, self.rect.y, w, self.rect.h)
    }

    fn tab_at(&self, x: f32, y: f32) -> Option<usize> {
        if !self.rect.contains(x, y) {
            return None;
        }
        (0..self.tabs.len()).find(|&i| self.tab_rect(i).contains(x, y))
    }
}

impl Widget for TabBar {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.hovered = None;
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hovered = None;
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut EventCtx<'_>) -> EventResult {
        match *event {
            InputEvent::PointerMoved { x, y } => {
                self.hovered = self.tab_at(x, y);
                EventResult::Ignored
            }
            InputEvent::PointerPressed {
                x,
                y,
                button: MouseButton::Left,
            } => {
                if let Some(index) = self.tab_at(x, y) {
                    if index != self.active {
                        self.active = index;
                        ctx.emit(SignalKind::TabChanged(index));
                    }
                    return EventResult::Handled;
                }
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>, z: i32) {
        let bar = RoundedRect::uniform(self.rect, 6.0);
        canvas.rounded_rect(bar, Brush::Solid(ctx.palette.panel), z);
        canvas.stroke_rounded_rect(bar, 1.0, Brush::Solid(ctx.palette.panel_border), z + 1);

        for (i, label) in self.tabs.iter().enumerate() {
            let cell = self.tab_rect(i).inflate(-2.0, -2.0);
            let (fill, ink) = if i == self.active {
                (Some(ctx.palette.accent), ctx.palette.bg)
            } else if self.hovered == Some(i) {
                (Some(ctx.palette.button.hover), ctx.palette.text)
            } else {
                (None, ctx.palette.text_muted)
            };
            if let Some(fill) = fill {
                canvas.rounded_rect(RoundedRect::uniform(cell, 4.0), Brush::Solid(fill), z + 2);
            }
            let text_w = ctx.measure.width(label, self.text_size);
            let tx = cell.x + (cell.w - text_w) * 0.5;
            let ty = cell.y + cell.h * 0.5 + self.text_size * 0.35;
            canvas.draw_text_run([tx, ty], label.clone(), self.text_size, ink, z + 3);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foxkit_text::{MemoryClipboard, MonoMeasure};

    fn bar3() -> TabBar {
        TabBar::new(
            Rect::new(0.0, 0.0, 300.0, 30.0),
            vec!["One".into(), "Two".into(), "Three".into()],
        )
    }

    #[test]
    fn clicking_a_tab_activates_it_and_emits_once() {
        let mut bar = bar3();
        let measure = MonoMeasure::default();
        let mut clip = MemoryClipboard::new();
        let mut ctx = EventCtx::new(&measure, &mut clip);
        // Three 100px cells; x=250 lands on index 2.
        let ev = InputEvent::PointerPressed {
            x: 250.0,
            y: 15.0,
            button: MouseButton::Left,
        };
        assert!(bar.handle_event(&ev, &mut ctx).is_handled());
        assert_eq!(bar.active(), 2);
        let signals = ctx.drain_signals();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::TabChanged(2));
    }

    #[test]
    fn clicking_the_active_tab_emits_nothing() {
        let mut bar = bar3();
        let measure = MonoMeasure::default();
        let mut clip = MemoryClipboard::new();
        let mut ctx = EventCtx::new(&measure, &mut clip);
        let ev = InputEvent::PointerPressed {
            x: 50.0,
            y: 15.0,
            button: MouseButton::Left,
        };
        bar.handle_event(&ev, &mut ctx);
        assert_eq!(bar.active(), 0);
        assert!(ctx.signals().is_empty());
    }

    #[test]
    fn set_tabs_keeps_active_in_bounds() {
        let mut bar = bar3();
        bar.set_active(2);
        bar.set_tabs(vec!["Only".into()]);
        assert_eq!(bar.active(), 0);

        bar.set_tabs(Vec::new());
        assert_eq!(bar.active(), 0);

        // Empty to non-empty defaults to 0.
        bar.set_tabs(vec!["A".into(), "B".into()]);
        assert_eq!(bar.active(), 0);
    }

    #[test]
    fn set_active_ignores_out_of_bounds() {
        let mut bar = bar3();
        bar.set_active(7);
        assert_eq!(bar.active(), 0);
        bar.set_active(1);
        assert_eq!(bar.active(), 1);
    }
}

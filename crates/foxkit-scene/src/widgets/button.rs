use std::any::Any;

use foxkit_core::{Brush, Canvas, Rect, RoundedRect};

use crate::input::{EventResult, InputEvent, MouseButton};
use crate::widget::{EventCtx, PaintCtx, SignalKind, Widget};

/// Push button. Emits [`SignalKind::Clicked`] when a left press started
/// inside its bounds is released inside them.
pub struct Button {
    rect: Rect,
    label: String,
    text_size: f32,
    radius: f32,
    visible: bool,
    enabled: bool,
    hovered: bool,
    pressed: bool,
}

impl Button {
    pub fn new(rect: Rect, label: impl Into<String>) -> Button {
        Button {
            rect,
            label: label.into(),
            text_size: 16.0,
            radius: 6.0,
            visible: true,
            enabled: true,
            hovered: false,
            pressed: false,
        }
    }

    pub fn with_text_size(mut self, size: f32) -> Button {
        self.text_size = size;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Widget for Button {
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
            self.hovered = false;
            self.pressed = false;
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hovered = false;
            self.pressed = false;
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut EventCtx<'_>) -> EventResult {
        match *event {
            InputEvent::PointerMoved { x, y } => {
                self.hovered = self.rect.contains(x, y);
                EventResult::Ignored
            }
            InputEvent::PointerPressed {
                x,
                y,
                button: MouseButton::Left,
            } => {
                if self.rect.contains(x, y) {
                    self.pressed = true;
                    return EventResult::Handled;
                }
                EventResult::Ignored
            }
            InputEvent::PointerReleased {
                x,
                y,
                button: MouseButton::Left,
            } => {
                let was_pressed = self.pressed;
                self.pressed = false;
                if was_pressed && self.rect.contains(x, y) {
                    ctx.emit(SignalKind::Clicked);
                    return EventResult::Handled;
                }
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>, z: i32) {
        let colors = &ctx.palette.button;
        let fill = if !self.enabled {
            colors.disabled
        } else if self.pressed {
            colors.active
        } else if self.hovered {
            colors.hover
        } else {
            colors.normal
        };
        let rrect = RoundedRect::uniform(self.rect, self.radius);
        canvas.rounded_rect(rrect, Brush::Solid(fill), z);
        canvas.stroke_rounded_rect(rrect, 1.0, Brush::Solid(ctx.palette.panel_border), z + 1);

        let ink = if self.enabled {
            ctx.palette.text
        } else {
            ctx.palette.text_muted
        };
        let text_w = ctx.measure.width(&self.label, self.text_size);
        let tx = self.rect.x + (self.rect.w - text_w) * 0.5;
        let ty = self.rect.y + self.rect.h * 0.5 + self.text_size * 0.35;
        canvas.draw_text_run([tx, ty], self.label.clone(), self.text_size, ink, z + 2);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

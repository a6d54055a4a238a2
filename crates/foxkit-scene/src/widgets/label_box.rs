use std::any::Any;

use foxkit_core::shapes::{BorderStyle, BorderWidths, RectStyle, draw_rectangle};
use foxkit_core::{Brush, Canvas, Rect};

use crate::widget::{PaintCtx, Widget};

/// Horizontal alignment of a label's text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Read-only text display, with an optional panel-style background.
/// Never handles events.
pub struct LabelBox {
    rect: Rect,
    text: String,
    text_size: f32,
    align: TextAlign,
    panel: bool,
    muted: bool,
    visible: bool,
    enabled: bool,
}

impl LabelBox {
    pub fn new(rect: Rect, text: impl Into<String>) -> LabelBox {
        LabelBox {
            rect,
            text: text.into(),
            text_size: 16.0,
            align: TextAlign::Left,
            panel: false,
            muted: false,
            visible: true,
            enabled: true,
        }
    }

    pub fn with_text_size(mut self, size: f32) -> LabelBox {
        self.text_size = size;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> LabelBox {
        self.align = align;
        self
    }

    /// Draw a panel background and border behind the text.
    pub fn with_panel(mut self) -> LabelBox {
        self.panel = true;
        self
    }

    pub fn muted(mut self) -> LabelBox {
        self.muted = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for LabelBox {
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
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>, z: i32) {
        let pad = 8.0;
        if self.panel {
            let style = RectStyle {
                fill: Some(Brush::Solid(ctx.palette.panel)),
                border: Some(BorderStyle {
                    widths: BorderWidths::uniform(1.0),
                    brush: Brush::Solid(ctx.palette.panel_border),
                }),
            };
            draw_rectangle(canvas, self.rect, &style, z);
        }
        let ink = if self.muted {
            ctx.palette.text_muted
        } else {
            ctx.palette.text
        };
        let text_w = ctx.measure.width(&self.text, self.text_size);
        let tx = match self.align {
            TextAlign::Left => self.rect.x + if self.panel { pad } else { 0.0 },
            TextAlign::Center => self.rect.x + (self.rect.w - text_w) * 0.5,
            TextAlign::Right => self.rect.right() - text_w - if self.panel { pad } else { 0.0 },
        };
        let ty = self.rect.y + self.rect.h * 0.5 + self.text_size * 0.35;
        canvas.draw_text_run([tx, ty], self.text.clone(), self.text_size, ink, z + 2);
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
    use foxkit_core::{Command, Viewport};
    use foxkit_text::MonoMeasure;

    #[test]
    fn label_emits_only_text_without_panel() {
        let label = LabelBox::new(Rect::new(0.0, 0.0, 100.0, 20.0), "hi");
        let mut canvas = Canvas::new(Viewport {
            width: 200,
            height: 100,
        });
        let measure = MonoMeasure::default();
        let palette = crate::theme::Palette::dark();
        let ctx = PaintCtx {
            palette: &palette,
            measure: &measure,
        };
        label.draw(&mut canvas, &ctx, 10);
        let list = canvas.finish();
        assert_eq!(list.commands.len(), 1);
        assert!(matches!(list.commands[0], Command::DrawText { .. }));
    }

    #[test]
    fn centered_text_is_offset_by_half_the_slack() {
        let label = LabelBox::new(Rect::new(0.0, 0.0, 100.0, 20.0), "ab")
            .with_text_size(10.0)
            .with_align(TextAlign::Center);
        let mut canvas = Canvas::new(Viewport {
            width: 200,
            height: 100,
        });
        let measure = MonoMeasure { factor: 0.5 };
        let palette = crate::theme::Palette::dark();
        let ctx = PaintCtx {
            palette: &palette,
            measure: &measure,
        };
        label.draw(&mut canvas, &ctx, 0);
        let list = canvas.finish();
        match &list.commands[0] {
            // Text is 10px wide in a 100px box.
            Command::DrawText { run, .. } => assert_eq!(run.pos[0], 45.0),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

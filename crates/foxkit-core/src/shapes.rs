//! Small drawing helpers shared by widgets and background layers.

use crate::canvas::Canvas;
use crate::geometry::{Rect, RoundedRect};
use crate::{Brush, ColorLinPremul};

#[derive(Clone, Copy, Debug, Default)]
pub struct BorderWidths {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl BorderWidths {
    pub fn uniform(w: f32) -> Self {
        Self {
            top: w,
            right: w,
            bottom: w,
            left: w,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BorderStyle {
    pub widths: BorderWidths,
    pub brush: Brush,
}

#[derive(Clone, Debug, Default)]
pub struct RectStyle {
    pub fill: Option<Brush>,
    pub border: Option<BorderStyle>,
}

/// Draw a rectangle with optional fill and per-side border widths.
pub fn draw_rectangle(canvas: &mut Canvas, rect: Rect, style: &RectStyle, z: i32) {
    let Rect { x, y, w, h } = rect;
    if let Some(fill) = &style.fill {
        canvas.fill_rect(x, y, w, h, fill.clone(), z);
    }
    if let Some(border) = &style.border {
        let b = &border.widths;
        let brush = border.brush.clone();
        if b.top > 0.0 {
            canvas.fill_rect(x, y, w, b.top, brush.clone(), z + 1);
        }
        if b.right > 0.0 {
            canvas.fill_rect(x + w - b.right, y, b.right, h, brush.clone(), z + 1);
        }
        if b.bottom > 0.0 {
            canvas.fill_rect(x, y + h - b.bottom, w, b.bottom, brush.clone(), z + 1);
        }
        if b.left > 0.0 {
            canvas.fill_rect(x, y, b.left, h, brush, z + 1);
        }
    }
}

/// Draw a rounded rectangle with optional fill and uniform stroke.
pub fn draw_rounded_rectangle(
    canvas: &mut Canvas,
    rrect: RoundedRect,
    fill: Option<Brush>,
    stroke_width: Option<f32>,
    stroke_brush: Option<Brush>,
    z: i32,
) {
    if let Some(f) = fill {
        canvas.rounded_rect(rrect, f, z);
    }
    if let (Some(w), Some(b)) = (stroke_width, stroke_brush) {
        canvas.stroke_rounded_rect(rrect, w, b, z + 1);
    }
}

/// Horizontal progress bar: track, border, and fill proportional to `progress`.
pub fn draw_progress_bar(
    canvas: &mut Canvas,
    rect: Rect,
    progress: f32,
    bg: ColorLinPremul,
    fg: ColorLinPremul,
    border: ColorLinPremul,
    z: i32,
) {
    let rrect = RoundedRect::uniform(rect, 6.0);
    canvas.rounded_rect(rrect, Brush::Solid(bg), z);
    canvas.stroke_rounded_rect(rrect, 2.0, Brush::Solid(border), z + 1);

    let p = progress.clamp(0.0, 1.0);
    let fill_w = (rect.w - 4.0).max(0.0) * p;
    if fill_w > 0.0 {
        let fill = Rect::new(rect.x + 2.0, rect.y + 2.0, fill_w, (rect.h - 4.0).max(0.0));
        canvas.rounded_rect(RoundedRect::uniform(fill, 4.0), Brush::Solid(fg), z + 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Command, Viewport};

    fn canvas() -> Canvas {
        Canvas::new(Viewport {
            width: 320,
            height: 240,
        })
    }

    #[test]
    fn bordered_rect_emits_four_sides() {
        let mut c = canvas();
        let style = RectStyle {
            fill: Some(Brush::Solid(Color::rgb(10, 10, 10))),
            border: Some(BorderStyle {
                widths: BorderWidths::uniform(1.0),
                brush: Brush::Solid(Color::rgb(200, 200, 200)),
            }),
        };
        draw_rectangle(&mut c, Rect::new(0.0, 0.0, 100.0, 40.0), &style, 0);
        assert_eq!(c.finish().draw_count(), 5);
    }

    #[test]
    fn empty_progress_draws_no_fill() {
        let mut c = canvas();
        draw_progress_bar(
            &mut c,
            Rect::new(0.0, 0.0, 100.0, 18.0),
            0.0,
            Color::rgb(36, 40, 46),
            Color::rgb(90, 140, 200),
            Color::rgb(70, 70, 80),
            0,
        );
        let list = c.finish();
        // Track and border only.
        assert_eq!(list.draw_count(), 2);
    }

    #[test]
    fn progress_is_clamped() {
        let mut c = canvas();
        draw_progress_bar(
            &mut c,
            Rect::new(0.0, 0.0, 100.0, 18.0),
            7.5,
            Color::rgb(36, 40, 46),
            Color::rgb(90, 140, 200),
            Color::rgb(70, 70, 80),
            0,
        );
        let list = c.finish();
        let fill_w = list
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawRoundedRect { rrect, .. } => Some(rrect.rect.w),
                _ => None,
            })
            .last()
            .unwrap();
        assert!(fill_w <= 96.0 + f32::EPSILON);
    }
}

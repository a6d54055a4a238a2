use std::path::PathBuf;

use foxkit_core::{Brush, Canvas, ImageFit, Path, Rect, RoundedRect};

use crate::widget::PaintCtx;

/// One selectable row inside a [`super::ListContainer`]: a label, an
/// optional leading icon, and an optional remove affordance.
///
/// Rows are plain data owned by their container. Selection highlighting is
/// decided by the container from its selected index, never stored here.
#[derive(Debug, Clone)]
pub struct ListBox {
    pub label: String,
    pub icon: Option<PathBuf>,
    pub removable: bool,
}

impl ListBox {
    pub fn new(label: impl Into<String>) -> ListBox {
        ListBox {
            label: label.into(),
            icon: None,
            removable: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> ListBox {
        self.icon = Some(icon.into());
        self
    }

    pub fn removable(mut self) -> ListBox {
        self.removable = true;
        self
    }

    /// Rect of the remove affordance within `row_rect`, when present.
    pub(crate) fn remove_rect(&self, row_rect: Rect) -> Option<Rect> {
        if !self.removable {
            return None;
        }
        let side = (row_rect.h - 8.0).min(18.0).max(10.0);
        Some(Rect::new(
            row_rect.right() - side - 6.0,
            row_rect.y + (row_rect.h - side) * 0.5,
            side,
            side,
        ))
    }

    pub(crate) fn draw_row(
        &self,
        canvas: &mut Canvas,
        ctx: &PaintCtx<'_>,
        row_rect: Rect,
        text_size: f32,
        selected: bool,
        hovered: bool,
        z: i32,
    ) {
        if selected {
            canvas.rounded_rect(
                RoundedRect::uniform(row_rect, 4.0),
                Brush::Solid(ctx.palette.selection),
                z,
            );
        } else if hovered {
            canvas.rounded_rect(
                RoundedRect::uniform(row_rect, 4.0),
                Brush::Solid(ctx.palette.button.hover),
                z,
            );
        }

        let mut text_x = row_rect.x + 8.0;
        if let Some(icon) = &self.icon {
            let side = row_rect.h - 8.0;
            canvas.draw_image(
                icon.clone(),
                [text_x, row_rect.y + 4.0],
                [side, side],
                ImageFit::Contain,
                None,
                z + 1,
            );
            text_x += side + 6.0;
        }

        let ink = if selected {
            ctx.palette.text
        } else {
            ctx.palette.text_muted
        };
        let ty = row_rect.y + row_rect.h * 0.5 + text_size * 0.35;
        canvas.draw_text_run([text_x, ty], self.label.clone(), text_size, ink, z + 2);

        if let Some(x_rect) = self.remove_rect(row_rect) {
            // Small diagonal cross.
            let inset = 4.0;
            let a = Path::line(
                [x_rect.x + inset, x_rect.y + inset],
                [x_rect.right() - inset, x_rect.bottom() - inset],
            );
            let b = Path::line(
                [x_rect.right() - inset, x_rect.y + inset],
                [x_rect.x + inset, x_rect.bottom() - inset],
            );
            canvas.stroke_path(a, 1.5, ctx.palette.text_muted, z + 3);
            canvas.stroke_path(b, 1.5, ctx.palette.text_muted, z + 3);
        }
    }
}

use std::path::PathBuf;

use crate::display_list::{DisplayList, ImageFit, Viewport};
use crate::geometry::*;
use crate::painter::Painter;
use crate::{Brush, ColorLinPremul, FontStyle, TextRun};

/// Builder for a single frame's draw commands. Wraps [`Painter`] and adds
/// canvas helpers used by widgets and background layers.
pub struct Canvas {
    viewport: Viewport,
    painter: Painter,
    default_family: String,
    dpi_scale: f32,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            painter: Painter::begin_frame(viewport),
            default_family: "sans".to_string(),
            dpi_scale: 1.0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_dpi_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.dpi_scale = scale;
        }
    }

    pub fn dpi_scale(&self) -> f32 {
        self.dpi_scale
    }

    /// Font family used by `draw_text_run` when no explicit style is given.
    pub fn set_default_family(&mut self, family: impl Into<String>) {
        self.default_family = family.into();
    }

    /// Set the frame clear/background color.
    pub fn clear(&mut self, color: ColorLinPremul) {
        self.painter.set_clear_color(color);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, brush: Brush, z: i32) {
        self.painter.rect(Rect::new(x, y, w, h), brush, z);
    }

    pub fn rounded_rect(&mut self, rrect: RoundedRect, brush: Brush, z: i32) {
        self.painter.rounded_rect(rrect, brush, z);
    }

    pub fn stroke_rounded_rect(&mut self, rrect: RoundedRect, width: f32, brush: Brush, z: i32) {
        self.painter
            .stroke_rounded_rect(rrect, Stroke { width }, brush, z);
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f32, brush: Brush, z: i32) {
        self.painter.stroke_rect(rect, Stroke { width }, brush, z);
    }

    pub fn stroke_path(&mut self, path: Path, width: f32, color: ColorLinPremul, z: i32) {
        self.painter.stroke_path(path, Stroke { width }, color, z);
    }

    pub fn fill_path(&mut self, path: Path, color: ColorLinPremul, z: i32) {
        self.painter.fill_path(path, color, z);
    }

    /// Draw text in the default family. `pos` is the baseline origin.
    pub fn draw_text_run(
        &mut self,
        pos: [f32; 2],
        text: impl Into<String>,
        size: f32,
        color: ColorLinPremul,
        z: i32,
    ) {
        let family = self.default_family.clone();
        self.draw_text_styled(pos, text, size, color, family, FontStyle::Regular, z);
    }

    pub fn draw_text_styled(
        &mut self,
        pos: [f32; 2],
        text: impl Into<String>,
        size: f32,
        color: ColorLinPremul,
        family: impl Into<String>,
        style: FontStyle,
        z: i32,
    ) {
        self.painter.text(
            TextRun {
                text: text.into(),
                pos,
                size,
                color,
                family: family.into(),
                style,
            },
            z,
        );
    }

    pub fn draw_image(
        &mut self,
        path: PathBuf,
        origin: [f32; 2],
        size: [f32; 2],
        fit: ImageFit,
        tint: Option<ColorLinPremul>,
        z: i32,
    ) {
        self.painter.image(path, origin, size, fit, tint, z);
    }

    pub fn push_clip_rect(&mut self, rect: Rect) {
        self.painter.push_clip_rect(rect);
    }

    pub fn pop_clip(&mut self) {
        self.painter.pop_clip();
    }

    pub fn push_translate(&mut self, tx: f32, ty: f32) {
        self.painter.push_transform(Transform2D::translate(tx, ty));
    }

    pub fn pop_transform(&mut self) {
        self.painter.pop_transform();
    }

    /// Finish the frame, yielding the recorded display list.
    pub fn finish(self) -> DisplayList {
        self.painter.finish()
    }
}

use std::path::PathBuf;

use crate::display_list::{Command, DisplayList, ImageFit, Viewport};
use crate::geometry::*;
use crate::{Brush, ColorLinPremul, TextRun};

/// Records draw commands for one frame, maintaining transform and clip stacks.
pub struct Painter {
    list: DisplayList,
    transform_stack: Vec<Transform2D>,
    clip_depth: usize,
}

impl Painter {
    pub fn begin_frame(viewport: Viewport) -> Self {
        Self {
            list: DisplayList {
                viewport,
                clear_color: None,
                commands: Vec::new(),
            },
            transform_stack: vec![Transform2D::identity()],
            clip_depth: 0,
        }
    }

    pub fn current_transform(&self) -> Transform2D {
        *self
            .transform_stack
            .last()
            .unwrap_or(&Transform2D::identity())
    }

    pub fn push_transform(&mut self, t: Transform2D) {
        // Compose with current transform so nested pushes multiply.
        let composed = self.current_transform().concat(t);
        self.list.commands.push(Command::PushTransform(composed));
        self.transform_stack.push(composed);
    }

    pub fn pop_transform(&mut self) {
        if self.transform_stack.len() > 1 {
            self.list.commands.push(Command::PopTransform);
            self.transform_stack.pop();
        }
    }

    pub fn push_clip_rect(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.list.commands.push(Command::PushClip(ClipRect(rect)));
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.clip_depth -= 1;
            self.list.commands.push(Command::PopClip);
        }
    }

    pub fn set_clear_color(&mut self, color: ColorLinPremul) {
        self.list.clear_color = Some(color);
    }

    pub fn rect(&mut self, rect: Rect, brush: Brush, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawRect {
            rect,
            brush,
            z,
            transform,
        });
    }

    pub fn rounded_rect(&mut self, rrect: RoundedRect, brush: Brush, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawRoundedRect {
            rrect,
            brush,
            z,
            transform,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, stroke: Stroke, brush: Brush, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::StrokeRect {
            rect,
            stroke,
            brush,
            z,
            transform,
        });
    }

    pub fn stroke_rounded_rect(&mut self, rrect: RoundedRect, stroke: Stroke, brush: Brush, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::StrokeRoundedRect {
            rrect,
            stroke,
            brush,
            z,
            transform,
        });
    }

    pub fn text(&mut self, run: TextRun, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawText { run, z, transform });
    }

    pub fn stroke_path(&mut self, path: Path, stroke: Stroke, color: ColorLinPremul, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::StrokePath {
            path,
            stroke,
            color,
            z,
            transform,
        });
    }

    pub fn fill_path(&mut self, path: Path, color: ColorLinPremul, z: i32) {
        let transform = self.current_transform();
        self.list.commands.push(Command::FillPath {
            path,
            color,
            z,
            transform,
        });
    }

    pub fn image(
        &mut self,
        path: PathBuf,
        origin: [f32; 2],
        size: [f32; 2],
        fit: ImageFit,
        tint: Option<ColorLinPremul>,
        z: i32,
    ) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawImage {
            path,
            origin,
            size,
            fit,
            tint,
            z,
            transform,
        });
    }

    /// Close any dangling clips and hand the list over.
    pub fn finish(mut self) -> DisplayList {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn nested_transforms_compose() {
        let mut p = Painter::begin_frame(Viewport {
            width: 100,
            height: 100,
        });
        p.push_transform(Transform2D::translate(10.0, 0.0));
        p.push_transform(Transform2D::translate(0.0, 5.0));
        let t = p.current_transform();
        assert_eq!(t.m[4], 10.0);
        assert_eq!(t.m[5], 5.0);
        p.pop_transform();
        p.pop_transform();
        assert_eq!(p.current_transform().m[4], 0.0);
    }

    #[test]
    fn finish_closes_dangling_clips() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.push_clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        p.rect(
            Rect::new(0.0, 0.0, 5.0, 5.0),
            Brush::Solid(Color::rgb(0, 0, 0)),
            0,
        );
        let list = p.finish();
        let pushes = list
            .commands
            .iter()
            .filter(|c| matches!(c, Command::PushClip(_)))
            .count();
        let pops = list
            .commands
            .iter()
            .filter(|c| matches!(c, Command::PopClip))
            .count();
        assert_eq!(pushes, pops);
    }

    #[test]
    fn pop_transform_never_underflows() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.pop_transform();
        let _ = p.current_transform();
    }
}

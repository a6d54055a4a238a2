use std::path::PathBuf;

use crate::geometry::*;
use crate::{Brush, ColorLinPremul, TextRun};

/// Logical viewport of a frame, before DPI scaling.
#[derive(Clone, Copy, Debug, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// How an image should fit within its bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFit {
    Fill,
    #[default]
    Contain,
    Cover,
    /// Repeat the image at native size, offset by the given origin.
    Tile,
}

#[derive(Clone, Debug)]
pub enum Command {
    DrawRect {
        rect: Rect,
        brush: Brush,
        z: i32,
        transform: Transform2D,
    },
    DrawRoundedRect {
        rrect: RoundedRect,
        brush: Brush,
        z: i32,
        transform: Transform2D,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
        brush: Brush,
        z: i32,
        transform: Transform2D,
    },
    StrokeRoundedRect {
        rrect: RoundedRect,
        stroke: Stroke,
        brush: Brush,
        z: i32,
        transform: Transform2D,
    },
    DrawText {
        run: TextRun,
        z: i32,
        transform: Transform2D,
    },
    StrokePath {
        path: Path,
        stroke: Stroke,
        color: ColorLinPremul,
        z: i32,
        transform: Transform2D,
    },
    FillPath {
        path: Path,
        color: ColorLinPremul,
        z: i32,
        transform: Transform2D,
    },
    DrawImage {
        path: PathBuf,
        origin: [f32; 2],
        size: [f32; 2],
        fit: ImageFit,
        tint: Option<ColorLinPremul>,
        z: i32,
        transform: Transform2D,
    },
    PushClip(ClipRect),
    PopClip,
    PushTransform(Transform2D),
    PopTransform,
}

impl Command {
    /// Z value for draw commands; stack manipulation has none.
    pub fn z(&self) -> Option<i32> {
        match self {
            Command::DrawRect { z, .. }
            | Command::DrawRoundedRect { z, .. }
            | Command::StrokeRect { z, .. }
            | Command::StrokeRoundedRect { z, .. }
            | Command::DrawText { z, .. }
            | Command::StrokePath { z, .. }
            | Command::FillPath { z, .. }
            | Command::DrawImage { z, .. } => Some(*z),
            _ => None,
        }
    }
}

/// One recorded frame: a clear color and draw commands in submission order.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub clear_color: Option<ColorLinPremul>,
    pub commands: Vec<Command>,
}

impl DisplayList {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count of actual draw commands, ignoring clip/transform bookkeeping.
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.z().is_some()).count()
    }
}

//! foxkit-core: geometry, color, and the display-list layer.
//!
//! Widgets and scenes record draw commands into a [`Canvas`]; a finished
//! frame leaves the framework as a [`DisplayList`] through a [`FrameSink`].
//! Rasterization happens outside this workspace.

mod canvas;
mod color;
mod display_list;
mod geometry;
mod painter;
pub mod shapes;
mod sink;

pub use canvas::Canvas;
pub use display_list::{Command, DisplayList, ImageFit, Viewport};
pub use geometry::{
    ClipRect, FillRule, Path, PathCmd, Rect, RoundedRadii, RoundedRect, Stroke, Transform2D,
};
pub use painter::Painter;
pub use sink::{FrameSink, RecordingSink};

/// Premultiplied linear RGBA color. Constructors live in `color.rs`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorLinPremul {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Alias for the premultiplied linear color type, for a friendlier name in APIs.
pub type Color = ColorLinPremul;

#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(ColorLinPremul),
    LinearGradient {
        start: [f32; 2],
        end: [f32; 2],
        stops: Vec<(f32, ColorLinPremul)>,
    },
}

/// Text style dimension of a font cache key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
}

/// A positioned run of text. `pos` is the baseline origin in logical pixels.
#[derive(Clone, Debug)]
pub struct TextRun {
    pub text: String,
    pub pos: [f32; 2],
    pub size: f32,
    pub color: ColorLinPremul,
    pub family: String,
    pub style: FontStyle,
}

//! Ordered stack of background layers composited before widgets each frame.

use std::path::PathBuf;

use foxkit_core::{Brush, Canvas, Color, ImageFit, Rect, Viewport};

use crate::theme::Palette;

/// One background layer. Layers draw in stack order, each a fixed depth
/// band below the widget range.
pub trait BackgroundLayer {
    fn update(&mut self, _dt: f32) {}
    fn draw(&self, canvas: &mut Canvas, viewport: Viewport, palette: &Palette, z: i32);
}

/// Flat fill. With no explicit color it tracks the palette background, so
/// theme switches show up without scene involvement.
pub struct SolidLayer {
    pub color: Option<Color>,
}

impl SolidLayer {
    pub fn themed() -> SolidLayer {
        SolidLayer { color: None }
    }

    pub fn new(color: Color) -> SolidLayer {
        SolidLayer { color: Some(color) }
    }
}

impl BackgroundLayer for SolidLayer {
    fn draw(&self, canvas: &mut Canvas, viewport: Viewport, palette: &Palette, z: i32) {
        let color = self.color.unwrap_or(palette.bg);
        canvas.fill_rect(
            0.0,
            0.0,
            viewport.width as f32,
            viewport.height as f32,
            Brush::Solid(color),
            z,
        );
    }
}

/// Vertical two-stop gradient. Without explicit stops it runs from the
/// palette background into the panel color, re-resolved every draw so a
/// theme switch takes effect on the next frame.
pub struct GradientLayer {
    pub top: Option<Color>,
    pub bottom: Option<Color>,
}

impl GradientLayer {
    pub fn themed() -> GradientLayer {
        GradientLayer {
            top: None,
            bottom: None,
        }
    }

    pub fn new(top: Color, bottom: Color) -> GradientLayer {
        GradientLayer {
            top: Some(top),
            bottom: Some(bottom),
        }
    }
}

impl BackgroundLayer for GradientLayer {
    fn draw(&self, canvas: &mut Canvas, viewport: Viewport, palette: &Palette, z: i32) {
        let top = self.top.unwrap_or(palette.bg);
        let bottom = self.bottom.unwrap_or(palette.panel);
        let h = viewport.height as f32;
        canvas.fill_rect(
            0.0,
            0.0,
            viewport.width as f32,
            h,
            Brush::LinearGradient {
                start: [0.0, 0.0],
                end: [0.0, h],
                stops: vec![(0.0, top), (1.0, bottom)],
            },
            z,
        );
    }
}

/// Repeating image layer that scrolls at a constant speed and shifts with
/// the camera by a parallax factor. The scroll phase wraps at the tile
/// size, so it never grows unbounded.
pub struct TileLayer {
    image: PathBuf,
    tile_size: [f32; 2],
    speed: [f32; 2],
    parallax: [f32; 2],
    scroll: [f32; 2],
    camera: [f32; 2],
    tint: Option<Color>,
}

impl TileLayer {
    pub fn new(image: impl Into<PathBuf>, tile_size: [f32; 2]) -> TileLayer {
        TileLayer {
            image: image.into(),
            tile_size,
            speed: [0.0, 0.0],
            parallax: [0.0, 0.0],
            scroll: [0.0, 0.0],
            camera: [0.0, 0.0],
            tint: None,
        }
    }

    pub fn with_speed(mut self, speed: [f32; 2]) -> TileLayer {
        self.speed = speed;
        self
    }

    pub fn with_parallax(mut self, parallax: [f32; 2]) -> TileLayer {
        self.parallax = parallax;
        self
    }

    pub fn with_tint(mut self, tint: Color) -> TileLayer {
        self.tint = Some(tint);
        self
    }

    pub fn set_camera(&mut self, camera: [f32; 2]) {
        self.camera = camera;
    }

    /// Effective offset in [0, tile_size) per axis.
    pub fn offset(&self) -> [f32; 2] {
        let mut out = [0.0f32; 2];
        for axis in 0..2 {
            let tile = self.tile_size[axis].max(1.0);
            let raw = self.scroll[axis] + self.camera[axis] * self.parallax[axis];
            out[axis] = raw.rem_euclid(tile);
        }
        out
    }
}

impl BackgroundLayer for TileLayer {
    fn update(&mut self, dt: f32) {
        for axis in 0..2 {
            let tile = self.tile_size[axis].max(1.0);
            self.scroll[axis] = (self.scroll[axis] + self.speed[axis] * dt).rem_euclid(tile);
        }
    }

    fn draw(&self, canvas: &mut Canvas, viewport: Viewport, _palette: &Palette, z: i32) {
        let [ox, oy] = self.offset();
        let w = viewport.width as f32;
        let h = viewport.height as f32;
        canvas.push_clip_rect(Rect::new(0.0, 0.0, w, h));
        canvas.push_translate(-ox, -oy);
        // One extra tile on each axis covers the wrapped edge.
        canvas.draw_image(
            self.image.clone(),
            [0.0, 0.0],
            [w + self.tile_size[0], h + self.tile_size[1]],
            ImageFit::Tile,
            self.tint,
            z,
        );
        canvas.pop_transform();
        canvas.pop_clip();
    }
}

/// Translucent full-surface scrim drawn above the other layers.
pub struct OverlayLayer {
    pub color: Color,
}

impl OverlayLayer {
    pub fn dim(alpha: u8) -> OverlayLayer {
        OverlayLayer {
            color: Color::rgba(0, 0, 0, alpha),
        }
    }
}

impl BackgroundLayer for OverlayLayer {
    fn draw(&self, canvas: &mut Canvas, viewport: Viewport, _palette: &Palette, z: i32) {
        canvas.fill_rect(
            0.0,
            0.0,
            viewport.width as f32,
            viewport.height as f32,
            Brush::Solid(self.color),
            z,
        );
    }
}

/// Depth band reserved per layer.
const LAYER_Z_STRIDE: i32 = 4;

/// Owns a scene's background layers in composition order.
#[derive(Default)]
pub struct BackgroundSystem {
    layers: Vec<Box<dyn BackgroundLayer>>,
}

impl BackgroundSystem {
    pub fn new() -> BackgroundSystem {
        BackgroundSystem { layers: Vec::new() }
    }

    pub fn push(&mut self, layer: impl BackgroundLayer + 'static) -> &mut BackgroundSystem {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn update(&mut self, dt: f32) {
        for layer in &mut self.layers {
            layer.update(dt);
        }
    }

    /// Draw all layers starting at depth `z`, bottom of the stack first.
    pub fn draw(&self, canvas: &mut Canvas, viewport: Viewport, palette: &Palette, z: i32) {
        for (i, layer) in self.layers.iter().enumerate() {
            layer.draw(canvas, viewport, palette, z + i as i32 * LAYER_Z_STRIDE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foxkit_core::Command;

    fn viewport() -> Viewport {
        Viewport {
            width: 320,
            height: 200,
        }
    }

    #[test]
    fn tile_scroll_wraps_at_tile_size() {
        let mut layer = TileLayer::new("bg.png", [64.0, 64.0]).with_speed([32.0, 0.0]);
        for _ in 0..10 {
            layer.update(0.5);
        }
        // 10 * 16px = 160px of travel, wrapped into [0, 64).
        let [ox, oy] = layer.offset();
        assert!((ox - 32.0).abs() < 0.001);
        assert_eq!(oy, 0.0);
    }

    #[test]
    fn parallax_shifts_with_camera() {
        let mut layer = TileLayer::new("bg.png", [100.0, 100.0]).with_parallax([0.5, 0.0]);
        layer.set_camera([30.0, 999.0]);
        let [ox, oy] = layer.offset();
        assert_eq!(ox, 15.0);
        assert_eq!(oy, 0.0);
    }

    #[test]
    fn layers_draw_in_stack_order() {
        let mut bg = BackgroundSystem::new();
        bg.push(SolidLayer::themed());
        bg.push(GradientLayer::new(Color::rgb(0, 0, 0), Color::rgb(20, 20, 20)));
        bg.push(OverlayLayer::dim(80));
        let mut canvas = Canvas::new(viewport());
        let palette = crate::theme::Palette::dark();
        bg.draw(&mut canvas, viewport(), &palette, 0);
        let list = canvas.finish();
        let zs: Vec<i32> = list.commands.iter().filter_map(|c| c.z()).collect();
        assert_eq!(zs.len(), 3);
        assert!(zs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn themed_gradient_tracks_palette() {
        let layer = GradientLayer::themed();
        let palette = crate::theme::Palette::light();
        let mut canvas = Canvas::new(viewport());
        layer.draw(&mut canvas, viewport(), &palette, 0);
        let list = canvas.finish();
        match &list.commands[0] {
            Command::DrawRect { brush, .. } => {
                let Brush::LinearGradient { stops, .. } = brush else {
                    panic!("expected a gradient brush");
                };
                assert_eq!(stops[0].1, palette.bg);
                assert_eq!(stops[1].1, palette.panel);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn themed_solid_tracks_palette() {
        let bg_layer = SolidLayer::themed();
        let palette = crate::theme::Palette::light();
        let mut canvas = Canvas::new(viewport());
        bg_layer.draw(&mut canvas, viewport(), &palette, 0);
        let list = canvas.finish();
        match &list.commands[0] {
            Command::DrawRect { brush, .. } => {
                assert_eq!(*brush, Brush::Solid(palette.bg));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

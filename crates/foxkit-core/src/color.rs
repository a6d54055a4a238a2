use palette::{FromColor, LinSrgba, Srgba};

use crate::ColorLinPremul;

impl ColorLinPremul {
    /// Build from 8-bit sRGB channels. The result lives in linear space
    /// with the alpha multiplied through, which is what the blend math in
    /// the raster backend expects.
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let s = Srgba::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        );
        let lin = LinSrgba::from_color(s);
        Self {
            r: lin.red * lin.alpha,
            g: lin.green * lin.alpha,
            b: lin.blue * lin.alpha,
            a: lin.alpha,
        }
    }

    /// Opaque sRGB color.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Back to 8-bit sRGB, un-premultiplying first. Mostly for tests and
    /// debug output.
    pub fn to_srgba_u8(&self) -> [u8; 4] {
        let (r, g, b) = if self.a > 0.0001 {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        } else {
            (0.0, 0.0, 0.0)
        };
        let srgb = Srgba::from_color(LinSrgba::new(r, g, b, self.a));
        [
            (srgb.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

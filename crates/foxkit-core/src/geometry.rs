//! Axis-aligned geometry used throughout the widget layer.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        // Widget regions are always non-negative in size.
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Grow (positive) or shrink (negative) the rect around its center.
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx, self.y - dy, self.w + 2.0 * dx, self.h + 2.0 * dy)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.w * 0.5, self.y + self.h * 0.5]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoundedRadii {
    pub tl: f32,
    pub tr: f32,
    pub br: f32,
    pub bl: f32,
}

impl RoundedRadii {
    pub fn uniform(r: f32) -> Self {
        Self {
            tl: r,
            tr: r,
            br: r,
            bl: r,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    pub rect: Rect,
    pub radii: RoundedRadii,
}

impl RoundedRect {
    pub fn uniform(rect: Rect, radius: f32) -> Self {
        Self {
            rect,
            radii: RoundedRadii::uniform(radius),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ClipRect(pub Rect);

#[derive(Clone, Copy, Debug)]
pub struct Stroke {
    pub width: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

#[derive(Clone, Debug)]
pub enum PathCmd {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    Close,
}

#[derive(Clone, Debug)]
pub struct Path {
    pub cmds: Vec<PathCmd>,
    pub fill_rule: FillRule,
}

impl Path {
    pub fn new() -> Self {
        Self {
            cmds: Vec::new(),
            fill_rule: FillRule::NonZero,
        }
    }

    /// Single straight segment, the common case for carets and separators.
    pub fn line(from: [f32; 2], to: [f32; 2]) -> Self {
        Self {
            cmds: vec![PathCmd::MoveTo(from), PathCmd::LineTo(to)],
            fill_rule: FillRule::NonZero,
        }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Transform2D {
    // Affine 2D: [a, b, c, d, e, f] for matrix [[a c e],[b d f],[0 0 1]]
    pub m: [f32; 6],
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// Compose two transforms: self ∘ other (apply `other`, then `self`).
    pub fn concat(self, other: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.m;
        let [a2, b2, c2, d2, e2, f2] = other.m;
        Self {
            m: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * e2 + c1 * f2 + e1,
                b1 * e2 + d1 * f2 + f1,
            ],
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_clamps_negative_size() {
        let r = Rect::new(10.0, 10.0, -5.0, -1.0);
        assert_eq!(r.w, 0.0);
        assert_eq!(r.h, 0.0);
        assert!(!r.contains(10.0, 10.0));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.9, 9.9));
        assert!(!r.contains(10.0, 5.0));
    }

    #[test]
    fn transform_concat_translates() {
        let t = Transform2D::translate(3.0, 4.0).concat(Transform2D::translate(1.0, 2.0));
        assert_eq!(t.m[4], 4.0);
        assert_eq!(t.m[5], 6.0);
    }
}

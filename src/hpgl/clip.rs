// src/hpgl/clip.rs

//! Cohen-Sutherland line clipping against the soft-clip window.

use bitflags::bitflags;

use super::Point;

bitflags! {
    /// Region code of a point relative to the clip rectangle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Outcode: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const BOTTOM = 4;
        const TOP = 8;
    }
}

/// The soft-clip window set by `IW`, in integer plotter units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl ClipWindow {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        ClipWindow {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && y >= self.y_min && x <= self.x_max && y <= self.y_max
    }

    fn outcode(&self, p: Point) -> Outcode {
        let mut code = Outcode::empty();
        if p.x < self.x_min as f64 {
            code |= Outcode::LEFT;
        } else if p.x > self.x_max as f64 {
            code |= Outcode::RIGHT;
        }
        if p.y < self.y_min as f64 {
            code |= Outcode::BOTTOM;
        } else if p.y > self.y_max as f64 {
            code |= Outcode::TOP;
        }
        code
    }

    /// Clips the segment from `a` to `b` in place.
    ///
    /// Returns `false` when the segment lies entirely outside the window;
    /// `a` and `b` are then left in an unspecified partially-clipped state.
    pub fn clip_segment(&self, a: &mut Point, b: &mut Point) -> bool {
        let mut code_a = self.outcode(*a);
        let mut code_b = self.outcode(*b);

        loop {
            if (code_a | code_b).is_empty() {
                return true; // trivially inside
            }
            if !(code_a & code_b).is_empty() {
                return false; // trivially outside
            }
            // Move one outside endpoint onto the window edge it violates.
            let out = if !code_a.is_empty() { code_a } else { code_b };
            let p = if out.contains(Outcode::TOP) {
                Point::new(
                    a.x + (b.x - a.x) * (self.y_max as f64 - a.y) / (b.y - a.y),
                    self.y_max as f64,
                )
            } else if out.contains(Outcode::BOTTOM) {
                Point::new(
                    a.x + (b.x - a.x) * (self.y_min as f64 - a.y) / (b.y - a.y),
                    self.y_min as f64,
                )
            } else if out.contains(Outcode::RIGHT) {
                Point::new(
                    self.x_max as f64,
                    a.y + (b.y - a.y) * (self.x_max as f64 - a.x) / (b.x - a.x),
                )
            } else {
                Point::new(
                    self.x_min as f64,
                    a.y + (b.y - a.y) * (self.x_min as f64 - a.x) / (b.x - a.x),
                )
            };
            if out == code_a {
                *a = p;
                code_a = self.outcode(*a);
            } else {
                *b = p;
                code_b = self.outcode(*b);
            }
        }
    }
}

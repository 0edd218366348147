// src/hpgl/scale.rs

//! The P1/P2 scaling frame and the user/plotter coordinate transforms.

use super::clip::ClipWindow;
use super::{PaperSize, Point};

/// Factory default for the lower-left scaling point P1.
pub const P1_DEFAULT: Point = Point::new(250.0, 279.0);
/// Factory default for the upper-right scaling point P2.
pub const P2_DEFAULT: Point = Point::new(10250.0, 7479.0);

/// Scaling points, user window and hard-clip limits.
///
/// `q` holds the per-axis ratio (P2-P1)/(S2-S1); with scaling off it is
/// (1, 1) and S mirrors P, so the transforms degenerate to the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleFrame {
    pub p1: Point,
    pub p2: Point,
    pub s1: Point,
    pub s2: Point,
    pub q: Point,
    pub window: ClipWindow,
    pub hw_limit: Point,
}

impl ScaleFrame {
    pub fn new(paper: PaperSize) -> Self {
        let hw = paper.hardware_limit();
        ScaleFrame {
            p1: P1_DEFAULT,
            p2: P2_DEFAULT,
            s1: P1_DEFAULT,
            s2: P2_DEFAULT,
            q: Point::new(1.0, 1.0),
            window: ClipWindow::new(0, 0, hw.x.floor() as i32, hw.y.floor() as i32),
            hw_limit: hw,
        }
    }

    pub fn user_to_plotter(&self, p: Point) -> Point {
        Point::new(
            self.p1.x + (p.x - self.s1.x) * self.q.x,
            self.p1.y + (p.y - self.s1.y) * self.q.y,
        )
    }

    pub fn plotter_to_user(&self, p: Point) -> Point {
        Point::new(
            self.s1.x + (p.x - self.p1.x) / self.q.x,
            self.s1.y + (p.y - self.p1.y) / self.q.y,
        )
    }

    /// Length of the P1-P2 diagonal, the base of the pattern length.
    pub fn diagonal(&self) -> f64 {
        (self.p2.x - self.p1.x).hypot(self.p2.y - self.p1.y)
    }

    /// Re-derives `q` from the current scaling points.
    pub fn derive_q(&mut self) {
        self.q.x = (self.p2.x - self.p1.x) / (self.s2.x - self.s1.x);
        self.q.y = (self.p2.y - self.p1.y) / (self.s2.y - self.s1.y);
    }
}

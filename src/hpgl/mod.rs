// src/hpgl/mod.rs

//! The HP-GL command processor core.
//!
//! This module owns everything between a decoded command line and the
//! primitive records sent back to the frontend: mnemonic lookup, parameter
//! scanning, the scaling frame, the clip window, line-type generation,
//! vector-font label drawing and the dispatching `Plotter` itself.

#[cfg(test)]
mod tests;

pub mod charset;
pub mod clip;
pub mod commands;
pub mod emulator;
pub mod params;
pub mod scale;
pub mod style;
pub mod text;

pub use commands::Mnemonic;
pub use emulator::{Plotter, PlotterState, Status};

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Smallest coordinate the firmware accepts or emits (plotter units).
pub const COORD_MIN: f64 = -32768.0;
/// Largest coordinate the firmware accepts or emits (plotter units).
pub const COORD_MAX: f64 = 32767.0;

/// A point in plotter or user units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Rounds a plotter coordinate to the integer grid of the output records.
pub(crate) fn round_coord(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Paper formats selectable through the paper-size switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Us,
}

impl PaperSize {
    /// Hard-clip limits of the plotting area for this format.
    pub fn hardware_limit(self) -> Point {
        match self {
            PaperSize::A4 => Point::new(10900.0, 7650.0),
            PaperSize::Us => Point::new(10300.0, 7650.0),
        }
    }
}

// src/hpgl/text.rs

//! Label-drawing parameters and the text cursor.
//!
//! Character cells are described by a width/height pair in plotter units
//! plus slant and direction; `adjust` folds those into a 2x2 matrix that
//! maps glyph grid coordinates to the page, and into the character and
//! line advance vectors. The reference point is the live text cursor,
//! the CR point is where a carriage return rewinds to.

use super::Point;

/// Control codes honored inside a label.
pub mod ctrl {
    pub const BS: u8 = 0x08;
    pub const HT: u8 = 0x09;
    pub const LF: u8 = 0x0a;
    pub const VT: u8 = 0x0b;
    pub const CR: u8 = 0x0d;
    pub const SO: u8 = 0x0e;
    pub const SI: u8 = 0x0f;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    /// Character cell width and height in plotter units.
    pub width: f64,
    pub height: f64,
    /// Character and line pitch derived from the cell size.
    pub space: f64,
    pub line: f64,
    /// Extra spacing relative to `space` / `line`.
    pub espace: f64,
    pub eline: f64,
    /// Writing direction in radians.
    pub dir: f64,
    /// Slant as the tangent of the lean angle.
    pub slant: f64,
    /// Active, designated-standard and designated-alternate sets (0..=4).
    pub font: u8,
    pub stdfont: u8,
    pub altfont: u8,
    /// Glyph-grid-to-page matrix.
    pub txx: f64,
    pub txy: f64,
    pub tyx: f64,
    pub tyy: f64,
    /// Advance to the next character origin / next line.
    pub chardiff: Point,
    pub linediff: Point,
    /// The text cursor.
    pub refpoint: Point,
    /// Where a carriage return returns to.
    pub cr_point: Point,
    /// Symbol-mode centering offset.
    pub offset: Point,
    /// Pending cursor offset from a CP command, consumed by the next label.
    pub ref_offset: Point,
}

impl TextFrame {
    pub fn new(p1: Point, p2: Point, pen_pos: Point) -> Self {
        let mut frame = TextFrame {
            width: 0.0,
            height: 0.0,
            space: 0.0,
            line: 0.0,
            espace: 0.0,
            eline: 0.0,
            dir: 0.0,
            slant: 0.0,
            font: 0,
            stdfont: 0,
            altfont: 0,
            txx: 0.0,
            txy: 0.0,
            tyx: 0.0,
            tyy: 0.0,
            chardiff: Point::default(),
            linediff: Point::default(),
            refpoint: Point::default(),
            cr_point: Point::default(),
            offset: Point::default(),
            ref_offset: Point::default(),
        };
        frame.reset(p1, p2, pen_pos);
        frame
    }

    /// Restores the power-on text parameters for the given scaling points.
    pub fn reset(&mut self, p1: Point, p2: Point, pen_pos: Point) {
        self.width = 0.0075 * (p2.x - p1.x);
        self.height = 0.015 * (p2.y - p1.y);
        self.espace = 0.0;
        self.eline = 0.0;
        self.dir = 0.0;
        self.slant = 0.0;
        self.font = 0;
        self.stdfont = 0;
        self.altfont = 0;
        self.refpoint = pen_pos;
        self.cr_point = pen_pos;
        self.offset = Point::default();
        self.ref_offset = Point::default();
        self.adjust();
    }

    /// Re-derives the matrix and advance vectors from width, height,
    /// direction and slant.
    pub fn adjust(&mut self) {
        self.space = self.width * 1.5;
        self.line = self.height * 2.0;

        let cdir = self.dir.cos();
        let sdir = self.dir.sin();
        self.txx = self.width * cdir / 4.0;
        self.tyx = self.width * sdir / 4.0;
        self.txy = self.height * (self.slant * cdir - sdir) / 6.0;
        self.tyy = self.height * (self.slant * sdir + cdir) / 6.0;

        let pitch = self.space * (1.0 + self.espace);
        self.chardiff = Point::new(pitch * cdir, pitch * sdir);
        let lead = self.line * (1.0 + self.eline);
        self.linediff = Point::new(lead * sdir, -lead * cdir);
    }

    /// Maps a glyph grid coordinate onto the page.
    pub fn glyph_point(&self, gx: f64, gy: f64) -> Point {
        Point::new(
            self.txx * gx + self.txy * gy + self.refpoint.x + self.offset.x,
            self.tyx * gx + self.tyy * gy + self.refpoint.y + self.offset.y,
        )
    }
}

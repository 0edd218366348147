// src/hpgl/style.rs

//! Line-type patterns and the dash-generation state.

use once_cell::sync::Lazy;

/// Lowest pattern index (the adaptive variants).
pub const LT_MIN: i32 = -8;
/// Highest pattern index.
pub const LT_MAX: i32 = 8;
/// Maximum number of percentage elements a user pattern may carry.
pub const LT_ELEMENTS: usize = 20;
/// Fraction of the pattern length treated as "close enough" when deciding
/// whether a residue still deserves a pattern pass.
pub const LT_PATTERN_TOL: f64 = 0.005;

const LT_SLOTS: usize = (LT_MAX - LT_MIN + 1) as usize;
// One spare slot: deriving an adaptive variant from an even-length
// pattern appends one element.
const LT_CAPACITY: usize = LT_ELEMENTS + 1;

/// How the line generator interprets the current pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    #[default]
    Solid,
    /// Whole patterns stretched to fit each segment.
    Adaptive,
    /// A single point at the segment end.
    PlotAt,
    /// Fixed-length patterns with the phase carried across segments.
    Fixed,
}

/// One dash pattern: alternating line/gap percentages, starting with a line.
/// A line of zero length is a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pattern {
    elems: [f64; LT_CAPACITY],
    len: usize,
}

impl Pattern {
    pub const EMPTY: Pattern = Pattern {
        elems: [0.0; LT_CAPACITY],
        len: 0,
    };

    /// Builds a pattern from at most [`LT_ELEMENTS`] percentage elements.
    pub fn new(elems: &[f64]) -> Pattern {
        let mut pat = Pattern::EMPTY;
        for &e in elems.iter().take(LT_ELEMENTS) {
            pat.elems[pat.len] = e;
            pat.len += 1;
        }
        pat
    }

    pub fn elements(&self) -> &[f64] {
        &self.elems[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, e: f64) {
        if self.len < LT_CAPACITY {
            self.elems[self.len] = e;
            self.len += 1;
        }
    }

    /// Rescales the elements to sum to 100 when they stray by more than 0.5.
    fn normalize(&mut self) {
        let sum: f64 = self.elements().iter().sum();
        if (sum - 100.0).abs() > 0.5 && sum > 0.0 {
            let factor = 100.0 / sum;
            for e in self.elems[..self.len].iter_mut() {
                *e *= factor;
            }
        }
    }
}

/// The 17 pattern slots, indexed -8..=8.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    slots: [Pattern; LT_SLOTS],
}

static DEFAULT_TABLE: Lazy<StyleTable> = Lazy::new(|| {
    let mut t = StyleTable {
        slots: [Pattern::EMPTY; LT_SLOTS],
    };
    // Negative slots hold the adaptive variants of their positive twins.
    t.set(-8, &[25.0, 10.0, 0.0, 10.0, 10.0, 10.0, 0.0, 10.0, 25.0]);
    t.set(-7, &[35.0, 10.0, 0.0, 10.0, 0.0, 10.0, 35.0]);
    t.set(-6, &[25.0, 10.0, 10.0, 10.0, 10.0, 10.0, 25.0]);
    t.set(-5, &[35.0, 10.0, 10.0, 10.0, 35.0]);
    t.set(-4, &[40.0, 10.0, 0.0, 10.0, 40.0]);
    t.set(-3, &[35.0, 30.0, 35.0]);
    t.set(-2, &[25.0, 50.0, 25.0]);
    t.set(-1, &[0.0, 100.0, 0.0]);
    t.set(0, &[0.0, 100.0]);
    t.set(1, &[0.0, 100.0]);
    t.set(2, &[50.0, 50.0]);
    t.set(3, &[70.0, 30.0]);
    t.set(4, &[80.0, 10.0, 0.0, 10.0]);
    t.set(5, &[70.0, 10.0, 10.0, 10.0]);
    t.set(6, &[50.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
    t.set(7, &[70.0, 10.0, 0.0, 10.0, 0.0, 10.0]);
    t.set(8, &[50.0, 10.0, 0.0, 10.0, 10.0, 10.0, 0.0, 10.0]);
    t
});

impl Default for StyleTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl StyleTable {
    fn slot(index: i32) -> usize {
        (index - LT_MIN) as usize
    }

    pub fn pattern(&self, index: i32) -> &Pattern {
        &self.slots[Self::slot(index)]
    }

    fn set(&mut self, index: i32, elems: &[f64]) {
        let mut pat = Pattern::new(elems);
        pat.normalize();
        self.slots[Self::slot(index)] = pat;
    }

    pub fn reset_defaults(&mut self) {
        *self = StyleTable::default();
    }

    /// Installs a user pattern (normalized) and derives its adaptive
    /// variant at the mirrored index.
    ///
    /// A pattern ending in a gap gets half its leading element appended so
    /// adaptive repeats start and end with visible ink; a pattern ending in
    /// a line gets its first and last elements averaged into both ends.
    pub fn define(&mut self, index: i32, elems: &[f64]) {
        self.set(index, elems);
        let pat = *self.pattern(index);
        let e = pat.elements();
        let mut adaptive = Pattern::EMPTY;
        if !e.is_empty() {
            if e.len() % 2 == 0 {
                // ends with a gap
                adaptive.push(e[0] / 2.0);
                for &v in &e[1..] {
                    adaptive.push(v);
                }
                adaptive.push(e[0] / 2.0);
            } else {
                // ends with a line
                let merged = (e[0] + e[e.len() - 1]) / 2.0;
                adaptive.push(merged);
                for &v in &e[1..e.len() - 1] {
                    adaptive.push(v);
                }
                adaptive.push(merged);
            }
        }
        self.slots[Self::slot(-index)] = adaptive;
    }
}

/// The mutable line-style state of the plotter.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub table: StyleTable,
    pub mode: LineMode,
    pub pattern: i32,
    /// Pattern length in plotter units (default 4% of the P1-P2 diagonal).
    pub pattern_len: f64,
    /// Phase within the pattern, carried across segments in fixed mode.
    pub phase: f64,
}

impl LineStyle {
    pub fn new(diagonal: f64) -> Self {
        LineStyle {
            table: StyleTable::default(),
            mode: LineMode::Solid,
            pattern: 0,
            pattern_len: 0.04 * diagonal,
            phase: 0.0,
        }
    }

    pub fn reset(&mut self, diagonal: f64) {
        self.table.reset_defaults();
        self.mode = LineMode::Solid;
        self.pattern = 0;
        self.pattern_len = 0.04 * diagonal;
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(p: &Pattern) -> f64 {
        p.elements().iter().sum()
    }

    #[test]
    fn default_patterns_sum_to_100() {
        let t = StyleTable::default();
        for idx in LT_MIN..=LT_MAX {
            let s = sum(t.pattern(idx));
            assert!((s - 100.0).abs() <= 0.5, "pattern {idx} sums to {s}");
        }
    }

    #[test]
    fn user_pattern_is_renormalized() {
        let mut t = StyleTable::default();
        t.define(3, &[10.0, 10.0, 20.0]);
        let s = sum(t.pattern(3));
        assert!((s - 100.0).abs() <= 0.5, "sums to {s}");
        // proportions survive the rescale
        let e = t.pattern(3).elements();
        assert!((e[0] - 25.0).abs() < 1e-9);
        assert!((e[2] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn adaptive_variant_of_gap_ended_pattern() {
        let mut t = StyleTable::default();
        t.define(2, &[60.0, 40.0]);
        let e = t.pattern(-2).elements();
        assert_eq!(e.len(), 3);
        assert!((e[0] - 30.0).abs() < 1e-9);
        assert!((e[1] - 40.0).abs() < 1e-9);
        assert!((e[2] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn adaptive_variant_of_line_ended_pattern() {
        let mut t = StyleTable::default();
        t.define(3, &[40.0, 30.0, 30.0]);
        let e = t.pattern(-3).elements();
        assert_eq!(e.len(), 3);
        assert!((e[0] - 35.0).abs() < 1e-9);
        assert!((e[1] - 30.0).abs() < 1e-9);
        assert!((e[2] - 35.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_patterns_are_truncated() {
        let elems = vec![5.0; 40];
        let p = Pattern::new(&elems);
        assert_eq!(p.elements().len(), LT_ELEMENTS);
    }

    #[test]
    fn empty_definition_yields_empty_slots() {
        let mut t = StyleTable::default();
        t.define(4, &[]);
        assert!(t.pattern(4).is_empty());
        assert!(t.pattern(-4).is_empty());
    }
}

// src/emit.rs

//! Output records sent to the frontend.
//!
//! Each record is one line on stdout, led by its numeric tag. Vector
//! records carry integer plotter coordinates and a trailing `C` marker
//! when clipping moved the endpoint off its commanded position.

use std::fmt;

/// The three vector record kinds, in wire order after `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKind {
    MoveTo,
    DrawTo,
    PlotAt,
}

impl VectorKind {
    fn tag(self) -> u8 {
        match self {
            VectorKind::MoveTo => 1,
            VectorKind::DrawTo => 2,
            VectorKind::PlotAt => 3,
        }
    }
}

/// One reply line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// 0 - drop all drawn content.
    Clear,
    /// 1/2/3 - pen movement on the integer output grid.
    Vector {
        kind: VectorKind,
        x: i32,
        y: i32,
        clipped: bool,
    },
    /// 4 - pen change.
    SetPen(i16),
    /// 5 - payload of an output instruction (OA, OC, OE, ...).
    Output(String),
    /// 6 - status byte, error code and terminator after every command.
    Status { status: u8, error: u8, term: u8 },
    /// 7 - human-readable error message.
    Emsg(&'static str),
    /// 8 / 9 - digitizing started / cancelled.
    DigiStart,
    DigiClear,
    /// 10 - scaling points moved.
    P1P2 { p1x: i32, p1y: i32, p2x: i32, p2y: i32 },
    /// 11 - end of the reply for one command.
    Eof,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Clear => write!(f, "0"),
            Record::Vector {
                kind,
                x,
                y,
                clipped,
            } => {
                write!(f, "{} {} {}", kind.tag(), x, y)?;
                if *clipped {
                    write!(f, " C")?;
                }
                Ok(())
            }
            Record::SetPen(pen) => write!(f, "4 {pen}"),
            Record::Output(s) => write!(f, "5 {s}"),
            Record::Status {
                status,
                error,
                term,
            } => write!(f, "6 {status} {error} {term}"),
            Record::Emsg(msg) => write!(f, "7 {msg}"),
            Record::DigiStart => write!(f, "8"),
            Record::DigiClear => write!(f, "9"),
            Record::P1P2 {
                p1x,
                p1y,
                p2x,
                p2y,
            } => write!(f, "10 {p1x} {p1y} {p2x} {p2y}"),
            Record::Eof => write!(f, "11"),
        }
    }
}

/// Collects the records produced while one command executes.
#[derive(Debug, Default)]
pub struct Emitter {
    records: Vec<Record>,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Drains everything emitted so far, in order.
    pub fn take(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_per_record() {
        assert_eq!(Record::Clear.to_string(), "0");
        assert_eq!(
            Record::Vector {
                kind: VectorKind::DrawTo,
                x: 120,
                y: -3,
                clipped: false
            }
            .to_string(),
            "2 120 -3"
        );
        assert_eq!(
            Record::Vector {
                kind: VectorKind::MoveTo,
                x: 0,
                y: 7650,
                clipped: true
            }
            .to_string(),
            "1 0 7650 C"
        );
        assert_eq!(Record::SetPen(2).to_string(), "4 2");
        assert_eq!(Record::Output("40,40".into()).to_string(), "5 40,40");
        assert_eq!(
            Record::Status {
                status: 0x08,
                error: 0,
                term: 3
            }
            .to_string(),
            "6 8 0 3"
        );
        assert_eq!(Record::Emsg("Value out of range").to_string(), "7 Value out of range");
        assert_eq!(
            Record::P1P2 {
                p1x: 250,
                p1y: 279,
                p2x: 10250,
                p2y: 7479
            }
            .to_string(),
            "10 250 279 10250 7479"
        );
        assert_eq!(Record::Eof.to_string(), "11");
    }

    #[test]
    fn take_drains_in_order() {
        let mut e = Emitter::new();
        e.push(Record::Clear);
        e.push(Record::Eof);
        assert_eq!(e.take(), vec![Record::Clear, Record::Eof]);
        assert!(e.records().is_empty());
    }
}

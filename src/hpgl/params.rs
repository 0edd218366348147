// src/hpgl/params.rs

//! Parameter scanning over one decoded command line.
//!
//! The scanner starts just past the two mnemonic bytes and consumes
//! parameters lazily: numbers separated by commas or blanks, raw bytes
//! for the single-character instructions (DT, SM) and terminator-delimited
//! label text for LB.

/// A cursor over the bytes of one command.
#[derive(Debug)]
pub struct ParamReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ParamReader<'a> {
    /// `buf` holds the full command including the two mnemonic bytes.
    pub fn new(buf: &'a [u8]) -> Self {
        ParamReader { buf, pos: 2 }
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Scans the next number, skipping leading commas and blanks.
    ///
    /// Accepts an optional sign, an integer part and a fractional part;
    /// no exponent notation. Returns `None` when no digit is found, which
    /// also covers a bare sign.
    pub fn number(&mut self) -> Option<f64> {
        while matches!(self.peek(), Some(b' ') | Some(b',')) {
            self.pos += 1;
        }
        let negative = match self.peek() {
            Some(b'+') => {
                self.pos += 1;
                false
            }
            Some(b'-') => {
                self.pos += 1;
                true
            }
            _ => false,
        };
        let mut value = 0.0f64;
        let mut found = false;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            found = true;
            value = value * 10.0 + f64::from(c - b'0');
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            let mut divisor = 10.0f64;
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                found = true;
                value += f64::from(c - b'0') / divisor;
                divisor *= 10.0;
                self.pos += 1;
            }
        }
        if !found {
            return None;
        }
        Some(if negative { -value } else { value })
    }

    /// Consumes and returns the next raw byte, unparsed.
    pub fn raw_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Collects label text up to `term` or the end of the command.
    ///
    /// When the terminator is found and the terminator is not silent, it is
    /// kept as part of the label (and will be drawn like any character).
    pub fn label(&mut self, term: u8, silent: bool) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == term {
                if !silent {
                    out.push(c);
                }
                return out;
            }
            out.push(c);
        }
        out
    }
}

// src/protocol.rs

//! The framed command protocol on standard input.
//!
//! Each frame is one line: a two-digit hex status byte, one space, then
//! the command body as hex pairs (blanks allowed between pairs, never
//! inside one), terminated by a line feed. A malformed or truncated
//! frame is fatal; the stream carries no way to resynchronize.

use anyhow::{bail, Context, Result};
use std::io::BufRead;

/// One decoded input frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Status byte the emulator adopts before executing the command.
    pub status: u8,
    /// The decoded command bytes.
    pub body: Vec<u8>,
}

/// Reads and decodes the next frame; `None` at end of input.
pub fn read_frame(input: &mut impl BufRead) -> Result<Option<Frame>> {
    let mut line = Vec::new();
    let n = input
        .read_until(b'\n', &mut line)
        .context("reading command frame")?;
    if n == 0 {
        return Ok(None);
    }
    if line.pop() != Some(b'\n') {
        bail!("truncated frame: missing line feed");
    }
    parse_frame(&line).map(Some)
}

/// Decodes one frame line (without its line feed).
pub fn parse_frame(line: &[u8]) -> Result<Frame> {
    if line.len() < 3 || line[2] != b' ' {
        bail!("malformed frame header");
    }
    let status = hex_pair(line[0], line[1])?;
    let mut body = Vec::with_capacity((line.len() - 3) / 2);
    let mut rest = &line[3..];
    loop {
        while let Some((b' ', tail)) = rest.split_first().map(|(&b, t)| (b, t)) {
            rest = tail;
        }
        let Some((&hi, tail)) = rest.split_first() else {
            break;
        };
        let Some((&lo, tail)) = tail.split_first() else {
            bail!("truncated hex pair in frame body");
        };
        body.push(hex_pair(hi, lo)?);
        rest = tail;
    }
    Ok(Frame { status, body })
}

fn hex_pair(hi: u8, lo: u8) -> Result<u8> {
    Ok(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

fn hex_digit(c: u8) -> Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => bail!("invalid hex digit {:?} in frame", c as char),
    }
}

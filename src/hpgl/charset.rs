// src/hpgl/charset.rs

//! Stroke tables for the vector font.
//!
//! Each glyph is a byte string; each byte encodes one move/draw action:
//!
//! ```text
//! bit:  7 6 5 4 3 2 1 0
//!       p x x x y y y y
//! ```
//!
//! `p` set means "draw to" the grid point, clear means "move to" it.
//! The glyph grid is 5x7 with the baseline at y = 4, so descenders fit
//! without sign bits. [`decode`] shifts the grid so the character origin
//! lands at (0, -4)..(7, 11) relative to the reference point.
//!
//! `BASE` holds codes 0x00..0x7f, `EXTENDED` the 8-bit range used by the
//! default set. Sets 1 through 4 share the base strokes but differ in
//! which codes back up over the previous character to overstrike accents,
//! and they reject 8-bit codes outright.

/// One glyph as a packed move/draw byte string.
pub type Strokes = &'static [u8];

/// Unpacks one stroke byte into (draw flag, grid x, grid y).
pub fn decode(b: u8) -> (bool, f64, f64) {
    let draw = b & 0x80 != 0;
    let x = f64::from((b >> 4) & 0x07) - 1.0;
    let y = f64::from(b & 0x0f) - 4.0;
    (draw, x, y)
}

/// Strokes for a 7-bit code.
pub fn base_glyph(code: u8) -> Strokes {
    BASE[(code & 0x7f) as usize]
}

/// Strokes for an 8-bit code in the default set (code 0x80 maps to
/// entry 0 of the extended table).
pub fn extended_glyph(code: u8) -> Strokes {
    EXTENDED[(code & 0x7f) as usize]
}

/// Whether `code` overstrikes the previous character in the given set.
///
/// The accented national sets draw their diacritics by backing the
/// reference point up one character cell before plotting.
pub fn accent_backspace(font: u8, code: u8) -> bool {
    match font {
        1 => matches!(code, 95 | 96 | 126),
        2 => matches!(code, 39 | 94 | 95 | 96 | 123 | 124 | 125),
        3 => code == 95 || code >= 123,
        4 => matches!(code, 39 | 94 | 95) || code >= 123,
        _ => false,
    }
}

static BASE: [Strokes; 128] = [
    b"", // 0x00
    b"", // 0x01
    b"", // 0x02
    b"", // 0x03
    b"", // 0x04
    b"", // 0x05
    b"", // 0x06
    b"", // 0x07
    b"", // 0x08
    b"", // 0x09
    b"", // 0x0a
    b"", // 0x0b
    b"", // 0x0c
    b"", // 0x0d
    b"", // 0x0e
    b"", // 0x0f
    b"", // 0x10
    b"", // 0x11
    b"", // 0x12
    b"", // 0x13
    b"", // 0x14
    b"", // 0x15
    b"", // 0x16
    b"", // 0x17
    b"", // 0x18
    b"", // 0x19
    b"", // 0x1a
    b"", // 0x1b
    b"", // 0x1c
    b"", // 0x1d
    b"", // 0x1e
    b"", // 0x1f
    b"", // 0x20
    b"\x34\xB5\x36\xBA", // 0x21
    b"\x29\xAA\x49\xCA", // 0x22
    b"\x24\xAA\x44\xCA\x16\xD6\x18\xD8", // 0x23
    b"\x34\xBA\x59\xA9\x98\xA7\xC7\xD6\xC5\x95", // 0x24
    b"\x14\xDA\x29\xA8\xB8\xB9\xA9\x36\xB5\xC5\xC6\xB6", // 0x25
    b"\x54\x98\x99\xAA\xB9\xB8\x96\x95\xA4\xB4\xD6", // 0x26
    b"\x39\xBB", // 0x27
    b"\x5A\xB8\xB6\xD4", // 0x28
    b"\x14\xB6\xB8\x9A", // 0x29
    b"\x05\xE9\x65\x89\x3A\xB4", // 0x2a
    b"\x35\xB9\x17\xD7", // 0x2b
    b"\x34\xA4\xA5\xB5\xB3\xA2", // 0x2c
    b"\x17\xD7", // 0x2d
    b"\x34\xA4\xA5\xB5\xB4", // 0x2e
    b"\xEA", // 0x2f
    b"\x15\xA4\xC4\xD5\xD9\xCA\xAA\x99\x95", // 0x30
    b"\x24\xC4\x34\xBA\xA9", // 0x31
    b"\x19\xAA\xCA\xD9\xD8\x95\x94\xD4", // 0x32
    b"\x15\xA4\xC4\xD5\xD6\xC7\xB7\xDA\x9A", // 0x33
    b"\x4A\x97\x96\xD6\x47\xC4", // 0x34
    b"\x5A\x9A\x98\xC8\xD7\xD5\xC4\xA4\x95", // 0x35
    b"\x5A\xBA\x98\x95\xA4\xC4\xD5\xD6\xC7\x97", // 0x36
    b"\x1A\xDA\xD9\x96\x94", // 0x37
    b"\x47\xD8\xD9\xCA\xAA\x99\x98\xA7\xC7\xD6\xD5\xC4\xA4\x95\x96\xA7", // 0x38
    b"\x24\xB4\xD6\xD9\xCA\xAA\x99\x98\xA7\xD7", // 0x39
    b"\x27\xA8\xB8\xB7\xA7\x25\xB5\xB4\xA4\xA5", // 0x3a
    b"\x26\xA7\xB7\xB6\xA6\x34\xA4\xA5\xB5\xB3\xA2", // 0x3b
    b"\x4A\x97\xC4", // 0x3c
    b"\x18\xD8\x16\xD6", // 0x3d
    b"\x1A\xC7\x94", // 0x3e
    b"\x19\xAA\xCA\xD9\xD8\xC7\xB7\xB6\x35\xB4", // 0x3f
    b"\x43\xA3\x94\x98\xAA\xCA\xD9\xD6\xC5\xB6\xB7\xC8\xD8", // 0x40
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6", // 0x41
    b"\x14\x9A\xCA\xD9\xD8\xC7\x97\x14\xC4\xD5\xD6\xC7", // 0x42
    b"\x55\xC4\xA4\x95\x99\xAA\xCA\xD9", // 0x43
    b"\x14\x9A\xCA\xD9\xD5\xC4\x94", // 0x44
    b"\x54\x94\x9A\xDA\x17\xC7", // 0x45
    b"\x14\x9A\xDA\x17\xC7", // 0x46
    b"\x59\xCA\xAA\x99\x95\xA4\xC4\xD5\xD7\xB7", // 0x47
    b"\x14\x9A\x54\xDA\x17\xD7", // 0x48
    b"\x14\xD4\x34\xBA\x1A\xDA", // 0x49
    b"\x15\xA4\xC4\xD5\xDA\x9A", // 0x4a
    b"\x14\x9A\x17\xA7\xD4\x27\xDA", // 0x4b
    b"\x1A\x94\xD4", // 0x4c
    b"\x14\x9A\xB8\xDA\xD4", // 0x4d
    b"\x14\x9A\xD4\xDA", // 0x4e
    b"\x24\x95\x99\xAA\xCA\xD9\xD5\xC4\xA4", // 0x4f
    b"\x14\x9A\xCA\xD9\xD8\xC7\x97", // 0x50
    b"\x24\x95\x99\xAA\xCA\xD9\xD6\xB4\xA4\x36\xD4", // 0x51
    b"\x14\x9A\xCA\xD9\xD8\xC7\x97\xA7\xD4", // 0x52
    b"\x15\xA4\xC4\xD5\xD6\xC7\xA7\x98\x99\xAA\xCA\xD9", // 0x53
    b"\x34\xBA\x9A\xDA", // 0x54
    b"\x1A\x95\xA4\xC4\xD5\xDA", // 0x55
    b"\x1A\x98\xB4\xD8\xDA", // 0x56
    b"\x1A\x94\xB7\xD4\xDA", // 0x57
    b"\x14\xDA\x54\x9A", // 0x58
    b"\x1A\x99\xB6\xB4\x36\xD9\xDA", // 0x59
    b"\x1A\xDA\x94\xD4", // 0x5a
    b"\x54\xB4\xBA\xDA", // 0x5b
    b"\x1A\xD4", // 0x5c
    b"\x14\xB4\xBA\x9A", // 0x5d
    b"\x18\xBA\xD8", // 0x5e
    b"\x13\xD3", // 0x5f
    b"\x2B\xC8", // 0x60
    b"\x54\xA4\x95\x97\xA8\xC8\xC4", // 0x61
    b"\x14\xC4\xD5\xD7\xC8\xA8\x2A\xA4", // 0x62
    b"\x55\xC4\xB4\xA5\xA7\xB8\xC8\xD7", // 0x63
    b"\x4A\xC4\xA4\x95\x97\xA8\xC8\x44\xD4", // 0x64
    b"\x16\xC6\xD7\xC8\xA8\x97\x95\xA4\xD4", // 0x65
    b"\x34\xB9\xCA\xDA\x27\xC7", // 0x66
    b"\x12\xB2\xC3\xC8\xA8\x97\x95\xA4\xC4", // 0x67
    b"\x1A\x94\x18\xB8\xC7\xC4", // 0x68
    b"\x3A\xB9\x28\xB8\xB4\x24\xC4", // 0x69
    b"\x3A\xB9\x28\xB8\xB3\xA2\x92", // 0x6a
    b"\x14\x9A\x44\x96\xC8", // 0x6b
    b"\x2A\xBA\xB4\x24\xC4", // 0x6c
    b"\x14\x98\x17\xA8\xB7\xB4\x37\xC8\xD7\xD4", // 0x6d
    b"\x14\x98\x17\xA8\xB8\xC7\xC4", // 0x6e
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4", // 0x6f
    b"\x12\x98\xB8\xC7\xC5\xB4\x94", // 0x70
    b"\x44\xA4\x95\x97\xA8\xC8\xC2", // 0x71
    b"\x18\x94\x16\xB8\xC8", // 0x72
    b"\x48\xA8\x97\xA6\xB6\xC5\xB4\x94", // 0x73
    b"\x2A\xA4\xC4\x18\xC8", // 0x74
    b"\x18\x95\xA4\xC4\xC8", // 0x75
    b"\x18\x96\xB4\xD6\xD8", // 0x76
    b"\x18\x95\xA4\xB5\xB7\x35\xC4\xD5\xD8", // 0x77
    b"\x18\xD4\x14\xD8", // 0x78
    b"\x12\xD6\xD8\x18\x96\xB4", // 0x79
    b"\x18\xC8\x94\xC4", // 0x7a
    b"\x4B\xBB\xB8\xA7\xB6\xB3\xC3", // 0x7b
    b"\x33\xBB", // 0x7c
    b"\x2B\xBB\xB8\xC7\xB6\xB3\xA3", // 0x7d
    b"\x17\xA8\xC7\xD8", // 0x7e
    b"", // 0x7f
];

static EXTENDED: [Strokes; 128] = [
    b"", // 0x00
    b"", // 0x01
    b"", // 0x02
    b"", // 0x03
    b"", // 0x04
    b"", // 0x05
    b"", // 0x06
    b"", // 0x07
    b"", // 0x08
    b"", // 0x09
    b"", // 0x0a
    b"", // 0x0b
    b"", // 0x0c
    b"", // 0x0d
    b"", // 0x0e
    b"", // 0x0f
    b"", // 0x10
    b"", // 0x11
    b"", // 0x12
    b"", // 0x13
    b"", // 0x14
    b"", // 0x15
    b"", // 0x16
    b"", // 0x17
    b"", // 0x18
    b"", // 0x19
    b"", // 0x1a
    b"", // 0x1b
    b"", // 0x1c
    b"", // 0x1d
    b"", // 0x1e
    b"", // 0x1f
    b"", // 0x20
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6\x2D\xCA", // 0x21
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6\x1A\xBC\xDA", // 0x22
    b"\x54\x94\x9A\xDA\x17\xC7\x2D\xCA", // 0x23
    b"\x54\x94\x9A\xDA\x17\xC7\x1A\xBC\xDA", // 0x24
    b"\x54\x94\x9A\xDA\x17\xC7\x2C\xAB\x4C\xCB", // 0x25
    b"\x14\xD4\x34\xBA\x1A\xDA\x1A\xBC\xDA", // 0x26
    b"\x14\xD4\x34\xBA\x1A\xDA\x2C\xAB\x4C\xCB", // 0x27
    b"\x2A\xCD", // 0x28
    b"\x2D\xCA", // 0x29
    b"\x1A\xBC\xDA", // 0x2a
    b"\x2C\xAB\x4C\xCB", // 0x2b
    b"\x1A\xAB\xC9\xDA", // 0x2c
    b"\x1A\x95\xA4\xC4\xD5\xDA\x2D\xCA", // 0x2d
    b"\x1A\x95\xA4\xC4\xD5\xDA\x1B\xBD\xDB", // 0x2e
    b"\x59\xDA\xCA\xB8\xB5\xA4\x94\x95\xA6\xC4\xD5\x28\xC8\x27\xC7", // 0x2f
    b"\x1B\xDB", // 0x30
    b"\x1A\x99\xB6\xB4\x36\xD9\xDA\x2A\xCD", // 0x31
    b"\x12\xD6\xD8\x18\x96\xB4\x2A\xCD", // 0x32
    b"\x28\xA9\xBA\xC9\xC8\xB7\xA8", // 0x33
    b"\x55\xC4\xA4\x95\x99\xAA\xCA\xD9\x34\xA3", // 0x34
    b"\x55\xC4\xB4\xA5\xA7\xB8\xC8\xD7\x34\xA3", // 0x35
    b"\x14\x9A\xD4\xDA\x1B\xAC\xCA\xDB", // 0x36
    b"\x14\x98\x17\xA8\xB8\xC7\xC4\x1A\xAB\xC9\xDA", // 0x37
    b"\x3A\xB9\x38\xB4", // 0x38
    b"\x3A\xB9\x38\xB7\xA7\x96\x95\xA4\xC4\xD5", // 0x39
    b"\x25\x96\x98\xA9\xC9\xD8\xD6\xC5\xA5\x1A\xA9\x5A\xC9\x14\xA5\x54\xC5", // 0x3a
    b"\x59\xDA\xCA\xB8\xB5\xA4\x94\x95\xA6\xC4\xD5\x28\xC8", // 0x3b
    b"\x1A\xB8\xB4\x38\xDA\x28\xC8\x27\xC7", // 0x3c
    b"\x49\xBA\xA9\xA8\xB8\xC7\xC6\xC4\xB3\xA3\xA4\x45\xB5\xA6\xA8", // 0x3d
    b"\x59\xDA\xCA\xB8\xB5\xA4\x94\x95\x28\xC8", // 0x3e
    b"\x55\xC4\xB4\xA5\xA7\xB8\xC8\xD7\x33\xB9", // 0x3f
    b"\x54\xA4\x95\x97\xA8\xC8\xC4\x29\xBA\xC9", // 0x40
    b"\x16\xC6\xD7\xC8\xA8\x97\x95\xA4\xD4\x29\xBA\xC9", // 0x41
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4\x29\xBA\xC9", // 0x42
    b"\x18\x95\xA4\xC4\xC8\x29\xBA\xC9", // 0x43
    b"\x54\xA4\x95\x97\xA8\xC8\xC4\x29\xCB", // 0x44
    b"\x16\xC6\xD7\xC8\xA8\x97\x95\xA4\xD4\x29\xCB", // 0x45
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4\x29\xCB", // 0x46
    b"\x18\x95\xA4\xC4\xC8\x29\xCB", // 0x47
    b"\x54\xA4\x95\x97\xA8\xC8\xC4\x2B\xC9", // 0x48
    b"\x16\xC6\xD7\xC8\xA8\x97\x95\xA4\xD4\x2B\xC9", // 0x49
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4\x2B\xC9", // 0x4a
    b"\x18\x95\xA4\xC4\xC8\x2B\xC9", // 0x4b
    b"\x54\xA4\x95\x97\xA8\xC8\xC4\x2A\xA9\x4A\xC9", // 0x4c
    b"\x16\xC6\xD7\xC8\xA8\x97\x95\xA4\xD4\x2A\xA9\x4A\xC9", // 0x4d
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4\x2A\xA9\x4A\xC9", // 0x4e
    b"\x18\x95\xA4\xC4\xC8\x2A\xA9\x4A\xC9", // 0x4f
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6\x3A\xAB\xBC\xCB\xBA", // 0x50
    b"\x28\xB8\xB4\x24\xC4\x29\xBA\xC9", // 0x51
    b"\x15\xA4\xC4\xD5\xD9\xCA\xAA\x99\x95\xD9", // 0x52
    b"\x5A\xBA\xB4\xD4\x57\xA7\x3A\x94", // 0x53
    b"\x54\xA4\x95\x97\xA8\xC8\xC4\x38\xA9\xBA\xC9\xB8", // 0x54
    b"\x28\xB8\xB4\x24\xC4\x29\xCB", // 0x55
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4\x14\xC8", // 0x56
    b"\x55\xC4\xB5\xB7\xC8\xD7\xC6\xA6\x95\xA4\xB5\x37\xA8\x97", // 0x57
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6\x2C\xAB\x4C\xCB", // 0x58
    b"\x28\xB8\xB4\x24\xC4\x2B\xC9", // 0x59
    b"\x24\x95\x99\xAA\xCA\xD9\xD5\xC4\xA4\x2C\xAB\x4C\xCB", // 0x5a
    b"\x1A\x95\xA4\xC4\xD5\xDA\x2C\xAB\x4C\xCB", // 0x5b
    b"\x54\x94\x9A\xDA\x17\xC7\x2A\xCD", // 0x5c
    b"\x28\xB8\xB4\x24\xC4\x2A\xA9\x4A\xC9", // 0x5d
    b"\x24\xA9\xBA\xC9\xC8\xB7\xC6\xC4\xB4\xA5", // 0x5e
    b"\x24\x95\x99\xAA\xCA\xD9\xD5\xC4\xA4\x1B\xBD\xDB", // 0x5f
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6\x2A\xCD", // 0x60
    b"\x14\x99\xAA\xCA\xD9\xD4\x16\xD6\x1B\xAC\xCA\xDB", // 0x61
    b"\x54\xA4\x95\x97\xA8\xC8\xC4\x1B\xAC\xCA\xDB", // 0x62
    b"\x14\x9A\xCA\xD9\xD5\xC4\x94\x17\xB7", // 0x63
    b"\x24\x95\x96\xA7\xC7\xD6\xD5\xC4\xA4\x1A\xC7\x18\xBA", // 0x64
    b"\x14\xD4\x34\xBA\x1A\xDA\x2A\xCD", // 0x65
    b"\x14\xD4\x34\xBA\x1A\xDA\x2D\xCA", // 0x66
    b"\x24\x95\x99\xAA\xCA\xD9\xD5\xC4\xA4\x2A\xCD", // 0x67
    b"\x24\x95\x99\xAA\xCA\xD9\xD5\xC4\xA4\x2D\xCA", // 0x68
    b"\x24\x95\x99\xAA\xCA\xD9\xD5\xC4\xA4\x1B\xAC\xCA\xDB", // 0x69
    b"\x24\x95\x97\xA8\xB8\xC7\xC5\xB4\xA4\x1A\xAB\xC9\xDA", // 0x6a
    b"\x15\xA4\xC4\xD5\xD6\xC7\xA7\x98\x99\xAA\xCA\xD9\x1C\xBA\xDC", // 0x6b
    b"\x48\xA8\x97\xA6\xB6\xC5\xB4\x94\x2A\xB8\xCA", // 0x6c
    b"\x1A\x95\xA4\xC4\xD5\xDA\x2A\xCD", // 0x6d
    b"\x1A\x99\xB6\xB4\x36\xD9\xDA\x2C\xAB\x4C\xCB", // 0x6e
    b"\x12\xD6\xD8\x18\x96\xB4\x2A\xA9\x4A\xC9", // 0x6f
    b"\x14\xB4\x24\xAA\x1A\xBA\x26\xC6\xD7\xC8\xA8", // 0x70
    b"\x14\xB4\x24\xAA\x1A\xBA\x25\xC6\xC8\xB9\xA9", // 0x71
    b"\x37\xB7", // 0x72
    b"\x14\xA8\xA6\xB5\xC6\xC8\x46\xD5", // 0x73
    b"\x34\xBA\x44\xCA\xAA\x99\xA8\xB8", // 0x74
    b"\x2A\xBA\xB9\xB8\xA8\x29\xB9\x27\xC7\x36\xA5\xC5\x36\xB4", // 0x75
    b"\x27\xC7", // 0x76
    b"\x29\xBA\xB8\x27\xC7\x36\xA5\xC5\x36\xB4", // 0x77
    b"\x29\xBA\xB8\x27\xC7\x26\xB6\xB5\xA4\xB4", // 0x78
    b"\x2A\xCA\xC8\xA8\xA9\xC9\x27\xC7", // 0x79
    b"\x29\xBA\xC9\xB8\xA9\x27\xC7", // 0x7a
    b"\x39\x97\xB5\x59\xB7\xD5", // 0x7b
    b"\x25\xA8\xD8\xD5\xA5", // 0x7c
    b"\x19\xB7\x95\x39\xD7\xB5", // 0x7d
    b"\x35\xB9\x17\xD7\x15\xD5", // 0x7e
    b"", // 0x7f
];

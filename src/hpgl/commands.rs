// src/hpgl/commands.rs

//! Two-letter HP-GL mnemonics and their lookup.

/// Every instruction the processor understands.
///
/// `Nop` covers the instructions the 7470 accepts for compatibility but
/// ignores entirely (AF, AH, AP, EC, UC, VA, VN).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    ArcAbsolute,
    ArcRelative,
    Circle,
    PlotAbsolute,
    PlotRelative,
    PenDown,
    PenUp,
    TickLength,
    XTick,
    YTick,
    InputPoints,
    Scale,
    InputWindow,
    LineType,
    UserLineType,
    ChordTolerance,
    VelocitySelect,
    SelectPen,
    Label,
    DefineTerminator,
    CharPlot,
    CharSizeAbsolute,
    CharSizeRelative,
    DirAbsolute,
    DirRelative,
    Slant,
    StandardSet,
    AlternateSet,
    SelectStandard,
    SelectAlternate,
    SymbolMode,
    OutputActual,
    OutputCommanded,
    OutputDigitized,
    OutputError,
    OutputFactors,
    OutputIdent,
    OutputOptions,
    OutputPoints,
    OutputStatus,
    OutputWindow,
    Initialize,
    Defaults,
    InputMask,
    DigitizePoint,
    DigitizeClear,
    StoreDigitized,
    SelectPaper,
    Nop,
}

impl Mnemonic {
    /// Looks up a mnemonic from its two command bytes, forcing upper case.
    pub fn lookup(b0: u8, b1: u8) -> Option<Mnemonic> {
        use Mnemonic::*;
        let mn = match (b0 & 0xDF, b1 & 0xDF) {
            (b'A', b'A') => ArcAbsolute,
            (b'A', b'R') => ArcRelative,
            (b'C', b'I') => Circle,
            (b'P', b'A') => PlotAbsolute,
            (b'P', b'R') => PlotRelative,
            (b'P', b'D') => PenDown,
            (b'P', b'U') => PenUp,
            (b'T', b'L') => TickLength,
            (b'X', b'T') => XTick,
            (b'Y', b'T') => YTick,
            (b'I', b'P') => InputPoints,
            (b'S', b'C') => Scale,
            (b'I', b'W') => InputWindow,
            (b'L', b'T') => LineType,
            (b'U', b'L') => UserLineType,
            (b'C', b'T') => ChordTolerance,
            (b'V', b'S') => VelocitySelect,
            (b'S', b'P') => SelectPen,
            (b'L', b'B') => Label,
            (b'D', b'T') => DefineTerminator,
            (b'C', b'P') => CharPlot,
            (b'S', b'I') => CharSizeAbsolute,
            (b'S', b'R') => CharSizeRelative,
            (b'D', b'I') => DirAbsolute,
            (b'D', b'R') => DirRelative,
            (b'S', b'L') => Slant,
            (b'C', b'S') => StandardSet,
            (b'C', b'A') => AlternateSet,
            (b'S', b'S') => SelectStandard,
            (b'S', b'A') => SelectAlternate,
            (b'S', b'M') => SymbolMode,
            (b'O', b'A') => OutputActual,
            (b'O', b'C') => OutputCommanded,
            (b'O', b'D') => OutputDigitized,
            (b'O', b'E') => OutputError,
            (b'O', b'F') => OutputFactors,
            (b'O', b'I') => OutputIdent,
            (b'O', b'O') => OutputOptions,
            (b'O', b'P') => OutputPoints,
            (b'O', b'S') => OutputStatus,
            (b'O', b'W') => OutputWindow,
            (b'I', b'N') => Initialize,
            (b'D', b'F') => Defaults,
            (b'I', b'M') => InputMask,
            (b'D', b'P') => DigitizePoint,
            (b'D', b'C') => DigitizeClear,
            (b'Z', b'Y') => StoreDigitized,
            (b'Z', b'Z') => SelectPaper,
            (b'A', b'F') | (b'A', b'H') | (b'A', b'P') | (b'E', b'C') | (b'U', b'C')
            | (b'V', b'A') | (b'V', b'N') => Nop,
            _ => return None,
        };
        Some(mn)
    }
}

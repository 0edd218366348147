// src/hpgl/emulator.rs

//! The plotter command processor.
//!
//! `Plotter` owns every piece of mutable firmware state and turns one
//! decoded command line at a time into output records. Pen movement is
//! funneled through a single pipeline: handler -> `pen_action` ->
//! `pen_stroke` -> line generator -> `emit_vector` (overflow check,
//! clipping, record emission), so lost mode, the clip window and the
//! dash patterns apply uniformly to vectors, arcs, ticks and labels.

use bitflags::bitflags;
use log::{debug, trace, warn};

use crate::config::Config;
use crate::emit::{Emitter, Record, VectorKind};

use super::charset;
use super::clip::ClipWindow;
use super::commands::Mnemonic;
use super::params::ParamReader;
use super::scale::{ScaleFrame, P1_DEFAULT, P2_DEFAULT};
use super::style::{LineMode, LineStyle, Pattern, LT_ELEMENTS, LT_MAX, LT_MIN, LT_PATTERN_TOL};
use super::text::{ctrl, TextFrame};
use super::{round_coord, PaperSize, Point, COORD_MAX, COORD_MIN};

/// Default label terminator.
pub const ETX: u8 = 0x03;

const DEFAULT_MASK: u8 = 223;

/// A pen position no real command can produce, marking "nowhere yet".
const NOWHERE: Point = Point::new(std::f64::consts::PI, std::f64::consts::PI);

bitflags! {
    /// The status byte reported by `OS` and sent with every reply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const PEN_DOWN = 0x01;
        const P1P2_CHANGED = 0x02;
        const DIGI_AVAILABLE = 0x04;
        const INITIALIZED = 0x08;
        const ERROR_PENDING = 0x20;
    }
}

/// Error register codes, gated by the `IM` mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum ErrorCode {
    NotRecognized = 1,
    Parameter = 2,
    Range = 3,
    PositionOverflow = 6,
}

/// Book-keeping shared by most instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterState {
    /// Physical pen position in plotter units.
    pub pen_pos: Point,
    /// Last commanded position, clamped to the coordinate range.
    pub cmd_pos: Point,
    /// Where the pen actually stopped when the last vector was clipped.
    pub pen_pos_clipped: Option<Point>,
    /// Last coordinate pair accepted by the vector group, in the current
    /// (user or plotter) space.
    pub p_last: Point,
    pub pen: i16,
    pub pen_down: bool,
    pub plot_rel: bool,
    pub scaling: bool,
    /// Set when a coordinate left the addressable range; vector commands
    /// are suppressed until an in-range coordinate arrives.
    pub lost: bool,
    pub status: Status,
    pub error: u8,
    pub mask: u8,
    pub str_term: u8,
    pub str_term_silent: bool,
    pub symbol_char: Option<u8>,
    pub digi: Point,
}

/// The command processor.
pub struct Plotter {
    state: PlotterState,
    scale: ScaleFrame,
    style: LineStyle,
    text: TextFrame,
    emitter: Emitter,
    paper: PaperSize,
    neg_ticklen: f64,
    pos_ticklen: f64,
    /// Chord tolerance is a distance rather than an angle.
    ct_dist: bool,
    /// A move was issued since the last draw; ends the running pattern.
    mv_flag: bool,
    /// Generator-side last point, in plotter units.
    gen_last: Point,
    /// Last point handed to the output stage, on the integer grid.
    out_last: (i32, i32),
    first_init: bool,
}

impl Plotter {
    pub fn new(config: &Config) -> Self {
        let paper = config.paper.size;
        let scale = ScaleFrame::new(paper);
        let diagonal = scale.diagonal();
        let mut plotter = Plotter {
            state: PlotterState {
                pen_pos: Point::default(),
                cmd_pos: Point::default(),
                pen_pos_clipped: None,
                p_last: NOWHERE,
                pen: -1,
                pen_down: false,
                plot_rel: false,
                scaling: false,
                lost: false,
                status: Status::INITIALIZED,
                error: 0,
                mask: DEFAULT_MASK,
                str_term: ETX,
                str_term_silent: true,
                symbol_char: None,
                digi: Point::new(-1.0, -1.0),
            },
            text: TextFrame::new(scale.p1, scale.p2, Point::default()),
            style: LineStyle::new(diagonal),
            scale,
            emitter: Emitter::new(),
            paper,
            neg_ticklen: 0.005,
            pos_ticklen: 0.005,
            ct_dist: false,
            mv_flag: false,
            gen_last: Point::default(),
            out_last: (0, 0),
            first_init: true,
        };
        plotter.initialize();
        plotter.first_init = false;
        plotter
    }

    /// Read-only view of the firmware state, mainly for tests.
    pub fn state(&self) -> &PlotterState {
        &self.state
    }

    /// Drains the records produced so far.
    pub fn take_records(&mut self) -> Vec<Record> {
        self.emitter.take()
    }

    /// Executes one framed command: adopt the host status byte, dispatch
    /// the instruction, then append the status and end-of-reply records.
    pub fn process_line(&mut self, status: u8, body: &[u8]) {
        self.state.status = Status::from_bits_retain(status);
        let mut buf = Vec::with_capacity(body.len() + 1);
        buf.extend_from_slice(body);
        buf.push(b';');
        trace!("command: {:?}", String::from_utf8_lossy(&buf));
        debug!("lost mode: {}", self.state.lost);
        self.dispatch(&buf);
        self.emitter.push(Record::Status {
            status: self.state.status.bits(),
            error: self.state.error,
            term: self.state.str_term,
        });
        self.emitter.push(Record::Eof);
    }

    fn dispatch(&mut self, buf: &[u8]) {
        if buf.len() < 3 {
            self.set_error(ErrorCode::NotRecognized, "Instruction not recognized");
            return;
        }
        let Some(mnemonic) = Mnemonic::lookup(buf[0], buf[1]) else {
            self.set_error(ErrorCode::NotRecognized, "Instruction not recognized");
            return;
        };
        let mut par = ParamReader::new(buf);
        match mnemonic {
            Mnemonic::ArcAbsolute => {
                if self.state.lost {
                    return;
                }
                self.arcs(false, &mut par);
                self.text.cr_point = self.state.pen_pos;
            }
            Mnemonic::ArcRelative => {
                if self.state.lost {
                    return;
                }
                self.arcs(true, &mut par);
                self.text.cr_point = self.state.pen_pos;
            }
            Mnemonic::Circle => {
                if self.state.lost {
                    return;
                }
                // CI leaves the pen where it started.
                let saved = self.state.pen_pos;
                self.circle(&mut par);
                self.state.pen_pos = saved;
            }
            Mnemonic::PlotAbsolute => {
                self.state.plot_rel = false;
                self.lines(false, &mut par);
                self.text.cr_point = self.state.pen_pos;
                self.text.refpoint = self.state.pen_pos;
            }
            Mnemonic::PenDown => {
                self.state.pen_down = true;
                self.state.status.insert(Status::PEN_DOWN);
                if self.state.plot_rel && self.state.lost {
                    return;
                }
                self.lines(self.state.plot_rel, &mut par);
                self.text.cr_point = self.state.pen_pos;
                self.text.refpoint = self.state.pen_pos;
            }
            Mnemonic::PenUp => {
                self.state.pen_down = false;
                self.state.status.remove(Status::PEN_DOWN);
                if self.state.plot_rel && self.state.lost {
                    return;
                }
                self.lines(self.state.plot_rel, &mut par);
                self.text.cr_point = self.state.pen_pos;
                self.text.refpoint = self.state.pen_pos;
            }
            Mnemonic::PlotRelative => {
                self.state.plot_rel = true;
                if self.state.lost {
                    return;
                }
                self.lines(true, &mut par);
                self.text.cr_point = self.state.pen_pos;
                self.text.refpoint = self.state.pen_pos;
            }
            Mnemonic::TickLength => self.cmd_tick_length(&mut par),
            Mnemonic::XTick => self.ax_ticks(false),
            Mnemonic::YTick => self.ax_ticks(true),
            Mnemonic::InputPoints => self.cmd_input_points(&mut par),
            Mnemonic::Scale => self.cmd_scale(&mut par),
            Mnemonic::InputWindow => self.cmd_input_window(&mut par),
            Mnemonic::LineType => self.cmd_line_type(&mut par),
            Mnemonic::UserLineType => self.cmd_user_line_type(&mut par),
            Mnemonic::ChordTolerance => self.cmd_chord_tolerance(&mut par),
            Mnemonic::VelocitySelect => {
                // Syntax check only; the emulated pen has no motor.
                if let Some(v) = par.number() {
                    if self.check_value(v, 0.0, 127.9999) {
                        self.set_error(ErrorCode::Parameter, "Illegal parameter");
                    }
                }
            }
            Mnemonic::SelectPen => self.cmd_select_pen(&mut par),
            Mnemonic::Label => {
                if self.state.lost {
                    return;
                }
                let label = par.label(self.state.str_term, self.state.str_term_silent);
                self.plot_label(&label);
                self.state.p_last = if self.state.scaling {
                    self.scale.plotter_to_user(self.state.pen_pos)
                } else {
                    self.state.pen_pos
                };
            }
            Mnemonic::DefineTerminator => {
                if let Some(t) = par.raw_byte() {
                    self.state.str_term = t;
                    self.state.str_term_silent = false;
                }
            }
            Mnemonic::CharPlot => self.cmd_char_plot(&mut par),
            Mnemonic::CharSizeAbsolute => self.cmd_char_size(&mut par, false),
            Mnemonic::CharSizeRelative => self.cmd_char_size(&mut par, true),
            Mnemonic::DirAbsolute => self.cmd_direction(&mut par, false),
            Mnemonic::DirRelative => self.cmd_direction(&mut par, true),
            Mnemonic::Slant => {
                let slant = par.number().unwrap_or(0.0);
                if self.check_value(slant, -128.0, 127.9999) {
                    self.set_error(ErrorCode::Range, "parameter out of range");
                    return;
                }
                self.text.slant = slant;
                self.text.adjust();
            }
            Mnemonic::StandardSet => {
                let set = par.number().unwrap_or(0.0);
                if !(0.0..=4.0).contains(&set) {
                    self.set_error(ErrorCode::Range, "Illegal character set");
                    return;
                }
                self.text.font = set as u8;
                self.text.stdfont = self.text.font;
            }
            Mnemonic::AlternateSet => {
                let set = par.number().unwrap_or(0.0);
                if !(0.0..=4.0).contains(&set) {
                    self.set_error(ErrorCode::Range, "Illegal character set");
                    return;
                }
                self.text.altfont = set as u8;
            }
            Mnemonic::SelectStandard => {
                self.text.font = self.text.stdfont;
            }
            Mnemonic::SelectAlternate => {
                self.text.font = self.text.altfont;
            }
            Mnemonic::SymbolMode => {
                // `;`, control/space bytes and 8-bit codes cancel symbol mode.
                let c = par.raw_byte().unwrap_or(b';');
                self.state.symbol_char = if c == b';' || c < 33 || c >= 0x80 {
                    None
                } else {
                    Some(c)
                };
            }
            Mnemonic::OutputActual => {
                let (x, y) = match self.state.pen_pos_clipped {
                    Some(p) => (round_coord(p.x), round_coord(p.y)),
                    None => self.out_last,
                };
                let line = format!("{},{},{}", x, y, u8::from(self.state.pen_down));
                self.emitter.push(Record::Output(line));
            }
            Mnemonic::OutputCommanded => {
                let c = self.state.cmd_pos;
                let line = if self.state.scaling {
                    format!("{:.4},{:.4},{}", c.x, c.y, u8::from(self.state.pen_down))
                } else {
                    format!(
                        "{},{},{}",
                        round_coord(c.x),
                        round_coord(c.y),
                        u8::from(self.state.pen_down)
                    )
                };
                self.emitter.push(Record::Output(line));
            }
            Mnemonic::OutputDigitized => {
                let line = format!(
                    "{},{},{}",
                    round_coord(self.state.digi.x),
                    round_coord(self.state.digi.y),
                    u8::from(self.state.pen_down)
                );
                self.emitter.push(Record::Output(line));
                self.state.status.remove(Status::DIGI_AVAILABLE);
            }
            Mnemonic::OutputError => {
                self.emitter
                    .push(Record::Output(self.state.error.to_string()));
                self.clear_error();
            }
            Mnemonic::OutputFactors => {
                self.emitter.push(Record::Output("40,40".into()));
            }
            Mnemonic::OutputIdent => {
                self.emitter.push(Record::Output("7470".into()));
            }
            Mnemonic::OutputOptions => {
                self.emitter.push(Record::Output("0,1,0,0,1,0,0,0".into()));
            }
            Mnemonic::OutputPoints => {
                let line = format!(
                    "{},{},{},{}",
                    round_coord(self.scale.p1.x),
                    round_coord(self.scale.p1.y),
                    round_coord(self.scale.p2.x),
                    round_coord(self.scale.p2.y)
                );
                self.emitter.push(Record::Output(line));
                self.state.status.remove(Status::P1P2_CHANGED);
            }
            Mnemonic::OutputStatus => {
                self.emitter
                    .push(Record::Output(self.state.status.bits().to_string()));
                self.state.status.remove(Status::INITIALIZED);
            }
            Mnemonic::OutputWindow => {
                let w = self.scale.window;
                let line = format!("{},{},{},{}", w.x_min, w.y_min, w.x_max, w.y_max);
                self.emitter.push(Record::Output(line));
            }
            Mnemonic::Initialize => {
                if par.number().is_some() {
                    self.set_error(ErrorCode::Parameter, "redundant parameter");
                    return;
                }
                self.initialize();
                self.text.cr_point = self.state.pen_pos;
                self.text.refpoint = self.state.pen_pos;
                self.emitter.push(Record::Clear);
                self.clear_error();
            }
            Mnemonic::Defaults => {
                if par.number().is_some() {
                    self.set_error(ErrorCode::Parameter, "redundant parameter");
                    return;
                }
                self.reset();
                self.text.cr_point = self.state.pen_pos;
                self.text.refpoint = self.state.pen_pos;
            }
            Mnemonic::InputMask => {
                let Some(m) = par.number() else {
                    self.state.mask = DEFAULT_MASK;
                    return;
                };
                let m = m as i64;
                if !(0..=255).contains(&m) {
                    self.state.mask = DEFAULT_MASK;
                    self.set_error(ErrorCode::Range, "Bad parameter");
                    return;
                }
                self.state.mask = m as u8;
            }
            Mnemonic::DigitizePoint => self.emitter.push(Record::DigiStart),
            Mnemonic::DigitizeClear => self.emitter.push(Record::DigiClear),
            Mnemonic::StoreDigitized => {
                // Host-side injection of a digitized point.
                let Some(x) = par.number() else { return };
                self.state.digi.x = x;
                let Some(y) = par.number() else { return };
                self.state.digi.y = y;
                self.state.status.insert(Status::DIGI_AVAILABLE);
            }
            Mnemonic::SelectPaper => {
                // Host-side paper switch; takes effect on the next IN.
                let Some(v) = par.number() else { return };
                self.paper = if round_coord(v) == 0 {
                    PaperSize::A4
                } else {
                    PaperSize::Us
                };
            }
            Mnemonic::Nop => {}
        }
    }

    // ----- status / error register ---------------------------------------

    fn set_error(&mut self, code: ErrorCode, msg: &'static str) {
        if (1u16 << (code as u8 - 1)) & u16::from(self.state.mask) != 0 {
            self.state.status.insert(Status::ERROR_PENDING);
            self.state.error = code as u8;
            self.emitter.push(Record::Emsg(msg));
        }
    }

    fn clear_error(&mut self) {
        self.state.status.remove(Status::ERROR_PENDING);
        self.state.error = 0;
    }

    /// Range check shared by most parameter validation; reports error 3.
    fn check_value(&mut self, value: f64, min: f64, max: f64) -> bool {
        if value < min || value > max {
            self.set_error(ErrorCode::Range, "Value out of range");
            true
        } else {
            false
        }
    }

    // ----- reset and initialization --------------------------------------

    /// `DF`: restore defaults, keeping P1/P2 and the paper format.
    fn reset(&mut self) {
        self.state.p_last = NOWHERE;
        self.out_last = (0, 0);
        self.state.pen_pos_clipped = None;
        self.state.pen_down = false;
        self.state.plot_rel = false;
        self.state.pen = -1;
        self.mv_flag = false;
        self.ct_dist = false;
        self.state.lost = false;
        self.style.reset(self.scale.diagonal());
        self.state.str_term = ETX;
        self.state.str_term_silent = true;
        self.state.scaling = false;
        self.scale.s1 = self.scale.p1;
        self.scale.s2 = self.scale.p2;
        self.scale.q = Point::new(1.0, 1.0);
        self.state.pen_pos = Point::default();
        self.neg_ticklen = 0.005;
        self.pos_ticklen = 0.005;
        self.state.symbol_char = None;
        self.text
            .reset(self.scale.p1, self.scale.p2, self.state.pen_pos);
        self.state.error = 0;
        self.state.mask = DEFAULT_MASK;
        self.scale.window = ClipWindow::new(
            0,
            0,
            self.scale.hw_limit.x.floor() as i32,
            self.scale.hw_limit.y.floor() as i32,
        );
    }

    /// `IN`: full reset including P1/P2 and the hard-clip limits.
    fn initialize(&mut self) {
        self.scale.p1 = P1_DEFAULT;
        self.scale.p2 = P2_DEFAULT;
        self.scale.hw_limit = self.paper.hardware_limit();
        self.state.status = Status::INITIALIZED;
        self.reset();
        if !self.first_init {
            self.emit_p1p2();
        }
    }

    fn emit_p1p2(&mut self) {
        self.emitter.push(Record::P1P2 {
            p1x: round_coord(self.scale.p1.x),
            p1y: round_coord(self.scale.p1.y),
            p2x: round_coord(self.scale.p2.x),
            p2y: round_coord(self.scale.p2.y),
        });
    }

    // ----- output stage --------------------------------------------------

    /// Overflow check, clipping, and record emission for one vector.
    fn emit_vector(&mut self, kind: VectorKind, pf: Point) {
        if pf.x < COORD_MIN || pf.x > COORD_MAX || pf.y < COORD_MIN || pf.y > COORD_MAX {
            self.state.lost = true;
        }
        if self.state.lost {
            warn!("position overflow at ({}, {})", pf.x, pf.y);
            self.set_error(ErrorCode::PositionOverflow, "Position overflow");
            return;
        }

        let x = round_coord(pf.x);
        let y = round_coord(pf.y);

        // Points outside the window are dropped, not clipped.
        if kind == VectorKind::PlotAt {
            if self.scale.window.contains(x, y) {
                self.emitter.push(Record::Vector {
                    kind,
                    x,
                    y,
                    clipped: false,
                });
            }
            self.out_last = (x, y);
            return;
        }

        let a0 = Point::new(f64::from(self.out_last.0), f64::from(self.out_last.1));
        let mut a = a0;
        let mut b = pf;
        if !self.scale.window.clip_segment(&mut a, &mut b) {
            self.out_last = (x, y);
            return;
        }

        // Reposition to where the segment enters the window.
        if a != a0 {
            self.emitter.push(Record::Vector {
                kind: VectorKind::MoveTo,
                x: round_coord(a.x),
                y: round_coord(a.y),
                clipped: true,
            });
        }
        // Stop where it leaves the window, and remember the cut.
        if b != pf {
            self.emitter.push(Record::Vector {
                kind,
                x: round_coord(b.x),
                y: round_coord(b.y),
                clipped: true,
            });
            self.state.pen_pos_clipped = Some(b);
        } else {
            self.emitter.push(Record::Vector {
                kind,
                x,
                y,
                clipped: false,
            });
            self.state.pen_pos_clipped = None;
        }
        self.out_last = (x, y);
    }

    // ----- pen movement pipeline -----------------------------------------

    /// Moves the pen and updates the commanded position.
    fn pen_action(&mut self, kind: VectorKind, p: Point, scaled: bool) {
        let pp = if scaled {
            self.scale.user_to_plotter(p)
        } else {
            p
        };
        self.state.pen_pos = pp;
        self.pen_stroke(kind, p, scaled);
        self.update_commanded(pp, scaled);
    }

    /// Low-level stroke: runs the line generator without touching the
    /// pen-position book-keeping (label strokes use this directly).
    fn pen_stroke(&mut self, kind: VectorKind, p: Point, scaled: bool) {
        let pp = if scaled {
            self.scale.user_to_plotter(p)
        } else {
            p
        };
        match kind {
            VectorKind::MoveTo => {
                self.mv_flag = true;
                self.emit_vector(VectorKind::MoveTo, pp);
            }
            VectorKind::DrawTo | VectorKind::PlotAt => {
                self.generate_line(pp);
                self.mv_flag = false;
            }
        }
        self.gen_last = pp;
    }

    fn update_commanded(&mut self, p: Point, scaled: bool) {
        let mut c = if scaled {
            self.scale.plotter_to_user(p)
        } else {
            p
        };
        c.x = c.x.clamp(COORD_MIN, COORD_MAX);
        c.y = c.y.clamp(COORD_MIN, COORD_MAX);
        trace!("commanded position {} {}", c.x, c.y);
        self.state.cmd_pos = c;
    }

    // ----- line and pattern generation -----------------------------------

    fn generate_line(&mut self, pb: Point) {
        let mut pa = self.gen_last;
        let dx = pb.x - pa.x;
        let dy = pb.y - pa.y;
        let seg_len = dx.hypot(dy);

        match self.style.mode {
            LineMode::Solid => {
                if seg_len < 1e-8 {
                    return;
                }
                self.emit_vector(VectorKind::DrawTo, pb);
            }
            LineMode::PlotAt => {
                self.emit_vector(VectorKind::PlotAt, pb);
            }
            LineMode::Adaptive => {
                if seg_len < 1e-8 {
                    return;
                }
                // A zero-length pattern cannot tile the segment.
                if self.style.pattern_len <= 0.0 {
                    self.emit_vector(VectorKind::DrawTo, pb);
                    return;
                }
                // Whole patterns, stretched so an integral count fits.
                self.style.phase = 0.0;
                let mut n_pat = ceil_with_tolerance(
                    seg_len / self.style.pattern_len,
                    self.style.pattern_len * LT_PATTERN_TOL,
                ) as i32;
                if n_pat < 1 {
                    n_pat = 1;
                }
                let sdx = dx / f64::from(n_pat);
                let sdy = dy / f64::from(n_pat);
                let pat = *self.style.table.pattern(self.style.pattern);
                for _ in 0..n_pat {
                    self.pattern_pass(&mut pa, sdx, sdy, 0.0, 1.0, &pat);
                }
            }
            LineMode::Fixed => {
                if seg_len < 1e-8 {
                    return;
                }
                if self.style.pattern_len <= 0.0 {
                    self.emit_vector(VectorKind::DrawTo, pb);
                    return;
                }
                if self.mv_flag {
                    // A move ends the running pattern.
                    self.style.phase = 0.0;
                }
                let mut quot = seg_len / self.style.pattern_len;
                let sdx = dx / quot;
                let sdy = dy / quot;
                let pat = *self.style.table.pattern(self.style.pattern);
                while quot >= 1.0 {
                    let phase = self.style.phase;
                    self.pattern_pass(&mut pa, sdx, sdy, phase, 1.0, &pat);
                    quot -= 1.0 - phase;
                    self.style.phase = 0.0;
                }
                quot += self.style.phase;
                if quot >= 1.0 {
                    let phase = self.style.phase;
                    self.pattern_pass(&mut pa, sdx, sdy, phase, 1.0, &pat);
                    quot -= 1.0;
                    self.style.phase = 0.0;
                }
                if quot > LT_PATTERN_TOL {
                    let phase = self.style.phase;
                    self.pattern_pass(&mut pa, sdx, sdy, phase, quot, &pat);
                    self.style.phase = quot;
                } else {
                    self.emit_vector(VectorKind::MoveTo, pb);
                }
            }
        }
    }

    /// Walks one pattern over the segment direction (`dx`, `dy` span one
    /// full pattern length). In fixed mode only the `[start, end]` window
    /// of the pattern is realized.
    fn pattern_pass(
        &mut self,
        pa: &mut Point,
        dx: f64,
        dy: f64,
        start_of_pat: f64,
        end_of_pat: f64,
        pat: &Pattern,
    ) {
        if self.style.mode == LineMode::Adaptive {
            let mut elems = pat.elements().iter();
            loop {
                // line or point
                let Some(&e) = elems.next() else { return };
                let len = e / 100.0;
                let kind = if len < 1e-5 {
                    VectorKind::PlotAt
                } else {
                    VectorKind::DrawTo
                };
                pa.x += dx * len;
                pa.y += dy * len;
                self.emit_vector(kind, *pa);
                // gap
                let Some(&g) = elems.next() else { return };
                let len = g / 100.0;
                pa.x += dx * len;
                pa.y += dy * len;
                self.emit_vector(VectorKind::MoveTo, *pa);
            }
        }

        let mut end_of_action = 0.0;
        let mut elems = pat.elements().iter();
        loop {
            // line or point
            let Some(&e) = elems.next() else { return };
            let mut start_of_action = end_of_action;
            let len = e / 100.0;
            if len < 1e-5 {
                self.emit_vector(VectorKind::PlotAt, *pa);
            } else {
                end_of_action += len;
                if end_of_action > start_of_pat {
                    if start_of_pat <= start_of_action {
                        if end_of_action <= end_of_pat {
                            pa.x += dx * len;
                            pa.y += dy * len;
                            self.emit_vector(VectorKind::DrawTo, *pa);
                        } else {
                            // element runs past the window: draw its head
                            pa.x += dx * (end_of_pat - start_of_action);
                            pa.y += dy * (end_of_pat - start_of_action);
                            self.emit_vector(VectorKind::DrawTo, *pa);
                            return;
                        }
                    } else if end_of_action <= end_of_pat {
                        // window starts inside the element: draw its tail
                        pa.x += dx * (end_of_action - start_of_pat);
                        pa.y += dy * (end_of_action - start_of_pat);
                        self.emit_vector(VectorKind::DrawTo, *pa);
                    } else {
                        // window lies inside the element: draw the middle
                        let kind = if end_of_pat == start_of_pat {
                            VectorKind::PlotAt
                        } else {
                            VectorKind::DrawTo
                        };
                        pa.x += dx * (end_of_pat - start_of_pat);
                        pa.y += dy * (end_of_pat - start_of_pat);
                        self.emit_vector(kind, *pa);
                        return;
                    }
                }
            }
            // gap, same windowing
            let Some(&g) = elems.next() else { return };
            start_of_action = end_of_action;
            let len = g / 100.0;
            end_of_action += len;
            if end_of_action > start_of_pat {
                if start_of_pat <= start_of_action {
                    if end_of_action <= end_of_pat {
                        pa.x += dx * len;
                        pa.y += dy * len;
                        self.emit_vector(VectorKind::MoveTo, *pa);
                    } else {
                        pa.x += dx * (end_of_pat - start_of_action);
                        pa.y += dy * (end_of_pat - start_of_action);
                        self.emit_vector(VectorKind::MoveTo, *pa);
                        return;
                    }
                } else if end_of_action <= end_of_pat {
                    pa.x += dx * (end_of_action - start_of_pat);
                    pa.y += dy * (end_of_action - start_of_pat);
                    self.emit_vector(VectorKind::MoveTo, *pa);
                } else {
                    if end_of_pat == start_of_pat {
                        return; // a null move
                    }
                    pa.x += dx * (end_of_pat - start_of_pat);
                    pa.y += dy * (end_of_pat - start_of_pat);
                    self.emit_vector(VectorKind::MoveTo, *pa);
                    return;
                }
            }
        }
    }

    // ----- the vector group ----------------------------------------------

    /// Coordinate-pair stream of PA/PR/PU/PD.
    fn lines(&mut self, relative: bool, par: &mut ParamReader) {
        let mut pairs = 0;
        loop {
            let Some(x) = par.number() else {
                if pairs > 0 {
                    return;
                }
                // A bare PD with a pen selected leaves a dot on paper.
                if self.state.pen_down && self.mv_flag && self.state.pen != 0 && !self.state.lost
                {
                    let p = self.state.p_last + Point::new(0.01, 0.01);
                    let back = self.state.p_last;
                    let scaling = self.state.scaling;
                    self.pen_action(VectorKind::MoveTo, p, scaling);
                    self.pen_action(VectorKind::DrawTo, back, scaling);
                }
                return;
            };
            let Some(y) = par.number() else {
                self.set_error(ErrorCode::Parameter, "missing parameter");
                return;
            };
            let mut p = Point::new(x, y);
            if !self.state.scaling {
                p.x = p.x.floor();
                p.y = p.y.floor();
            }
            self.line(relative, p);
            pairs += 1;
        }
    }

    /// One coordinate pair: range checks, lost-mode bookkeeping, movement.
    fn line(&mut self, relative: bool, mut p: Point) {
        if self.check_value(p.x, COORD_MIN, COORD_MAX)
            || self.check_value(p.y, COORD_MIN, COORD_MAX)
        {
            self.update_commanded(p, self.state.scaling);
            self.set_error(ErrorCode::Range, "coordinate out of range");
            self.state.lost = true;
            return;
        }
        if relative {
            p += self.state.p_last;
            if self.check_value(p.x, COORD_MIN, COORD_MAX)
                || self.check_value(p.y, COORD_MIN, COORD_MAX)
            {
                self.update_commanded(p, self.state.scaling);
                self.set_error(ErrorCode::Range, "resulting coordinate out of range");
                self.state.lost = true;
                return;
            }
        }
        if self.state.scaling {
            let pp = self.scale.user_to_plotter(p);
            if self.check_value(pp.x, COORD_MIN, COORD_MAX)
                || self.check_value(pp.y, COORD_MIN, COORD_MAX)
            {
                self.set_error(ErrorCode::Range, "scaled coordinate out of range");
                self.update_commanded(p, self.state.scaling);
                self.state.lost = true;
                return;
            }
        }
        // An accepted coordinate always recovers from lost mode.
        if self.state.lost {
            trace!("lost mode cleared");
            self.state.lost = false;
        }

        let scaling = self.state.scaling;
        if self.state.pen_down {
            self.pen_action(VectorKind::DrawTo, p, scaling);
        } else {
            self.pen_action(VectorKind::MoveTo, p, scaling);
        }
        if let Some(c) = self.state.symbol_char {
            self.plot_symbol_char(c);
            self.pen_action(VectorKind::MoveTo, p, scaling);
        }
        self.state.p_last = p;
    }

    // ----- arcs, circles and ticks ---------------------------------------

    fn arc_increment(&mut self, center: Point, r: f64, phi: f64) {
        let p = Point::new(center.x + r * phi.cos(), center.y + r * phi.sin());
        let scaling = self.state.scaling;
        if self.state.pen_down {
            self.pen_action(VectorKind::DrawTo, p, scaling);
        } else if p != self.state.p_last {
            self.pen_action(VectorKind::MoveTo, p, scaling);
        }
        self.state.p_last = p;
    }

    /// AA/AR: chord interpolation around a center point.
    fn arcs(&mut self, relative: bool, par: &mut ParamReader) {
        let Some(x) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no first parameter");
            return;
        };
        let Some(y) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no second parameter");
            return;
        };
        if self.check_value(x, COORD_MIN, COORD_MAX) || self.check_value(y, COORD_MIN, COORD_MAX)
        {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        let Some(sweep) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no third parameter");
            return;
        };
        if self.check_value(sweep, COORD_MIN, COORD_MAX) {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        let alpha = sweep.to_radians();

        let mut eps = match par.number() {
            None => 5.0,
            Some(v) => {
                if self.check_value(v, COORD_MIN, COORD_MAX) {
                    self.set_error(ErrorCode::Range, "parameter out of range");
                    return;
                }
                v.abs().max(0.5)
            }
        };

        let p = Point::new(x, y);
        let (d, center) = if relative {
            (p, p + self.state.p_last)
        } else {
            (p - self.state.p_last, p)
        };
        let r = d.x.hypot(d.y);
        if r == 0.0 || alpha == 0.0 {
            return;
        }
        if self.ct_dist {
            eps = 2.0 * ((r - eps) / r).acos();
        } else {
            eps = eps.to_radians();
        }
        let phi0 = (-d.y).atan2(-d.x);

        let saved_len = self.style.pattern_len;
        if self.style.mode == LineMode::Adaptive {
            // Pattern length follows the chord length for the duration.
            let mut chord = Point::new(r * eps.cos(), r * eps.sin());
            if self.state.scaling {
                chord = self.scale.user_to_plotter(chord);
            }
            self.style.pattern_len = chord.x.hypot(chord.y);
        }

        if alpha > 0.0 {
            let mut phi = phi0 + eps.min(alpha);
            while phi < phi0 + alpha {
                self.arc_increment(center, r, phi);
                phi += eps;
            }
        } else {
            let mut phi = phi0 - eps.min(-alpha);
            while phi > phi0 + alpha {
                self.arc_increment(center, r, phi);
                phi -= eps;
            }
        }
        self.arc_increment(center, r, phi0 + alpha);
        self.style.pattern_len = saved_len;
    }

    /// CI: full circle around the current position, closed with one
    /// overlapping chord so wide pens leave no gap.
    fn circle(&mut self, par: &mut ParamReader) {
        let Some(radius) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no second parameter");
            return;
        };
        if self.check_value(radius, COORD_MIN, COORD_MAX) {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        let mut eps = match par.number() {
            None => 5.0,
            Some(v) => {
                if self.check_value(v, COORD_MIN, COORD_MAX) {
                    self.set_error(ErrorCode::Range, "parameter out of range");
                    return;
                }
                let v = v.abs();
                if v < 0.5 {
                    0.5
                } else {
                    v.floor()
                }
            }
        };
        if radius == 0.0 {
            return;
        }
        if self.ct_dist {
            eps = 2.0 * ((radius - eps) / radius).acos();
        } else {
            eps = eps.to_radians();
        }

        let center = self.state.p_last;
        let scaling = self.state.scaling;

        self.pen_action(
            VectorKind::MoveTo,
            Point::new(center.x + radius, center.y),
            scaling,
        );

        let saved_len = self.style.pattern_len;
        if self.style.mode == LineMode::Adaptive {
            let mut chord = Point::new(radius * eps.cos(), radius * eps.sin());
            if scaling {
                chord = self.scale.user_to_plotter(chord);
            }
            self.style.pattern_len = chord.x.hypot(chord.y);
        }

        let mut phi = eps;
        while phi < 2.0 * std::f64::consts::PI {
            let p = Point::new(
                center.x + radius * phi.cos(),
                center.y + radius * phi.sin(),
            );
            self.pen_action(VectorKind::DrawTo, p, scaling);
            phi += eps;
        }
        self.pen_action(
            VectorKind::DrawTo,
            Point::new(center.x + radius, center.y),
            scaling,
        );
        self.pen_action(
            VectorKind::DrawTo,
            Point::new(
                center.x + radius * eps.cos(),
                center.y + radius * eps.sin(),
            ),
            scaling,
        );
        self.pen_action(VectorKind::MoveTo, center, scaling);
        self.style.pattern_len = saved_len;
    }

    /// XT/YT: a short solid tick across the current position.
    fn ax_ticks(&mut self, vertical: bool) {
        let p0 = self.state.p_last;
        let mut p1 = p0;
        let mut p2 = p0;
        // Ticks are never patterned.
        let saved_mode = self.style.mode;
        self.style.mode = LineMode::Solid;

        let span_x = self.scale.p2.x - self.scale.p1.x;
        let span_y = self.scale.p2.y - self.scale.p1.y;
        let scaling = self.state.scaling;
        if !vertical {
            let mut neg = self.neg_ticklen * span_y;
            let mut pos = self.pos_ticklen * span_y;
            if scaling {
                neg /= self.scale.q.y;
                pos /= self.scale.q.y;
            }
            p1.y -= neg;
            p2.y += pos;
        } else {
            let mut neg = self.neg_ticklen * span_x;
            let mut pos = self.pos_ticklen * span_x;
            if scaling {
                neg /= self.scale.q.x;
                pos /= self.scale.q.x;
            }
            p1.x -= neg;
            p2.x += pos;
        }

        self.pen_action(VectorKind::MoveTo, p1, scaling);
        self.pen_action(VectorKind::DrawTo, p2, scaling);
        self.pen_action(VectorKind::MoveTo, p0, scaling);

        self.style.mode = saved_mode;
    }

    fn cmd_tick_length(&mut self, par: &mut ParamReader) {
        let Some(pos) = par.number() else {
            self.neg_ticklen = 0.005;
            self.pos_ticklen = 0.005;
            return;
        };
        if self.check_value(pos, -128.0, 127.999) {
            self.set_error(ErrorCode::Parameter, "pt parameter error");
            return;
        }
        self.pos_ticklen = pos / 100.0;
        let Some(neg) = par.number() else {
            self.neg_ticklen = 0.0;
            return;
        };
        if self.check_value(neg, -128.0, 127.999) {
            self.set_error(ErrorCode::Parameter, "pt parameter error");
            return;
        }
        self.neg_ticklen = neg / 100.0;
    }

    // ----- scaling group -------------------------------------------------

    /// IP: move the scaling points. Validation happens up front; the
    /// derived state (Q, pattern length, text metrics) is rebuilt once at
    /// the end for every successful form.
    fn cmd_input_points(&mut self, par: &mut ParamReader) {
        let old_span_x = self.scale.p2.x - self.scale.p1.x;
        let old_span_y = self.scale.p2.y - self.scale.p1.y;

        let (new_p1, new_p2) = match par.number() {
            None => (P1_DEFAULT, P2_DEFAULT),
            Some(x1) => {
                if self.check_value(x1, COORD_MIN, COORD_MAX) {
                    return;
                }
                let Some(y1) = par.number() else {
                    self.set_error(ErrorCode::Parameter, "no second parameter");
                    return;
                };
                if self.check_value(y1, COORD_MIN, COORD_MAX) {
                    return;
                }
                match par.number() {
                    None => {
                        // P1 only: P2 keeps its offset from P1.
                        let p1 = Point::new(x1, y1);
                        let p2 = self.scale.p2 + (p1 - self.scale.p1);
                        (p1, p2)
                    }
                    Some(x2) => {
                        if self.check_value(x2, COORD_MIN, COORD_MAX) {
                            return;
                        }
                        let Some(y2) = par.number() else {
                            self.set_error(ErrorCode::Parameter, "no fourth parameter");
                            return;
                        };
                        if self.check_value(y2, COORD_MIN, COORD_MAX) {
                            return;
                        }
                        if par.number().is_some() {
                            self.set_error(ErrorCode::Parameter, "redundant parameter");
                            return;
                        }
                        let mut p1 = Point::new(x1, y1);
                        let mut p2 = Point::new(x2, y2);
                        // Outside the plotting area: snap to the full page.
                        if p1.x < 0.0
                            || p1.y < 0.0
                            || p2.x > self.scale.hw_limit.x
                            || p2.y > self.scale.hw_limit.y
                        {
                            p1 = Point::default();
                            p2 = self.scale.hw_limit;
                        }
                        // Degenerate spans get one plotter unit of room.
                        if (p1.x - p2.x).abs() < 1.0 {
                            p2.x += 1.0;
                        }
                        if (p1.y - p2.y).abs() < 1.0 {
                            p2.y += 1.0;
                        }
                        (p1, p2)
                    }
                }
            }
        };

        self.scale.p1 = new_p1;
        self.scale.p2 = new_p2;
        self.scale.s1 = new_p1;
        self.scale.s2 = new_p2;
        self.scale.derive_q();
        self.style.pattern_len = 0.04 * self.scale.diagonal();
        // Character cells track the P1/P2 spans.
        self.text.width *= (self.scale.p2.x - self.scale.p1.x) / old_span_x;
        self.text.height *= (self.scale.p2.y - self.scale.p1.y) / old_span_y;
        self.text.adjust();
        self.state.status.insert(Status::P1P2_CHANGED);
        self.emit_p1p2();
    }

    /// SC: define user units. Exactly four parameters or none; any failure
    /// leaves scaling off.
    fn cmd_scale(&mut self, par: &mut ParamReader) {
        // Carry the last position over to the new coordinate space.
        self.state.p_last = self.scale.user_to_plotter(self.state.p_last);

        'accept: {
            let Some(x_min) = par.number() else {
                break 'accept;
            };
            let Some(x_max) = par.number() else {
                self.set_error(ErrorCode::Parameter, "no second parameter");
                break 'accept;
            };
            let Some(y_min) = par.number() else {
                self.set_error(ErrorCode::Parameter, "no third parameter");
                break 'accept;
            };
            let Some(y_max) = par.number() else {
                self.set_error(ErrorCode::Parameter, "no fourth parameter");
                break 'accept;
            };
            if par.number().is_some() {
                self.set_error(ErrorCode::Parameter, "redundant parameter");
                break 'accept;
            }

            let x_min = x_min.floor();
            let x_max = x_max.floor();
            let y_min = y_min.floor();
            let y_max = y_max.floor();

            if self.check_value(x_min, COORD_MIN, COORD_MAX)
                || self.check_value(y_min, COORD_MIN, COORD_MAX)
                || self.check_value(x_max, COORD_MIN, COORD_MAX)
                || self.check_value(y_max, COORD_MIN, COORD_MAX)
                || x_min == x_max
                || y_min == y_max
            {
                break 'accept;
            }

            self.scale.s1 = Point::new(x_min, y_min);
            self.scale.s2 = Point::new(x_max, y_max);
            self.scale.derive_q();
            self.state.scaling = true;
            self.state.p_last = self.scale.plotter_to_user(self.state.p_last);
            return;
        }

        // SC with no parameters, or any failure: scaling off.
        self.scale.s1 = P1_DEFAULT;
        self.scale.s2 = P2_DEFAULT;
        self.scale.q = Point::new(1.0, 1.0);
        self.state.scaling = false;
    }

    /// IW: set the soft-clip window, always in plotter units.
    fn cmd_input_window(&mut self, par: &mut ParamReader) {
        let hw = self.scale.hw_limit;
        let Some(x_min) = par.number() else {
            self.scale.window = ClipWindow::new(0, 0, round_coord(hw.x), round_coord(hw.y));
            return;
        };
        let Some(y_min) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no second parameter");
            return;
        };
        let Some(x_max) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no third parameter");
            return;
        };
        let Some(y_max) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no fourth parameter");
            return;
        };
        if par.number().is_some() {
            self.set_error(ErrorCode::Parameter, "redundant parameter");
            return;
        }
        let x_min = self.window_param(x_min, hw.x);
        let y_min = self.window_param(y_min, hw.y);
        let x_max = self.window_param(x_max, hw.x);
        let y_max = self.window_param(y_max, hw.y);
        self.scale.window = ClipWindow::new(
            round_coord(x_min),
            round_coord(y_min),
            round_coord(x_max),
            round_coord(y_max),
        );
    }

    /// Negatives clamp to zero, oversize values to the page edge of their
    /// own axis.
    fn window_param(&mut self, v: f64, limit: f64) -> f64 {
        let v = v.max(0.0);
        if self.check_value(v, 0.0, COORD_MAX) {
            limit
        } else {
            v
        }
    }

    // ----- line-type group -----------------------------------------------

    fn cmd_line_type(&mut self, par: &mut ParamReader) {
        let Some(t) = par.number() else {
            self.style.mode = LineMode::Solid;
            return;
        };
        let t = t.floor();
        if self.check_value(t, -128.0, 127.9999) {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        let it = t as i32;
        if it < 0 {
            if it < LT_MIN {
                self.style.mode = LineMode::Solid;
                return;
            }
            // Negative types repeat whole patterns per segment.
            self.style.mode = LineMode::Adaptive;
            self.style.pattern = it;
        } else if it == 0 {
            self.style.mode = LineMode::PlotAt;
            self.style.pattern = 0;
        } else if it <= 6 {
            self.style.mode = LineMode::Fixed;
            self.style.pattern = it;
        }
        // Types above 6 keep the current mode; the length still applies.
        let Some(len) = par.number() else {
            self.style.pattern_len = 0.04 * self.scale.diagonal();
            return;
        };
        if self.check_value(len, 0.0, 127.9999) {
            return;
        }
        self.style.pattern_len = self.scale.diagonal() * len / 100.0;
    }

    fn cmd_user_line_type(&mut self, par: &mut ParamReader) {
        let Some(index) = par.number() else {
            self.style.table.reset_defaults();
            return;
        };
        let index = index as i32;
        if !(LT_MIN..=LT_MAX).contains(&index) {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        let mut elems = Vec::with_capacity(LT_ELEMENTS);
        while let Some(v) = par.number() {
            if elems.len() == LT_ELEMENTS {
                break;
            }
            elems.push(v);
        }
        self.style.table.define(index, &elems);
    }

    fn cmd_chord_tolerance(&mut self, par: &mut ParamReader) {
        let Some(v) = par.number() else {
            self.ct_dist = false;
            return;
        };
        match v as i32 {
            0 => self.ct_dist = false,
            1 => self.ct_dist = true,
            _ => self.set_error(ErrorCode::Range, "parameter out of range"),
        }
    }

    // ----- pens ----------------------------------------------------------

    fn cmd_select_pen(&mut self, par: &mut ParamReader) {
        let old = self.state.pen;
        let Some(v) = par.number() else {
            // No parameter stows the pen without reporting a change.
            self.state.pen = 0;
            return;
        };
        if self.check_value(v, COORD_MIN, COORD_MAX) {
            self.set_error(ErrorCode::Parameter, "illegal parameter");
            return;
        }
        // A two-pen carousel: even numbers load stall 2, odd stall 1.
        let n = round_coord(v.abs());
        self.state.pen = if n % 2 == 0 { 2 } else { 1 };
        if self.state.pen != old {
            self.emitter.push(Record::SetPen(self.state.pen));
        }
    }

    // ----- the character group -------------------------------------------

    /// CP: move the text cursor by character cells and lines.
    fn cmd_char_plot(&mut self, par: &mut ParamReader) {
        if self.state.lost {
            return;
        }
        let (chars, lines) = match par.number() {
            None => (0.0, -1.0),
            Some(c) => {
                let Some(l) = par.number() else {
                    self.set_error(ErrorCode::Parameter, "no second parameter");
                    return;
                };
                if par.number().is_some() {
                    self.set_error(ErrorCode::Parameter, "redundant parameter");
                    return;
                }
                (c, l)
            }
        };
        if self.check_value(chars, -128.0, 127.9999)
            || self.check_value(lines, -128.0, 127.9999)
        {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        // Sub-visible cursor offsets collapse to zero per axis.
        let ox = chars * self.text.chardiff.x;
        let oy = chars * self.text.chardiff.y;
        self.text.ref_offset = Point::new(
            if ox.abs() < 0.05 { 0.0 } else { ox },
            if oy.abs() < 0.05 { 0.0 } else { oy },
        );
        self.text.cr_point -= self.text.linediff * lines;
        self.state.pen_pos = self.text.cr_point;
        self.update_commanded(self.state.pen_pos, self.state.scaling);
    }

    /// SI (absolute, centimeters) / SR (percent of the P1-P2 spans).
    fn cmd_char_size(&mut self, par: &mut ParamReader, relative: bool) {
        let (dw, dh) = if relative { (0.75, 1.5) } else { (0.19, 0.27) };
        let (w, h) = match par.number() {
            None => (dw, dh),
            Some(w) => {
                let Some(h) = par.number() else {
                    self.set_error(ErrorCode::Parameter, "no second parameter");
                    return;
                };
                if self.check_value(w, -128.0, 127.9999)
                    || self.check_value(h, -128.0, 127.9999)
                {
                    self.set_error(ErrorCode::Range, "parameter out of range");
                    return;
                }
                if par.number().is_some() {
                    self.set_error(ErrorCode::Parameter, "redundant parameter");
                    return;
                }
                (w, h)
            }
        };
        if relative {
            self.text.width = w * (self.scale.p2.x - self.scale.p1.x) / 100.0;
            self.text.height = h * (self.scale.p2.y - self.scale.p1.y) / 100.0;
        } else {
            // Centimeters to plotter units.
            self.text.width = w * 400.0;
            self.text.height = h * 400.0;
        }
        self.text.adjust();
    }

    /// DI (absolute run/rise) / DR (run/rise relative to the P1-P2 spans).
    fn cmd_direction(&mut self, par: &mut ParamReader, relative: bool) {
        let Some(run) = par.number() else {
            self.text.dir = 0.0;
            self.text.cr_point = self.state.pen_pos;
            self.text.refpoint = self.state.pen_pos;
            self.text.adjust();
            return;
        };
        let Some(rise) = par.number() else {
            self.set_error(ErrorCode::Parameter, "no second parameter");
            return;
        };
        if run.abs() < 0.0004 && rise.abs() < 0.0004 {
            self.set_error(ErrorCode::Range, "both parameters are zero");
            return;
        }
        if self.check_value(run, -128.0, 127.9999) || self.check_value(rise, -128.0, 127.9999) {
            self.set_error(ErrorCode::Range, "parameter out of range");
            return;
        }
        if par.number().is_some() {
            self.set_error(ErrorCode::Parameter, "redundant parameter");
            return;
        }
        self.text.dir = if relative {
            (rise * (self.scale.p2.y - self.scale.p1.y))
                .atan2(run * (self.scale.p2.x - self.scale.p1.x))
        } else {
            rise.atan2(run)
        };
        self.text.cr_point = self.state.pen_pos;
        self.text.adjust();
    }

    // ----- label drawing -------------------------------------------------

    /// Draws one label, honoring the in-band control codes.
    fn plot_label(&mut self, label: &[u8]) {
        if self.text.ref_offset != Point::default() {
            // A pending CP offset anchors the label at the CR point.
            self.text.refpoint = self.text.cr_point + self.text.ref_offset;
            self.text.ref_offset = Point::default();
        } else {
            self.text.refpoint = self.state.pen_pos;
        }
        for &c in label {
            match c {
                b' ' => self.text.refpoint += self.text.chardiff,
                ctrl::CR => self.text.refpoint = self.text.cr_point,
                ctrl::LF => {
                    self.text.refpoint += self.text.linediff;
                    self.text.cr_point += self.text.linediff;
                }
                ctrl::BS => self.text.refpoint -= self.text.chardiff,
                ctrl::HT => self.text.refpoint -= self.text.chardiff * 0.5,
                ctrl::VT => {
                    self.text.refpoint -= self.text.linediff;
                    self.text.cr_point -= self.text.linediff;
                }
                ctrl::SO => {
                    if self.text.altfont != 0 {
                        self.text.font = self.text.altfont;
                    }
                }
                ctrl::SI => self.text.font = self.text.stdfont,
                _ => self.draw_char(c),
            }
            let rp = self.text.refpoint;
            self.pen_stroke(VectorKind::MoveTo, rp, false);
        }
        self.state.pen_pos = self.text.refpoint;
        self.update_commanded(self.text.refpoint, self.state.scaling);
    }

    /// Draws one character cell and advances the cursor.
    fn draw_char(&mut self, code: u8) {
        // Glyph strokes are always solid.
        let saved_mode = self.style.mode;
        self.style.mode = LineMode::Solid;

        let strokes: charset::Strokes = if (1..=4).contains(&self.text.font) {
            if code & 0x80 != 0 {
                self.set_error(ErrorCode::Range, "Illegal character");
                charset::base_glyph(b' ')
            } else {
                if charset::accent_backspace(self.text.font, code) {
                    self.text.refpoint -= self.text.chardiff;
                }
                charset::base_glyph(code)
            }
        } else if code & 0x80 != 0 {
            charset::extended_glyph(code)
        } else {
            charset::base_glyph(code)
        };

        for &b in strokes {
            let (draw, gx, gy) = charset::decode(b);
            let p = self.text.glyph_point(gx, gy);
            let kind = if draw {
                VectorKind::DrawTo
            } else {
                VectorKind::MoveTo
            };
            self.pen_stroke(kind, p, false);
        }
        self.text.refpoint += self.text.chardiff;
        self.style.mode = saved_mode;
    }

    /// Draws the symbol-mode character centered on the pen position.
    fn plot_symbol_char(&mut self, code: u8) {
        // Centroid of the strokes, taken with the cell at the origin.
        self.text.refpoint = Point::default();
        self.text.offset = Point::default();
        let strokes = if code & 0x80 != 0 {
            charset::extended_glyph(code)
        } else {
            charset::base_glyph(code)
        };
        let mut center = Point::default();
        for &b in strokes {
            let (_, gx, gy) = charset::decode(b);
            center += self.text.glyph_point(gx, gy);
        }
        if !strokes.is_empty() {
            let n = strokes.len() as f64;
            self.text.offset = Point::new(-center.x / n, -center.y / n);
        }
        self.text.refpoint = self.state.pen_pos;
        self.draw_char(code);
        let rp = self.text.refpoint;
        self.pen_stroke(VectorKind::MoveTo, rp, false);
    }
}

/// Ceiling that forgives a tiny overshoot past a whole number.
fn ceil_with_tolerance(x: f64, tol: f64) -> f64 {
    let rounded = (x + 0.5).floor();
    if (rounded - x).abs() <= tol {
        rounded
    } else {
        x.ceil()
    }
}

//! Escape-sequence parser.
//!
//! A table-driven VT100/ECMA-48 state machine. Each input byte is classified
//! into a [`ByteClass`], and [`transition`] maps `(State, ByteClass)` to the
//! next state plus an [`Action`]. Actions that complete a sequence emit
//! [`TerminalEvent`]s through a caller-supplied sink.
//!
//! The parser never fails: malformed or unsupported input either dispatches
//! [`TerminalEvent::Unsupported`] or is silently dropped, and the machine is
//! back in `Ground` no later than the byte after the anomaly.

use super::types::{Attribute, Color, CursorMove, EraseMode, TerminalEvent};

/// Maximum number of CSI parameters kept; the rest are dropped.
pub const MAX_PARAMS: usize = 16;

/// Maximum number of intermediate bytes kept.
const MAX_INTERMEDIATES: usize = 2;

/// OSC/DCS strings longer than this are abandoned so an unterminated string
/// cannot swallow the rest of a session.
const MAX_STRING_LEN: usize = 4096;

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    DcsIgnore,
}

/// Byte classes the transition table is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// C0 controls other than the ones below
    Control,
    /// BEL (0x07): a control in most states, a terminator for OSC
    Bell,
    /// CAN (0x18) and SUB (0x1a): abort any sequence
    Cancel,
    /// ESC (0x1b)
    Esc,
    /// 0x20-0x2f
    Intermediate,
    /// '0'-'9'
    Digit,
    /// ';' and ':'
    Separator,
    /// '<', '=', '>', '?'
    PrivateMarker,
    /// '[' (CSI after ESC)
    OpenBracket,
    /// ']' (OSC after ESC)
    CloseBracket,
    /// 'P', 'X', '^', '_' (DCS, SOS, PM, APC after ESC)
    StringStart,
    /// Any other byte in 0x40-0x7e
    Final,
    /// DEL (0x7f)
    Delete,
    /// 0x80-0xff, UTF-8 data
    High,
}

impl ByteClass {
    pub fn of(byte: u8) -> Self {
        match byte {
            0x07 => ByteClass::Bell,
            0x18 | 0x1a => ByteClass::Cancel,
            0x1b => ByteClass::Esc,
            0x00..=0x1f => ByteClass::Control,
            0x20..=0x2f => ByteClass::Intermediate,
            0x30..=0x39 => ByteClass::Digit,
            0x3a | 0x3b => ByteClass::Separator,
            0x3c..=0x3f => ByteClass::PrivateMarker,
            b'[' => ByteClass::OpenBracket,
            b']' => ByteClass::CloseBracket,
            b'P' | b'X' | b'^' | b'_' => ByteClass::StringStart,
            0x40..=0x7e => ByteClass::Final,
            0x7f => ByteClass::Delete,
            0x80..=0xff => ByteClass::High,
        }
    }

    fn is_final(self) -> bool {
        matches!(
            self,
            ByteClass::Final
                | ByteClass::OpenBracket
                | ByteClass::CloseBracket
                | ByteClass::StringStart
        )
    }
}

/// What to do with the current byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Print,
    Utf8,
    Execute,
    Clear,
    Collect,
    Param,
    EscDispatch,
    CsiDispatch,
    StringPut,
}

/// The transition table.
pub fn transition(state: State, class: ByteClass) -> (State, Action) {
    use Action as A;
    use ByteClass as B;
    use State as S;

    match (state, class) {
        // Transitions valid from anywhere
        (_, B::Cancel) => (S::Ground, A::None),
        (_, B::Esc) => (S::Escape, A::Clear),

        (S::Ground, B::Control | B::Bell) => (S::Ground, A::Execute),
        (S::Ground, B::Delete) => (S::Ground, A::None),
        (S::Ground, B::High) => (S::Ground, A::Utf8),
        (S::Ground, _) => (S::Ground, A::Print),

        (S::Escape, B::Control | B::Bell) => (S::Escape, A::Execute),
        (S::Escape, B::Delete) => (S::Escape, A::None),
        (S::Escape, B::Intermediate) => (S::EscapeIntermediate, A::Collect),
        (S::Escape, B::OpenBracket) => (S::CsiEntry, A::None),
        (S::Escape, B::CloseBracket) => (S::OscString, A::None),
        (S::Escape, B::StringStart) => (S::DcsIgnore, A::None),
        (S::Escape, B::High) => (S::Ground, A::Utf8),
        (S::Escape, _) => (S::Ground, A::EscDispatch),

        (S::EscapeIntermediate, B::Control | B::Bell) => (S::EscapeIntermediate, A::Execute),
        (S::EscapeIntermediate, B::Delete) => (S::EscapeIntermediate, A::None),
        (S::EscapeIntermediate, B::Intermediate) => (S::EscapeIntermediate, A::Collect),
        (S::EscapeIntermediate, B::High) => (S::Ground, A::Utf8),
        (S::EscapeIntermediate, _) => (S::Ground, A::EscDispatch),

        (S::CsiEntry, B::Control | B::Bell) => (S::CsiEntry, A::Execute),
        (S::CsiEntry, B::Delete) => (S::CsiEntry, A::None),
        (S::CsiEntry, B::Digit | B::Separator) => (S::CsiParam, A::Param),
        (S::CsiEntry, B::PrivateMarker) => (S::CsiParam, A::Collect),
        (S::CsiEntry, B::Intermediate) => (S::CsiIntermediate, A::Collect),
        (S::CsiEntry, B::High) => (S::Ground, A::Utf8),
        (S::CsiEntry, _) => (S::Ground, A::CsiDispatch),

        (S::CsiParam, B::Control | B::Bell) => (S::CsiParam, A::Execute),
        (S::CsiParam, B::Delete) => (S::CsiParam, A::None),
        (S::CsiParam, B::Digit | B::Separator) => (S::CsiParam, A::Param),
        (S::CsiParam, B::PrivateMarker) => (S::CsiIgnore, A::None),
        (S::CsiParam, B::Intermediate) => (S::CsiIntermediate, A::Collect),
        (S::CsiParam, B::High) => (S::Ground, A::Utf8),
        (S::CsiParam, _) => (S::Ground, A::CsiDispatch),

        (S::CsiIntermediate, B::Control | B::Bell) => (S::CsiIntermediate, A::Execute),
        (S::CsiIntermediate, B::Delete) => (S::CsiIntermediate, A::None),
        (S::CsiIntermediate, B::Intermediate) => (S::CsiIntermediate, A::Collect),
        (S::CsiIntermediate, B::Digit | B::Separator | B::PrivateMarker) => {
            (S::CsiIgnore, A::None)
        }
        (S::CsiIntermediate, B::High) => (S::Ground, A::Utf8),
        (S::CsiIntermediate, _) => (S::Ground, A::CsiDispatch),

        (S::CsiIgnore, B::Control | B::Bell) => (S::CsiIgnore, A::Execute),
        (S::CsiIgnore, c) if c.is_final() => (S::Ground, A::None),
        (S::CsiIgnore, _) => (S::CsiIgnore, A::None),

        (S::OscString, B::Bell) => (S::Ground, A::None),
        (S::OscString, _) => (S::OscString, A::StringPut),

        (S::DcsIgnore, _) => (S::DcsIgnore, A::StringPut),
    }
}

/// Streaming escape-sequence parser.
///
/// State persists between calls, so a sequence split across two chunks is
/// parsed exactly as if it had arrived in one.
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    params: [u16; MAX_PARAMS],
    param_count: usize,
    current: Option<u16>,
    has_params: bool,
    intermediates: [u8; MAX_INTERMEDIATES],
    intermediate_count: usize,
    private: Option<u8>,
    string_len: usize,
    utf8: [u8; 4],
    utf8_len: usize,
    utf8_needed: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: [0; MAX_PARAMS],
            param_count: 0,
            current: None,
            has_params: false,
            intermediates: [0; MAX_INTERMEDIATES],
            intermediate_count: 0,
            private: None,
            string_len: 0,
            utf8: [0; 4],
            utf8_len: 0,
            utf8_needed: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Parse a whole chunk and collect the events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<TerminalEvent> {
        let mut events = Vec::with_capacity(bytes.len());
        for &byte in bytes {
            self.advance(byte, &mut |event| events.push(event));
        }
        events
    }

    /// Process one byte, emitting any completed events into `sink`.
    pub fn advance<F: FnMut(TerminalEvent)>(&mut self, byte: u8, sink: &mut F) {
        if self.utf8_needed > 0 {
            if (0x80..=0xbf).contains(&byte) {
                self.utf8_continue(byte, sink);
                return;
            }
            // Truncated sequence: flag it and reprocess this byte from scratch
            self.utf8_needed = 0;
            self.utf8_len = 0;
            sink(TerminalEvent::Print(char::REPLACEMENT_CHARACTER));
        }

        let (next, action) = transition(self.state, ByteClass::of(byte));
        self.state = next;
        self.perform(action, byte, sink);
    }

    fn perform<F: FnMut(TerminalEvent)>(&mut self, action: Action, byte: u8, sink: &mut F) {
        match action {
            Action::None => {}
            Action::Print => sink(TerminalEvent::Print(byte as char)),
            Action::Utf8 => self.utf8_start(byte, sink),
            Action::Execute => {
                if let Some(event) = execute(byte) {
                    sink(event);
                }
            }
            Action::Clear => self.clear(),
            Action::Collect => self.collect(byte),
            Action::Param => self.param(byte),
            Action::EscDispatch => {
                if let Some(event) = self.esc_dispatch(byte) {
                    sink(event);
                }
            }
            Action::CsiDispatch => {
                self.finish_params();
                self.csi_dispatch(byte, sink);
            }
            Action::StringPut => {
                self.string_len += 1;
                if self.string_len > MAX_STRING_LEN {
                    tracing::debug!("abandoning unterminated string sequence");
                    self.state = State::Ground;
                    self.string_len = 0;
                }
            }
        }
    }

    fn clear(&mut self) {
        self.param_count = 0;
        self.current = None;
        self.has_params = false;
        self.intermediate_count = 0;
        self.private = None;
        self.string_len = 0;
    }

    fn collect(&mut self, byte: u8) {
        if self.state == State::CsiParam && ByteClass::of(byte) == ByteClass::PrivateMarker {
            self.private = Some(byte);
            return;
        }
        if self.intermediate_count < MAX_INTERMEDIATES {
            self.intermediates[self.intermediate_count] = byte;
            self.intermediate_count += 1;
        }
    }

    fn param(&mut self, byte: u8) {
        self.has_params = true;
        if byte.is_ascii_digit() {
            let digit = u16::from(byte - b'0');
            let value = self.current.unwrap_or(0);
            self.current = Some(value.saturating_mul(10).saturating_add(digit));
        } else {
            self.push_param();
        }
    }

    fn push_param(&mut self) {
        let value = self.current.take().unwrap_or(0);
        if self.param_count < MAX_PARAMS {
            self.params[self.param_count] = value;
            self.param_count += 1;
        }
    }

    fn finish_params(&mut self) {
        if self.has_params {
            self.push_param();
        }
    }

    fn params(&self) -> &[u16] {
        &self.params[..self.param_count]
    }

    fn utf8_start<F: FnMut(TerminalEvent)>(&mut self, byte: u8, sink: &mut F) {
        let needed = match byte {
            0xc2..=0xdf => 1,
            0xe0..=0xef => 2,
            0xf0..=0xf4 => 3,
            _ => {
                sink(TerminalEvent::Print(char::REPLACEMENT_CHARACTER));
                return;
            }
        };
        self.utf8[0] = byte;
        self.utf8_len = 1;
        self.utf8_needed = needed;
    }

    fn utf8_continue<F: FnMut(TerminalEvent)>(&mut self, byte: u8, sink: &mut F) {
        self.utf8[self.utf8_len] = byte;
        self.utf8_len += 1;
        self.utf8_needed -= 1;
        if self.utf8_needed > 0 {
            return;
        }

        let ch = std::str::from_utf8(&self.utf8[..self.utf8_len])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.utf8_len = 0;
        sink(TerminalEvent::Print(ch));
    }

    fn esc_dispatch(&self, byte: u8) -> Option<TerminalEvent> {
        if self.intermediate_count > 0 {
            // Charset designations and friends
            return Some(TerminalEvent::Unsupported);
        }
        match byte {
            b'7' => Some(TerminalEvent::SaveCursor),
            b'8' => Some(TerminalEvent::RestoreCursor),
            b'D' => Some(TerminalEvent::LineFeed),
            b'E' => Some(TerminalEvent::NextLine),
            b'M' => Some(TerminalEvent::ReverseIndex),
            b'c' => Some(TerminalEvent::FullReset),
            // String terminator for OSC/DCS
            b'\\' => None,
            _ => Some(TerminalEvent::Unsupported),
        }
    }

    fn csi_dispatch<F: FnMut(TerminalEvent)>(&self, byte: u8, sink: &mut F) {
        if self.intermediate_count > 0 {
            sink(TerminalEvent::Unsupported);
            return;
        }

        let params = self.params();
        let p = |i: usize| params.get(i).copied().unwrap_or(0);
        let n = |i: usize| p(i).max(1);

        let event = match (self.private, byte) {
            (None, b'A') => TerminalEvent::CursorMove(CursorMove::Up(n(0))),
            (None, b'B') => TerminalEvent::CursorMove(CursorMove::Down(n(0))),
            (None, b'C') => TerminalEvent::CursorMove(CursorMove::Forward(n(0))),
            (None, b'D') => TerminalEvent::CursorMove(CursorMove::Back(n(0))),
            (None, b'E') => TerminalEvent::CursorMove(CursorMove::NextLine(n(0))),
            (None, b'F') => TerminalEvent::CursorMove(CursorMove::PreviousLine(n(0))),
            (None, b'G' | b'`') => TerminalEvent::CursorMove(CursorMove::Column(n(0) - 1)),
            (None, b'd') => TerminalEvent::CursorMove(CursorMove::Row(n(0) - 1)),
            (None, b'H' | b'f') => TerminalEvent::CursorMove(CursorMove::Position {
                row: n(0) - 1,
                col: n(1) - 1,
            }),
            (None, b'J') => EraseMode::from_param(p(0))
                .map_or(TerminalEvent::Unsupported, TerminalEvent::EraseInDisplay),
            (None, b'K') => EraseMode::from_param(p(0))
                .map_or(TerminalEvent::Unsupported, TerminalEvent::EraseInLine),
            (None, b'X') => TerminalEvent::EraseChars(n(0)),
            (None, b'P') => TerminalEvent::DeleteChars(n(0)),
            (None, b'@') => TerminalEvent::InsertChars(n(0)),
            (None, b'L') => TerminalEvent::InsertLines(n(0)),
            (None, b'M') => TerminalEvent::DeleteLines(n(0)),
            (None, b'S') => TerminalEvent::ScrollUp(n(0)),
            (None, b'T') => TerminalEvent::ScrollDown(n(0)),
            (None, b'm') => {
                sgr(params, sink);
                return;
            }
            (None, b'r') => TerminalEvent::SetScrollRegion {
                top: Some(p(0)).filter(|&v| v > 0),
                bottom: Some(p(1)).filter(|&v| v > 0),
            },
            (None, b's') => TerminalEvent::SaveCursor,
            (None, b'u') => TerminalEvent::RestoreCursor,
            (Some(b'?'), b'h' | b'l') => {
                let visible = byte == b'h';
                for &mode in params {
                    sink(match mode {
                        25 => TerminalEvent::SetCursorVisible(visible),
                        _ => TerminalEvent::Unsupported,
                    });
                }
                return;
            }
            _ => TerminalEvent::Unsupported,
        };
        sink(event);
    }
}

/// C0 control dispatch.
fn execute(byte: u8) -> Option<TerminalEvent> {
    match byte {
        0x07 => Some(TerminalEvent::Bell),
        0x08 => Some(TerminalEvent::Backspace),
        0x09 => Some(TerminalEvent::Tab),
        0x0a..=0x0c => Some(TerminalEvent::LineFeed),
        0x0d => Some(TerminalEvent::CarriageReturn),
        _ => None,
    }
}

/// Expand an SGR parameter list into attribute events.
fn sgr<F: FnMut(TerminalEvent)>(params: &[u16], sink: &mut F) {
    if params.is_empty() {
        sink(TerminalEvent::ResetAttributes);
        return;
    }

    let mut i = 0;
    while i < params.len() {
        let code = params[i];
        i += 1;
        let attr = match code {
            0 => {
                sink(TerminalEvent::ResetAttributes);
                continue;
            }
            1 => Attribute::Bold,
            2 => Attribute::Dim,
            3 => Attribute::Italic,
            4 | 21 => Attribute::Underline,
            5 | 6 => Attribute::Blink,
            7 => Attribute::Inverse,
            9 => Attribute::Strikethrough,
            22 => Attribute::NormalIntensity,
            23 => Attribute::NoItalic,
            24 => Attribute::NoUnderline,
            25 => Attribute::NoBlink,
            27 => Attribute::NoInverse,
            29 => Attribute::NoStrikethrough,
            30..=37 => Attribute::Foreground(Color::Indexed((code - 30) as u8)),
            39 => Attribute::Foreground(Color::Default),
            40..=47 => Attribute::Background(Color::Indexed((code - 40) as u8)),
            49 => Attribute::Background(Color::Default),
            90..=97 => Attribute::Foreground(Color::Indexed((code - 90 + 8) as u8)),
            100..=107 => Attribute::Background(Color::Indexed((code - 100 + 8) as u8)),
            38 | 48 => {
                let (color, consumed) = extended_color(&params[i..]);
                i += consumed;
                match color {
                    Some(color) if code == 38 => Attribute::Foreground(color),
                    Some(color) => Attribute::Background(color),
                    None => {
                        sink(TerminalEvent::Unsupported);
                        continue;
                    }
                }
            }
            _ => {
                sink(TerminalEvent::Unsupported);
                continue;
            }
        };
        sink(TerminalEvent::SetAttribute(attr));
    }
}

/// Parse the tail of a 38/48 attribute. Returns the color and the number of
/// parameters consumed; a malformed tail consumes everything left.
fn extended_color(rest: &[u16]) -> (Option<Color>, usize) {
    let channel = |v: u16| v.min(255) as u8;
    match rest {
        [5, index, ..] => (Some(Color::Indexed(channel(*index))), 2),
        [2, r, g, b, ..] => (Some(Color::Rgb(channel(*r), channel(*g), channel(*b))), 4),
        _ => (None, rest.len()),
    }
}

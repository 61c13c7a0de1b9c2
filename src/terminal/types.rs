//! Terminal data types.
//!
//! Contains the core data structures for representing terminal state:
//! - Color: default, palette index (0-255) or RGB
//! - CellStyle: colors plus text attributes (bold, italic, underline, etc.)
//! - Cell: a single character with its style
//! - TerminalEvent: the structured output of the escape-sequence parser

/// A cell color as written by the application.
///
/// Colors stay symbolic inside the buffer; they are resolved against the
/// recording's theme only when the frame is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The theme's default foreground or background
    #[default]
    Default,
    /// Palette index: 0-7 normal, 8-15 bright, 16-255 xterm extended
    Indexed(u8),
    /// Direct 24-bit color
    Rgb(u8, u8, u8),
}

/// Text attributes plus colors. This is also the "pen" applied to newly
/// printed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    pub strikethrough: bool,
}

impl CellStyle {
    /// Apply a single SGR attribute to this style.
    pub fn apply(&mut self, attr: Attribute) {
        match attr {
            Attribute::Bold => self.bold = true,
            Attribute::Dim => self.dim = true,
            Attribute::Italic => self.italic = true,
            Attribute::Underline => self.underline = true,
            Attribute::Blink => self.blink = true,
            Attribute::Inverse => self.reverse = true,
            Attribute::Strikethrough => self.strikethrough = true,
            Attribute::NormalIntensity => {
                self.bold = false;
                self.dim = false;
            }
            Attribute::NoItalic => self.italic = false,
            Attribute::NoUnderline => self.underline = false,
            Attribute::NoBlink => self.blink = false,
            Attribute::NoInverse => self.reverse = false,
            Attribute::NoStrikethrough => self.strikethrough = false,
            Attribute::Foreground(color) => self.fg = color,
            Attribute::Background(color) => self.bg = color,
        }
    }
}

/// A single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
    /// Right half of a double-width character; carries no glyph of its own.
    pub spacer: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
            spacer: false,
        }
    }
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && !self.spacer
    }
}

/// SGR attribute carried by [`TerminalEvent::SetAttribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    Inverse,
    Strikethrough,
    NormalIntensity,
    NoItalic,
    NoUnderline,
    NoBlink,
    NoInverse,
    NoStrikethrough,
    Foreground(Color),
    Background(Color),
}

/// Cursor movement requested by a CSI sequence. Amounts are already
/// defaulted (a missing or zero parameter means 1). Absolute positions are
/// 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up(u16),
    Down(u16),
    Forward(u16),
    Back(u16),
    NextLine(u16),
    PreviousLine(u16),
    Column(u16),
    Row(u16),
    Position { row: u16, col: u16 },
}

/// Which part of a line or of the display to erase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end (mode 0)
    ToEnd,
    /// From the start to the cursor, inclusive (mode 1)
    ToStart,
    /// Everything (mode 2, and 3 for displays)
    All,
}

impl EraseMode {
    pub fn from_param(param: u16) -> Option<Self> {
        match param {
            0 => Some(EraseMode::ToEnd),
            1 => Some(EraseMode::ToStart),
            2 | 3 => Some(EraseMode::All),
            _ => None,
        }
    }
}

/// Structured output of the escape-sequence parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Print(char),
    CursorMove(CursorMove),
    SetAttribute(Attribute),
    ResetAttributes,
    EraseInLine(EraseMode),
    EraseInDisplay(EraseMode),
    EraseChars(u16),
    InsertChars(u16),
    DeleteChars(u16),
    InsertLines(u16),
    DeleteLines(u16),
    ScrollUp(u16),
    ScrollDown(u16),
    LineFeed,
    CarriageReturn,
    Backspace,
    Tab,
    ReverseIndex,
    NextLine,
    SaveCursor,
    RestoreCursor,
    SetCursorVisible(bool),
    /// 1-based margins as sent; `None` means "use the screen edge"
    SetScrollRegion {
        top: Option<u16>,
        bottom: Option<u16>,
    },
    FullReset,
    Bell,
    Unsupported,
}

/// Cursor state captured in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    pub visible: bool,
}

/// Immutable copy of the visible grid and cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Screen {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Cell>,
    pub cursor: Cursor,
}

impl Screen {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Text of one row with trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> String {
        let line: String = self
            .row(row)
            .iter()
            .filter(|c| !c.spacer)
            .map(|c| c.ch)
            .collect();
        line.trim_end().to_string()
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.row_text(row))?;
        }
        Ok(())
    }
}

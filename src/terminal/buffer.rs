//! Screen buffer: the grid of styled cells plus cursor and pen state.
//!
//! The grid is a flat `Vec<Cell>` indexed by `row * cols + col`. All
//! mutation goes through [`ScreenBuffer::apply`]; the per-category handlers
//! live in `handlers/`.

use unicode_width::UnicodeWidthChar;

use super::types::{Cell, CellStyle, Cursor, Screen, TerminalEvent};

/// Cursor position and pen saved by DECSC / `CSI s`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavedCursor {
    pub row: usize,
    pub col: usize,
    pub pen: CellStyle,
}

/// The live terminal grid.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) cells: Vec<Cell>,
    pub(crate) cursor_row: usize,
    pub(crate) cursor_col: usize,
    pub(crate) cursor_visible: bool,
    pub(crate) pen: CellStyle,
    /// Inclusive scroll margins, 0-based
    pub(crate) scroll_top: usize,
    pub(crate) scroll_bottom: usize,
    pub(crate) saved: Option<SavedCursor>,
    /// Set after printing in the last column; the next printable wraps first
    pub(crate) wrap_pending: bool,
    /// Number of lines scrolled off the top of the screen so far
    pub(crate) scrolled_lines: u64,
    pub(crate) capture_scrolled: bool,
    pub(crate) scrolled_out: Vec<Vec<Cell>>,
}

impl ScreenBuffer {
    /// Create a blank buffer. Zero dimensions are bumped to 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
            cursor_row: 0,
            cursor_col: 0,
            cursor_visible: true,
            pen: CellStyle::default(),
            scroll_top: 0,
            scroll_bottom: rows - 1,
            saved: None,
            wrap_pending: false,
            scrolled_lines: 0,
            capture_scrolled: false,
            scrolled_out: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn pen(&self) -> &CellStyle {
        &self.pen
    }

    /// Total number of lines scrolled off the top of the screen.
    pub fn scrolled_lines(&self) -> u64 {
        self.scrolled_lines
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(self.index(row, col))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Cell] {
        let start = row * self.cols;
        let end = start + self.cols;
        &mut self.cells[start..end]
    }

    /// Mutate the buffer according to one parser event.
    pub fn apply(&mut self, event: TerminalEvent) {
        match event {
            TerminalEvent::Print(ch) => self.print(ch),
            TerminalEvent::CursorMove(movement) => self.move_cursor(movement),
            TerminalEvent::SetAttribute(attr) => self.set_attribute(attr),
            TerminalEvent::ResetAttributes => self.reset_attributes(),
            TerminalEvent::EraseInLine(mode) => self.erase_in_line(mode),
            TerminalEvent::EraseInDisplay(mode) => self.erase_in_display(mode),
            TerminalEvent::EraseChars(n) => self.erase_chars(n as usize),
            TerminalEvent::InsertChars(n) => self.insert_chars(n as usize),
            TerminalEvent::DeleteChars(n) => self.delete_chars(n as usize),
            TerminalEvent::InsertLines(n) => self.insert_lines(n as usize),
            TerminalEvent::DeleteLines(n) => self.delete_lines(n as usize),
            TerminalEvent::ScrollUp(n) => self.scroll_up(n as usize),
            TerminalEvent::ScrollDown(n) => self.scroll_down(n as usize),
            TerminalEvent::LineFeed => self.line_feed(),
            TerminalEvent::CarriageReturn => self.carriage_return(),
            TerminalEvent::Backspace => self.backspace(),
            TerminalEvent::Tab => self.tab(),
            TerminalEvent::ReverseIndex => self.reverse_index(),
            TerminalEvent::NextLine => {
                self.carriage_return();
                self.line_feed();
            }
            TerminalEvent::SaveCursor => self.save_cursor(),
            TerminalEvent::RestoreCursor => self.restore_cursor(),
            TerminalEvent::SetCursorVisible(visible) => self.cursor_visible = visible,
            TerminalEvent::SetScrollRegion { top, bottom } => self.set_scroll_region(top, bottom),
            TerminalEvent::FullReset => self.full_reset(),
            TerminalEvent::Bell | TerminalEvent::Unsupported => {}
        }
    }

    /// Write a printable character at the cursor and advance.
    fn print(&mut self, ch: char) {
        let width = match ch.width() {
            Some(w) if w > 0 => w.min(self.cols),
            // Zero-width and combining characters are not rendered
            _ => return,
        };

        if self.wrap_pending {
            self.wrap();
        }
        if self.cursor_col + width > self.cols {
            // A wide character that does not fit wraps early
            self.wrap();
        }

        let (row, col) = (self.cursor_row, self.cursor_col);
        self.clear_wide_remnants(row, col, width);

        let idx = self.index(row, col);
        self.cells[idx] = Cell {
            ch,
            style: self.pen,
            spacer: false,
        };
        if width == 2 {
            self.cells[idx + 1] = Cell {
                ch: ' ',
                style: self.pen,
                spacer: true,
            };
        }

        if col + width >= self.cols {
            self.cursor_col = self.cols - 1;
            self.wrap_pending = true;
        } else {
            self.cursor_col = col + width;
        }
    }

    fn wrap(&mut self) {
        self.cursor_col = 0;
        self.line_feed();
    }

    /// Overwriting half of a double-width character blanks the other half.
    fn clear_wide_remnants(&mut self, row: usize, col: usize, width: usize) {
        let idx = self.index(row, col);
        if self.cells[idx].spacer && col > 0 {
            self.cells[idx - 1] = Cell::default();
        }
        let after = col + width;
        if after < self.cols && self.cells[idx + width].spacer {
            self.cells[idx + width] = Cell::default();
        }
    }

    /// Resize the grid, keeping the top-left content. When the cursor would
    /// fall below the new bottom edge, top lines are dropped so the cursor
    /// line stays visible.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let rows = rows.max(1);
        let cols = cols.max(1);
        if rows == self.rows && cols == self.cols {
            return;
        }

        let shift = (self.cursor_row + 1).saturating_sub(rows);
        let mut cells = vec![Cell::default(); rows * cols];
        for new_row in 0..rows {
            let old_row = new_row + shift;
            if old_row >= self.rows {
                break;
            }
            for col in 0..cols.min(self.cols) {
                cells[new_row * cols + col] = self.cells[self.index(old_row, col)];
            }
        }
        // A wide character cut in half at the new right edge
        for row in 0..rows {
            let last = row * cols + cols - 1;
            if cells[last].ch != ' ' && !cells[last].spacer && cells[last].ch.width() == Some(2) {
                cells[last] = Cell::default();
            }
        }

        self.cells = cells;
        self.rows = rows;
        self.cols = cols;
        self.cursor_row = (self.cursor_row - shift).min(rows - 1);
        self.cursor_col = self.cursor_col.min(cols - 1);
        self.scroll_top = 0;
        self.scroll_bottom = rows - 1;
        self.wrap_pending = false;
    }

    /// Return the terminal to its power-on state, keeping the geometry.
    pub(crate) fn full_reset(&mut self) {
        let scrolled_lines = self.scrolled_lines;
        let capture = self.capture_scrolled;
        let scrolled_out = std::mem::take(&mut self.scrolled_out);
        *self = Self::new(self.rows, self.cols);
        self.scrolled_lines = scrolled_lines;
        self.capture_scrolled = capture;
        self.scrolled_out = scrolled_out;
    }

    /// Immutable copy of the grid and cursor.
    pub fn snapshot(&self) -> Screen {
        Screen {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
            cursor: Cursor {
                row: self.cursor_row,
                col: self.cursor_col,
                visible: self.cursor_visible,
            },
        }
    }

    /// Text of one row with trailing blanks trimmed.
    pub fn line(&self, row: usize) -> String {
        let start = self.index(row, 0);
        let line: String = self.cells[start..start + self.cols]
            .iter()
            .filter(|c| !c.spacer)
            .map(|c| c.ch)
            .collect();
        line.trim_end().to_string()
    }

    pub(crate) fn take_scrolled(&mut self) -> Vec<Vec<Cell>> {
        std::mem::take(&mut self.scrolled_out)
    }
}

impl std::fmt::Display for ScreenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.line(row))?;
        }
        Ok(())
    }
}

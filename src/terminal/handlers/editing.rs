//! Erase and edit handlers.
//!
//! Handles CSI sequences:
//! - J: Erase in display
//! - K: Erase in line
//! - X: Erase characters
//! - @: Insert characters
//! - P: Delete characters
//!
//! Erased cells become blank on the default background.

use crate::terminal::buffer::ScreenBuffer;
use crate::terminal::types::{Cell, EraseMode};

impl ScreenBuffer {
    pub(crate) fn erase_in_line(&mut self, mode: EraseMode) {
        let row = self.cursor_row;
        let col = self.cursor_col;
        let cols = self.cols;
        let line = self.row_mut(row);
        match mode {
            EraseMode::ToEnd => line[col..].fill(Cell::default()),
            EraseMode::ToStart => line[..=col.min(cols - 1)].fill(Cell::default()),
            EraseMode::All => line.fill(Cell::default()),
        }
        self.wrap_pending = false;
    }

    pub(crate) fn erase_in_display(&mut self, mode: EraseMode) {
        let cursor = self.index(self.cursor_row, self.cursor_col);
        match mode {
            EraseMode::ToEnd => self.cells[cursor..].fill(Cell::default()),
            EraseMode::ToStart => self.cells[..=cursor].fill(Cell::default()),
            EraseMode::All => self.cells.fill(Cell::default()),
        }
        self.wrap_pending = false;
    }

    pub(crate) fn erase_chars(&mut self, n: usize) {
        let col = self.cursor_col;
        let end = (col + n).min(self.cols);
        let row = self.cursor_row;
        self.row_mut(row)[col..end].fill(Cell::default());
        self.wrap_pending = false;
    }

    /// Shift the rest of the line right, opening `n` blanks at the cursor.
    pub(crate) fn insert_chars(&mut self, n: usize) {
        let col = self.cursor_col;
        let row = self.cursor_row;
        let line = &mut self.row_mut(row)[col..];
        let n = n.min(line.len());
        line.rotate_right(n);
        line[..n].fill(Cell::default());
        self.wrap_pending = false;
    }

    /// Shift the rest of the line left over the cursor, blanking the end.
    pub(crate) fn delete_chars(&mut self, n: usize) {
        let col = self.cursor_col;
        let row = self.cursor_row;
        let line = &mut self.row_mut(row)[col..];
        let n = n.min(line.len());
        line.rotate_left(n);
        let len = line.len();
        line[len - n..].fill(Cell::default());
        self.wrap_pending = false;
    }
}

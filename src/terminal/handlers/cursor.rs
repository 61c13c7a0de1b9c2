//! Cursor movement handlers.
//!
//! Handles CSI sequences:
//! - A/B/C/D: Cursor up/down/forward/back
//! - E/F: Cursor next/previous line
//! - H/f: Cursor position
//! - G/`: Cursor horizontal absolute
//! - d: Cursor vertical absolute
//! - s/u: Save/restore cursor
//!
//! And ESC sequences:
//! - ESC 7: DEC save cursor
//! - ESC 8: DEC restore cursor

use crate::terminal::buffer::{SavedCursor, ScreenBuffer};
use crate::terminal::types::{CellStyle, CursorMove};

const TAB_WIDTH: usize = 8;

impl ScreenBuffer {
    pub(crate) fn move_cursor(&mut self, movement: CursorMove) {
        self.wrap_pending = false;
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;

        match movement {
            CursorMove::Up(n) | CursorMove::PreviousLine(n) => {
                // Stop at the top margin when starting inside the region
                let limit = if self.cursor_row >= self.scroll_top {
                    self.scroll_top
                } else {
                    0
                };
                self.cursor_row = self.cursor_row.saturating_sub(n as usize).max(limit);
                if matches!(movement, CursorMove::PreviousLine(_)) {
                    self.cursor_col = 0;
                }
            }
            CursorMove::Down(n) | CursorMove::NextLine(n) => {
                let limit = if self.cursor_row <= self.scroll_bottom {
                    self.scroll_bottom
                } else {
                    last_row
                };
                self.cursor_row = (self.cursor_row + n as usize).min(limit);
                if matches!(movement, CursorMove::NextLine(_)) {
                    self.cursor_col = 0;
                }
            }
            CursorMove::Forward(n) => {
                self.cursor_col = (self.cursor_col + n as usize).min(last_col);
            }
            CursorMove::Back(n) => {
                self.cursor_col = self.cursor_col.saturating_sub(n as usize);
            }
            CursorMove::Column(col) => self.cursor_col = (col as usize).min(last_col),
            CursorMove::Row(row) => self.cursor_row = (row as usize).min(last_row),
            CursorMove::Position { row, col } => {
                self.cursor_row = (row as usize).min(last_row);
                self.cursor_col = (col as usize).min(last_col);
            }
        }
    }

    pub(crate) fn carriage_return(&mut self) {
        self.cursor_col = 0;
        self.wrap_pending = false;
    }

    pub(crate) fn backspace(&mut self) {
        if self.wrap_pending {
            self.wrap_pending = false;
        } else {
            self.cursor_col = self.cursor_col.saturating_sub(1);
        }
    }

    pub(crate) fn tab(&mut self) {
        let next = (self.cursor_col / TAB_WIDTH + 1) * TAB_WIDTH;
        self.cursor_col = next.min(self.cols - 1);
    }

    pub(crate) fn save_cursor(&mut self) {
        self.saved = Some(SavedCursor {
            row: self.cursor_row,
            col: self.cursor_col,
            pen: self.pen,
        });
    }

    /// Restore the saved cursor, or home with a default pen if none was saved.
    pub(crate) fn restore_cursor(&mut self) {
        let saved = self.saved.unwrap_or(SavedCursor {
            row: 0,
            col: 0,
            pen: CellStyle::default(),
        });
        self.cursor_row = saved.row.min(self.rows - 1);
        self.cursor_col = saved.col.min(self.cols - 1);
        self.pen = saved.pen;
        self.wrap_pending = false;
    }
}

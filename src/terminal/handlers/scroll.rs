//! Scroll region handlers.
//!
//! Handles CSI sequences:
//! - r: DECSTBM (Set Top and Bottom Margins)
//! - S: Scroll up
//! - T: Scroll down
//! - L/M: Insert/delete lines
//!
//! And the controls that scroll implicitly:
//! - LF / ESC D: Index
//! - ESC M: Reverse index

use crate::terminal::buffer::ScreenBuffer;
use crate::terminal::types::Cell;

impl ScreenBuffer {
    /// Move down one line, scrolling the region when on its bottom margin.
    pub(crate) fn line_feed(&mut self) {
        self.wrap_pending = false;
        if self.cursor_row == self.scroll_bottom {
            self.scroll_up(1);
        } else if self.cursor_row < self.rows - 1 {
            self.cursor_row += 1;
        }
    }

    /// Move up one line, scrolling the region down when on its top margin.
    pub(crate) fn reverse_index(&mut self) {
        self.wrap_pending = false;
        if self.cursor_row == self.scroll_top {
            self.scroll_down(1);
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
        }
    }

    /// Scroll the region up: its top `n` lines are dropped and blank lines
    /// appear at the bottom.
    pub(crate) fn scroll_up(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top, self.scroll_bottom);
        self.remove_lines(top, bottom, n);
    }

    /// Scroll the region down: blank lines appear at the top.
    pub(crate) fn scroll_down(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top, self.scroll_bottom);
        self.open_lines(top, bottom, n);
    }

    pub(crate) fn insert_lines(&mut self, n: usize) {
        if self.cursor_row < self.scroll_top || self.cursor_row > self.scroll_bottom {
            return;
        }
        let (row, bottom) = (self.cursor_row, self.scroll_bottom);
        self.open_lines(row, bottom, n);
        self.cursor_col = 0;
        self.wrap_pending = false;
    }

    pub(crate) fn delete_lines(&mut self, n: usize) {
        if self.cursor_row < self.scroll_top || self.cursor_row > self.scroll_bottom {
            return;
        }
        let (row, bottom) = (self.cursor_row, self.scroll_bottom);
        self.remove_lines_inner(row, bottom, n);
        self.cursor_col = 0;
        self.wrap_pending = false;
    }

    /// Set the scroll margins (1-based, inclusive) and home the cursor.
    /// Invalid regions are ignored.
    pub(crate) fn set_scroll_region(&mut self, top: Option<u16>, bottom: Option<u16>) {
        let top = top.map_or(0, |t| (t as usize).saturating_sub(1));
        let bottom = bottom.map_or(self.rows - 1, |b| {
            (b as usize).saturating_sub(1).min(self.rows - 1)
        });
        if top >= bottom {
            tracing::debug!(top, bottom, "ignoring invalid scroll region");
            return;
        }
        self.scroll_top = top;
        self.scroll_bottom = bottom;
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.wrap_pending = false;
    }

    /// Scroll `[top, bottom]` up by `n`, counting lines that leave the
    /// screen when the region starts at the top row.
    fn remove_lines(&mut self, top: usize, bottom: usize, n: usize) {
        let n = n.min(bottom - top + 1);
        if top == 0 {
            self.scrolled_lines += n as u64;
            if self.capture_scrolled {
                for row in 0..n {
                    let start = self.index(row, 0);
                    let line = self.cells[start..start + self.cols].to_vec();
                    self.scrolled_out.push(line);
                }
            }
        }
        self.remove_lines_inner(top, bottom, n);
    }

    fn remove_lines_inner(&mut self, top: usize, bottom: usize, n: usize) {
        let n = n.min(bottom - top + 1);
        let start = self.index(top, 0);
        let end = self.index(bottom + 1, 0);
        self.cells[start..end].rotate_left(n * self.cols);
        for row in (bottom + 1 - n)..=bottom {
            self.row_mut(row).fill(Cell::default());
        }
    }

    fn open_lines(&mut self, top: usize, bottom: usize, n: usize) {
        let n = n.min(bottom - top + 1);
        let start = self.index(top, 0);
        let end = self.index(bottom + 1, 0);
        self.cells[start..end].rotate_right(n * self.cols);
        for row in top..top + n {
            self.row_mut(row).fill(Cell::default());
        }
    }
}

//! Virtual terminal emulator module.
//!
//! Replays raw session output into a grid of styled cells:
//! - `parser`: byte stream → [`TerminalEvent`]s (table-driven state machine)
//! - `buffer`: [`ScreenBuffer`], the grid, cursor and pen
//! - `handlers/`: the per-category event handlers of the buffer
//!
//! [`Terminal`] ties one parser to one buffer. It is owned by a single
//! replay pass and never shared between threads for writing.

mod buffer;
mod handlers;
pub mod parser;
mod types;

#[cfg(test)]
mod tests;

pub use buffer::ScreenBuffer;
pub use parser::Parser;
pub use types::{
    Attribute, Cell, CellStyle, Color, Cursor, CursorMove, EraseMode, Screen, TerminalEvent,
};

/// A parser feeding a screen buffer.
#[derive(Debug, Clone)]
pub struct Terminal {
    parser: Parser,
    buffer: ScreenBuffer,
}

impl Terminal {
    /// Create a terminal with given dimensions.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            parser: Parser::new(),
            buffer: ScreenBuffer::new(rows, cols),
        }
    }

    /// Feed raw output bytes through the parser into the buffer.
    ///
    /// When `scroll_cb` is given it receives every line that scrolls off the
    /// top of the screen, in order.
    pub fn process(&mut self, data: &[u8], scroll_cb: Option<&mut dyn FnMut(Vec<Cell>)>) {
        let Self { parser, buffer } = self;
        buffer.capture_scrolled = scroll_cb.is_some();
        for &byte in data {
            parser.advance(byte, &mut |event| buffer.apply(event));
        }
        if let Some(cb) = scroll_cb {
            for line in buffer.take_scrolled() {
                cb(line);
            }
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.buffer.resize(rows, cols);
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    pub fn snapshot(&self) -> Screen {
        self.buffer.snapshot()
    }

    pub fn cursor_row(&self) -> usize {
        self.buffer.cursor_row()
    }

    pub fn cursor_col(&self) -> usize {
        self.buffer.cursor_col()
    }
}

impl std::fmt::Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.buffer, f)
    }
}

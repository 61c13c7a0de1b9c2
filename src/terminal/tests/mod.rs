//! Terminal emulator tests.
//!
//! Organized by handler category:
//! - cursor_tests: Cursor movement
//! - scroll_tests: Scroll region behavior and auto-wrap
//! - editing_tests: Erase/insert/delete operations
//! - style_tests: SGR color/attribute handling
//! - integration_tests: Full sequence replay

mod cursor_tests;
mod style_tests;

use super::Terminal;

/// Build a terminal and feed it `input`.
pub(super) fn term(cols: usize, rows: usize, input: &str) -> Terminal {
    let mut term = Terminal::new(cols, rows);
    term.process(input.as_bytes(), None);
    term
}

//! Terminal escape sequence handlers.
//!
//! Organized by category, each an `impl ScreenBuffer` block:
//! - cursor: Cursor movement and positioning
//! - scroll: Scroll region and scrolling operations
//! - editing: Erase, insert and delete operations
//! - style: SGR (Select Graphic Rendition) handling

mod cursor;
mod editing;
mod scroll;
mod style;

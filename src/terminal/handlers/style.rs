//! SGR (Select Graphic Rendition) handler.
//!
//! The parser already splits `CSI ... m` into one attribute per event; this
//! applies them to the pen:
//! - Reset (0) restores the pen to its power-on value
//! - Bold, dim, italic, underline, blink, reverse, strikethrough and resets
//! - Standard, bright, 256-color and RGB foreground/background

use crate::terminal::buffer::ScreenBuffer;
use crate::terminal::types::{Attribute, CellStyle};

impl ScreenBuffer {
    pub(crate) fn set_attribute(&mut self, attr: Attribute) {
        self.pen.apply(attr);
    }

    pub(crate) fn reset_attributes(&mut self) {
        self.pen = CellStyle::default();
    }
}

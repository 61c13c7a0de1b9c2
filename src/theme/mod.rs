//! Color themes.
//!
//! A [`Theme`] is a named 16-color palette plus default foreground and
//! background. It is resolved once, when recording starts, and stored in the
//! cast header; rendering only ever reads the stored colors.
//!
//! - `builtin`: the table of named themes
//! - `source`: querying the display environment for the user's colors

mod builtin;
mod source;

use rgb::RGB8;

use crate::terminal::Color;

pub use builtin::{builtin, builtin_names, DEFAULT_THEME};
pub use source::{resolve_theme, NoDisplay, ThemeSource, XResources};

/// Errors raised while building or resolving a theme.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("display environment unavailable: {0}")]
    Unavailable(String),

    #[error("missing color '{0}' in display resources")]
    MissingColor(String),

    #[error("invalid color value {value:?} for '{key}'")]
    InvalidColor { key: String, value: String },

    #[error("palette must have 8 or 16 colors, got {0}")]
    PaletteSize(usize),

    #[error("unknown theme '{0}'")]
    Unknown(String),
}

/// A resolved color theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub fg: RGB8,
    pub bg: RGB8,
    /// Always 16 entries; an 8-color palette is repeated for the bright half
    pub palette: Vec<RGB8>,
}

impl Theme {
    /// Build a theme from an 8 or 16 color palette.
    pub fn new(
        name: impl Into<String>,
        fg: RGB8,
        bg: RGB8,
        mut palette: Vec<RGB8>,
    ) -> Result<Self, ThemeError> {
        match palette.len() {
            8 => palette.extend_from_within(..),
            16 => {}
            n => return Err(ThemeError::PaletteSize(n)),
        }
        Ok(Self {
            name: name.into(),
            fg,
            bg,
            palette,
        })
    }

    /// RGB value of a 256-color index.
    ///
    /// 0-15 come from the palette, 16-231 from the xterm 6x6x6 cube and
    /// 232-255 from the grayscale ramp.
    pub fn indexed(&self, index: u8) -> RGB8 {
        match index {
            0..=15 => self.palette[index as usize],
            16..=231 => {
                let i = index - 16;
                let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
                RGB8::new(level(i / 36), level((i / 6) % 6), level(i % 6))
            }
            232..=255 => {
                let v = 8 + (index - 232) * 10;
                RGB8::new(v, v, v)
            }
        }
    }

    /// Resolve a cell color, using `default` for [`Color::Default`].
    pub fn resolve(&self, color: Color, default: RGB8) -> RGB8 {
        match color {
            Color::Default => default,
            Color::Indexed(i) => self.indexed(i),
            Color::Rgb(r, g, b) => RGB8::new(r, g, b),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        builtin::fallback()
    }
}

/// Parse a `#rrggbb` color.
pub fn parse_hex_color(value: &str) -> Option<RGB8> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGB8::new(r, g, b))
}

/// Format a color as `#rrggbb`.
pub fn hex_color(color: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(v: u8) -> RGB8 {
        RGB8::new(v, v, v)
    }

    #[test]
    fn eight_color_palette_is_doubled() {
        let palette: Vec<RGB8> = (0..8).map(|i| gray(i * 10)).collect();
        let theme = Theme::new("t", gray(255), gray(0), palette).unwrap();
        assert_eq!(theme.palette.len(), 16);
        assert_eq!(theme.palette[9], theme.palette[1]);
    }

    #[test]
    fn rejects_bad_palette_size() {
        let result = Theme::new("t", gray(255), gray(0), vec![gray(1); 5]);
        assert!(matches!(result, Err(ThemeError::PaletteSize(5))));
    }

    #[test]
    fn indexed_colors_cover_cube_and_ramp() {
        let theme = Theme::default();
        assert_eq!(theme.indexed(1), theme.palette[1]);
        assert_eq!(theme.indexed(16), RGB8::new(0, 0, 0));
        assert_eq!(theme.indexed(196), RGB8::new(255, 0, 0));
        assert_eq!(theme.indexed(231), RGB8::new(255, 255, 255));
        assert_eq!(theme.indexed(232), gray(8));
        assert_eq!(theme.indexed(255), gray(238));
    }

    #[test]
    fn resolve_uses_default_and_rgb() {
        let theme = Theme::default();
        assert_eq!(theme.resolve(Color::Default, theme.fg), theme.fg);
        assert_eq!(
            theme.resolve(Color::Rgb(1, 2, 3), theme.fg),
            RGB8::new(1, 2, 3)
        );
    }

    #[test]
    fn hex_colors_round_trip() {
        let color = parse_hex_color("#0a1B2c").unwrap();
        assert_eq!(color, RGB8::new(0x0a, 0x1b, 0x2c));
        assert_eq!(hex_color(color), "#0a1b2c");
        assert_eq!(parse_hex_color("0a1b2c"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }
}

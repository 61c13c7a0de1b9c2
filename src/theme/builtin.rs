//! Built-in themes.
//!
//! Every entry carries a full 16-color palette; 8-color schemes list their
//! normal colors twice.

use rgb::RGB8;

use super::Theme;

/// Theme used when nothing else resolves.
pub const DEFAULT_THEME: &str = "solarized-dark";

struct BuiltinTheme {
    name: &'static str,
    fg: u32,
    bg: u32,
    palette: [u32; 16],
}

const XTERM: [u32; 16] = [
    0x000000, 0xcd0000, 0x00cd00, 0xcdcd00, 0x0000ee, 0xcd00cd, 0x00cdcd, 0xe5e5e5, 0x7f7f7f,
    0xff0000, 0x00ff00, 0xffff00, 0x5c5cff, 0xff00ff, 0x00ffff, 0xffffff,
];

const SOLARIZED: [u32; 16] = [
    0x073642, 0xdc322f, 0x859900, 0xb58900, 0x268bd2, 0xd33682, 0x2aa198, 0xeee8d5, 0x002b36,
    0xcb4b16, 0x586e75, 0x657b83, 0x839496, 0x6c71c4, 0x93a1a1, 0xfdf6e3,
];

/// Base16-style scheme: eight colors, bright half repeats them except
/// black (`bright_black`) and white (`bright_white`).
const fn base16(colors: [u32; 8], bright_black: u32, bright_white: u32) -> [u32; 16] {
    [
        colors[0],
        colors[1],
        colors[2],
        colors[3],
        colors[4],
        colors[5],
        colors[6],
        colors[7],
        bright_black,
        colors[1],
        colors[2],
        colors[3],
        colors[4],
        colors[5],
        colors[6],
        bright_white,
    ]
}

const THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        name: "circus",
        fg: 0xa7a7a7,
        bg: 0x191919,
        palette: base16(
            [0x191919, 0xdc657d, 0x84b97c, 0xc3ba63, 0x639ee4, 0xb888e2, 0x4bb1a7, 0xa7a7a7],
            0x5f5a60,
            0xffffff,
        ),
    },
    BuiltinTheme {
        name: "classic-dark",
        fg: 0xe5e5e5,
        bg: 0x000000,
        palette: XTERM,
    },
    BuiltinTheme {
        name: "classic-light",
        fg: 0x000000,
        bg: 0xffffff,
        palette: XTERM,
    },
    BuiltinTheme {
        name: "dracula",
        fg: 0xf8f8f2,
        bg: 0x282a36,
        palette: [
            0x000000, 0xff5555, 0x50fa7b, 0xf1fa8c, 0xbd93f9, 0xff79c6, 0x8be9fd, 0xbfbfbf,
            0x4d4d4d, 0xff6e67, 0x5af78e, 0xf4f99d, 0xcaa9fa, 0xff92d0, 0x9aedfe, 0xe6e6e6,
        ],
    },
    BuiltinTheme {
        name: "isotope",
        fg: 0xd0d0d0,
        bg: 0x000000,
        palette: base16(
            [0x000000, 0xff0000, 0x33ff00, 0xff0099, 0x0066ff, 0xcc00ff, 0x00ffff, 0xd0d0d0],
            0x808080,
            0xffffff,
        ),
    },
    BuiltinTheme {
        name: "marrakesh",
        fg: 0x948e48,
        bg: 0x201602,
        palette: base16(
            [0x201602, 0xc35359, 0x18974e, 0xa88339, 0x477ca1, 0x8868b3, 0x75a738, 0x948e48],
            0x6c6823,
            0xfaf0a5,
        ),
    },
    BuiltinTheme {
        name: "material",
        fg: 0xeeffff,
        bg: 0x263238,
        palette: base16(
            [0x263238, 0xf07178, 0xc3e88d, 0xffcb6b, 0x82aaff, 0xc792ea, 0x89ddff, 0xeeffff],
            0x546e7a,
            0xffffff,
        ),
    },
    BuiltinTheme {
        name: "monokai",
        fg: 0xf8f8f2,
        bg: 0x272822,
        palette: base16(
            [0x272822, 0xf92672, 0xa6e22e, 0xf4bf75, 0x66d9ef, 0xae81ff, 0xa1efe4, 0xf8f8f2],
            0x75715e,
            0xf9f8f5,
        ),
    },
    BuiltinTheme {
        name: "solarized-dark",
        fg: 0x839496,
        bg: 0x002b36,
        palette: SOLARIZED,
    },
    BuiltinTheme {
        name: "solarized-light",
        fg: 0x657b83,
        bg: 0xfdf6e3,
        palette: SOLARIZED,
    },
    BuiltinTheme {
        name: "zenburn",
        fg: 0xdcdccc,
        bg: 0x3f3f3f,
        palette: [
            0x1e2320, 0x705050, 0x60b48a, 0xdfaf8f, 0x506070, 0xdc8cc3, 0x8cd0d3, 0xdcdccc,
            0x709080, 0xdca3a3, 0xc3bf9f, 0xf0dfaf, 0x94bff3, 0xec93d3, 0x93e0e3, 0xffffff,
        ],
    },
];

fn rgb(value: u32) -> RGB8 {
    RGB8::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

impl BuiltinTheme {
    fn to_theme(&self) -> Theme {
        Theme {
            name: self.name.to_string(),
            fg: rgb(self.fg),
            bg: rgb(self.bg),
            palette: self.palette.iter().copied().map(rgb).collect(),
        }
    }
}

/// Look up a built-in theme by name.
pub fn builtin(name: &str) -> Option<Theme> {
    THEMES
        .iter()
        .find(|t| t.name == name)
        .map(BuiltinTheme::to_theme)
}

/// Names of all built-in themes, sorted.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|t| t.name)
}

pub(super) fn fallback() -> Theme {
    // THEMES is static and contains DEFAULT_THEME
    THEMES
        .iter()
        .find(|t| t.name == DEFAULT_THEME)
        .unwrap_or(&THEMES[0])
        .to_theme()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_and_unique() {
        let names: Vec<_> = builtin_names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn default_theme_exists() {
        let theme = builtin(DEFAULT_THEME).unwrap();
        assert_eq!(theme.bg, RGB8::new(0x00, 0x2b, 0x36));
        assert_eq!(fallback(), theme);
    }

    #[test]
    fn base16_schemes_repeat_normal_colors() {
        let theme = builtin("monokai").unwrap();
        assert_eq!(theme.palette[9], theme.palette[1]);
        assert_eq!(theme.palette[8], RGB8::new(0x75, 0x71, 0x5e));
        assert_eq!(theme.palette[15], RGB8::new(0xf9, 0xf8, 0xf5));
    }

    #[test]
    fn unknown_theme_is_none() {
        assert!(builtin("no-such-theme").is_none());
    }
}

//! Theme lookup from the display environment.

use std::collections::HashMap;
use std::process::Command;

use super::{builtin, parse_hex_color, Theme, ThemeError};

/// Something that can report the user's terminal colors.
pub trait ThemeSource {
    /// Query the environment for a theme.
    fn query(&self) -> Result<Theme, ThemeError>;
}

/// X resource database, read with `xrdb -query`.
///
/// Expects `*foreground`, `*background` and `*color0` .. `*color7`, and uses
/// `*color8` .. `*color15` when all of them are present.
pub struct XResources;

impl XResources {
    /// Create a new X resources source.
    pub fn new() -> Self {
        Self
    }

    /// Build a theme from `xrdb -query` output.
    pub fn parse(output: &str) -> Result<Theme, ThemeError> {
        let resources: HashMap<&str, &str> = output
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim(), value.trim()))
            .collect();

        let color = |name: &str| -> Result<Option<rgb::RGB8>, ThemeError> {
            let value = [format!("*{name}"), format!("*.{name}")]
                .iter()
                .find_map(|key| resources.get(key.as_str()).copied());
            match value {
                None => Ok(None),
                Some(value) => parse_hex_color(value).map(Some).ok_or_else(|| {
                    ThemeError::InvalidColor {
                        key: name.to_string(),
                        value: value.to_string(),
                    }
                }),
            }
        };
        let required = |name: &str| -> Result<rgb::RGB8, ThemeError> {
            color(name)?.ok_or_else(|| ThemeError::MissingColor(name.to_string()))
        };

        let fg = required("foreground")?;
        let bg = required("background")?;
        let mut palette = (0..8)
            .map(|i| required(&format!("color{i}")))
            .collect::<Result<Vec<_>, _>>()?;
        let bright = (8..16)
            .map(|i| color(&format!("color{i}")))
            .collect::<Result<Option<Vec<_>>, _>>()?;
        if let Some(bright) = bright {
            palette.extend(bright);
        }

        Theme::new("xresources", fg, bg, palette)
    }
}

impl ThemeSource for XResources {
    fn query(&self) -> Result<Theme, ThemeError> {
        if std::env::var_os("DISPLAY").is_none() {
            return Err(ThemeError::Unavailable("DISPLAY is not set".to_string()));
        }

        let output = Command::new("xrdb")
            .arg("-query")
            .output()
            .map_err(|e| ThemeError::Unavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(ThemeError::Unavailable("xrdb failed".to_string()));
        }

        Self::parse(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for XResources {
    fn default() -> Self {
        Self::new()
    }
}

/// A source that never finds anything.
pub struct NoDisplay;

impl ThemeSource for NoDisplay {
    fn query(&self) -> Result<Theme, ThemeError> {
        Err(ThemeError::Unavailable("no display source".to_string()))
    }
}

/// Resolve a theme by name, or from `source` when `name` is `None` or
/// `"auto"`. Never fails: anything unresolvable falls back to the default
/// built-in theme with a warning.
pub fn resolve_theme(name: Option<&str>, source: &dyn ThemeSource) -> Theme {
    match name {
        Some(name) if name != "auto" => match builtin(name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    error = %ThemeError::Unknown(name.to_string()),
                    "falling back to default theme"
                );
                Theme::default()
            }
        },
        _ => match source.query() {
            Ok(theme) => {
                tracing::debug!("using theme from display environment");
                theme
            }
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default theme");
                Theme::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::DEFAULT_THEME;
    use rgb::RGB8;

    const XRDB: &str = "\
*background:\t#1d1f21
*foreground:\t#c5c8c6
*color0:\t#282a2e
*color1:\t#a54242
*color2:\t#8c9440
*color3:\t#de935f
*color4:\t#5f819d
*color5:\t#85678f
*color6:\t#5e8d87
*color7:\t#707880
Xft.dpi:\t96
";

    struct Fixed(&'static str);

    impl ThemeSource for Fixed {
        fn query(&self) -> Result<Theme, ThemeError> {
            XResources::parse(self.0)
        }
    }

    #[test]
    fn parses_eight_color_resources() {
        let theme = XResources::parse(XRDB).unwrap();
        assert_eq!(theme.bg, RGB8::new(0x1d, 0x1f, 0x21));
        assert_eq!(theme.palette.len(), 16);
        assert_eq!(theme.palette[12], RGB8::new(0x5f, 0x81, 0x9d));
    }

    #[test]
    fn parses_bright_colors_when_complete() {
        let mut output = XRDB.to_string();
        for i in 8..16 {
            output.push_str(&format!("*.color{i}: #0000{i:02}\n"));
        }
        let theme = XResources::parse(&output).unwrap();
        assert_eq!(theme.palette[15], RGB8::new(0, 0, 0x15));
    }

    #[test]
    fn missing_color_is_an_error() {
        let output = XRDB.replace("*color3:\t#de935f\n", "");
        assert!(matches!(
            XResources::parse(&output),
            Err(ThemeError::MissingColor(name)) if name == "color3"
        ));
    }

    #[test]
    fn invalid_color_is_an_error() {
        let output = XRDB.replace("#a54242", "red");
        assert!(matches!(
            XResources::parse(&output),
            Err(ThemeError::InvalidColor { .. })
        ));
    }

    #[test]
    fn named_theme_ignores_source() {
        let theme = resolve_theme(Some("dracula"), &Fixed(XRDB));
        assert_eq!(theme.name, "dracula");
    }

    #[test]
    fn auto_uses_source() {
        let theme = resolve_theme(Some("auto"), &Fixed(XRDB));
        assert_eq!(theme.name, "xresources");
        assert_eq!(resolve_theme(None, &Fixed(XRDB)).name, "xresources");
    }

    #[test]
    fn failures_fall_back_to_default() {
        assert_eq!(resolve_theme(None, &NoDisplay).name, DEFAULT_THEME);
        assert_eq!(resolve_theme(Some("nope"), &NoDisplay).name, DEFAULT_THEME);
        assert_eq!(resolve_theme(None, &Fixed("garbage")).name, DEFAULT_THEME);
    }
}

//! Cast log to animated SVG.
//!
//! - `frames`: replay through a fresh terminal, then timing and dedup
//! - `svg`: document serialization

mod frames;
mod svg;

use anyhow::{Context, Result};

use crate::asciicast::CastLog;
use crate::theme::Theme;

pub use frames::{build_frames, Frame, FrameOptions};
pub use svg::{Geometry, SvgRenderer};

/// Everything that shapes a rendered document.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub frames: FrameOptions,
    pub geometry: Geometry,
    pub looping: bool,
    /// Overrides the theme stored in the log
    pub theme: Option<Theme>,
}

/// Render a whole cast log to an SVG document held in memory.
pub fn render_log(log: &CastLog, options: &RenderOptions) -> Result<String> {
    let theme = options
        .theme
        .clone()
        .or_else(|| log.header.theme.clone())
        .unwrap_or_default();

    let frames = build_frames(log, &options.frames);
    tracing::info!(frames = frames.len(), theme = %theme.name, "rendering");

    SvgRenderer::new(theme, options.geometry.clone())
        .looping(options.looping)
        .render(&frames)
        .context("Failed to serialize SVG")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asciicast::{Header, Record};
    use std::time::Duration;

    fn log_with_theme(name: &str) -> CastLog {
        let mut log = CastLog::new(Header::default());
        log.header.theme = crate::theme::builtin(name);
        log.records
            .push(Record::output(Duration::ZERO, b"x".to_vec()));
        log
    }

    #[test]
    fn header_theme_used_by_default() {
        let svg = render_log(&log_with_theme("dracula"), &RenderOptions::default()).unwrap();
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#282a36\"/>"));
    }

    #[test]
    fn explicit_theme_overrides_header() {
        let options = RenderOptions {
            theme: crate::theme::builtin("classic-light"),
            ..RenderOptions::default()
        };
        let svg = render_log(&log_with_theme("dracula"), &options).unwrap();
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>"));
        assert!(!svg.contains("#282a36"));
    }

    #[test]
    fn configured_theme_used_without_header_theme() {
        let log = CastLog::new(Header::default());
        let options = RenderOptions {
            theme: crate::theme::builtin("classic-light"),
            ..RenderOptions::default()
        };
        let svg = render_log(&log, &options).unwrap();
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>"));
    }
}

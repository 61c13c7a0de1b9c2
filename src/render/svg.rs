//! Animated SVG serialization.
//!
//! Every frame is a `<g>` hidden by default and shown during its
//! `[start, end)` window by a SMIL `<set>` element. Frames are serialized in
//! parallel and concatenated in order.

use std::fmt::{self, Write};
use std::time::Duration;

use rayon::prelude::*;
use rgb::RGB8;

use super::frames::Frame;
use crate::terminal::{Cell, Color, Screen};
use crate::theme::{hex_color, Theme};

/// Id of the timeline element frames synchronize on in loop mode.
const TIMELINE_ID: &str = "timeline";

/// Cell and font metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub cell_width: u32,
    pub cell_height: u32,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 17,
            font_size: 14,
            font_family: "'DejaVu Sans Mono', 'Liberation Mono', monospace".to_string(),
        }
    }
}

/// Serializes frames into one standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    theme: Theme,
    geometry: Geometry,
    looping: bool,
}

/// Fully resolved look of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Look {
    fg: RGB8,
    bg: RGB8,
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
}

impl SvgRenderer {
    pub fn new(theme: Theme, geometry: Geometry) -> Self {
        Self {
            theme,
            geometry,
            looping: false,
        }
    }

    /// Restart the animation after the last frame instead of freezing on it.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Render `frames` into an SVG document.
    pub fn render(&self, frames: &[Frame]) -> Result<String, fmt::Error> {
        let cols = frames.iter().map(|f| f.screen.cols).max().unwrap_or(1);
        let rows = frames.iter().map(|f| f.screen.rows).max().unwrap_or(1);
        let width = cols as u32 * self.geometry.cell_width;
        let height = rows as u32 * self.geometry.cell_height;
        let total = frames.last().map(|f| f.end).unwrap_or_default();

        let groups = frames
            .par_iter()
            .enumerate()
            .map(|(i, frame)| self.render_frame(frame, i + 1 == frames.len()))
            .collect::<Result<Vec<String>, fmt::Error>>()?;

        let mut out = String::with_capacity(groups.iter().map(String::len).sum::<usize>() + 1024);
        write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" \
             font-family=\"{}\" font-size=\"{}\">",
            escape(&self.geometry.font_family),
            self.geometry.font_size
        )?;
        out.push_str("<style>text{white-space:pre}</style>");
        write!(
            out,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            hex_color(self.theme.bg)
        )?;

        if self.looping {
            write!(
                out,
                "<rect width=\"0\" height=\"0\"><animate id=\"{TIMELINE_ID}\" \
                 attributeName=\"width\" from=\"0\" to=\"0\" begin=\"0ms;{TIMELINE_ID}.end\" \
                 dur=\"{}ms\"/></rect>",
                millis(total).max(1)
            )?;
        }

        for group in groups {
            out.push_str(&group);
        }
        out.push_str("</svg>");

        tracing::debug!(
            frames = frames.len(),
            bytes = out.len(),
            duration_ms = millis(total),
            "rendered svg"
        );
        Ok(out)
    }

    fn render_frame(&self, frame: &Frame, last: bool) -> Result<String, fmt::Error> {
        let mut out = String::new();
        let begin = millis(frame.start);
        // Zero-length SMIL durations are invalid
        let dur = millis(frame.end).saturating_sub(begin).max(1);

        out.push_str("<g display=\"none\">");
        if self.looping {
            write!(
                out,
                "<set attributeName=\"display\" to=\"inline\" \
                 begin=\"{TIMELINE_ID}.begin+{begin}ms\" dur=\"{dur}ms\"/>"
            )?;
        } else {
            write!(
                out,
                "<set attributeName=\"display\" to=\"inline\" begin=\"{begin}ms\" dur=\"{dur}ms\"{}/>",
                if last { " fill=\"freeze\"" } else { "" }
            )?;
        }

        self.write_backgrounds(&mut out, &frame.screen)?;
        self.write_cursor(&mut out, &frame.screen)?;
        self.write_text(&mut out, &frame.screen)?;
        out.push_str("</g>");
        Ok(out)
    }

    fn look(&self, cell: &Cell, cursor: bool) -> Look {
        let style = &cell.style;
        let fg_color = match style.fg {
            Color::Indexed(i) if style.bold && i < 8 => Color::Indexed(i + 8),
            other => other,
        };
        let mut fg = self.theme.resolve(fg_color, self.theme.fg);
        let mut bg = self.theme.resolve(style.bg, self.theme.bg);
        if style.reverse != cursor {
            std::mem::swap(&mut fg, &mut bg);
        }
        Look {
            fg,
            bg,
            bold: style.bold,
            dim: style.dim,
            italic: style.italic,
            underline: style.underline,
            strikethrough: style.strikethrough,
        }
    }

    fn is_cursor(screen: &Screen, row: usize, col: usize) -> bool {
        screen.cursor.visible && screen.cursor.row == row && screen.cursor.col == col
    }

    /// One rectangle per run of cells sharing a non-default background.
    fn write_backgrounds(&self, out: &mut String, screen: &Screen) -> fmt::Result {
        for row in 0..screen.rows {
            let mut run: Option<(usize, RGB8)> = None;
            for col in 0..=screen.cols {
                let bg = (col < screen.cols && !Self::is_cursor(screen, row, col))
                    .then(|| self.look(&screen.row(row)[col], false).bg)
                    .filter(|bg| *bg != self.theme.bg);
                match (run, bg) {
                    (Some((_, current)), Some(bg)) if current == bg => {}
                    _ => {
                        if let Some((start, color)) = run {
                            self.write_rect(out, row, start, col - start, color)?;
                        }
                        run = bg.map(|bg| (col, bg));
                    }
                }
            }
        }
        Ok(())
    }

    fn write_cursor(&self, out: &mut String, screen: &Screen) -> fmt::Result {
        let cursor = screen.cursor;
        if !cursor.visible || cursor.row >= screen.rows || cursor.col >= screen.cols {
            return Ok(());
        }
        let look = self.look(&screen.row(cursor.row)[cursor.col], true);
        self.write_rect(out, cursor.row, cursor.col, 1, look.bg)
    }

    fn write_rect(
        &self,
        out: &mut String,
        row: usize,
        col: usize,
        len: usize,
        color: RGB8,
    ) -> fmt::Result {
        let g = &self.geometry;
        write!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            col as u32 * g.cell_width,
            row as u32 * g.cell_height,
            len as u32 * g.cell_width,
            g.cell_height,
            hex_color(color)
        )
    }

    /// One `<text>` per run of identically styled cells. Runs of blank
    /// cells without decoration are skipped.
    fn write_text(&self, out: &mut String, screen: &Screen) -> fmt::Result {
        for row in 0..screen.rows {
            let cells = screen.row(row);
            let mut col = 0;
            while col < screen.cols {
                let look = self.look(&cells[col], Self::is_cursor(screen, row, col));
                let start = col;
                let mut text = String::new();
                while col < screen.cols {
                    let cell = &cells[col];
                    if !cell.spacer {
                        if self.look(cell, Self::is_cursor(screen, row, col)) != look {
                            break;
                        }
                        text.push(cell.ch);
                    }
                    col += 1;
                }

                let decorated = look.underline || look.strikethrough;
                if !decorated && text.chars().all(|c| c == ' ') {
                    continue;
                }
                self.write_run(out, row, start, col - start, &text, &look)?;
            }
        }
        Ok(())
    }

    fn write_run(
        &self,
        out: &mut String,
        row: usize,
        col: usize,
        len: usize,
        text: &str,
        look: &Look,
    ) -> fmt::Result {
        let g = &self.geometry;
        write!(
            out,
            "<text x=\"{}\" y=\"{}\" textLength=\"{}\" lengthAdjust=\"spacingAndGlyphs\"",
            col as u32 * g.cell_width,
            row as u32 * g.cell_height + g.font_size,
            len as u32 * g.cell_width
        )?;
        if look.fg != self.theme.fg {
            write!(out, " fill=\"{}\"", hex_color(look.fg))?;
        }
        if look.bold {
            out.push_str(" font-weight=\"bold\"");
        }
        if look.italic {
            out.push_str(" font-style=\"italic\"");
        }
        if look.dim {
            out.push_str(" opacity=\"0.5\"");
        }
        match (look.underline, look.strikethrough) {
            (true, true) => out.push_str(" text-decoration=\"underline line-through\""),
            (true, false) => out.push_str(" text-decoration=\"underline\""),
            (false, true) => out.push_str(" text-decoration=\"line-through\""),
            (false, false) => {}
        }
        out.push('>');
        escape_into(out, text);
        out.push_str("</text>");
        Ok(())
    }
}

fn millis(duration: Duration) -> u128 {
    duration.as_millis()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

/// XML-escape `s` into `out`. Characters XML cannot carry become spaces.
fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < ' ' || c == '\u{fffe}' || c == '\u{ffff}' => out.push(' '),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Terminal;

    fn frame(input: &str, start: u64, end: u64) -> Frame {
        let mut term = Terminal::new(10, 2);
        term.process(input.as_bytes(), None);
        Frame {
            start: Duration::from_millis(start),
            end: Duration::from_millis(end),
            screen: term.snapshot(),
        }
    }

    fn renderer() -> SvgRenderer {
        SvgRenderer::new(
            crate::theme::builtin("classic-dark").unwrap(),
            Geometry::default(),
        )
    }

    #[test]
    fn document_structure() {
        let svg = renderer().render(&[frame("hi", 0, 1000)]).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"80\" height=\"34\""));
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#000000\"/>"));
        assert!(svg.contains(">hi</text>"));
    }

    #[test]
    fn sub_millisecond_frames_last_one_millisecond() {
        let short = Frame {
            start: Duration::from_micros(200),
            end: Duration::from_micros(700),
            ..frame("a", 0, 0)
        };
        let svg = renderer().render(&[short, frame("ab", 1, 1001)]).unwrap();
        assert!(svg.contains("begin=\"0ms\" dur=\"1ms\"/>"));
        assert!(!svg.contains("dur=\"0ms\""));
    }

    #[test]
    fn frames_have_visibility_windows() {
        let svg = renderer()
            .render(&[frame("a", 0, 250), frame("ab", 250, 1250)])
            .unwrap();
        assert_eq!(svg.matches("<g display=\"none\">").count(), 2);
        assert!(svg.contains("begin=\"0ms\" dur=\"250ms\"/>"));
        assert!(svg.contains("begin=\"250ms\" dur=\"1000ms\" fill=\"freeze\"/>"));
        assert_eq!(svg.matches("fill=\"freeze\"").count(), 1);
    }

    #[test]
    fn loop_mode_uses_timeline() {
        let svg = renderer()
            .looping(true)
            .render(&[frame("a", 0, 250), frame("ab", 250, 1250)])
            .unwrap();
        assert!(svg.contains("begin=\"0ms;timeline.end\" dur=\"1250ms\""));
        assert!(svg.contains("begin=\"timeline.begin+250ms\" dur=\"1000ms\"/>"));
        assert!(!svg.contains("freeze"));
    }

    #[test]
    fn colors_and_bold_bright() {
        let svg = renderer()
            .render(&[frame("\x1b[31mr\x1b[1mR\x1b[0m", 0, 10)])
            .unwrap();
        // palette 1 then bright palette 9
        assert!(svg.contains("fill=\"#cd0000\">r</text>"));
        assert!(svg.contains("fill=\"#ff0000\" font-weight=\"bold\">R</text>"));
    }

    #[test]
    fn background_runs_become_rects() {
        let svg = renderer()
            .render(&[frame("\x1b[44m  \x1b[0m", 0, 10)])
            .unwrap();
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"16\" height=\"17\" fill=\"#0000ee\"/>"));
    }

    #[test]
    fn inverse_swaps_colors() {
        let svg = renderer().render(&[frame("\x1b[7mx", 0, 10)]).unwrap();
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"8\" height=\"17\" fill=\"#e5e5e5\"/>"));
        assert!(svg.contains("fill=\"#000000\">x</text>"));
    }

    #[test]
    fn cursor_rect_only_when_visible() {
        let svg = renderer().render(&[frame("ab", 0, 10)]).unwrap();
        assert!(svg.contains("<rect x=\"16\" y=\"0\" width=\"8\" height=\"17\" fill=\"#e5e5e5\"/>"));

        let svg = renderer().render(&[frame("ab\x1b[?25l", 0, 10)]).unwrap();
        assert!(!svg.contains("fill=\"#e5e5e5\"/>"));
    }

    #[test]
    fn text_is_escaped() {
        let svg = renderer().render(&[frame("<&>", 0, 10)]).unwrap();
        assert!(svg.contains(">&lt;&amp;&gt;</text>"));
    }

    #[test]
    fn escape_drops_invalid_xml_chars() {
        let mut out = String::new();
        escape_into(&mut out, "a\u{1}b\"");
        assert_eq!(out, "a b&quot;");
    }
}

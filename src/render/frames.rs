//! Replay a cast log into timed, deduplicated screen frames.

use std::time::Duration;

use crate::asciicast::{CastLog, Channel};
use crate::terminal::{Screen, Terminal};

/// Timing knobs for frame building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptions {
    /// Frames shorter than this are folded into their successor
    pub min_frame_duration: Duration,
    /// Longest pause kept when the log has no idle time limit of its own
    pub max_frame_duration: Option<Duration>,
    /// How long the last frame stays up when the log has no duration
    pub last_frame_hold: Duration,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            min_frame_duration: Duration::from_millis(1),
            max_frame_duration: None,
            last_frame_hold: Duration::from_millis(1000),
        }
    }
}

/// A screen state shown during `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub start: Duration,
    pub end: Duration,
    pub screen: Screen,
}

impl Frame {
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Replay the output and resize records of `log` and return its frames.
///
/// The result is never empty and no two adjacent frames show the same
/// screen.
pub fn build_frames(log: &CastLog, options: &FrameOptions) -> Vec<Frame> {
    let header = &log.header;
    let idle_limit = header.idle_limit().or(options.max_frame_duration);
    let compress = |gap: Duration| match idle_limit {
        Some(limit) => gap.min(limit),
        None => gap,
    };

    let mut terminal = Terminal::new(header.cols as usize, header.rows as usize);
    let mut snapshots: Vec<(Duration, Screen)> = Vec::new();
    let mut last_time = Duration::ZERO;
    let mut clock = Duration::ZERO;

    for record in &log.records {
        match record.channel {
            Channel::Output => terminal.process(&record.data, None),
            Channel::Resize => match record.parse_resize() {
                Some((cols, rows)) => terminal.resize(cols as usize, rows as usize),
                None => continue,
            },
            Channel::Input => continue,
        }
        clock += compress(record.time.saturating_sub(last_time));
        last_time = last_time.max(record.time);
        snapshots.push((clock, terminal.snapshot()));
    }

    if snapshots.is_empty() {
        tracing::debug!("cast log has no output, rendering a blank frame");
        snapshots.push((Duration::ZERO, terminal.snapshot()));
    }

    let last_start = snapshots.last().map(|(t, _)| *t).unwrap_or_default();
    let end = match header.explicit_duration() {
        Some(explicit) => {
            let tail = compress(explicit.saturating_sub(last_time));
            last_start.saturating_add(tail.max(options.min_frame_duration))
        }
        None => last_start.saturating_add(options.last_frame_hold),
    };

    let ends = snapshots
        .iter()
        .skip(1)
        .map(|(t, _)| *t)
        .chain(std::iter::once(end));
    let candidates = snapshots
        .iter()
        .zip(ends)
        .map(|((start, screen), end)| Frame {
            start: *start,
            end,
            screen: screen.clone(),
        });

    let frames = coalesce(candidates, options.min_frame_duration);
    tracing::debug!(
        records = log.records.len(),
        frames = frames.len(),
        "built frames"
    );
    frames
}

/// Fold short frames into their successor and merge equal neighbours.
fn coalesce(candidates: impl Iterator<Item = Frame>, min: Duration) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for mut frame in candidates {
        if let Some(last) = frames.last_mut() {
            if last.screen == frame.screen {
                last.end = frame.end;
                continue;
            }
            if last.duration() < min {
                frame.start = last.start;
                frames.pop();
                if let Some(prev) = frames.last_mut() {
                    if prev.screen == frame.screen {
                        prev.end = frame.end;
                        continue;
                    }
                }
            }
        }
        frames.push(frame);
    }

    frames
}

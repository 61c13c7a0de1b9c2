//! termsvg: record terminal sessions and render them as animated SVG.
//!
//! The pipeline: a live session is recorded into a cast log
//! ([`recording`], [`asciicast`]), the log is replayed through a terminal
//! emulator ([`terminal`]) into deduplicated timed frames, and the frames are
//! serialized as one SVG animation ([`render`]).

pub mod asciicast;
pub mod cli;
pub mod config;
pub mod recording;
pub mod render;
pub mod terminal;
pub mod theme;

pub use asciicast::{CastError, CastLog, Header, Record};
pub use config::Config;
pub use recording::{Recorder, RecordingSummary};
pub use render::{render_log, RenderOptions};
pub use terminal::Terminal;
pub use theme::{resolve_theme, Theme};

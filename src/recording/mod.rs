//! Session recording.
//!
//! A [`ByteSource`] is read on its own thread; chunks flow over an `mpsc`
//! channel to the [`Recorder`] loop, which timestamps them and appends
//! records to a [`RecordSink`].
//!
//! - `source`: byte sources and the reader threads that drain them
//! - `sink`: where records go (a cast file, or a channel to the renderer)
//! - `recorder`: the timestamping loop
//! - `pty`: a shell on a pseudo-terminal

mod pty;
mod recorder;
mod sink;
mod source;

pub use pty::{PtyResizer, PtySession};
pub use recorder::{Chunk, Recorder, RecordingSummary};
pub use sink::{CastSink, ChannelSink, ChannelSource, LogEntry, RecordSink};
pub use source::{spawn_input_forwarder, spawn_output_reader, ByteSource, ReaderSource};

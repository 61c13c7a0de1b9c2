//! The recording loop.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use humansize::{format_size, BINARY};

use super::sink::RecordSink;
use super::source::{spawn_output_reader, ByteSource};
use crate::asciicast::{Header, Record};

/// How often the loop checks the interrupt flag while idle.
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// Message from a reader thread to the recorder loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Output(Vec<u8>),
    Input(Vec<u8>),
    Resize { cols: u16, rows: u16 },
    /// The session's output stream ended
    End,
}

/// What a finished recording contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordingSummary {
    pub records: usize,
    /// Output bytes recorded
    pub bytes: u64,
    pub duration: Duration,
    pub interrupted: bool,
}

impl fmt::Display for RecordingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} of output, {:.1}s",
            self.records,
            format_size(self.bytes, BINARY),
            self.duration.as_secs_f64()
        )
    }
}

/// Timestamps chunks from a live session and appends them to a sink.
pub struct Recorder<K: RecordSink> {
    sink: K,
    header: Header,
    passthrough: Option<Box<dyn Write>>,
    record_input: bool,
    interrupt: Arc<AtomicBool>,
    tx: Sender<Chunk>,
    rx: Receiver<Chunk>,
}

impl<K: RecordSink> Recorder<K> {
    pub fn new(header: Header, sink: K) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            sink,
            header,
            passthrough: None,
            record_input: false,
            interrupt: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Copy every output chunk to `writer` (usually the user's terminal).
    pub fn passthrough(mut self, writer: impl Write + 'static) -> Self {
        self.passthrough = Some(Box::new(writer));
        self
    }

    /// Keep input chunks as input records.
    pub fn record_input(mut self, record_input: bool) -> Self {
        self.record_input = record_input;
        self
    }

    /// Flag that stops the loop when set.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Sender for input and resize chunks from other threads.
    pub fn sender(&self) -> Sender<Chunk> {
        self.tx.clone()
    }

    /// Record until `source` ends or the interrupt flag is set.
    pub fn run<S: ByteSource + 'static>(self, source: S) -> Result<RecordingSummary> {
        let Recorder {
            mut sink,
            header,
            mut passthrough,
            record_input,
            interrupt,
            tx,
            rx,
        } = self;

        sink.begin(&header)?;
        tracing::info!(cols = header.cols, rows = header.rows, "recording started");

        spawn_output_reader(source, tx);

        let mut state = LoopState::default();
        loop {
            if interrupt.load(Ordering::SeqCst) {
                state.summary.interrupted = true;
                break;
            }

            let chunk = match rx.recv_timeout(INTERRUPT_POLL) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            let time = state.clock();

            match chunk {
                Chunk::Output(data) => {
                    if let Some(writer) = passthrough.as_mut() {
                        if let Err(e) = writer.write_all(&data).and_then(|_| writer.flush()) {
                            tracing::debug!(error = %e, "passthrough closed");
                            passthrough = None;
                        }
                    }
                    let complete = state.split_output(data);
                    if !complete.is_empty() {
                        state.summary.bytes += complete.len() as u64;
                        state.append(&mut sink, Record::output(time, complete))?;
                    }
                }
                Chunk::Input(data) if record_input => {
                    state.append(&mut sink, Record::input(time, data))?;
                }
                Chunk::Input(_) => {}
                Chunk::Resize { cols, rows } => {
                    state.append(&mut sink, Record::resize(time, cols, rows))?;
                }
                Chunk::End => break,
            }
        }

        if !state.carry.is_empty() {
            let time = state.clock();
            let rest = std::mem::take(&mut state.carry);
            state.summary.bytes += rest.len() as u64;
            state.append(&mut sink, Record::output(time, rest))?;
        }
        sink.finish()?;

        tracing::info!(summary = %state.summary, "recording finished");
        Ok(state.summary)
    }
}

#[derive(Default)]
struct LoopState {
    start: Option<Instant>,
    /// Incomplete UTF-8 sequence held back from the last output chunk
    carry: Vec<u8>,
    summary: RecordingSummary,
}

impl LoopState {
    /// Time since the first chunk.
    fn clock(&mut self) -> Duration {
        self.start.get_or_insert_with(Instant::now).elapsed()
    }

    fn append<K: RecordSink>(&mut self, sink: &mut K, record: Record) -> Result<()> {
        self.summary.duration = self.summary.duration.max(record.time);
        self.summary.records += 1;
        sink.append(record)
    }

    /// Prepend the carried bytes and hold back a trailing incomplete
    /// character.
    fn split_output(&mut self, data: Vec<u8>) -> Vec<u8> {
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(&data);
        let complete = complete_prefix_len(&bytes);
        self.carry = bytes.split_off(complete);
        bytes
    }
}

/// Length of `bytes` without a trailing, truncated UTF-8 sequence.
fn complete_prefix_len(bytes: &[u8]) -> usize {
    let len = bytes.len();
    for back in 1..=len.min(3) {
        let byte = bytes[len - back];
        if byte & 0xc0 == 0x80 {
            // continuation byte, keep looking for the lead byte
            continue;
        }
        let needed = match byte {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return len,
        };
        return if needed > back { len - back } else { len };
    }
    len
}

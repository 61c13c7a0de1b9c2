//! Byte sources and reader threads.

use std::io::{ErrorKind, Read, Write};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use super::recorder::Chunk;

const READ_BUFFER_SIZE: usize = 4096;

/// A stream of bytes from a live session.
pub trait ByteSource: Send {
    /// Next chunk, or `None` at end of stream. Read errors end the stream.
    fn read(&mut self) -> Option<Vec<u8>>;
}

/// Byte source over any [`Read`].
pub struct ReaderSource<R> {
    reader: R,
    buf: Box<[u8]>,
}

impl<R: Read + Send> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; READ_BUFFER_SIZE].into_boxed_slice(),
        }
    }
}

impl<R: Read + Send> ByteSource for ReaderSource<R> {
    fn read(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return None,
                Ok(n) => return Some(self.buf[..n].to_vec()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    // A pty reports EIO once the child has exited
                    tracing::debug!(error = %e, "byte source closed");
                    return None;
                }
            }
        }
    }
}

/// Drain `source` on a dedicated thread, sending [`Chunk::Output`] for each
/// chunk and [`Chunk::End`] when the stream ends.
pub fn spawn_output_reader<S>(mut source: S, tx: Sender<Chunk>) -> JoinHandle<()>
where
    S: ByteSource + 'static,
{
    thread::spawn(move || {
        while let Some(data) = source.read() {
            if tx.send(Chunk::Output(data)).is_err() {
                return;
            }
        }
        // Ignore send errors (recorder may have stopped already)
        let _ = tx.send(Chunk::End);
    })
}

/// Forward `source` (the user's keyboard) to `session` on a dedicated
/// thread, reporting each chunk as [`Chunk::Input`].
pub fn spawn_input_forwarder<S, W>(mut source: S, mut session: W, tx: Sender<Chunk>) -> JoinHandle<()>
where
    S: ByteSource + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        while let Some(data) = source.read() {
            if let Err(e) = session.write_all(&data).and_then(|_| session.flush()) {
                tracing::debug!(error = %e, "session input closed");
                return;
            }
            if tx.send(Chunk::Input(data)).is_err() {
                return;
            }
        }
    })
}

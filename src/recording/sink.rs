//! Record sinks.

use std::io::Write;
use std::sync::mpsc::{Receiver, Sender};

use anyhow::{bail, Context, Result};

use crate::asciicast::{CastError, CastLog, CastWriter, Header, Record};

/// Destination for a recording. `begin` is called exactly once, before any
/// record.
pub trait RecordSink {
    fn begin(&mut self, header: &Header) -> Result<()>;
    fn append(&mut self, record: Record) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// Streams records into a cast log as they arrive.
pub struct CastSink<W: Write> {
    pending: Option<W>,
    writer: Option<CastWriter<W>>,
}

impl<W: Write> CastSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            pending: Some(writer),
            writer: None,
        }
    }

    /// The underlying writer, once the header has been written.
    pub fn into_inner(self) -> Option<W> {
        match self.writer {
            Some(writer) => Some(writer.into_inner()),
            None => self.pending,
        }
    }
}

impl<W: Write> RecordSink for CastSink<W> {
    fn begin(&mut self, header: &Header) -> Result<()> {
        let Some(writer) = self.pending.take() else {
            bail!("Cast header already written");
        };
        self.writer = Some(CastWriter::new(writer, header).context("Failed to write cast header")?);
        Ok(())
    }

    fn append(&mut self, record: Record) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            bail!("Cast record written before header");
        };
        writer
            .record(&record)
            .context("Failed to write cast record")
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = &self.writer {
            tracing::debug!(records = writer.records(), "cast log complete");
        }
        Ok(())
    }
}

/// Entry passed from the recorder to an in-process consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Header(Header),
    Record(Record),
}

/// Sends the recording over a channel instead of to disk.
pub struct ChannelSink {
    tx: Sender<LogEntry>,
}

impl ChannelSink {
    pub fn new(tx: Sender<LogEntry>) -> Self {
        Self { tx }
    }
}

impl RecordSink for ChannelSink {
    fn begin(&mut self, header: &Header) -> Result<()> {
        self.tx
            .send(LogEntry::Header(header.clone()))
            .context("Log receiver dropped")
    }

    fn append(&mut self, record: Record) -> Result<()> {
        self.tx
            .send(LogEntry::Record(record))
            .context("Log receiver dropped")
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receiving end of a [`ChannelSink`].
pub struct ChannelSource {
    rx: Receiver<LogEntry>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<LogEntry>) -> Self {
        Self { rx }
    }

    /// Collect everything sent so far into a cast log. Blocks until every
    /// sender is dropped.
    pub fn into_log(self) -> Result<CastLog, CastError> {
        let mut entries = self.rx.into_iter();
        let header = match entries.next() {
            Some(LogEntry::Header(header)) => header,
            _ => return Err(CastError::MissingHeader),
        };

        let mut log = CastLog::new(header);
        for entry in entries {
            match entry {
                LogEntry::Record(record) => log.records.push(record),
                LogEntry::Header(_) => {
                    return Err(CastError::MalformedHeader("duplicate header".to_string()))
                }
            }
        }
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn cast_sink_writes_header_then_records() {
        let mut sink = CastSink::new(Vec::new());
        sink.begin(&Header::default()).unwrap();
        sink.append(Record::output(Duration::ZERO, b"hi".to_vec()))
            .unwrap();
        sink.finish().unwrap();

        let content = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let log = CastLog::parse_str(&content).unwrap();
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].data, b"hi");
    }

    #[test]
    fn cast_sink_rejects_misordered_calls() {
        let mut sink = CastSink::new(Vec::new());
        assert!(sink
            .append(Record::output(Duration::ZERO, Vec::new()))
            .is_err());
        sink.begin(&Header::default()).unwrap();
        assert!(sink.begin(&Header::default()).is_err());
    }

    #[test]
    fn channel_round_trip() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink::new(tx);
        sink.begin(&Header::default()).unwrap();
        sink.append(Record::output(Duration::from_millis(3), b"x".to_vec()))
            .unwrap();
        drop(sink);

        let log = ChannelSource::new(rx).into_log().unwrap();
        assert_eq!(log.header, Header::default());
        assert_eq!(log.records[0].time, Duration::from_millis(3));
    }

    #[test]
    fn channel_without_header_fails() {
        let (tx, rx) = mpsc::channel::<LogEntry>();
        drop(tx);
        assert!(matches!(
            ChannelSource::new(rx).into_log(),
            Err(CastError::MissingHeader)
        ));
    }
}

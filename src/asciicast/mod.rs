// Derived from asciinema (https://github.com/asciinema/asciinema)
// Copyright (c) asciinema authors
// Licensed under GPL-3.0-or-later
// Vendored by AGR project

//! Cast log codec (asciicast v3 framing).
//!
//! Reference: https://docs.asciinema.org/manual/asciicast/v3/
//!
//! A cast log is one JSON header line followed by one JSON array per record:
//! `[interval, code, data]`. Intervals are relative to the previous record
//! and carry microsecond precision. Data is a JSON string when the bytes are
//! valid UTF-8 and an array of byte values otherwise, so arbitrary output
//! survives a round trip unchanged.

mod error;
mod util;
mod v3;

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::theme::Theme;

pub use error::CastError;
pub use v3::{CastReader, CastWriter};

/// The only cast format version read and written.
pub const FORMAT_VERSION: u8 = 3;

/// Record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Data written by the session to the terminal
    Output,
    /// Data typed by the user
    Input,
    /// Terminal size change, data is `COLSxROWS`
    Resize,
}

impl Channel {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "o" => Some(Channel::Output),
            "i" => Some(Channel::Input),
            "r" => Some(Channel::Resize),
            _ => None,
        }
    }

    pub fn to_code(&self) -> &'static str {
        match self {
            Channel::Output => "o",
            Channel::Input => "i",
            Channel::Resize => "r",
        }
    }
}

/// One timestamped chunk of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Time since the start of the recording
    pub time: Duration,
    pub channel: Channel,
    pub data: Vec<u8>,
}

impl Record {
    pub fn output(time: Duration, data: Vec<u8>) -> Self {
        Self {
            time,
            channel: Channel::Output,
            data,
        }
    }

    pub fn input(time: Duration, data: Vec<u8>) -> Self {
        Self {
            time,
            channel: Channel::Input,
            data,
        }
    }

    pub fn resize(time: Duration, cols: u16, rows: u16) -> Self {
        Self {
            time,
            channel: Channel::Resize,
            data: format!("{cols}x{rows}").into_bytes(),
        }
    }

    /// `(cols, rows)` of a resize record.
    pub fn parse_resize(&self) -> Option<(u16, u16)> {
        if self.channel != Channel::Resize {
            return None;
        }
        let text = std::str::from_utf8(&self.data).ok()?;
        let (cols, rows) = text.split_once('x')?;
        Some((cols.trim().parse().ok()?, rows.trim().parse().ok()?))
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.time.as_secs_f64()
    }
}

/// Cast log header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub cols: u16,
    pub rows: u16,
    /// Unix seconds
    pub timestamp: Option<u64>,
    /// Colors the session was recorded with
    pub theme: Option<Theme>,
    /// Explicit total duration in seconds
    pub duration: Option<f64>,
    /// Longest pause kept when rendering, in seconds
    pub idle_time_limit: Option<f64>,
    pub command: Option<String>,
    pub title: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            timestamp: None,
            theme: None,
            duration: None,
            idle_time_limit: None,
            command: None,
            title: None,
        }
    }
}

impl Header {
    /// Idle time limit as a duration. Values that are not positive or do not
    /// fit a `Duration` count as absent.
    pub fn idle_limit(&self) -> Option<Duration> {
        seconds(self.idle_time_limit).filter(|limit| !limit.is_zero())
    }

    /// Explicit total duration, absent when out of range.
    pub fn explicit_duration(&self) -> Option<Duration> {
        seconds(self.duration)
    }
}

fn seconds(value: Option<f64>) -> Option<Duration> {
    value.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

/// A whole cast log held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct CastLog {
    pub header: Header,
    pub records: Vec<Record>,
}

impl CastLog {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    /// Read a cast log from a file.
    pub fn parse<P: AsRef<Path>>(path: P, lenient: bool) -> Result<Self> {
        let path = path.as_ref();
        let file =
            fs::File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;

        Self::parse_reader(BufReader::new(file), lenient)
            .with_context(|| format!("Failed to read cast log: {:?}", path))
    }

    pub fn parse_reader<R: BufRead>(reader: R, lenient: bool) -> Result<Self, CastError> {
        let reader = CastReader::new(reader)?.lenient(lenient);
        let header = reader.header().clone();
        let records = reader.collect::<Result<Vec<_>, _>>()?;

        Ok(Self { header, records })
    }

    /// Parse a strict cast log from a string.
    pub fn parse_str(content: &str) -> Result<Self, CastError> {
        Self::parse_reader(content.as_bytes(), false)
    }

    /// Write the cast log to a file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file =
            fs::File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;

        self.write_to(file)
            .with_context(|| format!("Failed to write cast log: {:?}", path))
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CastError> {
        let mut writer = CastWriter::new(writer, &self.header)?;
        for record in &self.records {
            writer.record(record)?;
        }
        Ok(())
    }

    pub fn to_string(&self) -> Result<String, CastError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

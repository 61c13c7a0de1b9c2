// Derived from asciinema (https://github.com/asciinema/asciinema)
// Copyright (c) asciinema authors
// Licensed under GPL-3.0-or-later
// Vendored by AGR project

use std::io::{BufRead, Write};
use std::time::Duration;

use rgb::RGB8;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::util::{format_interval, parse_interval, Quantizer};
use super::{CastError, Channel, Header, Record, FORMAT_VERSION};
use crate::theme::{hex_color, parse_hex_color, Theme};

#[derive(Serialize, Deserialize)]
struct V3Header {
    version: u8,
    term: V3Term,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    idle_time_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct V3Term {
    cols: u16,
    rows: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<V3Theme>,
}

#[derive(Serialize, Deserialize)]
struct V3Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(serialize_with = "serialize_color", deserialize_with = "deserialize_color")]
    fg: RGB8,
    #[serde(serialize_with = "serialize_color", deserialize_with = "deserialize_color")]
    bg: RGB8,
    #[serde(
        serialize_with = "serialize_palette",
        deserialize_with = "deserialize_palette"
    )]
    palette: Vec<RGB8>,
}

fn serialize_color<S: Serializer>(color: &RGB8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex_color(*color))
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<RGB8, D::Error>
where
    D: Deserializer<'de>,
{
    let value: String = Deserialize::deserialize(deserializer)?;
    parse_hex_color(&value).ok_or_else(|| serde::de::Error::custom("invalid hex triplet"))
}

fn serialize_palette<S: Serializer>(palette: &[RGB8], serializer: S) -> Result<S::Ok, S::Error> {
    let palette = palette
        .iter()
        .map(|c| hex_color(*c))
        .collect::<Vec<_>>()
        .join(":");
    serializer.serialize_str(&palette)
}

fn deserialize_palette<'de, D>(deserializer: D) -> Result<Vec<RGB8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: String = Deserialize::deserialize(deserializer)?;
    let mut colors = value
        .split(':')
        .map(parse_hex_color)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| serde::de::Error::custom("invalid hex triplet in palette"))?;

    match colors.len() {
        8 => colors.extend_from_within(..),
        16 => {}
        _ => return Err(serde::de::Error::custom("expected 8 or 16 hex triplets")),
    }

    Ok(colors)
}

impl From<&Header> for V3Header {
    fn from(header: &Header) -> Self {
        V3Header {
            version: FORMAT_VERSION,
            term: V3Term {
                cols: header.cols,
                rows: header.rows,
                theme: header.theme.as_ref().map(|theme| V3Theme {
                    name: Some(theme.name.clone()),
                    fg: theme.fg,
                    bg: theme.bg,
                    palette: theme.palette.clone(),
                }),
            },
            timestamp: header.timestamp,
            duration: header.duration,
            idle_time_limit: header.idle_time_limit,
            command: header.command.clone(),
            title: header.title.clone(),
        }
    }
}

impl From<V3Header> for Header {
    fn from(header: V3Header) -> Self {
        Header {
            cols: header.term.cols,
            rows: header.term.rows,
            timestamp: header.timestamp,
            theme: header.term.theme.map(|theme| Theme {
                name: theme.name.unwrap_or_else(|| "recorded".to_string()),
                fg: theme.fg,
                bg: theme.bg,
                palette: theme.palette,
            }),
            duration: header.duration,
            idle_time_limit: header.idle_time_limit,
            command: header.command,
            title: header.title,
        }
    }
}

/// Serialize a header to its single JSON line (without newline).
pub(super) fn encode_header(header: &Header) -> Result<String, CastError> {
    serde_json::to_string(&V3Header::from(header))
        .map_err(|e| CastError::MalformedHeader(e.to_string()))
}

/// Parse a header line, checking the version before anything else.
pub(super) fn decode_header(line: &str) -> Result<Header, CastError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| CastError::MalformedHeader(e.to_string()))?;

    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| CastError::MalformedHeader("missing version".to_string()))?;
    if version != u64::from(FORMAT_VERSION) {
        return Err(CastError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let header: V3Header =
        serde_json::from_value(value).map_err(|e| CastError::MalformedHeader(e.to_string()))?;
    Ok(header.into())
}

fn encode_data(data: &[u8]) -> serde_json::Value {
    match std::str::from_utf8(data) {
        Ok(text) => serde_json::Value::from(text),
        Err(_) => serde_json::Value::from(data.to_vec()),
    }
}

fn decode_data(value: &serde_json::Value) -> Result<Vec<u8>, String> {
    match value {
        serde_json::Value::String(text) => Ok(text.as_bytes().to_vec()),
        serde_json::Value::Array(bytes) => bytes
            .iter()
            .map(|b| {
                b.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| format!("invalid byte value {b}"))
            })
            .collect(),
        other => Err(format!("data must be a string or byte array, got {other}")),
    }
}

/// Streaming cast log writer.
///
/// The header is written and flushed on construction; every record is one
/// flushed line, so a log cut short by a crash is still readable.
pub struct CastWriter<W: Write> {
    writer: W,
    prev_time: Duration,
    quantizer: Quantizer,
    records: usize,
}

impl<W: Write> CastWriter<W> {
    pub fn new(mut writer: W, header: &Header) -> Result<Self, CastError> {
        writeln!(writer, "{}", encode_header(header)?)?;
        writer.flush()?;

        Ok(Self {
            writer,
            prev_time: Duration::ZERO,
            quantizer: Quantizer::new(1_000),
            records: 0,
        })
    }

    /// Append one record. Times earlier than the previous record are
    /// written as a zero interval.
    pub fn record(&mut self, record: &Record) -> Result<(), CastError> {
        let dt = record.time.saturating_sub(self.prev_time);
        self.prev_time = self.prev_time.max(record.time);
        let dt = Duration::from_nanos(self.quantizer.next(dt.as_nanos()) as u64);

        let code = serde_json::Value::from(record.channel.to_code());
        writeln!(
            self.writer,
            "[{}, {}, {}]",
            format_interval(dt),
            code,
            encode_data(&record.data)
        )?;
        self.writer.flush()?;
        self.records += 1;

        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Streaming cast log reader.
///
/// The header is read eagerly by [`CastReader::new`]; records are decoded
/// lazily by iterating.
pub struct CastReader<R: BufRead> {
    lines: std::io::Lines<R>,
    header: Header,
    line_no: usize,
    time: Duration,
    lenient: bool,
}

impl<R: BufRead> CastReader<R> {
    pub fn new(reader: R) -> Result<Self, CastError> {
        let mut lines = reader.lines();
        let header_line = match lines.next() {
            Some(line) => line?,
            None => return Err(CastError::MissingHeader),
        };
        if header_line.trim().is_empty() {
            return Err(CastError::MissingHeader);
        }
        let header = decode_header(&header_line)?;

        Ok(Self {
            lines,
            header,
            line_no: 1,
            time: Duration::ZERO,
            lenient: false,
        })
    }

    /// Skip malformed records instead of failing on them.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decode one record line. `Ok(None)` means a well-formed record of a
    /// kind this reader does not keep (markers, exit status).
    fn decode_record(&mut self, line: &str) -> Result<Option<Record>, String> {
        let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
        let fields = value.as_array().ok_or("record must be a JSON array")?;
        if fields.len() < 3 {
            return Err(format!("expected 3 fields, got {}", fields.len()));
        }

        let interval = parse_interval(&fields[0])?;
        let code = fields[1].as_str().ok_or("record code must be a string")?;
        let data = decode_data(&fields[2])?;
        let time = self
            .time
            .checked_add(interval)
            .ok_or("record time overflows")?;

        let Some(channel) = Channel::from_code(code) else {
            self.time = time;
            tracing::debug!(line = self.line_no, code, "skipping record");
            return Ok(None);
        };

        let record = Record {
            time,
            channel,
            data,
        };
        if channel == Channel::Resize && record.parse_resize().is_none() {
            return Err("resize data must be COLSxROWS".to_string());
        }

        self.time = time;
        Ok(Some(record))
    }
}

impl<R: BufRead> Iterator for CastReader<R> {
    type Item = Result<Record, CastError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            match self.decode_record(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(reason) if self.lenient => {
                    tracing::debug!(line = self.line_no, %reason, "skipping malformed record");
                    continue;
                }
                Err(reason) => {
                    return Some(Err(CastError::MalformedRecord {
                        line: self.line_no,
                        reason,
                    }))
                }
            }
        }
    }
}

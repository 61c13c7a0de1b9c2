// Derived from asciinema (https://github.com/asciinema/asciinema)
// Copyright (c) asciinema authors
// Licensed under GPL-3.0-or-later
// Vendored by AGR project

//! Cast log errors.

/// Errors raised while reading or writing a cast log.
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    #[error("cast log is empty: missing header line")]
    MissingHeader,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unsupported cast format version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u8 },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("cast log I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

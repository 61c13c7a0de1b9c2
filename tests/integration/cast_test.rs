//! Integration tests for the cast log codec

use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;

use super::helpers::{fixtures_dir, temp_fixture};
use termsvg::asciicast::{CastReader, CastWriter, Channel};
use termsvg::{CastError, CastLog, Header, Record};

#[test]
fn sample_fixture_parses() {
    let log = CastLog::parse(fixtures_dir().join("sample.cast"), false).unwrap();
    assert_eq!((log.header.cols, log.header.rows), (20, 4));
    assert_eq!(log.header.command.as_deref(), Some("/bin/bash"));
    assert_eq!(log.header.theme.as_ref().unwrap().name, "solarized-dark");

    // exit record dropped, the rest kept in order
    let channels: Vec<_> = log.records.iter().map(|r| r.channel).collect();
    assert_eq!(
        channels,
        vec![
            Channel::Output,
            Channel::Input,
            Channel::Output,
            Channel::Output,
            Channel::Resize
        ]
    );
    assert_eq!(log.records[4].time, Duration::from_millis(1650));
}

#[test]
fn unsupported_version_is_reported() {
    let err = CastLog::parse(fixtures_dir().join("v2.cast"), false).unwrap_err();
    let cast_err = err.downcast_ref::<CastError>().expect("cast error");
    assert!(matches!(
        cast_err,
        CastError::UnsupportedVersion { found: 2, expected: 3 }
    ));
}

#[test]
fn malformed_record_strict_and_lenient() {
    let path = fixtures_dir().join("malformed.cast");
    let err = CastLog::parse(&path, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CastError>(),
        Some(CastError::MalformedRecord { line: 3, .. })
    ));

    let log = CastLog::parse(&path, true).unwrap();
    assert_eq!(log.records.len(), 2);
    assert_eq!(log.records[1].data, b"two\r\n");
}

#[test]
fn file_round_trip_is_exact() {
    let (temp_dir, path) = temp_fixture("sample.cast");
    let mut log = CastLog::parse(&path, false).unwrap();
    log.records.push(Record::output(
        Duration::from_micros(2_000_001),
        vec![0x00, 0x1b, b'[', b'm', 0xff, 0xfe],
    ));

    let out = temp_dir.path().join("copy.cast");
    log.write(&out).unwrap();
    let reread = CastLog::parse(&out, false).unwrap();
    assert_eq!(reread, log);
}

#[test]
fn partial_log_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.cast");
    {
        let file = BufWriter::new(File::create(&path).unwrap());
        let mut writer = CastWriter::new(file, &Header::default()).unwrap();
        writer
            .record(&Record::output(Duration::from_millis(5), b"first".to_vec()))
            .unwrap();
        // Leak the writer, as a crash mid-session would
        std::mem::forget(writer);
    }

    let reader = CastReader::new(std::io::BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(reader.header().cols, 80);
    let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data, b"first");
}

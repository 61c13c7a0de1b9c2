//! Integration tests for recording and rendering

use std::io::Cursor;
use std::sync::mpsc;
use std::time::Duration;

use super::helpers::fixtures_dir;
use termsvg::recording::{ChannelSink, ChannelSource, ReaderSource};
use termsvg::render::{build_frames, FrameOptions};
use termsvg::{render_log, CastLog, Header, Recorder, RenderOptions};

#[test]
fn record_then_render_end_to_end() {
    let (tx, rx) = mpsc::channel();
    let header = Header {
        cols: 20,
        rows: 3,
        theme: termsvg::theme::builtin("classic-dark"),
        ..Header::default()
    };
    let summary = Recorder::new(header, ChannelSink::new(tx))
        .run(ReaderSource::new(Cursor::new(b"hi\n".to_vec())))
        .unwrap();
    assert_eq!(summary.bytes, 3);

    let log = ChannelSource::new(rx).into_log().unwrap();
    let options = RenderOptions::default();

    let frames = build_frames(&log, &options.frames);
    assert!(frames.iter().any(|f| f.screen.row_text(0) == "hi"));
    let total = frames.last().unwrap().end;
    assert!(total >= options.frames.last_frame_hold);

    let svg = render_log(&log, &options).unwrap();
    assert!(svg.contains(">hi</text>"));
    assert!(svg.contains("dur=\"1000ms\" fill=\"freeze\""));
}

#[test]
fn sample_frames_and_timing() {
    let log = CastLog::parse(fixtures_dir().join("sample.cast"), false).unwrap();
    let frames = build_frames(&log, &FrameOptions::default());

    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0].start, Duration::from_millis(100));
    assert_eq!(frames[1].screen.row_text(0), "$ echo hi");
    assert_eq!(frames[2].screen.row_text(1), "hi");
    assert_eq!(frames[3].screen.cols, 30);
    assert_eq!(frames[3].end, Duration::from_millis(2650));
    for pair in frames.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert_ne!(pair[0].screen, pair[1].screen);
    }
}

#[test]
fn sample_svg_uses_recorded_theme() {
    let log = CastLog::parse(fixtures_dir().join("sample.cast"), false).unwrap();
    let svg = render_log(&log, &RenderOptions::default()).unwrap();

    assert!(svg.contains("width=\"240\" height=\"85\""));
    assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#002b36\"/>"));
    assert!(svg.contains("fill=\"#859900\">hi</text>"));
    assert!(svg.contains("begin=\"1650ms\" dur=\"1000ms\" fill=\"freeze\""));
    assert_eq!(svg.matches("<g display=\"none\">").count(), 4);
}

#[test]
fn looping_render_has_no_freeze() {
    let log = CastLog::parse(fixtures_dir().join("sample.cast"), false).unwrap();
    let options = RenderOptions {
        looping: true,
        ..RenderOptions::default()
    };
    let svg = render_log(&log, &options).unwrap();
    assert!(svg.contains("dur=\"2650ms\""));
    assert!(!svg.contains("freeze"));
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::rstest;
use smallvec::smallvec;

use crate::model::{ArrowState, Canvas, Point};

use super::{
    encode, export_ascii, load_from_file, load_meta, meta_path, parse, save_meta, save_to_file,
    BufferMeta, ParseError,
};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = env::temp_dir().join(format!(
            "thetis-{prefix}-{}-{nanos}-{counter}",
            process::id()
        ));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn sample_canvas() -> Canvas {
    let mut canvas = Canvas::new();
    let a = canvas.add_box(10, 5, "Start");
    let b = canvas.add_box(25, 10, "Process");
    canvas.set_box_size(b, 13, 5);
    canvas.add_connection_with_waypoints(
        Some(a),
        Some(b),
        Point::new(17, 7),
        Point::new(25, 12),
        smallvec![Point::new(20, 7)],
    );
    canvas.add_text(2, 20, "a note");
    canvas
}

#[test]
fn encode_parse_round_trip_preserves_everything() {
    let mut canvas = sample_canvas();
    canvas.cycle_connection_arrow(0);

    let text = encode(&canvas);
    let parsed = parse(&text).expect("parse");
    assert_eq!(parsed, canvas);
}

#[test]
fn encoded_form_is_the_documented_line_format() {
    let mut canvas = Canvas::new();
    canvas.add_box(10, 5, "Start");
    canvas.add_connection_with_waypoints(
        None,
        Some(0),
        Point::new(0, 0),
        Point::new(10, 6),
        smallvec![Point::new(4, 0)],
    );
    assert_eq!(
        encode(&canvas),
        "FLOWCHART\n\
         BOXES:1\n\
         10,5,8,3,Start\n\
         CONNECTIONS:1\n\
         -1,0,0,0,10,6,1,0|4:0\n\
         TEXTS:0\n"
    );
}

#[test]
fn newlines_in_text_are_escaped_on_one_line() {
    let mut canvas = Canvas::new();
    canvas.add_box(0, 0, "two\nlines");
    canvas.add_text(0, 10, "free\ntext");

    let text = encode(&canvas);
    assert!(text.contains("two\\nlines"));
    assert!(text.contains("free\\ntext"));

    let parsed = parse(&text).expect("parse");
    assert_eq!(parsed.get_box_text(0), Some("two\nlines".to_owned()));
    assert_eq!(parsed.get_text_text(0), Some("free\ntext".to_owned()));
}

#[test]
fn commas_in_text_survive_as_the_tail_field() {
    let mut canvas = Canvas::new();
    canvas.add_box(0, 0, "a, b, and c");
    canvas.add_text(0, 10, "x, y");

    let parsed = parse(&encode(&canvas)).expect("parse");
    assert_eq!(parsed, canvas);
}

#[test]
fn arrow_state_round_trips_through_every_value() {
    for _ in 0..4 {
        let mut canvas = sample_canvas();
        canvas.cycle_connection_arrow(0);
        let parsed = parse(&encode(&canvas)).expect("parse");
        assert_eq!(parsed.connections()[0].arrow, canvas.connections()[0].arrow);
    }
}

#[test]
fn legacy_box_line_autosizes() {
    let input = "FLOWCHART\nBOXES:1\n10,5,Start\nCONNECTIONS:0\n";
    let parsed = parse(input).expect("parse");
    let b = &parsed.boxes()[0];
    assert_eq!((b.x(), b.y()), (10, 5));
    assert_eq!((b.width(), b.height()), (8, 3));
}

#[test]
fn legacy_connection_line_recomputes_edge_points() {
    let input = "FLOWCHART\n\
                 BOXES:2\n\
                 10,5,Start\n\
                 30,5,End\n\
                 CONNECTIONS:1\n\
                 0,1\n";
    let parsed = parse(input).expect("parse");
    let conn = &parsed.connections()[0];
    assert_eq!(conn.from_box, Some(0));
    assert_eq!(conn.to_box, Some(1));
    // Facing edges: right edge of box 0, left edge of box 1.
    assert_eq!(conn.from, Point::new(17, 6));
    assert_eq!(conn.to, Point::new(30, 6));
    assert!(conn.waypoints.is_empty());
    assert_eq!(conn.arrow, ArrowState::None);
}

#[test]
fn legacy_connection_with_unknown_box_fails() {
    let input = "FLOWCHART\nBOXES:1\n0,0,a\nCONNECTIONS:1\n0,7\n";
    assert_eq!(
        parse(input),
        Err(ParseError::UnknownBoxId { line: 0, id: 7 })
    );
}

#[test]
fn free_endpoints_round_trip_as_minus_one() {
    let mut canvas = Canvas::new();
    canvas.add_connection_with_waypoints(
        None,
        None,
        Point::new(3, 3),
        Point::new(9, 3),
        smallvec![],
    );
    let parsed = parse(&encode(&canvas)).expect("parse");
    assert_eq!(parsed.connections()[0].from_box, None);
    assert_eq!(parsed.connections()[0].to_box, None);
}

#[test]
fn texts_section_is_optional() {
    let input = "FLOWCHART\nBOXES:0\nCONNECTIONS:0\n";
    let parsed = parse(input).expect("parse");
    assert!(parsed.is_empty());
}

#[test]
fn crlf_line_endings_are_accepted() {
    let input = "FLOWCHART\r\nBOXES:1\r\n0,0,a\r\nCONNECTIONS:0\r\nTEXTS:0\r\n";
    let parsed = parse(input).expect("parse");
    assert_eq!(parsed.boxes().len(), 1);
}

#[rstest]
#[case::empty("", ParseError::MissingHeader)]
#[case::wrong_header("MINDMAP\nBOXES:0\n", ParseError::BadHeader { found: "MINDMAP".to_owned() })]
#[case::missing_boxes("FLOWCHART\n", ParseError::BadSection { expected: "BOXES", found: String::new() })]
#[case::bad_count("FLOWCHART\nBOXES:many\n", ParseError::BadCount { section: "BOXES", found: "many".to_owned() })]
#[case::truncated(
    "FLOWCHART\nBOXES:2\n0,0,a\n",
    ParseError::MissingLine { section: "BOXES", line: 1 }
)]
fn malformed_input_is_rejected(#[case] input: &str, #[case] expected: ParseError) {
    assert_eq!(parse(input), Err(expected));
}

#[test]
fn bad_connection_fields_name_the_line() {
    let input = "FLOWCHART\nBOXES:0\nCONNECTIONS:1\n0,1,x,0,5,5,0|\n";
    match parse(input) {
        Err(ParseError::BadLine { section, line, .. }) => {
            assert_eq!(section, "CONNECTIONS");
            assert_eq!(line, 0);
        }
        other => panic!("expected BadLine, got {other:?}"),
    }
}

#[test]
fn waypoint_count_mismatch_is_rejected() {
    let input = "FLOWCHART\nBOXES:0\nCONNECTIONS:1\n-1,-1,0,0,9,0,2|4:0\n";
    assert!(matches!(
        parse(input),
        Err(ParseError::BadLine {
            section: "CONNECTIONS",
            ..
        })
    ));
}

#[test]
fn save_and_load_round_trip_on_disk() {
    let dir = TempDir::new("save-load");
    let path = dir.file("diagram.flow");

    let canvas = sample_canvas();
    save_to_file(&canvas, &path).expect("save");
    let loaded = load_from_file(&path).expect("load");
    assert_eq!(loaded, canvas);

    // No temp file left behind.
    let entries: Vec<_> = fs::read_dir(&dir.path)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("diagram.flow")]);
}

#[test]
fn failed_parse_leaves_no_canvas() {
    let dir = TempDir::new("bad-load");
    let path = dir.file("broken.flow");
    fs::write(&path, "FLOWCHART\nBOXES:1\nnot a box\n").expect("write");
    assert!(load_from_file(&path).is_err());
}

#[test]
fn meta_sidecar_round_trips_next_to_the_diagram() {
    let dir = TempDir::new("meta");
    let path = dir.file("diagram.flow");

    assert_eq!(
        meta_path(&path).file_name().and_then(|n| n.to_str()),
        Some("diagram.flow.meta.json")
    );
    assert_eq!(load_meta(&path), None);

    let meta = BufferMeta {
        pan: Point::new(-4, 2),
        cursor: Point::new(12, 7),
    };
    save_meta(&path, &meta).expect("save meta");
    assert_eq!(load_meta(&path), Some(meta));
}

#[test]
fn corrupt_meta_sidecar_falls_back_to_none() {
    let dir = TempDir::new("meta-corrupt");
    let path = dir.file("diagram.flow");
    fs::write(meta_path(&path), "{ not json").expect("write");
    assert_eq!(load_meta(&path), None);
}

#[test]
fn ascii_export_writes_the_full_extent() {
    let dir = TempDir::new("export");
    let path = dir.file("diagram.txt");

    let mut canvas = Canvas::new();
    canvas.add_box(0, 0, "Start");
    export_ascii(&canvas, &path).expect("export");

    let text = fs::read_to_string(&path).expect("read export");
    assert_eq!(text, "+------+\n|Start |\n+------+\n");
}

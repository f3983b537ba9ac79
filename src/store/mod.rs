// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence: the line-oriented `FLOWCHART` text format (with its legacy
//! forms), ASCII export of the rendered diagram, and the JSON buffer meta
//! sidecar.
//!
//! Loading is parse-then-commit: a malformed file yields an error and the
//! in-memory model is never partially updated. Writes go through a temp file
//! plus rename so a failed save does not leave a truncated file behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{ArrowState, Canvas, Point, Waypoints};
use crate::render::{render, ViewState};
use crate::route;

const HEADER: &str = "FLOWCHART";
const META_SUFFIX: &str = ".meta.json";

/// Per-buffer view state persisted alongside a diagram file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferMeta {
    pub pan: Point,
    pub cursor: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingHeader,
    BadHeader {
        found: String,
    },
    BadSection {
        expected: &'static str,
        found: String,
    },
    BadCount {
        section: &'static str,
        found: String,
    },
    MissingLine {
        section: &'static str,
        line: usize,
    },
    BadLine {
        section: &'static str,
        line: usize,
        reason: String,
    },
    UnknownBoxId {
        line: usize,
        id: i64,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "empty file (expected {HEADER} header)"),
            Self::BadHeader { found } => {
                write!(f, "bad header (expected {HEADER}, found '{found}')")
            }
            Self::BadSection { expected, found } => {
                write!(f, "bad section header (expected {expected}:N, found '{found}')")
            }
            Self::BadCount { section, found } => {
                write!(f, "non-numeric {section} count: '{found}'")
            }
            Self::MissingLine { section, line } => {
                write!(f, "{section} section ends early (missing entry {line})")
            }
            Self::BadLine {
                section,
                line,
                reason,
            } => write!(f, "bad {section} line {line}: {reason}"),
            Self::UnknownBoxId { line, id } => {
                write!(f, "connection line {line} references unknown box {id}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(ParseError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "read failed: {err}"),
            Self::Parse(err) => write!(f, "parse failed: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

// --- encoding ------------------------------------------------------------

/// Serializes a canvas into the line-oriented text format.
pub fn encode(canvas: &Canvas) -> String {
    let mut out = String::new();
    let mut ints = itoa::Buffer::new();

    out.push_str(HEADER);
    out.push('\n');

    out.push_str("BOXES:");
    out.push_str(ints.format(canvas.boxes().len()));
    out.push('\n');
    for b in canvas.boxes() {
        push_int_fields(&mut out, &[b.x(), b.y(), b.width(), b.height()]);
        out.push(',');
        push_escaped(&mut out, &b.text());
        out.push('\n');
    }

    out.push_str("CONNECTIONS:");
    out.push_str(ints.format(canvas.connections().len()));
    out.push('\n');
    for conn in canvas.connections() {
        push_box_ref(&mut out, conn.from_box);
        out.push(',');
        push_box_ref(&mut out, conn.to_box);
        out.push(',');
        push_int_fields(&mut out, &[conn.from.x, conn.from.y, conn.to.x, conn.to.y]);
        out.push(',');
        out.push_str(ints.format(conn.waypoints.len()));
        out.push(',');
        out.push_str(ints.format(conn.arrow.as_u8()));
        out.push('|');
        for (i, wp) in conn.waypoints.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(ints.format(wp.x));
            out.push(':');
            out.push_str(ints.format(wp.y));
        }
        out.push('\n');
    }

    out.push_str("TEXTS:");
    out.push_str(ints.format(canvas.texts().len()));
    out.push('\n');
    for t in canvas.texts() {
        push_int_fields(&mut out, &[t.x(), t.y()]);
        out.push(',');
        push_escaped(&mut out, &t.text());
        out.push('\n');
    }

    out
}

fn push_int_fields(out: &mut String, fields: &[i32]) {
    let mut ints = itoa::Buffer::new();
    for (i, value) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(ints.format(*value));
    }
}

fn push_box_ref(out: &mut String, id: Option<usize>) {
    let mut ints = itoa::Buffer::new();
    match id {
        Some(id) => out.push_str(ints.format(id)),
        None => out.push_str("-1"),
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == '\n' {
            out.push('\\');
            out.push('n');
        } else {
            out.push(ch);
        }
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

// --- parsing -------------------------------------------------------------

/// Parses the text format into a fresh canvas. The caller's model is only
/// replaced on success.
pub fn parse(input: &str) -> Result<Canvas, ParseError> {
    let mut lines = input.lines().map(|line| line.trim_end_matches('\r'));

    let header = lines.next().ok_or(ParseError::MissingHeader)?;
    if header != HEADER {
        return Err(ParseError::BadHeader {
            found: header.to_owned(),
        });
    }

    let mut canvas = Canvas::new();

    let box_count = section_count(lines.next(), "BOXES")?;
    for line_no in 0..box_count {
        let line = lines.next().ok_or(ParseError::MissingLine {
            section: "BOXES",
            line: line_no,
        })?;
        parse_box_line(&mut canvas, line, line_no)?;
    }

    let conn_count = section_count(lines.next(), "CONNECTIONS")?;
    for line_no in 0..conn_count {
        let line = lines.next().ok_or(ParseError::MissingLine {
            section: "CONNECTIONS",
            line: line_no,
        })?;
        parse_connection_line(&mut canvas, line, line_no)?;
    }

    // The TEXTS section is optional in legacy files.
    if let Some(line) = lines.find(|line| !line.trim().is_empty()) {
        let text_count = section_count(Some(line), "TEXTS")?;
        for line_no in 0..text_count {
            let line = lines.next().ok_or(ParseError::MissingLine {
                section: "TEXTS",
                line: line_no,
            })?;
            parse_text_line(&mut canvas, line, line_no)?;
        }
    }

    Ok(canvas)
}

fn section_count(line: Option<&str>, section: &'static str) -> Result<usize, ParseError> {
    let line = line.ok_or(ParseError::BadSection {
        expected: section,
        found: String::new(),
    })?;
    let count = line
        .strip_prefix(section)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| ParseError::BadSection {
            expected: section,
            found: line.to_owned(),
        })?;
    count.parse().map_err(|_| ParseError::BadCount {
        section,
        found: count.to_owned(),
    })
}

fn parse_box_line(canvas: &mut Canvas, line: &str, line_no: usize) -> Result<(), ParseError> {
    let bad = |reason: String| ParseError::BadLine {
        section: "BOXES",
        line: line_no,
        reason,
    };

    let parts: SmallVec<[&str; 5]> = line.splitn(5, ',').collect();
    // Modern 5-field form; falls back to the legacy 3-field X,Y,Text line
    // (where a numeric-looking text would otherwise be eaten as a size).
    if parts.len() == 5 {
        let x = parts[0].parse::<i32>();
        let y = parts[1].parse::<i32>();
        let w = parts[2].parse::<i32>();
        let h = parts[3].parse::<i32>();
        if let (Ok(x), Ok(y), Ok(w), Ok(h)) = (x, y, w, h) {
            let id = canvas.add_box(x, y, &unescape(parts[4]));
            canvas.set_box_size(id, w, h);
            return Ok(());
        }
    }

    let parts: SmallVec<[&str; 3]> = line.splitn(3, ',').collect();
    if parts.len() != 3 {
        return Err(bad(format!("expected 5 or 3 fields, got '{line}'")));
    }
    let x = parts[0]
        .parse::<i32>()
        .map_err(|_| bad(format!("bad x '{}'", parts[0])))?;
    let y = parts[1]
        .parse::<i32>()
        .map_err(|_| bad(format!("bad y '{}'", parts[1])))?;
    canvas.add_box(x, y, &unescape(parts[2]));
    Ok(())
}

fn parse_connection_line(
    canvas: &mut Canvas,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let bad = |reason: String| ParseError::BadLine {
        section: "CONNECTIONS",
        line: line_no,
        reason,
    };

    let Some((left, right)) = line.split_once('|') else {
        return parse_legacy_connection_line(canvas, line, line_no);
    };

    let fields: SmallVec<[&str; 8]> = left.split(',').collect();
    if fields.len() != 7 && fields.len() != 8 {
        return Err(bad(format!("expected 7 or 8 fields, got '{left}'")));
    }

    let mut ints = [0i64; 7];
    for (slot, field) in ints.iter_mut().zip(fields.iter()) {
        *slot = field
            .parse()
            .map_err(|_| bad(format!("bad numeric field '{field}'")))?;
    }

    let arrow = match fields.get(7) {
        Some(field) => {
            let tag = field
                .parse::<u8>()
                .map_err(|_| bad(format!("bad arrow field '{field}'")))?;
            ArrowState::from_u8(tag).ok_or_else(|| bad(format!("bad arrow state {tag}")))?
        }
        None => ArrowState::None,
    };

    let waypoint_count = ints[6];
    let mut waypoints = Waypoints::new();
    for token in right.split(',').filter(|t| !t.is_empty()) {
        let (x, y) = token
            .split_once(':')
            .ok_or_else(|| bad(format!("bad waypoint '{token}'")))?;
        let x = x
            .parse::<i32>()
            .map_err(|_| bad(format!("bad waypoint x '{x}'")))?;
        let y = y
            .parse::<i32>()
            .map_err(|_| bad(format!("bad waypoint y '{y}'")))?;
        waypoints.push(Point::new(x, y));
    }
    if waypoints.len() as i64 != waypoint_count {
        return Err(bad(format!(
            "waypoint count {waypoint_count} does not match {} listed",
            waypoints.len()
        )));
    }

    let idx = canvas.add_connection_with_waypoints(
        box_ref(ints[0]),
        box_ref(ints[1]),
        Point::new(ints[2] as i32, ints[3] as i32),
        Point::new(ints[4] as i32, ints[5] as i32),
        waypoints,
    );
    if arrow != ArrowState::None {
        if let Some(mut conn) = canvas.connection_snapshot(idx) {
            conn.arrow = arrow;
            canvas.replace_connection(idx, conn);
        }
    }
    Ok(())
}

/// Legacy `FromID,ToID` connection lines: geometry is recomputed from the two
/// boxes' facing edges.
fn parse_legacy_connection_line(
    canvas: &mut Canvas,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let bad = |reason: String| ParseError::BadLine {
        section: "CONNECTIONS",
        line: line_no,
        reason,
    };

    let (from, to) = line
        .split_once(',')
        .ok_or_else(|| bad(format!("expected FromID,ToID, got '{line}'")))?;
    let from: i64 = from
        .parse()
        .map_err(|_| bad(format!("bad from id '{from}'")))?;
    let to: i64 = to.parse().map_err(|_| bad(format!("bad to id '{to}'")))?;

    let (from_id, to_id) = match (box_ref(from), box_ref(to)) {
        (Some(f), Some(t)) => (f, t),
        _ => {
            return Err(bad("legacy connection needs two box ids".to_owned()));
        }
    };
    let (from_pt, to_pt) = route::edge_points_between(canvas, from_id, to_id).ok_or(
        ParseError::UnknownBoxId {
            line: line_no,
            id: if canvas.get_box(from_id).is_none() {
                from
            } else {
                to
            },
        },
    )?;

    canvas.add_connection_with_waypoints(
        Some(from_id),
        Some(to_id),
        from_pt,
        to_pt,
        Waypoints::new(),
    );
    Ok(())
}

fn parse_text_line(canvas: &mut Canvas, line: &str, line_no: usize) -> Result<(), ParseError> {
    let bad = |reason: String| ParseError::BadLine {
        section: "TEXTS",
        line: line_no,
        reason,
    };

    let parts: SmallVec<[&str; 3]> = line.splitn(3, ',').collect();
    if parts.len() != 3 {
        return Err(bad(format!("expected 3 fields, got '{line}'")));
    }
    let x = parts[0]
        .parse::<i32>()
        .map_err(|_| bad(format!("bad x '{}'", parts[0])))?;
    let y = parts[1]
        .parse::<i32>()
        .map_err(|_| bad(format!("bad y '{}'", parts[1])))?;
    canvas.add_text(x, y, &unescape(parts[2]));
    Ok(())
}

fn box_ref(id: i64) -> Option<usize> {
    (id >= 0).then_some(id as usize)
}

// --- file I/O ------------------------------------------------------------

pub fn save_to_file(canvas: &Canvas, path: &Path) -> io::Result<()> {
    write_atomic(path, encode(canvas).as_bytes())
}

pub fn load_from_file(path: &Path) -> Result<Canvas, LoadError> {
    let input = fs::read_to_string(path).map_err(LoadError::Io)?;
    Ok(parse(&input)?)
}

/// Renders the full diagram extent and writes it as plain text. PNG-style
/// raster export stays with the outer shell; this is the portable export.
pub fn export_ascii(canvas: &Canvas, path: &Path) -> io::Result<()> {
    let (width, height) = content_extent(canvas);
    let grid = render(canvas, width, height, &ViewState::default());
    let mut text = grid.rows().join("\n");
    if !text.ends_with('\n') {
        text.push('\n');
    }
    write_atomic(path, text.as_bytes())
}

/// The smallest viewport (≥ 1×1) covering every element, shadow layer, and
/// highlighted cell at pan zero.
pub fn content_extent(canvas: &Canvas) -> (i32, i32) {
    let mut width = 1;
    let mut height = 1;
    for b in canvas.boxes() {
        let rect = b.rect();
        let z = i32::from(b.z_level());
        width = width.max(rect.right() + z + 1);
        height = height.max(rect.bottom() + z + 1);
    }
    for t in canvas.texts() {
        let rect = t.rect();
        width = width.max(rect.right() + 1);
        height = height.max(rect.bottom() + 1);
    }
    for conn in canvas.connections() {
        for cell in route::connection_path(canvas, conn) {
            width = width.max(cell.pos.x + 1);
            height = height.max(cell.pos.y + 1);
        }
    }
    for (x, y) in canvas.highlights().keys() {
        width = width.max(x + 1);
        height = height.max(y + 1);
    }
    (width, height)
}

/// The sidecar path for a diagram file (`diagram.flow` → `diagram.flow.meta.json`).
pub fn meta_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(META_SUFFIX);
    path.with_file_name(name)
}

pub fn save_meta(path: &Path, meta: &BufferMeta) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(meta)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    write_atomic(&meta_path(path), &json)
}

/// Best-effort: a missing or unreadable sidecar just yields defaults.
pub fn load_meta(path: &Path) -> Option<BufferMeta> {
    let raw = fs::read_to_string(meta_path(path)).ok()?;
    serde_json::from_str(&raw).ok()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, bytes)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Orthogonal connection routing.
//!
//! Resolves endpoints against box edges, traces straight/L-shaped/waypoint
//! paths cell by cell (with corner and arrowhead glyph selection), and answers
//! the nearest-point queries line-based editing is built on.

use crate::model::{ArrowState, Canvas, CanvasBox, Connection, Point};

pub const GLYPH_HORIZONTAL: char = '─';
pub const GLYPH_VERTICAL: char = '│';
pub const GLYPH_CORNER_RIGHT_DOWN: char = '┐';
pub const GLYPH_CORNER_RIGHT_UP: char = '┘';
pub const GLYPH_CORNER_LEFT_DOWN: char = '┌';
pub const GLYPH_CORNER_LEFT_UP: char = '└';
pub const GLYPH_ARROW_DOWN: char = '▼';
pub const GLYPH_ARROW_UP: char = '▲';
pub const GLYPH_ARROW_RIGHT: char = '▶';
pub const GLYPH_ARROW_LEFT: char = '◀';

/// One rendered cell of a traced connection path, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCell {
    pub pos: Point,
    pub glyph: char,
}

/// Picks the point on the box border facing `target`.
///
/// The dominant axis (|Δx| vs |Δy| from the box center, ties horizontal)
/// selects the side; the perpendicular coordinate is clamped into the edge's
/// range.
pub fn nearest_edge_point(b: &CanvasBox, target: Point) -> Point {
    let rect = b.rect();
    let center = rect.center();
    let dx = target.x - center.x;
    let dy = target.y - center.y;

    if dx.abs() >= dy.abs() {
        let x = if dx >= 0 { rect.right() } else { rect.x };
        Point::new(x, target.y.clamp(rect.y, rect.bottom()))
    } else {
        let y = if dy >= 0 { rect.bottom() } else { rect.y };
        Point::new(target.x.clamp(rect.x, rect.right()), y)
    }
}

/// Resolves a connection's concrete endpoints: box-anchored ends re-resolve
/// against the current box edge (so they track box moves), free ends use the
/// stored coordinates.
pub fn resolve_endpoints(canvas: &Canvas, conn: &Connection) -> (Point, Point) {
    let from_hint = conn.waypoints.first().copied().unwrap_or_else(|| {
        conn.to_box
            .and_then(|id| canvas.get_box(id))
            .map(CanvasBox::center)
            .unwrap_or(conn.to)
    });

    let from = match conn.from_box.and_then(|id| canvas.get_box(id)) {
        Some(b) => nearest_edge_point(b, from_hint),
        None => conn.from,
    };

    let to_hint = conn.waypoints.last().copied().unwrap_or(from);
    let to = match conn.to_box.and_then(|id| canvas.get_box(id)) {
        Some(b) => nearest_edge_point(b, to_hint),
        None => conn.to,
    };

    (from, to)
}

/// Traces an orthogonal path through `points` in order and applies arrowheads.
///
/// Consecutive point pairs become a vertical run, a horizontal run, or an
/// L-shaped path (horizontal at the first point's row, then vertical at the
/// second point's column). Corner glyphs follow the turn direction; arrowhead
/// glyphs replace the terminal cell per approach direction when `arrow`
/// includes that end.
pub fn trace_path(points: &[Point], arrow: ArrowState) -> Vec<PathCell> {
    let mut cells: Vec<PathCell> = Vec::new();

    for pair in points.windows(2) {
        emit_segment(&mut cells, pair[0], pair[1]);
    }

    if cells.is_empty() {
        if let Some(p) = points.first() {
            cells.push(PathCell {
                pos: *p,
                glyph: GLYPH_HORIZONTAL,
            });
        }
    }

    apply_arrowheads(&mut cells, arrow);
    cells
}

/// The full traced path of a stored connection against the current canvas.
pub fn connection_path(canvas: &Canvas, conn: &Connection) -> Vec<PathCell> {
    let (from, to) = resolve_endpoints(canvas, conn);
    let mut points = Vec::with_capacity(conn.waypoints.len() + 2);
    points.push(from);
    points.extend(conn.waypoints.iter().copied());
    points.push(to);
    trace_path(&points, conn.arrow)
}

/// Finds the connection cell closest to `(x, y)` across every connection's
/// traced path. Returns the connection index and the cell position, or `None`
/// when no connections exist. Ties keep the earliest connection/cell.
pub fn nearest_point_on_connection(canvas: &Canvas, at: Point) -> Option<(usize, Point)> {
    let mut best: Option<(u32, usize, Point)> = None;

    for (idx, conn) in canvas.connections().iter().enumerate() {
        for cell in connection_path(canvas, conn) {
            let d = cell.pos.distance(at);
            if best.map_or(true, |(best_d, _, _)| d < best_d) {
                best = Some((d, idx, cell.pos));
                if d == 0 {
                    return Some((idx, cell.pos));
                }
            }
        }
    }

    best.map(|(_, idx, pos)| (idx, pos))
}

/// Edge points for a new connection between two boxes with no waypoints: the
/// from point faces the target's center, the to point faces the resolved from.
pub fn edge_points_between(canvas: &Canvas, from_id: usize, to_id: usize) -> Option<(Point, Point)> {
    let from_box = canvas.get_box(from_id)?;
    let to_box = canvas.get_box(to_id)?;
    let from = nearest_edge_point(from_box, to_box.center());
    let to = nearest_edge_point(to_box, from);
    Some((from, to))
}

fn emit_segment(cells: &mut Vec<PathCell>, from: Point, to: Point) {
    if from == to {
        return;
    }

    if from.x == to.x {
        emit_vertical(cells, from.x, from.y, to.y);
    } else if from.y == to.y {
        emit_horizontal(cells, from.y, from.x, to.x);
    } else {
        // Horizontal-first L: across at from.y, then down/up at to.x.
        emit_horizontal(cells, from.y, from.x, to.x);
        let corner = corner_glyph(to.x > from.x, to.y > from.y);
        set_last_glyph(cells, corner);
        emit_vertical(cells, to.x, from.y, to.y);
    }
}

fn corner_glyph(going_right: bool, turning_down: bool) -> char {
    match (going_right, turning_down) {
        (true, true) => GLYPH_CORNER_RIGHT_DOWN,
        (true, false) => GLYPH_CORNER_RIGHT_UP,
        (false, true) => GLYPH_CORNER_LEFT_DOWN,
        (false, false) => GLYPH_CORNER_LEFT_UP,
    }
}

fn emit_horizontal(cells: &mut Vec<PathCell>, y: i32, x0: i32, x1: i32) {
    let step = if x1 >= x0 { 1 } else { -1 };
    let mut x = x0;
    loop {
        push_cell(cells, Point::new(x, y), GLYPH_HORIZONTAL);
        if x == x1 {
            break;
        }
        x += step;
    }
}

fn emit_vertical(cells: &mut Vec<PathCell>, x: i32, y0: i32, y1: i32) {
    let step = if y1 >= y0 { 1 } else { -1 };
    let mut y = y0;
    loop {
        push_cell(cells, Point::new(x, y), GLYPH_VERTICAL);
        if y == y1 {
            break;
        }
        y += step;
    }
}

fn push_cell(cells: &mut Vec<PathCell>, pos: Point, glyph: char) {
    // Segments share their junction point; keep the first-written glyph there
    // (the corner set by the previous segment).
    if cells.last().map(|c| c.pos) == Some(pos) {
        return;
    }
    cells.push(PathCell { pos, glyph });
}

fn set_last_glyph(cells: &mut Vec<PathCell>, glyph: char) {
    if let Some(last) = cells.last_mut() {
        last.glyph = glyph;
    }
}

fn apply_arrowheads(cells: &mut [PathCell], arrow: ArrowState) {
    if cells.len() < 2 {
        return;
    }

    if arrow.at_to() {
        let prev = cells[cells.len() - 2].pos;
        let last = cells[cells.len() - 1].pos;
        if let Some(glyph) = arrow_glyph(last.x - prev.x, last.y - prev.y) {
            if let Some(cell) = cells.last_mut() {
                cell.glyph = glyph;
            }
        }
    }

    if arrow.at_from() {
        let first = cells[0].pos;
        let next = cells[1].pos;
        if let Some(glyph) = arrow_glyph(first.x - next.x, first.y - next.y) {
            cells[0].glyph = glyph;
        }
    }
}

fn arrow_glyph(dx: i32, dy: i32) -> Option<char> {
    match (dx.signum(), dy.signum()) {
        (0, 1) => Some(GLYPH_ARROW_DOWN),
        (0, -1) => Some(GLYPH_ARROW_UP),
        (1, 0) => Some(GLYPH_ARROW_RIGHT),
        (-1, 0) => Some(GLYPH_ARROW_LEFT),
        _ => None,
    }
}

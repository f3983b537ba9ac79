// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a canvas: point hit tests and the cell enumeration
//! behind "highlight the whole element".

use crate::model::{Canvas, Point};
use crate::route;

/// The topmost box whose footprint contains `(x, y)` (latest id wins).
pub fn box_at(canvas: &Canvas, x: i32, y: i32) -> Option<usize> {
    let at = Point::new(x, y);
    canvas
        .boxes()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, b)| b.rect().contains(at))
        .map(|(id, _)| id)
}

/// The topmost free text whose footprint contains `(x, y)`.
pub fn text_at(canvas: &Canvas, x: i32, y: i32) -> Option<usize> {
    let at = Point::new(x, y);
    canvas
        .texts()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, t)| t.rect().contains(at))
        .map(|(id, _)| id)
}

/// Every grid cell the box occupies (border and interior).
pub fn box_cells(canvas: &Canvas, id: usize) -> Vec<Point> {
    let Some(b) = canvas.get_box(id) else {
        return Vec::new();
    };
    let rect = b.rect();
    let mut cells = Vec::with_capacity((rect.width * rect.height).max(0) as usize);
    for y in rect.y..=rect.bottom() {
        for x in rect.x..=rect.right() {
            cells.push(Point::new(x, y));
        }
    }
    cells
}

/// Every cell a free text's characters occupy (per line, not the bounding
/// rectangle).
pub fn text_cells(canvas: &Canvas, id: usize) -> Vec<Point> {
    let Some(t) = canvas.get_text(id) else {
        return Vec::new();
    };
    let mut cells = Vec::new();
    for (row, line) in t.lines().iter().enumerate() {
        for col in 0..line.chars().count() {
            cells.push(Point::new(t.x() + col as i32, t.y() + row as i32));
        }
    }
    cells
}

/// Every cell of the connection's traced path against the current canvas.
pub fn connection_cells(canvas: &Canvas, idx: usize) -> Vec<Point> {
    let Some(conn) = canvas.get_connection(idx) else {
        return Vec::new();
    };
    route::connection_path(canvas, conn)
        .into_iter()
        .map(|cell| cell.pos)
        .collect()
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use crate::model::{Canvas, Connection, Point};

    use super::{box_at, box_cells, connection_cells, text_at, text_cells};

    #[test]
    fn box_hit_test_is_containment_with_topmost_wins() {
        let mut canvas = Canvas::new();
        canvas.add_box(0, 0, "under");
        canvas.add_box(4, 1, "over");

        assert_eq!(box_at(&canvas, 1, 1), Some(0));
        assert_eq!(box_at(&canvas, 5, 2), Some(1));
        assert_eq!(box_at(&canvas, 30, 30), None);
    }

    #[test]
    fn text_hit_test_spans_footprint() {
        let mut canvas = Canvas::new();
        canvas.add_text(5, 5, "ab\nlong line");
        assert_eq!(text_at(&canvas, 6, 5), Some(0));
        assert_eq!(text_at(&canvas, 13, 6), Some(0));
        assert_eq!(text_at(&canvas, 0, 0), None);
    }

    #[test]
    fn box_cells_cover_the_full_footprint() {
        let mut canvas = Canvas::new();
        let id = canvas.add_box(2, 3, "x");
        let cells = box_cells(&canvas, id);
        assert_eq!(cells.len(), 8 * 3);
        assert!(cells.contains(&Point::new(2, 3)));
        assert!(cells.contains(&Point::new(9, 5)));
        assert!(!cells.contains(&Point::new(10, 5)));
    }

    #[test]
    fn text_cells_follow_line_lengths() {
        let mut canvas = Canvas::new();
        let id = canvas.add_text(0, 0, "ab\nc");
        let cells = text_cells(&canvas, id);
        assert_eq!(
            cells,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)]
        );
    }

    #[test]
    fn connection_cells_match_the_traced_path() {
        let mut canvas = Canvas::new();
        canvas.restore_connection(Connection::new(
            None,
            None,
            Point::new(0, 0),
            Point::new(2, 0),
            smallvec![],
        ));
        assert_eq!(
            connection_cells(&canvas, 0),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
        assert!(connection_cells(&canvas, 9).is_empty());
    }

    #[test]
    fn queries_on_missing_ids_return_empty() {
        let canvas = Canvas::new();
        assert!(box_cells(&canvas, 0).is_empty());
        assert!(text_cells(&canvas, 0).is_empty());
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Canvas, CanvasBox, FreeText, Point};
use crate::route;

use super::{
    EditTarget, Grid, InlineEdit, PreviewConnection, Selection, ViewState,
    GLYPH_CURSOR, GLYPH_MARQUEE, GLYPH_SELECTED_BORDER, GLYPH_SHADOW,
};

/// Paints the canvas plus ephemeral overlays into a fresh `width`×`height`
/// grid (clamped to at least 1×1).
///
/// Draw order, back to front: connections, texts, boxes (so borders occlude
/// wires), then the marquee, preview connection, inline edit overlay, and
/// cursor.
pub fn render(canvas: &Canvas, width: i32, height: i32, view: &ViewState) -> Grid {
    let mut grid = Grid::new(width, height);
    let pan = view.pan;

    draw_connections(&mut grid, canvas, view.selection, pan);
    for (id, text) in canvas.texts().iter().enumerate() {
        draw_text(&mut grid, text, id, view, pan);
    }
    for (id, b) in canvas.boxes().iter().enumerate() {
        draw_box(&mut grid, b, id, view, pan);
    }

    if let Some((a, b)) = view.marquee {
        draw_marquee(&mut grid, a, b, pan);
    }
    if let Some(preview) = &view.preview {
        draw_preview(&mut grid, preview, pan);
    }
    if let Some(edit) = &view.edit {
        draw_inline_edit(&mut grid, canvas, edit, pan);
    }
    if view.edit.is_none() {
        if let Some(cursor) = view.cursor {
            grid.set(cursor.x + pan.x, cursor.y + pan.y, GLYPH_CURSOR);
        }
    }

    grid
}

fn draw_connections(grid: &mut Grid, canvas: &Canvas, selection: Selection, pan: Point) {
    for (idx, conn) in canvas.connections().iter().enumerate() {
        let emphasized = selection == Selection::Connection(idx);
        for cell in route::connection_path(canvas, conn) {
            let glyph = if emphasized {
                GLYPH_SELECTED_BORDER
            } else {
                cell.glyph
            };
            // First-writer-wins: an earlier connection's cell is never
            // clobbered by a later one sharing it.
            grid.set_if_blank(cell.pos.x + pan.x, cell.pos.y + pan.y, glyph);
        }
    }
}

fn draw_text(grid: &mut Grid, text: &FreeText, id: usize, view: &ViewState, pan: Point) {
    // While this text is being edited in place, the live buffer replaces it.
    if matches!(&view.edit, Some(edit) if edit.target == EditTarget::Text(id)) {
        return;
    }
    for (row, line) in text.lines().iter().enumerate() {
        let y = text.y() + row as i32 + pan.y;
        for (col, ch) in line.chars().enumerate() {
            grid.set(text.x() + col as i32 + pan.x, y, ch);
        }
    }
}

fn draw_box(grid: &mut Grid, b: &CanvasBox, id: usize, view: &ViewState, pan: Point) {
    let rect = b.rect();
    let x0 = rect.x + pan.x;
    let y0 = rect.y + pan.y;
    let x1 = rect.right() + pan.x;
    let y1 = rect.bottom() + pan.y;

    // Drop shadow layers below-right, one per z-level.
    for d in 1..=i32::from(b.z_level()) {
        for x in (x0 + d)..=(x1 + d) {
            grid.set_if_blank(x, y1 + d, GLYPH_SHADOW);
        }
        for y in (y0 + d)..=(y1 + d) {
            grid.set_if_blank(x1 + d, y, GLYPH_SHADOW);
        }
    }

    // Blank interior first so the body occludes wires behind it.
    for y in y0..=y1 {
        for x in x0..=x1 {
            grid.set(x, y, ' ');
        }
    }

    let selected = view.selection == Selection::Box(id);
    let glyphs = b.border().glyphs();
    let (h, v, tl, tr, bl, br) = if selected {
        let g = GLYPH_SELECTED_BORDER;
        (g, g, g, g, g, g)
    } else {
        (
            glyphs.horizontal,
            glyphs.vertical,
            glyphs.top_left,
            glyphs.top_right,
            glyphs.bottom_left,
            glyphs.bottom_right,
        )
    };

    for x in (x0 + 1)..x1 {
        grid.set(x, y0, h);
        grid.set(x, y1, h);
    }
    for y in (y0 + 1)..y1 {
        grid.set(x0, y, v);
        grid.set(x1, y, v);
    }
    grid.set(x0, y0, tl);
    grid.set(x1, y0, tr);
    grid.set(x0, y1, bl);
    grid.set(x1, y1, br);

    // While this box is being edited in place the overlay draws the text.
    if matches!(&view.edit, Some(edit) if edit.target == EditTarget::Box(id)) {
        return;
    }
    let interior_width = (rect.width - 2).max(0) as usize;
    let interior_height = (rect.height - 2).max(0) as usize;
    for (row, line) in b.lines().iter().take(interior_height).enumerate() {
        let y = y0 + 1 + row as i32;
        for (col, ch) in line.chars().take(interior_width).enumerate() {
            grid.set(x0 + 1 + col as i32, y, ch);
        }
    }
}

fn draw_marquee(grid: &mut Grid, a: Point, b: Point, pan: Point) {
    let (min_x, max_x) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
    let (min_y, max_y) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
    for x in min_x..=max_x {
        grid.set(x + pan.x, min_y + pan.y, GLYPH_MARQUEE);
        grid.set(x + pan.x, max_y + pan.y, GLYPH_MARQUEE);
    }
    for y in min_y..=max_y {
        grid.set(min_x + pan.x, y + pan.y, GLYPH_MARQUEE);
        grid.set(max_x + pan.x, y + pan.y, GLYPH_MARQUEE);
    }
}

fn draw_preview(grid: &mut Grid, preview: &PreviewConnection, pan: Point) {
    let mut points = Vec::with_capacity(preview.waypoints.len() + 2);
    points.push(preview.start);
    points.extend(preview.waypoints.iter().copied());
    points.push(preview.cursor);
    for cell in route::trace_path(&points, crate::model::ArrowState::None) {
        grid.set(cell.pos.x + pan.x, cell.pos.y + pan.y, cell.glyph);
    }
}

fn draw_inline_edit(grid: &mut Grid, canvas: &Canvas, edit: &InlineEdit, pan: Point) {
    let (origin, clip) = match edit.target {
        EditTarget::Box(id) => {
            let Some(b) = canvas.get_box(id) else {
                return;
            };
            let rect = b.rect();
            (
                Point::new(rect.x + 1, rect.y + 1),
                Some(((rect.width - 2).max(0), (rect.height - 2).max(0))),
            )
        }
        EditTarget::Text(id) => {
            let Some(t) = canvas.get_text(id) else {
                return;
            };
            (Point::new(t.x(), t.y()), None)
        }
    };

    let in_clip = |col: i32, row: i32| match clip {
        Some((w, h)) => col < w && row < h,
        None => true,
    };

    let mut col = 0i32;
    let mut row = 0i32;
    for (offset, ch) in edit.buffer.chars().enumerate() {
        if ch == '\n' {
            if offset == edit.cursor && in_clip(col, row) {
                grid.set(origin.x + col + pan.x, origin.y + row + pan.y, GLYPH_CURSOR);
            }
            col = 0;
            row += 1;
            continue;
        }
        if in_clip(col, row) {
            // The cursor replaces (not inserts before) the character under it.
            let glyph = if offset == edit.cursor { GLYPH_CURSOR } else { ch };
            grid.set(origin.x + col + pan.x, origin.y + row + pan.y, glyph);
        }
        col += 1;
    }
    if edit.cursor >= edit.buffer.chars().count() && in_clip(col, row) {
        grid.set(origin.x + col + pan.x, origin.y + row + pan.y, GLYPH_CURSOR);
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Character-grid rendering.
//!
//! Every frame reproduces the full grid from scratch from the diagram model
//! plus the transient view state; there is no incremental diffing. The output
//! is always exactly `height` rows of exactly `width` cells.

use std::fmt;

use crate::model::Point;

mod scene;

pub use scene::render;

pub const GLYPH_SELECTED_BORDER: char = '#';
pub const GLYPH_SHADOW: char = '░';
pub const GLYPH_CURSOR: char = '█';
pub const GLYPH_MARQUEE: char = '.';

/// A fixed-size viewport grid of character cells.
///
/// Writes outside the grid are clipped cell by cell and never fail; blank
/// cells hold `' '`. `set_if_blank` gives connection passes their
/// first-writer-wins collision behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Creates a blank grid; degenerate dimensions are clamped to 1.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1) as usize;
        let height = height.max(1) as usize;
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        self.index_of(x, y).map(|idx| self.cells[idx])
    }

    /// Writes `ch`, overwriting whatever is there. Out-of-range is a no-op.
    pub fn set(&mut self, x: i32, y: i32, ch: char) {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = ch;
        }
    }

    /// Writes `ch` only when the cell is still blank.
    pub fn set_if_blank(&mut self, x: i32, y: i32, ch: char) {
        if let Some(idx) = self.index_of(x, y) {
            if self.cells[idx] == ' ' {
                self.cells[idx] = ch;
            }
        }
    }

    /// The grid as `height` strings of `width` chars each.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| self.cells[y * self.width..(y + 1) * self.width].iter().collect())
            .collect()
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

/// Which element, if any, carries rendering emphasis. Purely advisory; never
/// mutates model invariants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Box(usize),
    Text(usize),
    Connection(usize),
}

/// A connect gesture in flight: traced with the same routing as committed
/// connections, from the fixed start through any waypoints to the live cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConnection {
    pub start: Point,
    pub waypoints: Vec<Point>,
    pub cursor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Box(usize),
    Text(usize),
}

/// In-place text editing overlay: the live edit buffer (not yet committed to
/// the model) and the cursor offset within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEdit {
    pub target: EditTarget,
    pub buffer: String,
    pub cursor: usize,
}

/// Transient per-frame state supplied by the input layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Additive world → viewport translation, applied before clipping.
    pub pan: Point,
    /// Cursor in world coordinates; drawn unless an inline edit owns it.
    pub cursor: Option<Point>,
    pub selection: Selection,
    pub preview: Option<PreviewConnection>,
    pub edit: Option<InlineEdit>,
    /// Multi-select rectangle corners in world coordinates.
    pub marquee: Option<(Point, Point)>,
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use crate::ops::History;

use super::canvas::Canvas;
use super::geometry::Point;

/// One open diagram: a canvas plus its own undo/redo history, filename, and
/// pan offset.
#[derive(Debug, Default)]
pub struct Buffer {
    canvas: Canvas,
    history: History,
    filename: Option<PathBuf>,
    pan: Point,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: Canvas, filename: Option<PathBuf>) -> Self {
        Self {
            canvas,
            history: History::default(),
            filename,
            pan: Point::default(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Canvas and history borrowed together, for record/undo/redo call sites.
    pub fn canvas_and_history(&mut self) -> (&mut Canvas, &mut History) {
        (&mut self.canvas, &mut self.history)
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, filename: Option<PathBuf>) {
        self.filename = filename;
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan = Point::new(self.pan.x + dx, self.pan.y + dy);
    }
}

/// The top-level container the editor shell runs against: all open buffers
/// and which one is active. Switching buffers is a pure index change.
#[derive(Debug)]
pub struct Workspace {
    buffers: Vec<Buffer>,
    active: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Starts with a single empty, unnamed buffer.
    pub fn new() -> Self {
        Self {
            buffers: vec![Buffer::new()],
            active: 0,
        }
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Buffer {
        &self.buffers[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.active]
    }

    /// Opens a buffer and makes it active.
    pub fn open(&mut self, buffer: Buffer) -> usize {
        self.buffers.push(buffer);
        self.active = self.buffers.len() - 1;
        self.active
    }

    /// Switches the active buffer; out-of-range indices are a no-op.
    pub fn switch_to(&mut self, index: usize) {
        if index < self.buffers.len() {
            self.active = index;
        }
    }

    pub fn switch_next(&mut self) {
        self.active = (self.active + 1) % self.buffers.len();
    }

    pub fn switch_prev(&mut self) {
        self.active = (self.active + self.buffers.len() - 1) % self.buffers.len();
    }

    /// Closes a buffer. The last remaining buffer is replaced with a fresh
    /// empty one instead of leaving the workspace bufferless. The active
    /// buffer stays the same buffer when one below it closes.
    pub fn close(&mut self, index: usize) {
        if index >= self.buffers.len() {
            return;
        }
        self.buffers.remove(index);
        if self.buffers.is_empty() {
            self.buffers.push(Buffer::new());
        }
        if index < self.active {
            self.active -= 1;
        }
        if self.active >= self.buffers.len() {
            self.active = self.buffers.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Buffer, Workspace};

    #[test]
    fn workspace_starts_with_one_empty_buffer() {
        let ws = Workspace::new();
        assert_eq!(ws.buffers().len(), 1);
        assert_eq!(ws.active_index(), 0);
        assert!(ws.active().canvas().is_empty());
    }

    #[test]
    fn buffer_switching_is_an_index_change() {
        let mut ws = Workspace::new();
        ws.active_mut().canvas_mut().add_box(0, 0, "first");
        ws.open(Buffer::new());
        assert_eq!(ws.active_index(), 1);
        assert!(ws.active().canvas().is_empty());

        ws.switch_to(0);
        assert_eq!(ws.active().canvas().boxes().len(), 1);

        ws.switch_to(99);
        assert_eq!(ws.active_index(), 0);

        ws.switch_next();
        assert_eq!(ws.active_index(), 1);
        ws.switch_prev();
        assert_eq!(ws.active_index(), 0);
        ws.switch_prev();
        assert_eq!(ws.active_index(), 1);
    }

    #[test]
    fn closing_the_last_buffer_leaves_a_fresh_one() {
        let mut ws = Workspace::new();
        ws.active_mut().canvas_mut().add_box(0, 0, "x");
        ws.close(0);
        assert_eq!(ws.buffers().len(), 1);
        assert!(ws.active().canvas().is_empty());
    }

    #[test]
    fn closing_a_buffer_below_the_active_keeps_it_active() {
        let mut ws = Workspace::new();
        ws.active_mut().canvas_mut().add_box(0, 0, "first");
        ws.open(Buffer::new());
        ws.active_mut().canvas_mut().add_box(0, 0, "second");
        ws.open(Buffer::new());
        ws.active_mut().canvas_mut().add_box(0, 0, "third");
        assert_eq!(ws.active_index(), 2);

        ws.close(0);
        assert_eq!(ws.active_index(), 1);
        assert_eq!(
            ws.active().canvas().get_box_text(0).as_deref(),
            Some("third")
        );

        // Closing the active buffer itself falls back to the previous one.
        ws.close(ws.active_index());
        assert_eq!(ws.active_index(), 0);
        assert_eq!(
            ws.active().canvas().get_box_text(0).as_deref(),
            Some("second")
        );
    }

    #[test]
    fn histories_are_per_buffer() {
        let mut ws = Workspace::new();
        {
            let (canvas, history) = ws.active_mut().canvas_and_history();
            let id = canvas.add_box(0, 0, "a");
            history.record(crate::ops::Action::AddBox {
                id,
                x: 0,
                y: 0,
                text: "a".to_owned(),
            });
        }
        ws.open(Buffer::new());
        assert!(!ws.active().history().can_undo());
        ws.switch_to(0);
        assert!(ws.active().history().can_undo());
    }
}

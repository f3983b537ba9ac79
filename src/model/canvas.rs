// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::elements::{BorderStyle, CanvasBox, Connection, FreeText, Waypoints};
use super::geometry::Point;

/// Everything removed by a cascading box delete, snapshotted by value so a
/// later renumbering cannot invalidate it. Each removed connection carries its
/// original array index so undo can put it back exactly where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedBox {
    pub snapshot: CanvasBox,
    pub connections: Vec<(usize, Connection)>,
}

/// Exclusive owner of the boxes, connections, texts, and highlights of one
/// diagram buffer.
///
/// Box and text ids are dense storage indices (`0..len`); deleting compacts
/// the array and renumbers every connection endpoint referencing a shifted id.
/// Every mutator is a silent no-op on an out-of-range id, so a stale index
/// computed by the UI can never crash the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    boxes: Vec<CanvasBox>,
    connections: Vec<Connection>,
    texts: Vec<FreeText>,
    highlights: BTreeMap<(i32, i32), u8>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxes(&self) -> &[CanvasBox] {
        &self.boxes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn texts(&self) -> &[FreeText] {
        &self.texts
    }

    pub fn highlights(&self) -> &BTreeMap<(i32, i32), u8> {
        &self.highlights
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
            && self.connections.is_empty()
            && self.texts.is_empty()
            && self.highlights.is_empty()
    }

    // --- boxes -----------------------------------------------------------

    /// Adds a box sized to fit `text` and returns its id.
    pub fn add_box(&mut self, x: i32, y: i32, text: &str) -> usize {
        self.boxes.push(CanvasBox::new(x, y, text));
        self.boxes.len() - 1
    }

    /// Re-adds a box at a specific id, shifting later ids up by one.
    ///
    /// Used by undo/redo and load to restore a box under its original id.
    pub fn add_box_with_id(&mut self, x: i32, y: i32, text: &str, id: usize) {
        self.insert_box_snapshot(id, CanvasBox::new(x, y, text));
    }

    /// Inserts a full box snapshot at `id` (clamped to the array length) and
    /// renumbers connection endpoints at or above it.
    pub fn insert_box_snapshot(&mut self, id: usize, snapshot: CanvasBox) {
        let id = id.min(self.boxes.len());
        self.boxes.insert(id, snapshot);
        for conn in &mut self.connections {
            if let Some(from) = conn.from_box {
                if from >= id {
                    conn.from_box = Some(from + 1);
                }
            }
            if let Some(to) = conn.to_box {
                if to >= id {
                    conn.to_box = Some(to + 1);
                }
            }
        }
    }

    /// Deletes a box: drops every connection attached to it, compacts the box
    /// array, and renumbers higher ids down by one (including connection
    /// endpoints). Returns the removed data for undo recording.
    pub fn delete_box(&mut self, id: usize) -> Option<DeletedBox> {
        if id >= self.boxes.len() {
            return None;
        }

        let snapshot = self.boxes.remove(id);
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.connections.len());
        for (idx, conn) in self.connections.drain(..).enumerate() {
            if conn.references(id) {
                removed.push((idx, conn));
            } else {
                kept.push(conn);
            }
        }
        self.connections = kept;
        for conn in &mut self.connections {
            if let Some(from) = conn.from_box {
                if from > id {
                    conn.from_box = Some(from - 1);
                }
            }
            if let Some(to) = conn.to_box {
                if to > id {
                    conn.to_box = Some(to - 1);
                }
            }
        }

        Some(DeletedBox {
            snapshot,
            connections: removed,
        })
    }

    pub fn get_box(&self, id: usize) -> Option<&CanvasBox> {
        self.boxes.get(id)
    }

    pub fn get_box_text(&self, id: usize) -> Option<String> {
        self.boxes.get(id).map(CanvasBox::text)
    }

    pub fn set_box_text(&mut self, id: usize, text: &str) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.set_text(text);
        }
    }

    pub fn set_box_size(&mut self, id: usize, width: i32, height: i32) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.set_size(width, height);
        }
    }

    pub fn set_box_position(&mut self, id: usize, x: i32, y: i32) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.set_position(x, y);
        }
    }

    pub fn move_box(&mut self, id: usize, dx: i32, dy: i32) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.translate(dx, dy);
        }
    }

    pub fn set_box_z_level(&mut self, id: usize, z_level: u8) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.set_z_level(z_level);
        }
    }

    pub fn set_box_border(&mut self, id: usize, border: BorderStyle) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.set_border(border);
        }
    }

    // --- texts -----------------------------------------------------------

    pub fn add_text(&mut self, x: i32, y: i32, text: &str) -> usize {
        self.texts.push(FreeText::new(x, y, text));
        self.texts.len() - 1
    }

    /// Re-adds a text at a specific id, shifting later ids up by one.
    pub fn add_text_with_id(&mut self, x: i32, y: i32, text: &str, id: usize) {
        self.insert_text_snapshot(id, FreeText::new(x, y, text));
    }

    pub fn insert_text_snapshot(&mut self, id: usize, snapshot: FreeText) {
        let id = id.min(self.texts.len());
        self.texts.insert(id, snapshot);
    }

    pub fn delete_text(&mut self, id: usize) -> Option<FreeText> {
        if id >= self.texts.len() {
            return None;
        }
        Some(self.texts.remove(id))
    }

    pub fn get_text(&self, id: usize) -> Option<&FreeText> {
        self.texts.get(id)
    }

    pub fn get_text_text(&self, id: usize) -> Option<String> {
        self.texts.get(id).map(FreeText::text)
    }

    pub fn set_text_text(&mut self, id: usize, text: &str) {
        if let Some(t) = self.texts.get_mut(id) {
            t.set_text(text);
        }
    }

    pub fn set_text_position(&mut self, id: usize, x: i32, y: i32) {
        if let Some(t) = self.texts.get_mut(id) {
            t.set_position(x, y);
        }
    }

    pub fn move_text(&mut self, id: usize, dx: i32, dy: i32) {
        if let Some(t) = self.texts.get_mut(id) {
            t.translate(dx, dy);
        }
    }

    // --- connections -----------------------------------------------------

    /// Adds a connection with explicit endpoint coordinates and waypoints and
    /// returns its index.
    pub fn add_connection_with_waypoints(
        &mut self,
        from_box: Option<usize>,
        to_box: Option<usize>,
        from: Point,
        to: Point,
        waypoints: Waypoints,
    ) -> usize {
        self.connections
            .push(Connection::new(from_box, to_box, from, to, waypoints));
        self.connections.len() - 1
    }

    /// Removes the first connection equal to `value` by full value comparison.
    ///
    /// Two visually identical connections are indistinguishable here; when a
    /// duplicate exists the first stored instance is the one removed.
    pub fn remove_specific_connection(&mut self, value: &Connection) -> bool {
        match self.connections.iter().position(|c| c == value) {
            Some(idx) => {
                self.connections.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Appends a connection by value (used when re-applying an add).
    pub fn restore_connection(&mut self, value: Connection) {
        self.connections.push(value);
    }

    /// Re-inserts a removed connection at its original index (clamped to the
    /// array length), preserving serialized order across delete/undo.
    pub fn insert_connection_snapshot(&mut self, idx: usize, value: Connection) {
        let idx = idx.min(self.connections.len());
        self.connections.insert(idx, value);
    }

    /// Swaps the connection at `idx` for `value`, returning the old one.
    pub fn replace_connection(&mut self, idx: usize, value: Connection) -> Option<Connection> {
        let slot = self.connections.get_mut(idx)?;
        Some(std::mem::replace(slot, value))
    }

    /// Rotates the arrow state of the connection at `idx` and returns the
    /// (old, new) pair for undo recording.
    pub fn cycle_connection_arrow(&mut self, idx: usize) -> Option<(Connection, Connection)> {
        let conn = self.connections.get_mut(idx)?;
        let old = conn.clone();
        conn.arrow = conn.arrow.cycled();
        Some((old, conn.clone()))
    }

    pub fn get_connection(&self, idx: usize) -> Option<&Connection> {
        self.connections.get(idx)
    }

    // --- highlights ------------------------------------------------------

    /// Paints a highlight color (0–7) onto a cell. Out-of-range colors are a
    /// no-op; absence of a cell is distinct from color 0.
    pub fn set_highlight(&mut self, x: i32, y: i32, color: u8) {
        if color > 7 {
            return;
        }
        self.highlights.insert((x, y), color);
    }

    /// Clears a cell back to "no highlight", returning the prior color.
    pub fn clear_highlight(&mut self, x: i32, y: i32) -> Option<u8> {
        self.highlights.remove(&(x, y))
    }

    pub fn get_highlight(&self, x: i32, y: i32) -> Option<u8> {
        self.highlights.get(&(x, y)).copied()
    }

    /// Highlighted cells covered by `rect`, snapshotted for cascade undo.
    pub fn highlights_in(&self, rect: super::Rect) -> Vec<(Point, u8)> {
        self.highlights
            .iter()
            .filter(|((x, y), _)| rect.contains(Point::new(*x, *y)))
            .map(|((x, y), color)| (Point::new(*x, *y), *color))
            .collect()
    }
}

impl Canvas {
    /// Convenience accessor used by edit flows that need the old arrow pair
    /// without mutating: clones the connection at `idx`.
    pub fn connection_snapshot(&self, idx: usize) -> Option<Connection> {
        self.connections.get(idx).cloned()
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The action log: exact forward/inverse mutation pairs and per-buffer
//! undo/redo stacks.
//!
//! Every variant carries value snapshots, never live references; a later
//! renumbering delete cannot invalidate recorded data. Applying an action's
//! inverse and then its forward (or vice versa) reproduces the exact model
//! state on either side, including cascade side effects.

use crate::model::{Canvas, CanvasBox, Connection, FreeText, Point, Rect};

/// One edit to a highlight cell: the new state and the prior state.
/// `None` means "no highlight", which is distinct from color 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightEdit {
    pub at: Point,
    pub color: Option<u8>,
    pub old_color: Option<u8>,
}

/// A recorded mutation with everything both directions need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddBox {
        id: usize,
        x: i32,
        y: i32,
        text: String,
    },
    AddText {
        id: usize,
        x: i32,
        y: i32,
        text: String,
    },
    /// Cascading delete: the box, the connections removed with it (each with
    /// its original array index), and the highlighted cells the caller chose
    /// to clear alongside it.
    DeleteBox {
        id: usize,
        snapshot: CanvasBox,
        connections: Vec<(usize, Connection)>,
        highlights: Vec<(Point, u8)>,
    },
    DeleteText {
        id: usize,
        snapshot: FreeText,
    },
    EditBox {
        id: usize,
        old_text: String,
        new_text: String,
    },
    EditText {
        id: usize,
        old_text: String,
        new_text: String,
    },
    /// The absolute original geometry is authoritative for undo; the delta is
    /// replayed against current state for redo, so both stay correct if the
    /// box drifted between recording and replay.
    ResizeBox {
        id: usize,
        dw: i32,
        dh: i32,
        orig: Rect,
    },
    MoveBox {
        id: usize,
        dx: i32,
        dy: i32,
        orig: Point,
    },
    MoveText {
        id: usize,
        dx: i32,
        dy: i32,
        orig: Point,
    },
    AddConnection {
        value: Connection,
    },
    /// The index is where the connection sat when it was removed; undo
    /// re-inserts there so serialized order is preserved.
    DeleteConnection {
        index: usize,
        value: Connection,
    },
    /// Undo installs `old`, redo installs `new`, both at `index`.
    CycleArrow {
        index: usize,
        old: Connection,
        new: Connection,
    },
    Highlight {
        cells: Vec<HighlightEdit>,
    },
}

/// Replays an action's forward direction against the model.
pub fn apply_forward(canvas: &mut Canvas, action: &Action) {
    match action {
        Action::AddBox { id, x, y, text } => canvas.add_box_with_id(*x, *y, text, *id),
        Action::AddText { id, x, y, text } => canvas.add_text_with_id(*x, *y, text, *id),
        Action::DeleteBox { id, highlights, .. } => {
            canvas.delete_box(*id);
            for (at, _) in highlights {
                canvas.clear_highlight(at.x, at.y);
            }
        }
        Action::DeleteText { id, .. } => {
            canvas.delete_text(*id);
        }
        Action::EditBox { id, new_text, .. } => canvas.set_box_text(*id, new_text),
        Action::EditText { id, new_text, .. } => canvas.set_text_text(*id, new_text),
        Action::ResizeBox { id, dw, dh, .. } => {
            if let Some(b) = canvas.get_box(*id) {
                let (w, h) = (b.width() + dw, b.height() + dh);
                canvas.set_box_size(*id, w, h);
            }
        }
        Action::MoveBox { id, dx, dy, .. } => canvas.move_box(*id, *dx, *dy),
        Action::MoveText { id, dx, dy, .. } => canvas.move_text(*id, *dx, *dy),
        Action::AddConnection { value } => canvas.restore_connection(value.clone()),
        Action::DeleteConnection { value, .. } => {
            canvas.remove_specific_connection(value);
        }
        Action::CycleArrow { index, new, .. } => {
            canvas.replace_connection(*index, new.clone());
        }
        Action::Highlight { cells } => {
            for cell in cells {
                match cell.color {
                    Some(color) => canvas.set_highlight(cell.at.x, cell.at.y, color),
                    None => {
                        canvas.clear_highlight(cell.at.x, cell.at.y);
                    }
                }
            }
        }
    }
}

/// Replays an action's inverse direction against the model.
pub fn apply_inverse(canvas: &mut Canvas, action: &Action) {
    match action {
        Action::AddBox { id, .. } => {
            canvas.delete_box(*id);
        }
        Action::AddText { id, .. } => {
            canvas.delete_text(*id);
        }
        Action::DeleteBox {
            id,
            snapshot,
            connections,
            highlights,
        } => {
            canvas.insert_box_snapshot(*id, snapshot.clone());
            // Ascending index order, so each insert lands where the
            // connection originally sat.
            for (idx, conn) in connections {
                canvas.insert_connection_snapshot(*idx, conn.clone());
            }
            for (at, color) in highlights {
                canvas.set_highlight(at.x, at.y, *color);
            }
        }
        Action::DeleteText { id, snapshot } => canvas.insert_text_snapshot(*id, snapshot.clone()),
        Action::EditBox { id, old_text, .. } => canvas.set_box_text(*id, old_text),
        Action::EditText { id, old_text, .. } => canvas.set_text_text(*id, old_text),
        Action::ResizeBox { id, orig, .. } => {
            canvas.set_box_position(*id, orig.x, orig.y);
            canvas.set_box_size(*id, orig.width, orig.height);
        }
        Action::MoveBox { id, orig, .. } => canvas.set_box_position(*id, orig.x, orig.y),
        Action::MoveText { id, orig, .. } => canvas.set_text_position(*id, orig.x, orig.y),
        Action::AddConnection { value } => {
            canvas.remove_specific_connection(value);
        }
        Action::DeleteConnection { index, value } => {
            canvas.insert_connection_snapshot(*index, value.clone());
        }
        Action::CycleArrow { index, old, .. } => {
            canvas.replace_connection(*index, old.clone());
        }
        Action::Highlight { cells } => {
            for cell in cells {
                match cell.old_color {
                    Some(color) => canvas.set_highlight(cell.at.x, cell.at.y, color),
                    None => {
                        canvas.clear_highlight(cell.at.x, cell.at.y);
                    }
                }
            }
        }
    }
}

/// One buffer's undo/redo stacks. History is linear: recording clears the
/// redo stack.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<Action>,
    redo: Vec<Action>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a freshly performed action. The mutation itself has already
    /// been applied by the caller; this only records it.
    pub fn record(&mut self, action: Action) {
        self.undo.push(action);
        self.redo.clear();
    }

    /// Applies the inverse of the most recent action. No-op on an empty
    /// stack; returns whether anything was undone.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(action) = self.undo.pop() else {
            return false;
        };
        apply_inverse(canvas, &action);
        self.redo.push(action);
        true
    }

    /// Re-applies the most recently undone action.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(action) = self.redo.pop() else {
            return false;
        };
        apply_forward(canvas, &action);
        self.undo.push(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
mod tests;

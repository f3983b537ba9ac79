// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::smallvec;

use crate::model::{Canvas, Connection, Point, Rect};

use super::{Action, HighlightEdit, History};

/// Performs a mutation and records it, the way the input layer does.
fn add_box_recorded(canvas: &mut Canvas, history: &mut History, x: i32, y: i32, text: &str) -> usize {
    let id = canvas.add_box(x, y, text);
    history.record(Action::AddBox {
        id,
        x,
        y,
        text: text.to_owned(),
    });
    id
}

fn delete_box_recorded(canvas: &mut Canvas, history: &mut History, id: usize) {
    let highlights = match canvas.get_box(id) {
        Some(b) => canvas.highlights_in(b.rect()),
        None => return,
    };
    let Some(removed) = canvas.delete_box(id) else {
        return;
    };
    for (at, _) in &highlights {
        canvas.clear_highlight(at.x, at.y);
    }
    history.record(Action::DeleteBox {
        id,
        snapshot: removed.snapshot,
        connections: removed.connections,
        highlights,
    });
}

fn connect_recorded(
    canvas: &mut Canvas,
    history: &mut History,
    from: usize,
    to: usize,
) -> usize {
    let (from_pt, to_pt) = crate::route::edge_points_between(canvas, from, to).expect("boxes");
    let idx =
        canvas.add_connection_with_waypoints(Some(from), Some(to), from_pt, to_pt, smallvec![]);
    history.record(Action::AddConnection {
        value: canvas.connections()[idx].clone(),
    });
    idx
}

#[test]
fn undo_redo_round_trip_restores_exact_states() {
    let mut canvas = Canvas::new();
    let mut history = History::new();

    let initial = canvas.clone();

    let a = add_box_recorded(&mut canvas, &mut history, 10, 5, "Start");
    let b = add_box_recorded(&mut canvas, &mut history, 25, 10, "Process");
    connect_recorded(&mut canvas, &mut history, a, b);
    canvas.set_box_text(b, "Process 2");
    history.record(Action::EditBox {
        id: b,
        old_text: "Process".to_owned(),
        new_text: "Process 2".to_owned(),
    });
    canvas.set_highlight(12, 6, 5);
    history.record(Action::Highlight {
        cells: vec![HighlightEdit {
            at: Point::new(12, 6),
            color: Some(5),
            old_color: None,
        }],
    });

    let final_state = canvas.clone();
    let depth = history.undo_depth();
    assert_eq!(depth, 5);

    for _ in 0..depth {
        assert!(history.undo(&mut canvas));
    }
    assert_eq!(canvas, initial);
    assert!(!history.undo(&mut canvas));

    for _ in 0..depth {
        assert!(history.redo(&mut canvas));
    }
    assert_eq!(canvas, final_state);
    assert!(!history.redo(&mut canvas));
}

#[test]
fn record_clears_the_redo_stack() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    add_box_recorded(&mut canvas, &mut history, 0, 0, "a");
    add_box_recorded(&mut canvas, &mut history, 0, 10, "b");
    history.undo(&mut canvas);
    assert!(history.can_redo());

    add_box_recorded(&mut canvas, &mut history, 0, 20, "c");
    assert!(!history.can_redo());
}

#[test]
fn cascading_delete_undo_restores_box_and_connections() {
    let mut canvas = Canvas::new();
    let mut history = History::new();

    let a = add_box_recorded(&mut canvas, &mut history, 0, 0, "a");
    let b = add_box_recorded(&mut canvas, &mut history, 20, 0, "b");
    let c = add_box_recorded(&mut canvas, &mut history, 40, 0, "c");
    connect_recorded(&mut canvas, &mut history, a, b);
    connect_recorded(&mut canvas, &mut history, b, c);
    connect_recorded(&mut canvas, &mut history, a, c);

    let before = canvas.clone();
    delete_box_recorded(&mut canvas, &mut history, b);

    // Both connections touching b are gone; the a→c survivor is renumbered.
    assert_eq!(canvas.boxes().len(), 2);
    assert_eq!(canvas.connections().len(), 1);
    assert_eq!(canvas.connections()[0].from_box, Some(0));
    assert_eq!(canvas.connections()[0].to_box, Some(1));

    assert!(history.undo(&mut canvas));
    assert_eq!(canvas, before);
}

#[test]
fn cascading_delete_undo_preserves_serialized_order() {
    let mut canvas = Canvas::new();
    let mut history = History::new();

    let a = add_box_recorded(&mut canvas, &mut history, 0, 0, "a");
    let b = add_box_recorded(&mut canvas, &mut history, 20, 0, "b");
    let c = add_box_recorded(&mut canvas, &mut history, 40, 0, "c");
    connect_recorded(&mut canvas, &mut history, a, b);
    connect_recorded(&mut canvas, &mut history, a, c);
    connect_recorded(&mut canvas, &mut history, b, c);

    // Deleting a removes the connections at indices 0 and 1, leaving the
    // b→c survivor; undo must put them back at those indices, not append.
    let before = crate::store::encode(&canvas);
    delete_box_recorded(&mut canvas, &mut history, a);
    assert!(history.undo(&mut canvas));
    assert_eq!(crate::store::encode(&canvas), before);
}

#[test]
fn delete_box_undo_restores_cleared_highlights() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    let id = add_box_recorded(&mut canvas, &mut history, 0, 0, "a");
    canvas.set_highlight(1, 1, 3);
    history.record(Action::Highlight {
        cells: vec![HighlightEdit {
            at: Point::new(1, 1),
            color: Some(3),
            old_color: None,
        }],
    });

    delete_box_recorded(&mut canvas, &mut history, id);
    assert_eq!(canvas.get_highlight(1, 1), None);

    assert!(history.undo(&mut canvas));
    assert_eq!(canvas.get_highlight(1, 1), Some(3));
    assert_eq!(canvas.boxes().len(), 1);
}

#[test]
fn highlight_undo_restores_prior_color_exactly() {
    let mut canvas = Canvas::new();
    let mut history = History::new();

    canvas.set_highlight(4, 4, 2);
    history.record(Action::Highlight {
        cells: vec![HighlightEdit {
            at: Point::new(4, 4),
            color: Some(2),
            old_color: None,
        }],
    });

    // Paint 5 over the existing 2.
    let old = canvas.get_highlight(4, 4);
    canvas.set_highlight(4, 4, 5);
    history.record(Action::Highlight {
        cells: vec![HighlightEdit {
            at: Point::new(4, 4),
            color: Some(5),
            old_color: old,
        }],
    });

    assert!(history.undo(&mut canvas));
    assert_eq!(canvas.get_highlight(4, 4), Some(2));

    assert!(history.undo(&mut canvas));
    assert_eq!(canvas.get_highlight(4, 4), None);
}

#[test]
fn arrow_cycle_inverse_restores_prior_state() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    canvas.restore_connection(Connection::new(
        None,
        None,
        Point::new(0, 0),
        Point::new(5, 0),
        smallvec![],
    ));

    let before = canvas.connections()[0].clone();
    let (old, new) = canvas.cycle_connection_arrow(0).expect("cycle");
    history.record(Action::CycleArrow {
        index: 0,
        old,
        new,
    });

    assert!(history.undo(&mut canvas));
    assert_eq!(canvas.connections()[0], before);

    assert!(history.redo(&mut canvas));
    assert_eq!(canvas.connections()[0].arrow, before.arrow.cycled());
}

#[test]
fn resize_undo_uses_absolute_original_after_drift() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    let id = canvas.add_box(5, 5, "x");
    let orig = canvas.get_box(id).expect("box").rect();

    canvas.set_box_size(id, orig.width + 4, orig.height + 2);
    history.record(Action::ResizeBox {
        id,
        dw: 4,
        dh: 2,
        orig,
    });

    // The box drifts through an unrelated (unrecorded) move.
    canvas.move_box(id, 3, 3);

    assert!(history.undo(&mut canvas));
    let b = canvas.get_box(id).expect("box");
    assert_eq!(b.rect(), orig);

    // Redo replays the delta against current state.
    assert!(history.redo(&mut canvas));
    let b = canvas.get_box(id).expect("box");
    assert_eq!((b.width(), b.height()), (orig.width + 4, orig.height + 2));
}

#[test]
fn move_undo_restores_original_position() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    let id = canvas.add_box(5, 5, "x");

    canvas.move_box(id, 7, 2);
    history.record(Action::MoveBox {
        id,
        dx: 7,
        dy: 2,
        orig: Point::new(5, 5),
    });

    assert!(history.undo(&mut canvas));
    let b = canvas.get_box(id).expect("box");
    assert_eq!((b.x(), b.y()), (5, 5));

    assert!(history.redo(&mut canvas));
    let b = canvas.get_box(id).expect("box");
    assert_eq!((b.x(), b.y()), (12, 7));
}

#[test]
fn delete_connection_round_trips() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    let conn = Connection::new(None, None, Point::new(0, 0), Point::new(6, 3), smallvec![]);
    canvas.restore_connection(conn.clone());

    assert!(canvas.remove_specific_connection(&conn));
    history.record(Action::DeleteConnection {
        index: 0,
        value: conn.clone(),
    });
    assert!(canvas.connections().is_empty());

    assert!(history.undo(&mut canvas));
    assert_eq!(canvas.connections(), &[conn.clone()]);

    assert!(history.redo(&mut canvas));
    assert!(canvas.connections().is_empty());
}

#[test]
fn deleting_a_middle_connection_undoes_to_the_same_index() {
    let mut canvas = Canvas::new();
    let mut history = History::new();
    for x in [4, 8, 12] {
        canvas.restore_connection(Connection::new(
            None,
            None,
            Point::new(0, 0),
            Point::new(x, 0),
            smallvec![],
        ));
    }
    let before = crate::store::encode(&canvas);

    let middle = canvas.connections()[1].clone();
    assert!(canvas.remove_specific_connection(&middle));
    history.record(Action::DeleteConnection {
        index: 1,
        value: middle,
    });

    assert!(history.undo(&mut canvas));
    assert_eq!(crate::store::encode(&canvas), before);
}

#[test]
fn actions_snapshot_geometry_by_value() {
    // A recorded resize keeps working even though the rect it captured has
    // long been replaced in the model.
    let mut canvas = Canvas::new();
    let mut history = History::new();
    let id = canvas.add_box(0, 0, "x");
    let orig = Rect::new(0, 0, 8, 3);
    canvas.set_box_size(id, 12, 5);
    history.record(Action::ResizeBox {
        id,
        dw: 4,
        dh: 2,
        orig,
    });
    canvas.set_box_text(id, "something much longer than before");

    assert!(history.undo(&mut canvas));
    let b = canvas.get_box(id).expect("box");
    // Clamped to the new text fit, but positioned from the snapshot.
    assert_eq!((b.x(), b.y()), (0, 0));
}

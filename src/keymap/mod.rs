// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The modal key dispatcher as a pure function: `(mode, key)` in, `(new mode,
//! ordered commands)` out.
//!
//! No model access happens here. The shell owns cursor position, selection,
//! and gesture buffers; it interprets the returned [`Command`]s against them.
//! Multi-step gestures (connect, move, resize, marquee select) stay dry until
//! their commit command: cancelling mid-gesture emits [`Command::CancelGesture`]
//! and nothing else, so the model and undo history are untouched.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The editor's input mode. Edit carries no element id: the shell resolved
/// the target when it entered the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// In-place text editing of the selected box or free text.
    Edit,
    /// A connection gesture is pending (start point fixed, cursor live).
    Connect,
    /// The selected element follows cursor movement until committed.
    Move,
    /// Arrow keys grow/shrink the selected box until committed.
    Resize,
    /// A marquee rectangle is being dragged.
    Select,
}

/// One operation for the shell to invoke against the core, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCursor(i32, i32),
    Pan(i32, i32),

    AddBoxAtCursor,
    AddTextAtCursor,
    DeleteAtCursor,
    BeginEditAtCursor,
    CycleArrowAtCursor,
    CycleBorderAtCursor,
    RaiseZAtCursor,
    HighlightAtCursor(u8),
    ClearHighlightAtCursor,

    InsertChar(char),
    InsertNewline,
    DeleteCharBack,
    EditCursorLeft,
    EditCursorRight,
    CommitEdit,

    BeginConnection,
    AddWaypoint,
    CommitConnection,

    BeginMove,
    Nudge(i32, i32),
    CommitMove,

    BeginResize,
    Grow(i32, i32),
    CommitResize,

    BeginSelect,
    CommitSelect,

    CancelGesture,

    Undo,
    Redo,
    Save,
    ExportAscii,
    NextBuffer,
    PrevBuffer,
    NewBuffer,
    CloseBuffer,
    Quit,
}

/// Maps one key press. Repeats and releases produce nothing; an unbound key
/// keeps the mode and emits no commands.
pub fn dispatch(mode: Mode, key: &KeyEvent) -> (Mode, Vec<Command>) {
    if key.kind != KeyEventKind::Press {
        return (mode, Vec::new());
    }
    match mode {
        Mode::Normal => dispatch_normal(key),
        Mode::Edit => dispatch_edit(key),
        Mode::Connect => dispatch_connect(key),
        Mode::Move => dispatch_move(key),
        Mode::Resize => dispatch_resize(key),
        Mode::Select => dispatch_select(key),
    }
}

fn dispatch_normal(key: &KeyEvent) -> (Mode, Vec<Command>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        let commands = match key.code {
            KeyCode::Char('s') => vec![Command::Save],
            KeyCode::Char('e') => vec![Command::ExportAscii],
            KeyCode::Char('z') => vec![Command::Undo],
            KeyCode::Char('y') => vec![Command::Redo],
            KeyCode::Char('n') => vec![Command::NewBuffer],
            KeyCode::Char('w') => vec![Command::CloseBuffer],
            KeyCode::Char('q') => vec![Command::Quit],
            _ => Vec::new(),
        };
        return (Mode::Normal, commands);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => (Mode::Normal, vec![Command::MoveCursor(0, -1)]),
        KeyCode::Down | KeyCode::Char('j') => (Mode::Normal, vec![Command::MoveCursor(0, 1)]),
        KeyCode::Left | KeyCode::Char('h') => (Mode::Normal, vec![Command::MoveCursor(-1, 0)]),
        KeyCode::Right | KeyCode::Char('l') => (Mode::Normal, vec![Command::MoveCursor(1, 0)]),
        KeyCode::Char('K') => (Mode::Normal, vec![Command::Pan(0, -1)]),
        KeyCode::Char('J') => (Mode::Normal, vec![Command::Pan(0, 1)]),
        KeyCode::Char('H') => (Mode::Normal, vec![Command::Pan(-1, 0)]),
        KeyCode::Char('L') => (Mode::Normal, vec![Command::Pan(1, 0)]),

        KeyCode::Char('b') => (Mode::Normal, vec![Command::AddBoxAtCursor]),
        KeyCode::Char('t') => (Mode::Normal, vec![Command::AddTextAtCursor]),
        KeyCode::Char('d') | KeyCode::Delete => (Mode::Normal, vec![Command::DeleteAtCursor]),
        KeyCode::Char('e') | KeyCode::Enter => (Mode::Edit, vec![Command::BeginEditAtCursor]),
        KeyCode::Char('>') => (Mode::Normal, vec![Command::CycleArrowAtCursor]),
        KeyCode::Char('o') => (Mode::Normal, vec![Command::CycleBorderAtCursor]),
        KeyCode::Char('z') => (Mode::Normal, vec![Command::RaiseZAtCursor]),
        KeyCode::Char(ch @ '0'..='7') => {
            // '0' clears; 1-7 paint.
            let color = ch as u8 - b'0';
            if color == 0 {
                (Mode::Normal, vec![Command::ClearHighlightAtCursor])
            } else {
                (Mode::Normal, vec![Command::HighlightAtCursor(color)])
            }
        }

        KeyCode::Char('a') => (Mode::Connect, vec![Command::BeginConnection]),
        KeyCode::Char('m') => (Mode::Move, vec![Command::BeginMove]),
        KeyCode::Char('r') => (Mode::Resize, vec![Command::BeginResize]),
        KeyCode::Char('v') => (Mode::Select, vec![Command::BeginSelect]),

        KeyCode::Char('u') => (Mode::Normal, vec![Command::Undo]),
        KeyCode::Char('U') => (Mode::Normal, vec![Command::Redo]),
        KeyCode::Char(']') => (Mode::Normal, vec![Command::NextBuffer]),
        KeyCode::Char('[') => (Mode::Normal, vec![Command::PrevBuffer]),
        KeyCode::Char('q') => (Mode::Normal, vec![Command::Quit]),
        _ => (Mode::Normal, Vec::new()),
    }
}

fn dispatch_edit(key: &KeyEvent) -> (Mode, Vec<Command>) {
    match key.code {
        KeyCode::Esc => (Mode::Normal, vec![Command::CancelGesture]),
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            (Mode::Edit, vec![Command::InsertNewline])
        }
        KeyCode::Enter => (Mode::Normal, vec![Command::CommitEdit]),
        KeyCode::Backspace => (Mode::Edit, vec![Command::DeleteCharBack]),
        KeyCode::Left => (Mode::Edit, vec![Command::EditCursorLeft]),
        KeyCode::Right => (Mode::Edit, vec![Command::EditCursorRight]),
        KeyCode::Char(ch) => (Mode::Edit, vec![Command::InsertChar(ch)]),
        _ => (Mode::Edit, Vec::new()),
    }
}

fn dispatch_connect(key: &KeyEvent) -> (Mode, Vec<Command>) {
    match key.code {
        KeyCode::Esc => (Mode::Normal, vec![Command::CancelGesture]),
        KeyCode::Char('a') | KeyCode::Enter => (Mode::Normal, vec![Command::CommitConnection]),
        KeyCode::Char('w') | KeyCode::Char(' ') => (Mode::Connect, vec![Command::AddWaypoint]),
        code => cursor_step(code)
            .map(|(dx, dy)| (Mode::Connect, vec![Command::MoveCursor(dx, dy)]))
            .unwrap_or((Mode::Connect, Vec::new())),
    }
}

fn dispatch_move(key: &KeyEvent) -> (Mode, Vec<Command>) {
    match key.code {
        KeyCode::Esc => (Mode::Normal, vec![Command::CancelGesture]),
        KeyCode::Enter | KeyCode::Char('m') => (Mode::Normal, vec![Command::CommitMove]),
        code => cursor_step(code)
            .map(|(dx, dy)| (Mode::Move, vec![Command::Nudge(dx, dy)]))
            .unwrap_or((Mode::Move, Vec::new())),
    }
}

fn dispatch_resize(key: &KeyEvent) -> (Mode, Vec<Command>) {
    match key.code {
        KeyCode::Esc => (Mode::Normal, vec![Command::CancelGesture]),
        KeyCode::Enter | KeyCode::Char('r') => (Mode::Normal, vec![Command::CommitResize]),
        code => cursor_step(code)
            .map(|(dx, dy)| (Mode::Resize, vec![Command::Grow(dx, dy)]))
            .unwrap_or((Mode::Resize, Vec::new())),
    }
}

fn dispatch_select(key: &KeyEvent) -> (Mode, Vec<Command>) {
    match key.code {
        KeyCode::Esc => (Mode::Normal, vec![Command::CancelGesture]),
        KeyCode::Enter | KeyCode::Char('v') => (Mode::Normal, vec![Command::CommitSelect]),
        code => cursor_step(code)
            .map(|(dx, dy)| (Mode::Select, vec![Command::MoveCursor(dx, dy)]))
            .unwrap_or((Mode::Select, Vec::new())),
    }
}

fn cursor_step(code: KeyCode) -> Option<(i32, i32)> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some((0, -1)),
        KeyCode::Down | KeyCode::Char('j') => Some((0, 1)),
        KeyCode::Left | KeyCode::Char('h') => Some((-1, 0)),
        KeyCode::Right | KeyCode::Char('l') => Some((1, 0)),
        _ => None,
    }
}

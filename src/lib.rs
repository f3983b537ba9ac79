// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thetis — terminal flowchart editor core.
//!
//! The engine behind a modal terminal flowchart/mind-map editor: a geometric
//! diagram model (boxes, connections, free text, highlights), orthogonal
//! routing, deterministic character-grid rendering, and an action-log
//! undo/redo system of exact forward/inverse mutation pairs.

pub mod keymap;
pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod route;
pub mod store;

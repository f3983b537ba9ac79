// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram model: geometry primitives, canvas elements, the canvas itself, and
//! the buffer/workspace containers the editor shell runs against.

mod buffer;
mod canvas;
mod elements;
mod geometry;

pub use buffer::{Buffer, Workspace};
pub use canvas::{Canvas, DeletedBox};
pub use elements::{
    ArrowState, BorderGlyphs, BorderStyle, CanvasBox, Connection, FreeText, Waypoints,
    MAX_Z_LEVEL, MIN_BOX_HEIGHT, MIN_BOX_WIDTH,
};
pub use geometry::{Point, Rect};

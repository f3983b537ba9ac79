// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::geometry::{Point, Rect};

pub const MIN_BOX_WIDTH: i32 = 8;
pub const MIN_BOX_HEIGHT: i32 = 3;
pub const MAX_Z_LEVEL: u8 = 3;

/// Intermediate points a connection's path must pass through, in traversal order.
pub type Waypoints = SmallVec<[Point; 4]>;

/// Which end(s) of a connection render a directional arrowhead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrowState {
    #[default]
    None,
    To,
    From,
    Both,
}

impl ArrowState {
    /// Rotates none → to → from → both → none.
    pub fn cycled(self) -> Self {
        match self {
            Self::None => Self::To,
            Self::To => Self::From,
            Self::From => Self::Both,
            Self::Both => Self::None,
        }
    }

    pub fn at_to(self) -> bool {
        matches!(self, Self::To | Self::Both)
    }

    pub fn at_from(self) -> bool {
        matches!(self, Self::From | Self::Both)
    }

    /// Stable numeric tag used by the file format.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::To => 1,
            Self::From => 2,
            Self::Both => 3,
        }
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::To),
            2 => Some(Self::From),
            3 => Some(Self::Both),
            _ => None,
        }
    }
}

/// Border glyph set a box is stroked with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderStyle {
    #[default]
    Plain,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderStyle {
    pub fn glyphs(self) -> BorderGlyphs {
        match self {
            Self::Plain => BorderGlyphs {
                top_left: '+',
                top_right: '+',
                bottom_left: '+',
                bottom_right: '+',
                horizontal: '-',
                vertical: '|',
            },
            Self::Rounded => BorderGlyphs {
                top_left: '.',
                top_right: '.',
                bottom_left: '\'',
                bottom_right: '\'',
                horizontal: '-',
                vertical: '|',
            },
        }
    }
}

/// A bordered box on the canvas. Identity is the dense storage index held by
/// the owning [`Canvas`](super::Canvas); boxes do not carry their own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    lines: Vec<String>,
    z_level: u8,
    border: BorderStyle,
}

impl CanvasBox {
    /// Creates a box at `(x, y)` sized to fit `text` (positions clamped ≥ 0).
    pub fn new(x: i32, y: i32, text: &str) -> Self {
        let mut this = Self {
            x: x.max(0),
            y: y.max(0),
            width: MIN_BOX_WIDTH,
            height: MIN_BOX_HEIGHT,
            lines: split_lines(text),
            z_level: 0,
            border: BorderStyle::default(),
        };
        this.fit_to_text();
        this
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the text and re-fits the box around it.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.fit_to_text();
    }

    pub fn z_level(&self) -> u8 {
        self.z_level
    }

    pub fn set_z_level(&mut self, z_level: u8) {
        self.z_level = z_level.min(MAX_Z_LEVEL);
    }

    pub fn border(&self) -> BorderStyle {
        self.border
    }

    pub fn set_border(&mut self, border: BorderStyle) {
        self.border = border;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x.max(0);
        self.y = y.max(0);
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.set_position(self.x + dx, self.y + dy);
    }

    /// Sets an explicit size, clamped to the minimums and to the text fit.
    pub fn set_size(&mut self, width: i32, height: i32) {
        let (fit_w, fit_h) = self.text_fit();
        self.width = width.max(fit_w);
        self.height = height.max(fit_h);
    }

    /// Shrinks/grows the box to exactly fit its text (+1 border and padding on
    /// each side), never below the minimum size.
    pub fn fit_to_text(&mut self) {
        let (w, h) = self.text_fit();
        self.width = w;
        self.height = h;
    }

    fn text_fit(&self) -> (i32, i32) {
        let longest = self
            .lines
            .iter()
            .map(|line| line.chars().count() as i32)
            .max()
            .unwrap_or(0);
        let w = (longest + 2).max(MIN_BOX_WIDTH);
        let h = (self.lines.len() as i32 + 2).max(MIN_BOX_HEIGHT);
        (w, h)
    }
}

/// A connection between two endpoints, each either anchored to a box (tracks
/// the box edge) or free (fixed world coordinates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from_box: Option<usize>,
    pub to_box: Option<usize>,
    pub from: Point,
    pub to: Point,
    pub waypoints: Waypoints,
    pub arrow: ArrowState,
}

impl Connection {
    pub fn new(
        from_box: Option<usize>,
        to_box: Option<usize>,
        from: Point,
        to: Point,
        waypoints: Waypoints,
    ) -> Self {
        Self {
            from_box,
            to_box,
            from,
            to,
            waypoints,
            arrow: ArrowState::default(),
        }
    }

    pub fn references(&self, box_id: usize) -> bool {
        self.from_box == Some(box_id) || self.to_box == Some(box_id)
    }
}

/// Borderless text placed directly on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeText {
    x: i32,
    y: i32,
    lines: Vec<String>,
}

impl FreeText {
    pub fn new(x: i32, y: i32, text: &str) -> Self {
        Self {
            x: x.max(0),
            y: y.max(0),
            lines: split_lines(text),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x.max(0);
        self.y = y.max(0);
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.set_position(self.x + dx, self.y + dy);
    }

    /// The occupied footprint: one row per line, as wide as the longest line.
    pub fn rect(&self) -> Rect {
        let longest = self
            .lines
            .iter()
            .map(|line| line.chars().count() as i32)
            .max()
            .unwrap_or(0);
        Rect::new(self.x, self.y, longest.max(1), (self.lines.len() as i32).max(1))
    }
}

fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    text.split('\n').map(ToOwned::to_owned).collect()
}

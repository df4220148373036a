// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;
use quill_geometry::{AffineTransform, Point, Rect};

use crate::{BlendMode, Dash, LineCap, LineJoin, Path};

/// Rule deciding which regions of a path are inside.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// How [`Context::draw_path`](crate::Context::draw_path) paints the current path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathDrawingMode {
    Fill,
    EoFill,
    Stroke,
    FillStroke,
    EoFillStroke,
}

/// Stroke parameters captured when a stroke is recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Width in user space; `transform` maps it to device space.
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
    pub dash: Option<Dash>,
    /// The CTM in effect for the stroke.
    pub transform: AffineTransform,
}

/// Compositing parameters shared by every command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaintState {
    /// Fill color for fills and glyphs, stroke color for strokes.
    pub color: Color,
    pub alpha: f64,
    pub blend_mode: BlendMode,
    /// Device space clip rectangle.
    pub clip: Rect,
    pub antialias: bool,
    pub flatness: f64,
}

/// A recorded drawing operation.
///
/// Paths and rectangles are in device space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill {
        path: Path,
        rule: FillRule,
        paint: PaintState,
    },
    Stroke {
        path: Path,
        style: StrokeStyle,
        paint: PaintState,
    },
    /// Clears the bounding box of a transformed rectangle to transparent.
    Clear { rect: Rect, clip: Rect },
    Glyphs {
        glyphs: Vec<u16>,
        /// Glyph origins in user space.
        positions: Vec<Point>,
        /// Maps glyph outlines into user space around each origin.
        text_matrix: AffineTransform,
        /// The CTM in effect when the glyphs were drawn.
        transform: AffineTransform,
        font_size: f64,
        character_spacing: f64,
        paint: PaintState,
    },
}

/// The sequence of commands recorded by a [`Context`](crate::Context).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes all commands.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub(crate) fn push(&mut self, command: DrawCommand) {
        log::trace!("recording {command:?}");
        self.commands.push(command);
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

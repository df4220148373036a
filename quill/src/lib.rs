// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quill is a small 2D graphics toolkit built around [`AffineTransform`].
//!
//! It provides the pieces that consume transforms:
//!
//! - [`Path`], a vector path that applies an optional transform to every appended segment.
//! - [`Context`], a drawing context that keeps a graphics state stack and a current
//!   transformation matrix, and records what is drawn into a [`DisplayList`].
//!   Rendering that list is left to a backend.
//! - [`TextRun`], a run of already shaped glyphs along with the text matrix it was laid
//!   out with.
//!
//! All geometry is `f64`. The value types live in [`quill_geometry`] and are re-exported here.
//! Colors are [`peniko::Color`] values.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod context;
mod error;
mod path;
mod recording;
mod sink;
mod text;

pub use context::{
    BlendMode, Context, ContextOptions, Dash, GraphicsState, LineCap, LineJoin,
    TextDrawingMode,
};
pub use error::Error;
pub use path::{Path, PathElement, TransformedPath};
pub use recording::{DisplayList, DrawCommand, FillRule, PaintState, PathDrawingMode, StrokeStyle};
pub use sink::PathSink;
pub use text::{FontMetrics, RunStatus, TextRun, TypographicBounds};

pub use quill_geometry::{
    AffineTransform, GeometryError, Point, Rect, RectEdge, Size, DEGENERATE_EPSILON,
};

pub use peniko;

#[cfg(feature = "kurbo")]
pub use quill_geometry::kurbo;

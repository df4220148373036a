// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use quill_geometry::GeometryError;
use thiserror::Error;

/// Errors that can occur in Quill.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A transform had to be inverted but is singular.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A segment was appended to a path that has no current point.
    /// Start a subpath with `move_to` first.
    #[error("path has no current point")]
    NoCurrentPoint,
    /// An argument was outside of the accepted domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },
    /// A glyph range reached past the end of a run.
    #[error("range {start}..{end} is out of bounds for a run of {len} glyphs")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    /// A caller provided buffer cannot hold the requested items.
    #[error("buffer of length {len} cannot hold {needed} items")]
    BufferTooSmall { needed: usize, len: usize },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }
}

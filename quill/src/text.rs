// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Laid out glyph runs.

use std::ops::{Bound, Range, RangeBounds};

use bitflags::bitflags;
use quill_geometry::{AffineTransform, Point, Size};

use crate::Error;

bitflags! {
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct RunStatus: u32 {
        /// Glyphs are stored in right to left order.
        const RIGHT_TO_LEFT = 1 << 0;
        /// String indices do not follow the run direction.
        const NON_MONOTONIC = 1 << 1;
        /// The run has a text matrix other than the identity.
        const HAS_NON_IDENTITY_MATRIX = 1 << 2;
    }
}

/// Vertical metrics of the font a run was shaped with.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    pub ascent: f64,
    /// Distance below the baseline, as a positive number.
    pub descent: f64,
    pub leading: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TypographicBounds {
    /// Sum of the advance widths.
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub leading: f64,
}

/// A run of shaped glyphs sharing one font and text matrix.
///
/// Every per-glyph sequence has one entry per glyph. Positions are relative to the
/// text position the run is drawn at.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    glyphs: Vec<u16>,
    positions: Vec<Point>,
    advances: Vec<Size>,
    string_indices: Vec<usize>,
    text_matrix: AffineTransform,
    metrics: FontMetrics,
    right_to_left: bool,
}

impl TextRun {
    /// Creates a left to right run with an identity text matrix.
    pub fn new(
        glyphs: Vec<u16>,
        positions: Vec<Point>,
        advances: Vec<Size>,
        string_indices: Vec<usize>,
        metrics: FontMetrics,
    ) -> Result<Self, Error> {
        let len = glyphs.len();
        if positions.len() != len {
            return Err(Error::invalid("positions", "must hold one entry per glyph"));
        }
        if advances.len() != len {
            return Err(Error::invalid("advances", "must hold one entry per glyph"));
        }
        if string_indices.len() != len {
            return Err(Error::invalid("string_indices", "must hold one entry per glyph"));
        }
        Ok(Self {
            glyphs,
            positions,
            advances,
            string_indices,
            text_matrix: AffineTransform::IDENTITY,
            metrics,
            right_to_left: false,
        })
    }

    pub fn with_text_matrix(mut self, matrix: AffineTransform) -> Self {
        self.text_matrix = matrix;
        self
    }

    pub fn with_right_to_left(mut self, right_to_left: bool) -> Self {
        self.right_to_left = right_to_left;
        self
    }

    pub fn status(&self) -> RunStatus {
        let mut status = RunStatus::empty();
        status.set(RunStatus::RIGHT_TO_LEFT, self.right_to_left);
        let monotonic = self.string_indices.windows(2).all(|w| {
            if self.right_to_left {
                w[0] >= w[1]
            } else {
                w[0] <= w[1]
            }
        });
        status.set(RunStatus::NON_MONOTONIC, !monotonic);
        status.set(
            RunStatus::HAS_NON_IDENTITY_MATRIX,
            !self.text_matrix.is_identity(),
        );
        status
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn text_matrix(&self) -> AffineTransform {
        self.text_matrix
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn glyphs(&self, range: impl RangeBounds<usize>) -> Result<&[u16], Error> {
        Ok(&self.glyphs[self.resolve(range)?])
    }

    pub fn positions(&self, range: impl RangeBounds<usize>) -> Result<&[Point], Error> {
        Ok(&self.positions[self.resolve(range)?])
    }

    pub fn advances(&self, range: impl RangeBounds<usize>) -> Result<&[Size], Error> {
        Ok(&self.advances[self.resolve(range)?])
    }

    pub fn string_indices(&self, range: impl RangeBounds<usize>) -> Result<&[usize], Error> {
        Ok(&self.string_indices[self.resolve(range)?])
    }

    /// Copies the glyphs in `range` into `out`, returning how many were copied.
    pub fn glyphs_into(
        &self,
        range: impl RangeBounds<usize>,
        out: &mut [u16],
    ) -> Result<usize, Error> {
        copy_into(self.glyphs(range)?, out)
    }

    pub fn positions_into(
        &self,
        range: impl RangeBounds<usize>,
        out: &mut [Point],
    ) -> Result<usize, Error> {
        copy_into(self.positions(range)?, out)
    }

    pub fn advances_into(
        &self,
        range: impl RangeBounds<usize>,
        out: &mut [Size],
    ) -> Result<usize, Error> {
        copy_into(self.advances(range)?, out)
    }

    pub fn string_indices_into(
        &self,
        range: impl RangeBounds<usize>,
        out: &mut [usize],
    ) -> Result<usize, Error> {
        copy_into(self.string_indices(range)?, out)
    }

    /// The range of the source string the run was shaped from.
    ///
    /// Empty for a run without glyphs.
    pub fn string_range(&self) -> Range<usize> {
        let min = self.string_indices.iter().min();
        let max = self.string_indices.iter().max();
        match (min, max) {
            (Some(&min), Some(&max)) => min..max.saturating_add(1),
            _ => 0..0,
        }
    }

    pub fn typographic_bounds(
        &self,
        range: impl RangeBounds<usize>,
    ) -> Result<TypographicBounds, Error> {
        let width = self.advances(range)?.iter().map(|a| a.width).sum();
        Ok(TypographicBounds {
            width,
            ascent: self.metrics.ascent,
            descent: self.metrics.descent,
            leading: self.metrics.leading,
        })
    }

    pub(crate) fn resolve(&self, range: impl RangeBounds<usize>) -> Result<Range<usize>, Error> {
        let len = self.glyphs.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(Error::RangeOutOfBounds { start, end, len });
        }
        Ok(start..end)
    }
}

fn copy_into<T: Copy>(src: &[T], out: &mut [T]) -> Result<usize, Error> {
    let Some(dst) = out.get_mut(..src.len()) else {
        return Err(Error::BufferTooSmall {
            needed: src.len(),
            len: out.len(),
        });
    };
    dst.copy_from_slice(src);
    Ok(src.len())
}

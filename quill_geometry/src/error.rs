// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors produced by geometry operations.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum GeometryError {
    /// The transform has a zero (or non-finite) determinant and cannot be inverted.
    #[error("transform is not invertible (determinant {determinant})")]
    DegenerateTransform {
        /// Determinant `a * d - b * c` of the offending transform.
        determinant: f64,
    },
}

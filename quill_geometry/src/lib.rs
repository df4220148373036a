// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine transforms and plain 2D geometry values.
//!
//! Every type in this crate is a `#[repr(C)]` value whose field order matches the
//! platform geometry structs, so values can be passed across a foreign function
//! boundary by value (or cast to coefficient arrays with [`bytemuck`]).

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

mod affine;
mod error;
mod geometry;

pub use affine::{AffineTransform, DEGENERATE_EPSILON};
pub use error::GeometryError;
pub use geometry::{Point, Rect, RectEdge, Size};

#[cfg(feature = "kurbo")]
pub use peniko::kurbo;

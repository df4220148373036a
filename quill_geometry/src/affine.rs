// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Mul, MulAssign};

use bytemuck::{Pod, Zeroable};

use crate::{GeometryError, Point, Rect, Size};

/// Determinants with a magnitude at or below this value are treated as zero by
/// [`AffineTransform::invert`].
///
/// The threshold is absolute, so uniformly scaling by less than about `1.5e-8` also
/// counts as degenerate. Use [`AffineTransform::invert_with_epsilon`] to pick another one.
pub const DEGENERATE_EPSILON: f64 = f64::EPSILON;

/// Affine transformation matrix.
///
/// The six coefficients describe the matrix
///
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | tx ty 1 |
/// ```
///
/// applied to a row vector `[x y 1]`, so a point maps to
/// `(a * x + c * y + tx, b * x + d * y + ty)`.
///
/// Field order matches the platform affine transform struct bit for bit.
/// Equality is exact: transforms that differ by a single ULP in any coefficient
/// are not equal.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

static_assertions::assert_eq_size!(AffineTransform, [f64; 6]);
static_assertions::assert_eq_align!(AffineTransform, f64);

impl AffineTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Creates a transform from coefficients in `[a, b, c, d, tx, ty]` order.
    pub const fn from_coeffs(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }

    /// Returns the coefficients in `[a, b, c, d, tx, ty]` order.
    pub const fn as_coeffs(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Rotation by `angle` radians.
    ///
    /// With y pointing up the rotation is counter-clockwise.
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Scale by `sx` horizontally and `sy` vertically.
    ///
    /// Zero and negative factors are allowed; they collapse or mirror the plane.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Returns the transform that applies `first` and then `second`.
    #[inline]
    pub fn compose(first: Self, second: Self) -> Self {
        let (a, b) = (first, second);
        Self {
            a: a.a * b.a + a.b * b.c,
            b: a.a * b.b + a.b * b.d,
            c: a.c * b.a + a.d * b.c,
            d: a.c * b.b + a.d * b.d,
            tx: a.tx * b.a + a.ty * b.c + b.tx,
            ty: a.tx * b.b + a.ty * b.d + b.ty,
        }
    }

    /// Returns the transform that applies `self` and then `other`.
    #[inline]
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self::compose(self, other)
    }

    /// Replaces `self` with `self` followed by `other`.
    #[inline]
    pub fn compose_in_place(&mut self, other: Self) {
        *self = Self::compose(*self, other);
    }

    /// Appends a scale to the transform.
    pub fn scale_by(&mut self, sx: f64, sy: f64) {
        self.compose_in_place(Self::scale(sx, sy));
    }

    /// Appends a translation to the transform.
    pub fn translate_by(&mut self, tx: f64, ty: f64) {
        self.compose_in_place(Self::translation(tx, ty));
    }

    /// Appends a rotation to the transform.
    pub fn rotate_by(&mut self, angle: f64) {
        self.compose_in_place(Self::rotation(angle));
    }

    #[inline]
    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }

    /// Applies the linear part of the transform; translation does not affect sizes.
    #[inline]
    pub fn transform_size(&self, size: Size) -> Size {
        Size::new(
            self.a * size.width + self.c * size.height,
            self.b * size.width + self.d * size.height,
        )
    }

    /// Returns the axis-aligned bounding box of the transformed rectangle.
    ///
    /// The null and infinite rectangles are returned unchanged.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        if rect.is_null() || rect.is_infinite() {
            return rect;
        }
        let [p0, p1, p2, p3] = rect.corners().map(|p| self.transform_point(p));
        let x0 = p0.x.min(p1.x).min(p2.x).min(p3.x);
        let y0 = p0.y.min(p1.y).min(p2.y).min(p3.y);
        let x1 = p0.x.max(p1.x).max(p2.x).max(p3.x);
        let y1 = p0.y.max(p1.y).max(p2.y).max(p3.y);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// True only for exactly `(1, 0, 0, 1, 0, 0)`.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_invertible(&self) -> bool {
        is_regular(self.determinant(), DEGENERATE_EPSILON)
    }

    /// Returns the inverse transform.
    ///
    /// Fails with [`GeometryError::DegenerateTransform`] when the magnitude of the
    /// determinant is at most [`DEGENERATE_EPSILON`] or is not finite.
    pub fn invert(&self) -> Result<Self, GeometryError> {
        self.invert_with_epsilon(DEGENERATE_EPSILON)
    }

    /// Like [`invert`](Self::invert), with a caller-chosen determinant threshold.
    pub fn invert_with_epsilon(&self, epsilon: f64) -> Result<Self, GeometryError> {
        let determinant = self.determinant();
        if !is_regular(determinant, epsilon) {
            return Err(GeometryError::DegenerateTransform { determinant });
        }
        let inv_det = determinant.recip();
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        Ok(Self {
            a,
            b,
            c,
            d,
            tx: -(self.tx * a + self.ty * c),
            ty: -(self.tx * b + self.ty * d),
        })
    }

    /// Returns the inverse transform, or `self` unchanged when it is degenerate.
    pub fn invert_or_self(&self) -> Self {
        match self.invert() {
            Ok(inverse) => inverse,
            Err(err) => {
                log::debug!("{err}; keeping {self}");
                *self
            }
        }
    }

    /// Creates a transform from a kurbo affine matrix.
    ///
    /// The coefficient layout is identical, but kurbo's `*` applies its right operand
    /// first: `AffineTransform::compose(a, b)` corresponds to `kb * ka`.
    #[cfg(feature = "kurbo")]
    pub fn from_kurbo(transform: &peniko::kurbo::Affine) -> Self {
        Self::from_coeffs(transform.as_coeffs())
    }

    /// Converts the transform to a kurbo affine matrix.
    #[cfg(feature = "kurbo")]
    pub fn to_kurbo(&self) -> peniko::kurbo::Affine {
        peniko::kurbo::Affine::new(self.as_coeffs())
    }
}

fn is_regular(determinant: f64, epsilon: f64) -> bool {
    determinant.is_finite() && determinant.abs() > epsilon
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Hash for AffineTransform {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in self.as_coeffs() {
            // 0.0 == -0.0, so both must hash alike.
            let bits = if v == 0.0 { 0 } else { v.to_bits() };
            state.write_u64(bits);
        }
    }
}

/// `a * b` applies `a` first, then `b`.
impl Mul for AffineTransform {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Self::compose(self, other)
    }
}

impl MulAssign for AffineTransform {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        self.compose_in_place(other);
    }
}

impl Mul<Point> for AffineTransform {
    type Output = Point;

    #[inline]
    fn mul(self, point: Point) -> Point {
        self.transform_point(point)
    }
}

/// Prints each coefficient with one or two decimals, e.g. `xx:1.0 yx:0.71`.
impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "xx:{} yx:{} xy:{} yy:{} x0:{} y0:{}",
            Coeff(self.a),
            Coeff(self.b),
            Coeff(self.c),
            Coeff(self.d),
            Coeff(self.tx),
            Coeff(self.ty)
        )
    }
}

/// A coefficient rounded to two decimals, keeping at least one.
struct Coeff(f64);

impl fmt::Display for Coeff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.0.is_finite() {
            return write!(f, "{}", self.0);
        }
        let s = format!("{:.2}", self.0);
        f.write_str(s.strip_suffix('0').unwrap_or(&s))
    }
}

// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::{Add, Sub};

use bytemuck::{Pod, Zeroable};

/// A point in a 2D coordinate space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A width and height, or a displacement between two points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A rectangle given by its origin and size.
///
/// The size may be negative. Most queries operate on the [standardized](Rect::standardize)
/// rectangle, so `Rect::new(10., 10., -5., -5.)` and `Rect::new(5., 5., 5., 5.)`
/// describe the same area, although they don't compare equal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// Edge of a rectangle, used by [`Rect::divide`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RectEdge {
    MinX,
    MinY,
    MaxX,
    MaxY,
}

static_assertions::assert_eq_size!(Point, [f64; 2]);
static_assertions::assert_eq_size!(Size, [f64; 2]);
static_assertions::assert_eq_size!(Rect, [f64; 4]);

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Add<Size> for Point {
    type Output = Self;

    #[inline]
    fn add(self, offset: Size) -> Self {
        Self::new(self.x + offset.width, self.y + offset.height)
    }
}

impl Sub for Point {
    type Output = Size;

    #[inline]
    fn sub(self, other: Self) -> Size {
        Size::new(self.x - other.x, self.y - other.y)
    }
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Add for Size {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.width + other.width, self.height + other.height)
    }
}

impl Sub for Size {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.width - other.width, self.height - other.height)
    }
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// The null rectangle: the absence of a rectangle.
    ///
    /// Its origin lies at positive infinity. It is the identity of [`Rect::union`] and the
    /// result of intersecting disjoint rectangles.
    pub const NULL: Self = Self::new(f64::INFINITY, f64::INFINITY, 0.0, 0.0);

    /// A rectangle with no bounds, covering the whole plane.
    pub const INFINITE: Self = Self::new(-f64::MAX / 2.0, -f64::MAX / 2.0, f64::MAX, f64::MAX);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// The smallest rectangle spanning both points.
    pub fn from_points(p0: Point, p1: Point) -> Self {
        let x0 = p0.x.min(p1.x);
        let y0 = p0.y.min(p1.y);
        Self::new(x0, y0, p0.x.max(p1.x) - x0, p0.y.max(p1.y) - y0)
    }

    /// Returns an equivalent rectangle with a non-negative width and height.
    pub fn standardize(self) -> Self {
        if self.is_null() {
            return self;
        }
        let mut r = self;
        if r.size.width < 0.0 {
            r.origin.x += r.size.width;
            r.size.width = -r.size.width;
        }
        if r.size.height < 0.0 {
            r.origin.y += r.size.height;
            r.size.height = -r.size.height;
        }
        r
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x + self.size.width.min(0.0)
    }

    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.size.width * 0.5
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width.max(0.0)
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y + self.size.height.min(0.0)
    }

    pub fn mid_y(&self) -> f64 {
        self.origin.y + self.size.height * 0.5
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height.max(0.0)
    }

    pub fn width(&self) -> f64 {
        self.size.width.abs()
    }

    pub fn height(&self) -> f64 {
        self.size.height.abs()
    }

    pub fn is_null(&self) -> bool {
        self.origin.x == f64::INFINITY || self.origin.y == f64::INFINITY
    }

    pub fn is_infinite(&self) -> bool {
        *self == Self::INFINITE
    }

    /// True for the null rectangle and for rectangles with zero width or height.
    pub fn is_empty(&self) -> bool {
        self.is_null() || self.size.width == 0.0 || self.size.height == 0.0
    }

    /// The four corners of the standardized rectangle, counter-clockwise from the minimum.
    pub fn corners(&self) -> [Point; 4] {
        let (x0, y0, x1, y1) = (self.min_x(), self.min_y(), self.max_x(), self.max_y());
        [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        if self.is_null() {
            return self;
        }
        let mut r = self;
        r.origin.x += dx;
        r.origin.y += dy;
        r
    }

    /// Shrinks the rectangle by `dx` on the left and right and `dy` on the top and bottom.
    ///
    /// Negative values grow it. Returns [`Rect::NULL`] if the result would have a
    /// negative extent.
    pub fn inset(self, dx: f64, dy: f64) -> Self {
        if self.is_null() {
            return self;
        }
        let r = self.standardize();
        let width = r.size.width - 2.0 * dx;
        let height = r.size.height - 2.0 * dy;
        if width < 0.0 || height < 0.0 {
            return Self::NULL;
        }
        Self::new(r.origin.x + dx, r.origin.y + dy, width, height)
    }

    /// The smallest rectangle with integer coordinates containing this one.
    pub fn integral(self) -> Self {
        if self.is_null() {
            return self;
        }
        let x0 = self.min_x().floor();
        let y0 = self.min_y().floor();
        Self::new(
            x0,
            y0,
            self.max_x().ceil() - x0,
            self.max_y().ceil() - y0,
        )
    }

    /// The smallest rectangle containing both rectangles.
    pub fn union(self, other: Self) -> Self {
        if self.is_null() {
            return other.standardize();
        }
        if other.is_null() {
            return self.standardize();
        }
        let x0 = self.min_x().min(other.min_x());
        let y0 = self.min_y().min(other.min_y());
        let x1 = self.max_x().max(other.max_x());
        let y1 = self.max_y().max(other.max_y());
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// The overlapping area, or [`Rect::NULL`] when the rectangles are disjoint.
    ///
    /// Rectangles that only share an edge intersect in a zero-area rectangle.
    pub fn intersection(self, other: Self) -> Self {
        if self.is_null() || other.is_null() {
            return Self::NULL;
        }
        let x0 = self.min_x().max(other.min_x());
        let y0 = self.min_y().max(other.min_y());
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 < x0 || y1 < y0 {
            return Self::NULL;
        }
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersection(*other).is_null()
    }

    /// Whether `point` lies inside the rectangle. The maximum edges are exclusive.
    pub fn contains_point(&self, point: Point) -> bool {
        !self.is_null()
            && point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        if other.is_null() {
            return true;
        }
        !self.is_null()
            && other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    /// Splits the rectangle in two along a line parallel to `edge`, `amount` away from it.
    ///
    /// Returns `(slice, remainder)` where `slice` is the part touching `edge`. `amount`
    /// is clamped to the extent of the rectangle.
    ///
    /// A NaN extent is carried into the remainder instead of being clamped against.
    pub fn divide(self, amount: f64, edge: RectEdge) -> (Self, Self) {
        if self.is_null() {
            return (Self::NULL, Self::NULL);
        }
        let r = self.standardize();
        let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.width, r.size.height);
        match edge {
            RectEdge::MinX => {
                let amount = clamp_amount(amount, w);
                (
                    Self::new(x, y, amount, h),
                    Self::new(x + amount, y, w - amount, h),
                )
            }
            RectEdge::MaxX => {
                let amount = clamp_amount(amount, w);
                (
                    Self::new(x + w - amount, y, amount, h),
                    Self::new(x, y, w - amount, h),
                )
            }
            RectEdge::MinY => {
                let amount = clamp_amount(amount, h);
                (
                    Self::new(x, y, w, amount),
                    Self::new(x, y + amount, w, h - amount),
                )
            }
            RectEdge::MaxY => {
                let amount = clamp_amount(amount, h);
                (
                    Self::new(x, y + h - amount, w, amount),
                    Self::new(x, y, w, h - amount),
                )
            }
        }
    }
}

/// Clamps `amount` to `0..=extent` without panicking on NaN.
fn clamp_amount(amount: f64, extent: f64) -> f64 {
    amount.max(0.0).min(extent)
}

#[cfg(feature = "kurbo")]
mod kurbo_interop {
    use peniko::kurbo;

    use super::{Point, Rect, Size};

    impl From<kurbo::Point> for Point {
        fn from(p: kurbo::Point) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<Point> for kurbo::Point {
        fn from(p: Point) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<kurbo::Size> for Size {
        fn from(s: kurbo::Size) -> Self {
            Self::new(s.width, s.height)
        }
    }

    impl From<Size> for kurbo::Size {
        fn from(s: Size) -> Self {
            Self::new(s.width, s.height)
        }
    }

    impl From<kurbo::Rect> for Rect {
        fn from(r: kurbo::Rect) -> Self {
            let r = r.abs();
            Self::new(r.x0, r.y0, r.width(), r.height())
        }
    }

    impl From<Rect> for kurbo::Rect {
        fn from(r: Rect) -> Self {
            Self::new(r.min_x(), r.min_y(), r.max_x(), r.max_y())
        }
    }
}

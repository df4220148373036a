// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use quill_geometry::{AffineTransform, Point, Rect};

use crate::PathSink;

/// A single path command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathElement {
    /// Starts a new subpath at the point.
    MoveTo(Point),
    /// A line from the current point.
    LineTo(Point),
    /// A quadratic Bézier with one control point.
    QuadTo(Point, Point),
    /// A cubic Bézier with two control points.
    CurveTo(Point, Point, Point),
    /// Closes the current subpath with a line back to its start.
    ClosePath,
}

impl PathElement {
    /// The point this element ends at, if it has one.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CurveTo(_, _, p) => {
                Some(p)
            }
            Self::ClosePath => None,
        }
    }

    /// Applies `f` to every point of the element, control points included.
    #[must_use]
    pub fn map_points(self, mut f: impl FnMut(Point) -> Point) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::QuadTo(p1, p2) => Self::QuadTo(f(p1), f(p2)),
            Self::CurveTo(p1, p2, p3) => Self::CurveTo(f(p1), f(p2), f(p3)),
            Self::ClosePath => Self::ClosePath,
        }
    }

    pub fn transformed(self, transform: &AffineTransform) -> Self {
        self.map_points(|p| transform.transform_point(p))
    }

    fn for_each_point(&self, mut f: impl FnMut(Point)) {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => f(p),
            Self::QuadTo(p1, p2) => {
                f(p1);
                f(p2);
            }
            Self::CurveTo(p1, p2, p3) => {
                f(p1);
                f(p2);
                f(p3);
            }
            Self::ClosePath => {}
        }
    }
}

/// A vector path made of lines and Bézier curves.
///
/// Elements are appended through the [`PathSink`] methods. A `Path` stores points as
/// given; use [`Path::with_transform`] to map points through a transform as they are
/// appended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
    subpath_start: Option<Point>,
    current: Option<Point>,
}

/// A [`Path`] borrowed for appending through a transform.
///
/// Created by [`Path::with_transform`].
#[derive(Debug)]
pub struct TransformedPath<'a> {
    path: &'a mut Path,
    transform: AffineTransform,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a closed rectangular path, optionally transformed.
    pub fn from_rect(rect: Rect, transform: Option<&AffineTransform>) -> Self {
        let mut path = Self::new();
        path.with_transform(transform.copied().unwrap_or_default())
            .add_rect(rect);
        path
    }

    /// Creates a closed elliptical path inscribed in `rect`, optionally transformed.
    pub fn from_ellipse_in_rect(rect: Rect, transform: Option<&AffineTransform>) -> Self {
        let mut path = Self::new();
        path.with_transform(transform.copied().unwrap_or_default())
            .add_ellipse_in_rect(rect);
        path
    }

    /// Returns a handle that maps every appended point through `transform`.
    pub fn with_transform(&mut self, transform: AffineTransform) -> TransformedPath<'_> {
        TransformedPath {
            path: self,
            transform,
        }
    }

    /// Returns a copy of the path with every point mapped through `transform`.
    pub fn transformed(&self, transform: &AffineTransform) -> Self {
        Self {
            elements: self
                .elements
                .iter()
                .map(|el| el.transformed(transform))
                .collect(),
            subpath_start: self.subpath_start.map(|p| transform.transform_point(p)),
            current: self.current.map(|p| transform.transform_point(p)),
        }
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.subpath_start = None;
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    /// Calls `f` with every element in order.
    pub fn apply(&self, mut f: impl FnMut(&PathElement)) {
        for el in &self.elements {
            f(el);
        }
    }

    /// The point the next segment would start from.
    ///
    /// After a [`PathElement::ClosePath`] this is the start of the closed subpath.
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    /// The bounding box of every point in the path, control points included.
    ///
    /// Returns [`Rect::NULL`] for an empty path.
    pub fn bounding_box(&self) -> Rect {
        let mut bbox = Bounds::default();
        for el in &self.elements {
            el.for_each_point(|p| bbox.add(p));
        }
        bbox.rect()
    }

    /// The tight bounding box of the path.
    ///
    /// Unlike [`bounding_box`](Self::bounding_box), control points only contribute
    /// through the curve extrema they produce.
    pub fn path_bounding_box(&self) -> Rect {
        let mut bbox = Bounds::default();
        let mut start = Point::ZERO;
        let mut last = Point::ZERO;
        for el in &self.elements {
            match *el {
                PathElement::MoveTo(p) => {
                    bbox.add(p);
                    start = p;
                    last = p;
                }
                PathElement::LineTo(p) => {
                    bbox.add(p);
                    last = p;
                }
                PathElement::QuadTo(p1, p2) => {
                    bbox.add(p2);
                    for t in quad_extrema(last, p1, p2) {
                        bbox.add(eval_quad(last, p1, p2, t));
                    }
                    last = p2;
                }
                PathElement::CurveTo(p1, p2, p3) => {
                    bbox.add(p3);
                    for t in cubic_extrema(last, p1, p2, p3) {
                        bbox.add(eval_cubic(last, p1, p2, p3, t));
                    }
                    last = p3;
                }
                PathElement::ClosePath => last = start,
            }
        }
        bbox.rect()
    }

    /// Returns the rectangle this path describes, if it is a single closed
    /// axis-aligned rectangle.
    pub fn as_rect(&self) -> Option<Rect> {
        let (corners, closed) = match self.elements.as_slice() {
            [
                PathElement::MoveTo(p0),
                PathElement::LineTo(p1),
                PathElement::LineTo(p2),
                PathElement::LineTo(p3),
                rest @ ..,
            ] => {
                let closed = match rest {
                    [PathElement::ClosePath] => true,
                    [PathElement::LineTo(p4)] => p4 == p0,
                    [PathElement::LineTo(p4), PathElement::ClosePath] => p4 == p0,
                    _ => false,
                };
                ([*p0, *p1, *p2, *p3], closed)
            }
            _ => return None,
        };
        let [p0, p1, p2, p3] = corners;
        let horizontal_first = p0.y == p1.y && p1.x == p2.x && p2.y == p3.y && p3.x == p0.x;
        let vertical_first = p0.x == p1.x && p1.y == p2.y && p2.x == p3.x && p3.y == p0.y;
        (closed && (horizontal_first || vertical_first)).then(|| Rect::from_points(p0, p2))
    }

    /// Converts the path to a kurbo path.
    #[cfg(feature = "kurbo")]
    pub fn to_bez_path(&self) -> crate::kurbo::BezPath {
        use crate::kurbo::{BezPath, PathEl};

        let mut bez = BezPath::new();
        for el in &self.elements {
            bez.push(match *el {
                PathElement::MoveTo(p) => PathEl::MoveTo(p.into()),
                PathElement::LineTo(p) => PathEl::LineTo(p.into()),
                PathElement::QuadTo(p1, p2) => PathEl::QuadTo(p1.into(), p2.into()),
                PathElement::CurveTo(p1, p2, p3) => {
                    PathEl::CurveTo(p1.into(), p2.into(), p3.into())
                }
                PathElement::ClosePath => PathEl::ClosePath,
            });
        }
        bez
    }

    /// Appends kurbo path elements.
    ///
    /// Like kurbo, a segment without a current point starts a new subpath at its end point.
    #[cfg(feature = "kurbo")]
    pub fn extend_from_kurbo(&mut self, path: impl IntoIterator<Item = crate::kurbo::PathEl>) {
        use crate::kurbo::PathEl;

        for el in path {
            let el = match el {
                PathEl::MoveTo(p) => PathElement::MoveTo(p.into()),
                PathEl::LineTo(p) => PathElement::LineTo(p.into()),
                PathEl::QuadTo(p1, p2) => PathElement::QuadTo(p1.into(), p2.into()),
                PathEl::CurveTo(p1, p2, p3) => {
                    PathElement::CurveTo(p1.into(), p2.into(), p3.into())
                }
                PathEl::ClosePath => PathElement::ClosePath,
            };
            match el.end_point() {
                Some(end) if self.current.is_none() && !matches!(el, PathElement::MoveTo(_)) => {
                    self.push(PathElement::MoveTo(end));
                }
                _ => self.push(el),
            }
        }
    }

    /// Appends an element whose points are already in path space.
    pub(crate) fn push(&mut self, el: PathElement) {
        match el {
            PathElement::MoveTo(p) => {
                // Consecutive moves collapse into the last one.
                if let Some(PathElement::MoveTo(_)) = self.elements.last() {
                    self.elements.pop();
                }
                self.subpath_start = Some(p);
                self.current = Some(p);
            }
            PathElement::ClosePath => {
                if self.current.is_none() || self.elements.last() == Some(&PathElement::ClosePath)
                {
                    return;
                }
                self.current = self.subpath_start;
            }
            _ => self.current = el.end_point(),
        }
        self.elements.push(el);
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl PathSink for Path {
    fn sink_transform(&self) -> AffineTransform {
        AffineTransform::IDENTITY
    }

    fn push_element(&mut self, element: PathElement) {
        self.push(element);
    }

    fn sink_current_point(&self) -> Option<Point> {
        self.current
    }
}

impl PathSink for TransformedPath<'_> {
    fn sink_transform(&self) -> AffineTransform {
        self.transform
    }

    fn push_element(&mut self, element: PathElement) {
        self.path.push(element);
    }

    fn sink_current_point(&self) -> Option<Point> {
        self.path.current
    }
}

#[derive(Default)]
struct Bounds {
    min_max: Option<(Point, Point)>,
}

impl Bounds {
    fn add(&mut self, p: Point) {
        self.min_max = Some(match self.min_max {
            None => (p, p),
            Some((lo, hi)) => (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            ),
        });
    }

    fn rect(&self) -> Rect {
        match self.min_max {
            Some((lo, hi)) => Rect::from_points(lo, hi),
            None => Rect::NULL,
        }
    }
}

fn eval_quad(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let (w0, w1, w2) = (mt * mt, 2.0 * mt * t, t * t);
    Point::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y,
    )
}

fn eval_cubic(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let (w0, w1, w2, w3) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
    Point::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
    )
}

/// Parameters in `(0, 1)` where the quadratic's derivative vanishes in x or y.
fn quad_extrema(p0: Point, p1: Point, p2: Point) -> impl Iterator<Item = f64> {
    let axis = |a: f64, b: f64, c: f64| {
        let denom = a - 2.0 * b + c;
        (denom != 0.0).then(|| (a - b) / denom)
    };
    [axis(p0.x, p1.x, p2.x), axis(p0.y, p1.y, p2.y)]
        .into_iter()
        .flatten()
        .filter(|t| *t > 0.0 && *t < 1.0)
}

/// Parameters in `(0, 1)` where the cubic's derivative vanishes in x or y.
fn cubic_extrema(p0: Point, p1: Point, p2: Point, p3: Point) -> impl Iterator<Item = f64> {
    let axis = |v0: f64, v1: f64, v2: f64, v3: f64| {
        // Derivative divided by 3: a t^2 + b t + c.
        let a = -v0 + 3.0 * v1 - 3.0 * v2 + v3;
        let b = 2.0 * (v0 - 2.0 * v1 + v2);
        let c = v1 - v0;
        solve_quadratic(a, b, c)
    };
    let [x0, x1] = axis(p0.x, p1.x, p2.x, p3.x);
    let [y0, y1] = axis(p0.y, p1.y, p2.y, p3.y);
    [x0, x1, y0, y1]
        .into_iter()
        .flatten()
        .filter(|t| *t > 0.0 && *t < 1.0)
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    if a.abs() < 1e-12 {
        if b == 0.0 {
            return [None, None];
        }
        return [Some(-c / b), None];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let sq = disc.sqrt();
    [Some((-b + sq) / (2.0 * a)), Some((-b - sq) / (2.0 * a))]
}

#[cfg(test)]
mod tests {
    use quill_geometry::{AffineTransform, Point, Rect};

    use super::{Path, PathElement};
    use crate::{Error, PathSink};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn segments_need_a_current_point() {
        let mut path = Path::new();
        assert_eq!(path.line_to(p(1.0, 1.0)), Err(Error::NoCurrentPoint));
        assert_eq!(
            path.curve_to(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)),
            Err(Error::NoCurrentPoint)
        );
        assert!(path.is_empty());

        path.move_to(p(0.0, 0.0));
        path.line_to(p(1.0, 0.0)).unwrap();
        assert_eq!(path.current_point(), Some(p(1.0, 0.0)));
    }

    #[test]
    fn consecutive_moves_collapse() {
        let mut path = Path::new();
        path.move_to(p(0.0, 0.0));
        path.move_to(p(5.0, 5.0));
        assert_eq!(path.elements(), &[PathElement::MoveTo(p(5.0, 5.0))]);
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let mut path = Path::new();
        path.close_subpath();
        assert!(path.is_empty());

        path.move_to(p(1.0, 1.0));
        path.line_to(p(4.0, 1.0)).unwrap();
        path.close_subpath();
        path.close_subpath();
        assert_eq!(path.len(), 3);
        assert_eq!(path.current_point(), Some(p(1.0, 1.0)));
        // A segment after a close continues from the subpath start.
        path.line_to(p(1.0, 5.0)).unwrap();
        assert_eq!(path.current_point(), Some(p(1.0, 5.0)));
    }

    #[test]
    fn append_through_transform() {
        let mut path = Path::new();
        let mut scaled = path.with_transform(AffineTransform::scale(2.0, 3.0));
        scaled.move_to(p(1.0, 1.0));
        scaled.line_to(p(2.0, 2.0)).unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathElement::MoveTo(p(2.0, 3.0)),
                PathElement::LineTo(p(4.0, 6.0))
            ]
        );
    }

    #[test]
    fn bounding_boxes() {
        let mut path = Path::new();
        assert!(path.bounding_box().is_null());
        assert!(path.path_bounding_box().is_null());

        path.move_to(p(0.0, 0.0));
        path.quad_to(p(5.0, 10.0), p(10.0, 0.0)).unwrap();
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 10.0, 10.0));
        // The quadratic peaks halfway at y = 5.
        assert_eq!(path.path_bounding_box(), Rect::new(0.0, 0.0, 10.0, 5.0));

        let mut path = Path::new();
        path.move_to(p(0.0, 0.0));
        path.curve_to(p(0.0, 8.0), p(10.0, 8.0), p(10.0, 0.0))
            .unwrap();
        let tight = path.path_bounding_box();
        assert_eq!(path.bounding_box().size.height, 8.0);
        assert!((tight.size.height - 6.0).abs() < 1e-12);
        assert_eq!(tight.size.width, 10.0);
    }

    #[test]
    fn rect_detection() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Path::from_rect(r, None).as_rect(), Some(r));

        let rotated = Path::from_rect(r, Some(&AffineTransform::rotation(0.3)));
        assert_eq!(rotated.as_rect(), None);

        let mut open = Path::new();
        open.add_lines(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]);
        assert_eq!(open.as_rect(), None);
        open.line_to(p(0.0, 0.0)).unwrap();
        assert_eq!(open.as_rect(), Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn transformed_copy_matches_transformed_appends() {
        let t = AffineTransform::translation(3.0, -1.0) * AffineTransform::rotation(0.5);
        let r = Rect::new(0.0, 0.0, 2.0, 1.0);
        let copied = Path::from_rect(r, None).transformed(&t);
        let direct = Path::from_rect(r, Some(&t));
        assert_eq!(copied, direct);
    }

    #[test]
    fn apply_visits_in_order() {
        let path = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0), None);
        let mut kinds = Vec::new();
        path.apply(|el| kinds.push(matches!(el, PathElement::ClosePath)));
        assert_eq!(kinds, [false, false, false, false, true]);
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_round_trip() {
        let path = Path::from_ellipse_in_rect(Rect::new(0.0, 0.0, 4.0, 2.0), None);
        let bez = path.to_bez_path();
        let mut back = Path::new();
        back.extend_from_kurbo(bez.elements().iter().copied());
        assert_eq!(back, path);

        // A leading line becomes a move, as in kurbo.
        let mut leading = Path::new();
        leading.extend_from_kurbo([crate::kurbo::PathEl::LineTo((1.0, 2.0).into())]);
        assert_eq!(leading.elements(), &[PathElement::MoveTo(p(1.0, 2.0))]);
    }
}

// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use quill_geometry::{AffineTransform, Point, Rect, Size};
use smallvec::SmallVec;

use crate::{Error, Path, PathElement};

/// Magic number for approximating a quarter circle with a cubic Bézier: `4/3 * (√2 - 1)`.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Something that path segments can be appended to.
///
/// Points passed to the provided methods are in the sink's user space; they are
/// mapped through [`sink_transform`](Self::sink_transform) before being stored. This is
/// how a [`Path`] appends through an optional transform and how a drawing context
/// stores its current path in device space.
pub trait PathSink {
    /// Transform from user space to the space elements are stored in.
    fn sink_transform(&self) -> AffineTransform;

    /// Stores an element whose points are already transformed.
    fn push_element(&mut self, element: PathElement);

    /// The current point in storage space, if any.
    fn sink_current_point(&self) -> Option<Point>;

    /// Starts a new subpath at `point`.
    fn move_to(&mut self, point: Point) {
        let t = self.sink_transform();
        self.push_element(PathElement::MoveTo(t.transform_point(point)));
    }

    fn line_to(&mut self, point: Point) -> Result<(), Error> {
        require_current_point(self)?;
        let t = self.sink_transform();
        self.push_element(PathElement::LineTo(t.transform_point(point)));
        Ok(())
    }

    fn quad_to(&mut self, control: Point, point: Point) -> Result<(), Error> {
        require_current_point(self)?;
        let t = self.sink_transform();
        self.push_element(PathElement::QuadTo(
            t.transform_point(control),
            t.transform_point(point),
        ));
        Ok(())
    }

    fn curve_to(&mut self, control1: Point, control2: Point, point: Point) -> Result<(), Error> {
        require_current_point(self)?;
        let t = self.sink_transform();
        self.push_element(PathElement::CurveTo(
            t.transform_point(control1),
            t.transform_point(control2),
            t.transform_point(point),
        ));
        Ok(())
    }

    /// Closes the current subpath. Does nothing when there is no open subpath.
    fn close_subpath(&mut self) {
        self.push_element(PathElement::ClosePath);
    }

    /// Appends a closed subpath tracing `rect` from its minimum corner.
    fn add_rect(&mut self, rect: Rect) {
        if rect.is_null() {
            return;
        }
        let t = self.sink_transform();
        let [p0, p1, p2, p3] = rect.corners().map(|p| t.transform_point(p));
        self.push_element(PathElement::MoveTo(p0));
        self.push_element(PathElement::LineTo(p1));
        self.push_element(PathElement::LineTo(p2));
        self.push_element(PathElement::LineTo(p3));
        self.push_element(PathElement::ClosePath);
    }

    fn add_rects(&mut self, rects: &[Rect]) {
        for rect in rects {
            self.add_rect(*rect);
        }
    }

    /// Appends an open polyline through `points`. An empty slice appends nothing.
    fn add_lines(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let t = self.sink_transform();
        self.push_element(PathElement::MoveTo(t.transform_point(*first)));
        for p in rest {
            self.push_element(PathElement::LineTo(t.transform_point(*p)));
        }
    }

    /// Appends a closed ellipse inscribed in `rect`.
    ///
    /// The ellipse starts at the middle of the maximum x edge and proceeds in the
    /// direction of increasing angle, as four cubic segments.
    fn add_ellipse_in_rect(&mut self, rect: Rect) {
        if rect.is_null() {
            return;
        }
        let t = self.sink_transform();
        let (cx, cy) = (rect.mid_x(), rect.mid_y());
        let (rx, ry) = (rect.width() * 0.5, rect.height() * 0.5);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let tp = |x: f64, y: f64| t.transform_point(Point::new(x, y));
        self.push_element(PathElement::MoveTo(tp(cx + rx, cy)));
        self.push_element(PathElement::CurveTo(
            tp(cx + rx, cy + ky),
            tp(cx + kx, cy + ry),
            tp(cx, cy + ry),
        ));
        self.push_element(PathElement::CurveTo(
            tp(cx - kx, cy + ry),
            tp(cx - rx, cy + ky),
            tp(cx - rx, cy),
        ));
        self.push_element(PathElement::CurveTo(
            tp(cx - rx, cy - ky),
            tp(cx - kx, cy - ry),
            tp(cx, cy - ry),
        ));
        self.push_element(PathElement::CurveTo(
            tp(cx + kx, cy - ry),
            tp(cx + rx, cy - ky),
            tp(cx + rx, cy),
        ));
        self.push_element(PathElement::ClosePath);
    }

    /// Appends a circular arc around `center` from `start_angle` to `end_angle`.
    ///
    /// With y pointing up, a clockwise arc runs towards decreasing angles. The arc is
    /// connected to the current point with a line, or starts a new subpath if there is
    /// none. Sweeps are limited to one full turn.
    fn add_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) -> Result<(), Error> {
        let delta = end_angle - start_angle;
        let sweep = if clockwise {
            if delta <= -TAU {
                -TAU
            } else if delta > 0.0 {
                delta.rem_euclid(TAU) - TAU
            } else {
                delta
            }
        } else if delta >= TAU {
            TAU
        } else if delta < 0.0 {
            delta.rem_euclid(TAU)
        } else {
            delta
        };
        append_arc(self, center, radius, start_angle, sweep)
    }

    /// Appends a circular arc sweeping `delta` radians from `start_angle`.
    ///
    /// Positive deltas run towards increasing angles.
    fn add_relative_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        delta: f64,
    ) -> Result<(), Error> {
        append_arc(self, center, radius, start_angle, delta.clamp(-TAU, TAU))
    }

    /// Appends an arc of `radius` tangent to the line from the current point to `p1`
    /// and to the line from `p1` to `p2`.
    ///
    /// The current point is first connected to the start of the arc with a line. When
    /// the points are collinear or `radius` is zero this is just a line to `p1`.
    fn add_arc_to_point(&mut self, p1: Point, p2: Point, radius: f64) -> Result<(), Error> {
        let current = require_current_point(self)?;
        check_radius(radius)?;
        let t = self.sink_transform();
        let p0 = t.invert()?.transform_point(current);

        let v1 = p0 - p1;
        let v2 = p2 - p1;
        let l1 = v1.width.hypot(v1.height);
        let l2 = v2.width.hypot(v2.height);
        let cross = v1.width * v2.height - v1.height * v2.width;
        if radius == 0.0 || l1 == 0.0 || l2 == 0.0 || cross.abs() <= 1e-12 * l1 * l2 {
            return self.line_to(p1);
        }

        let u1 = Size::new(v1.width / l1, v1.height / l1);
        let u2 = Size::new(v2.width / l2, v2.height / l2);
        let cos = (u1.width * u2.width + u1.height * u2.height).clamp(-1.0, 1.0);
        let half = cos.acos() * 0.5;
        let tangent_dist = radius / half.tan();
        let t1 = p1 + Size::new(u1.width * tangent_dist, u1.height * tangent_dist);
        let t2 = p1 + Size::new(u2.width * tangent_dist, u2.height * tangent_dist);
        let bisector = u1 + u2;
        let bisector_len = bisector.width.hypot(bisector.height);
        let center_dist = radius / half.sin();
        let center = p1
            + Size::new(
                bisector.width / bisector_len * center_dist,
                bisector.height / bisector_len * center_dist,
            );

        let start = (t1.y - center.y).atan2(t1.x - center.x);
        let end = (t2.y - center.y).atan2(t2.x - center.x);
        let mut sweep = end - start;
        if sweep > PI {
            sweep -= TAU;
        } else if sweep < -PI {
            sweep += TAU;
        }
        append_arc(self, center, radius, start, sweep)
    }

    /// Appends every element of `path`, mapped through the sink transform.
    fn add_path(&mut self, path: &Path) {
        let t = self.sink_transform();
        for el in path {
            self.push_element(el.transformed(&t));
        }
    }
}

fn require_current_point<S: PathSink + ?Sized>(sink: &S) -> Result<Point, Error> {
    sink.sink_current_point().ok_or(Error::NoCurrentPoint)
}

fn check_radius(radius: f64) -> Result<(), Error> {
    if radius >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid("radius", "must be a non-negative number"))
    }
}

/// Appends an arc given in user space, starting with a line or a move to its start.
fn append_arc<S: PathSink + ?Sized>(
    sink: &mut S,
    center: Point,
    radius: f64,
    start: f64,
    sweep: f64,
) -> Result<(), Error> {
    check_radius(radius)?;
    let t = sink.sink_transform();
    let first = t.transform_point(point_on_circle(center, radius, start));
    match sink.sink_current_point() {
        Some(current) if current == first => {}
        Some(_) => sink.push_element(PathElement::LineTo(first)),
        None => sink.push_element(PathElement::MoveTo(first)),
    }
    for [c1, c2, p] in arc_cubics(center, radius, start, sweep) {
        sink.push_element(PathElement::CurveTo(
            t.transform_point(c1),
            t.transform_point(c2),
            t.transform_point(p),
        ));
    }
    Ok(())
}

fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(center.x + radius * cos, center.y + radius * sin)
}

/// Splits an arc into cubic segments of at most a quarter turn.
fn arc_cubics(center: Point, radius: f64, start: f64, sweep: f64) -> SmallVec<[[Point; 3]; 4]> {
    let mut cubics = SmallVec::new();
    if sweep == 0.0 || !sweep.is_finite() {
        return cubics;
    }
    // The slack keeps an exact multiple of a quarter turn from rounding up a segment.
    let n = (sweep.abs() / FRAC_PI_2 - 1e-9).ceil().max(1.0) as usize;
    let step = sweep / n as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;
    let mut angle = start;
    let mut p0 = point_on_circle(center, radius, angle);
    for i in 1..=n {
        // Avoid drift by computing each end angle from the start.
        let next = start + step * i as f64;
        let p3 = point_on_circle(center, radius, next);
        let (s0, c0) = angle.sin_cos();
        let (s1, c1) = next.sin_cos();
        let ctrl1 = Point::new(p0.x - k * s0, p0.y + k * c0);
        let ctrl2 = Point::new(p3.x + k * s1, p3.y - k * c1);
        cubics.push([ctrl1, ctrl2, p3]);
        angle = next;
        p0 = p3;
    }
    cubics
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use quill_geometry::{AffineTransform, Point, Rect};

    use super::KAPPA;
    use crate::{Error, Path, PathElement, PathSink};

    const EPS: f64 = 1e-9;

    fn near(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn curve_count(path: &Path) -> usize {
        path.iter()
            .filter(|el| matches!(el, PathElement::CurveTo(..)))
            .count()
    }

    #[test]
    fn kappa_is_four_thirds_of_tan_eighth_turn() {
        let k = 4.0 / 3.0 * (FRAC_PI_2 / 4.0).tan();
        assert!((k - KAPPA).abs() < 1e-15);
    }

    #[test]
    fn rect_order() {
        let mut path = Path::new();
        path.add_rect(Rect::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(
            path.elements(),
            &[
                PathElement::MoveTo(Point::new(0.0, 0.0)),
                PathElement::LineTo(Point::new(2.0, 0.0)),
                PathElement::LineTo(Point::new(2.0, 1.0)),
                PathElement::LineTo(Point::new(0.0, 1.0)),
                PathElement::ClosePath,
            ]
        );
        path.add_rect(Rect::NULL);
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn add_rects_and_lines() {
        let mut path = Path::new();
        path.add_rects(&[Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 1.0, 1.0)]);
        assert_eq!(path.len(), 10);

        let mut path = Path::new();
        path.add_lines(&[]);
        assert!(path.is_empty());
        path.add_lines(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.current_point(), Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn ellipse_starts_at_max_x() {
        let mut path = Path::new();
        path.add_ellipse_in_rect(Rect::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(path.elements()[0], PathElement::MoveTo(Point::new(4.0, 1.0)));
        assert_eq!(curve_count(&path), 4);
        assert_eq!(path.elements().last(), Some(&PathElement::ClosePath));
        let bbox = path.path_bounding_box();
        assert!(near(bbox.origin, Point::ZERO));
        assert!((bbox.size.width - 4.0).abs() < EPS && (bbox.size.height - 2.0).abs() < EPS);
        // The second quadrant comes next: increasing angle.
        let PathElement::CurveTo(_, _, end) = path.elements()[1] else {
            panic!("expected a curve");
        };
        assert_eq!(end, Point::new(2.0, 2.0));
    }

    #[test]
    fn counter_clockwise_quarter_arc() {
        let mut path = Path::new();
        path.add_arc(Point::ZERO, 10.0, 0.0, FRAC_PI_2, false)
            .unwrap();
        assert_eq!(path.elements()[0], PathElement::MoveTo(Point::new(10.0, 0.0)));
        assert_eq!(curve_count(&path), 1);
        assert!(near(path.current_point().unwrap(), Point::new(0.0, 10.0)));
    }

    #[test]
    fn clockwise_arc_goes_the_long_way() {
        let mut path = Path::new();
        path.add_arc(Point::ZERO, 1.0, 0.0, FRAC_PI_2, true).unwrap();
        // Three quarters of a turn, through (0, -1).
        assert_eq!(curve_count(&path), 3);
        let PathElement::CurveTo(_, _, first_end) = path.elements()[1] else {
            panic!("expected a curve");
        };
        assert!(near(first_end, Point::new(0.0, -1.0)));
        assert!(near(path.current_point().unwrap(), Point::new(0.0, 1.0)));
    }

    #[test]
    fn arc_connects_to_current_point() {
        let mut path = Path::new();
        path.move_to(Point::new(-5.0, 0.0));
        path.add_arc(Point::ZERO, 1.0, 0.0, PI, false).unwrap();
        assert_eq!(path.elements()[1], PathElement::LineTo(Point::new(1.0, 0.0)));
        assert_eq!(curve_count(&path), 2);
    }

    #[test]
    fn full_circle_is_clamped() {
        let mut path = Path::new();
        path.add_relative_arc(Point::ZERO, 1.0, 0.0, 1e6).unwrap();
        assert_eq!(curve_count(&path), 4);
        assert!(near(path.current_point().unwrap(), Point::new(1.0, 0.0)));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut path = Path::new();
        assert!(matches!(
            path.add_arc(Point::ZERO, -1.0, 0.0, 1.0, false),
            Err(Error::InvalidArgument { name: "radius", .. })
        ));
        assert!(path.is_empty());
    }

    #[test]
    fn arc_to_point_rounds_a_corner() {
        let mut path = Path::new();
        assert_eq!(
            path.add_arc_to_point(Point::new(10.0, 0.0), Point::new(10.0, 10.0), 5.0),
            Err(Error::NoCurrentPoint)
        );
        path.move_to(Point::ZERO);
        path.add_arc_to_point(Point::new(10.0, 0.0), Point::new(10.0, 10.0), 5.0)
            .unwrap();
        let PathElement::LineTo(t1) = path.elements()[1] else {
            panic!("expected a line to the tangent point");
        };
        assert!(near(t1, Point::new(5.0, 0.0)));
        assert_eq!(curve_count(&path), 1);
        assert!(near(path.current_point().unwrap(), Point::new(10.0, 5.0)));
    }

    #[test]
    fn arc_to_point_collinear_is_a_line() {
        let mut path = Path::new();
        path.move_to(Point::ZERO);
        path.add_arc_to_point(Point::new(5.0, 0.0), Point::new(10.0, 0.0), 2.0)
            .unwrap();
        assert_eq!(path.elements()[1], PathElement::LineTo(Point::new(5.0, 0.0)));
    }

    #[test]
    fn arc_to_point_through_transform() {
        let t = AffineTransform::scale(2.0, 2.0);
        let mut path = Path::new();
        let mut scaled = path.with_transform(t);
        scaled.move_to(Point::ZERO);
        scaled
            .add_arc_to_point(Point::new(10.0, 0.0), Point::new(10.0, 10.0), 5.0)
            .unwrap();
        assert!(near(path.current_point().unwrap(), Point::new(20.0, 10.0)));

        let mut path = Path::new();
        path.move_to(Point::ZERO);
        let mut flat = path.with_transform(AffineTransform::scale(0.0, 1.0));
        assert!(matches!(
            flat.add_arc_to_point(Point::new(1.0, 0.0), Point::new(1.0, 1.0), 1.0),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn add_path_applies_sink_transform() {
        let source = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0), None);
        let mut path = Path::new();
        path.with_transform(AffineTransform::translation(10.0, 0.0))
            .add_path(&source);
        assert_eq!(path.as_rect(), Some(Rect::new(10.0, 0.0, 1.0, 1.0)));
    }
}

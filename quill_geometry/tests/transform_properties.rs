// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Algebraic properties of [`AffineTransform`] over a fixed set of sample matrices.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};

use quill_geometry::{AffineTransform, GeometryError, Point};

const TOLERANCE: f64 = 1e-9;

fn samples() -> Vec<AffineTransform> {
    vec![
        AffineTransform::IDENTITY,
        AffineTransform::rotation(FRAC_PI_6),
        AffineTransform::rotation(-2.5),
        AffineTransform::scale(2.0, 3.0),
        AffineTransform::scale(-1.0, 0.5),
        AffineTransform::translation(5.0, -5.0),
        AffineTransform::new(1.0, 0.5, -0.25, 2.0, 7.0, 11.0),
        AffineTransform::new(0.3, -1.2, 0.8, 0.1, -3.0, 0.5),
        AffineTransform::rotation(FRAC_PI_3).then(AffineTransform::translation(1.0, 2.0)),
    ]
}

fn points() -> [Point; 4] {
    [
        Point::ZERO,
        Point::new(1.0, 0.0),
        Point::new(-3.5, 2.25),
        Point::new(100.0, -40.0),
    ]
}

fn near(a: AffineTransform, b: AffineTransform) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs())
        .all(|(x, y)| (x - y).abs() <= TOLERANCE * (1.0 + y.abs()))
}

fn near_point(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= TOLERANCE * (1.0 + b.x.abs())
        && (a.y - b.y).abs() <= TOLERANCE * (1.0 + b.y.abs())
}

#[test]
fn identity_composition_is_exact() {
    for t in samples() {
        assert_eq!(AffineTransform::compose(AffineTransform::IDENTITY, t), t);
        assert_eq!(AffineTransform::compose(t, AffineTransform::IDENTITY), t);
    }
}

#[test]
fn composition_is_associative() {
    let samples = samples();
    for &x in &samples {
        for &y in &samples {
            for &z in &samples {
                let left = AffineTransform::compose(AffineTransform::compose(x, y), z);
                let right = AffineTransform::compose(x, AffineTransform::compose(y, z));
                assert!(near(left, right), "{x} / {y} / {z}");
            }
        }
    }
}

#[test]
fn transform_point_distributes_over_composition() {
    for x in samples() {
        for y in samples() {
            let xy = AffineTransform::compose(x, y);
            for p in points() {
                let stepwise = y.transform_point(x.transform_point(p));
                assert!(near_point(xy.transform_point(p), stepwise), "{x} / {y} at {p:?}");
            }
        }
    }
}

#[test]
fn double_inversion_round_trips() {
    for t in samples() {
        let inverse = t.invert().unwrap();
        assert!(near(inverse.invert().unwrap(), t), "{t}");
        assert!(near(t.then(inverse), AffineTransform::IDENTITY), "{t}");
    }
}

#[test]
fn degenerate_transforms_do_not_invert() {
    assert!(matches!(
        AffineTransform::scale(0.0, 1.0).invert(),
        Err(GeometryError::DegenerateTransform { .. })
    ));
    // Rank one: the second row is a multiple of the first.
    let collapsed = AffineTransform::new(1.0, 2.0, 2.0, 4.0, 3.0, 3.0);
    assert!(collapsed.invert().is_err());
    assert!(!collapsed.is_invertible());
    assert_eq!(collapsed.invert_or_self(), collapsed);
    assert!(AffineTransform::new(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0)
        .invert()
        .is_err());
}

#[test]
fn scenarios() {
    assert_eq!(AffineTransform::rotation(0.0), AffineTransform::IDENTITY);
    assert_eq!(
        AffineTransform::scale(2.0, 3.0).transform_point(Point::new(1.0, 1.0)),
        Point::new(2.0, 3.0)
    );
    assert_eq!(
        AffineTransform::translation(5.0, -5.0).transform_point(Point::ZERO),
        Point::new(5.0, -5.0)
    );
    let t = AffineTransform::compose(
        AffineTransform::scale(2.0, 1.0),
        AffineTransform::translation(10.0, 0.0),
    );
    assert_eq!(t.transform_point(Point::new(1.0, 0.0)), Point::new(12.0, 0.0));
    assert!(!AffineTransform::new(1.000_000_1, 0.0, 0.0, 1.0, 0.0, 0.0).is_identity());
}

fn hash_of(t: AffineTransform) -> u64 {
    let mut hasher = DefaultHasher::new();
    t.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn equal_transforms_hash_alike() {
    let rotated = AffineTransform::rotation(0.0);
    assert_eq!(rotated, AffineTransform::IDENTITY);
    assert_eq!(hash_of(rotated), hash_of(AffineTransform::IDENTITY));
    assert_eq!(
        hash_of(AffineTransform::scale(1.0, 1.0)),
        hash_of(AffineTransform::IDENTITY)
    );
}

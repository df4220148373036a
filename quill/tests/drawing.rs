// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing through a [`Context`] and inspecting the recorded commands.

use std::f64::consts::FRAC_PI_2;

use quill::{
    AffineTransform, Context, ContextOptions, DrawCommand, FillRule, FontMetrics, Path,
    PathElement, PathSink, Point, Rect, Size, TextRun,
};

/// A context with a flipped y axis over a 200 by 100 device.
fn flipped() -> Context {
    let device = AffineTransform::scale(1.0, -1.0).then(AffineTransform::translation(0.0, 100.0));
    Context::new(
        ContextOptions::default()
            .with_device_transform(device)
            .with_bounds(Rect::new(0.0, 0.0, 200.0, 100.0)),
    )
}

#[test]
fn flipped_fill_lands_in_device_space() {
    let mut cx = flipped();
    cx.fill_rect(Rect::new(10.0, 10.0, 20.0, 30.0));
    let [DrawCommand::Fill { path, rule, paint }] = cx.display_list().commands() else {
        panic!("expected a single fill");
    };
    assert_eq!(*rule, FillRule::NonZero);
    assert_eq!(path.bounding_box(), Rect::new(10.0, 60.0, 20.0, 30.0));
    assert_eq!(paint.clip, Rect::new(0.0, 0.0, 200.0, 100.0));
}

#[test]
fn saved_state_scopes_transforms() {
    let mut cx = flipped();
    let base = cx.ctm();
    cx.save_state();
    cx.translate_ctm(50.0, 0.0);
    cx.rotate_ctm(FRAC_PI_2);
    cx.move_to(Point::ZERO);
    cx.line_to(Point::new(10.0, 0.0)).unwrap();
    cx.restore_state();
    assert_eq!(cx.ctm(), base);

    // Points already appended keep the transform they were added under.
    cx.stroke_path();
    let [DrawCommand::Stroke { path, style, .. }] = cx.display_list().commands() else {
        panic!("expected a single stroke");
    };
    assert_eq!(style.transform, base);
    let end = path.current_point().unwrap();
    assert!((end.x - 50.0).abs() < 1e-9);
    assert!((end.y - 90.0).abs() < 1e-9);
}

#[test]
fn paths_replay_into_a_context() {
    let mut path = Path::new();
    path.add_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    path.add_ellipse_in_rect(Rect::new(10.0, 10.0, 4.0, 2.0));

    let mut cx = Context::default();
    cx.scale_ctm(2.0, 2.0);
    cx.add_path(&path);
    let copy = cx.copy_path().unwrap();
    assert_eq!(copy.len(), path.len());
    assert_eq!(copy.elements()[0], PathElement::MoveTo(Point::ZERO));
    assert_eq!(
        cx.path_bounding_box().unwrap(),
        path.bounding_box(),
        "user space bounds survive the round trip through device space"
    );
}

#[test]
fn runs_draw_at_the_text_position() {
    let metrics = FontMetrics {
        ascent: 8.0,
        descent: 2.0,
        leading: 0.0,
    };
    let run = TextRun::new(
        vec![3, 4, 5],
        vec![Point::ZERO, Point::new(6.0, 0.0), Point::new(12.0, 0.0)],
        vec![Size::new(6.0, 0.0); 3],
        vec![0, 1, 2],
        metrics,
    )
    .unwrap()
    .with_text_matrix(AffineTransform::scale(1.0, -1.0));

    let mut cx = flipped();
    cx.set_font_size(16.0);
    cx.set_text_position(Point::new(20.0, 40.0));
    cx.draw_run(&run, 1..).unwrap();
    assert!(cx.draw_run(&run, 2..9).is_err());

    let [DrawCommand::Glyphs {
        glyphs,
        positions,
        text_matrix,
        transform,
        font_size,
        ..
    }] = cx.display_list().commands()
    else {
        panic!("expected a single glyph draw");
    };
    assert_eq!(glyphs, &[4, 5]);
    assert_eq!(positions, &[Point::new(26.0, 40.0), Point::new(32.0, 40.0)]);
    assert_eq!(*text_matrix, AffineTransform::scale(1.0, -1.0));
    assert_eq!(*transform, cx.ctm());
    assert_eq!(*font_size, 16.0);
    assert_eq!(run.typographic_bounds(..).unwrap().width, 18.0);
}

use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

const EPS: f64 = 1e-9;

fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
    Frame::new(Point::new(x, y), Size::new(w, h))
}

/// Page-space position of the unrotated top-left corner of a rotated frame.
fn anchor(f: Frame, rotation: f64) -> Point {
    let half = Vec2::new(f.width() / 2.0, f.height() / 2.0);
    f.center() - rotate_vec2(half, rotation)
}

fn assert_point(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6,
        "{a:?} != {b:?}"
    );
}

#[test]
fn larger_axis_drives_and_aspect_is_kept() {
    let out = resize_maintaining_aspect(frame(0.0, 0.0, 200.0, 100.0), 0.0, Vec2::new(10.0, 40.0))
        .unwrap();
    assert!((out.frame.width() - 240.0).abs() < EPS);
    assert!((out.frame.height() - 120.0).abs() < EPS);
}

#[test]
fn top_left_stays_put_without_rotation() {
    let f = frame(100.0, 200.0, 250.0, 125.0);
    let out = resize_maintaining_aspect(f, 0.0, Vec2::new(50.0, -5.0)).unwrap();
    assert_point(out.frame.origin, f.origin);
    assert_point(out.center, out.frame.center());
}

#[test]
fn anchor_follows_rotation_for_quarter_turns() {
    let f = frame(300.0, 400.0, 250.0, 125.0);
    for theta in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
        for drag in [Vec2::new(40.0, 0.0), Vec2::new(-60.0, -90.0), Vec2::new(0.0, 15.5)] {
            let out = resize_maintaining_aspect(f, theta, drag).unwrap();
            assert_point(anchor(out.frame, theta), anchor(f, theta));

            let dw = out.frame.width() - f.width();
            let dh = out.frame.height() - f.height();
            let expected = f.center() + rotate_vec2(Vec2::new(dw / 2.0, dh / 2.0), theta);
            assert_point(out.center, expected);
        }
    }
}

#[test]
fn quarter_turn_offset_is_explicit() {
    // At pi/2 the center shifts by (-dh/2, dw/2).
    let f = frame(0.0, 0.0, 100.0, 100.0);
    let out = resize_maintaining_aspect(f, FRAC_PI_2, Vec2::new(20.0, 0.0)).unwrap();
    assert_point(out.center, Point::new(50.0 - 10.0, 50.0 + 10.0));
}

#[test]
fn never_below_minimum() {
    let shapes = [
        frame(0.0, 0.0, 250.0, 125.0),
        frame(0.0, 0.0, 125.0, 250.0),
        frame(0.0, 0.0, 60.0, 60.0),
        frame(0.0, 0.0, 30.0, 10.0),
    ];
    for f in shapes {
        for theta in [0.0, 0.7, PI] {
            let out = resize_maintaining_aspect(f, theta, Vec2::new(-1e6, -1e6)).unwrap();
            assert!(out.frame.width() >= MIN_ITEM_SIZE - EPS, "{out:?}");
            assert!(out.frame.height() >= MIN_ITEM_SIZE - EPS, "{out:?}");
            let aspect = f.width() / f.height();
            assert!((out.frame.width() / out.frame.height() - aspect).abs() < 1e-9);
        }
    }
}

#[test]
fn tall_item_floors_on_width() {
    let out =
        resize_maintaining_aspect(frame(0.0, 0.0, 100.0, 200.0), 0.0, Vec2::new(-500.0, -500.0))
            .unwrap();
    assert!((out.frame.width() - 50.0).abs() < EPS);
    assert!((out.frame.height() - 100.0).abs() < EPS);
}

#[test]
fn rejects_degenerate_input() {
    assert!(resize_maintaining_aspect(frame(0.0, 0.0, 0.0, 10.0), 0.0, Vec2::ZERO).is_err());
    assert!(
        resize_maintaining_aspect(frame(0.0, 0.0, 10.0, 10.0), f64::NAN, Vec2::ZERO).is_err()
    );
    assert!(
        resize_maintaining_aspect(frame(0.0, 0.0, 10.0, 10.0), 0.0, Vec2::new(f64::INFINITY, 0.0))
            .is_err()
    );
}

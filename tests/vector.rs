use std::f64::consts::{FRAC_PI_2, PI};

use nbody_trajectories::vector::{add, scale, sub};
use nbody_trajectories::{Rotation2, Vector2};

fn close(a: Vector2, b: Vector2) -> bool {
    (a - b).magnitude() <= 1e-12 * (1.0 + b.magnitude())
}

#[test]
fn from_polar_places_points_on_the_axes() {
    assert!(close(Vector2::from_polar(2.0, 0.0), Vector2::new(2.0, 0.0)));
    assert!(close(Vector2::from_polar(2.0, FRAC_PI_2), Vector2::new(0.0, 2.0)));
    assert!(close(Vector2::from_polar(3.0, PI), Vector2::new(-3.0, 0.0)));

    let v = Vector2::from_polar(6_563_000.0, -2.159);
    assert!((v.magnitude() - 6_563_000.0).abs() < 1e-6);
    assert!((v.angle() + 2.159).abs() < 1e-12);
}

#[test]
fn rotation_by_quarter_turn_swaps_axes() {
    let quarter = Rotation2::from_angle(FRAC_PI_2);
    assert!(close(Vector2::new(1.0, 0.0).rotate(&quarter), Vector2::new(0.0, 1.0)));
    assert!(close(Vector2::new(0.0, 5.0).rotate(&quarter), Vector2::new(-5.0, 0.0)));

    let back = Rotation2::from_angle(-FRAC_PI_2);
    let p = Vector2::new(3.844e8, -1.2e6);
    assert!(close(p.rotate(&quarter).rotate(&back), p));
    assert_eq!(p.rotate(&Rotation2::IDENTITY), p);
}

#[test]
fn rotation_preserves_length() {
    let r = Rotation2::from_angle(-0.0123);
    let p = Vector2::new(-4_670_000.0, 12_345.0);
    assert!((p.rotate(&r).magnitude() - p.magnitude()).abs() < 1e-6);
}

#[test]
fn arithmetic_helpers_match_operators() {
    let a = Vector2::new(1.5, -2.0);
    let b = Vector2::new(-0.5, 4.0);

    assert_eq!(add(&a, &b), Vector2::new(1.0, 2.0));
    assert_eq!(sub(&a, &b), Vector2::new(2.0, -6.0));
    assert_eq!(scale(&a, -2.0), Vector2::new(-3.0, 4.0));
    assert_eq!(a + b, add(&a, &b));
    assert_eq!(a - b, sub(&a, &b));
    assert_eq!(a * 4.0, scale(&a, 4.0));
    assert_eq!(-a, Vector2::new(-1.5, 2.0));

    let mut c = a;
    c += b;
    assert_eq!(c, a + b);
}

#[test]
fn magnitude_and_finiteness() {
    assert_eq!(Vector2::new(3.0, 4.0).magnitude(), 5.0);
    assert_eq!(Vector2::ZERO.magnitude(), 0.0);
    assert!(Vector2::new(1.0, 2.0).is_finite());
    assert!(!Vector2::new(f64::NAN, 0.0).is_finite());
    assert!(!Vector2::new(0.0, f64::INFINITY).is_finite());
}

use super::*;

#[test]
fn constructor_keeps_min_below_max() {
    let c = Constraints::new(50.0, 10.0, 0.0, 20.0);
    assert_eq!(c.min_width, 50.0);
    assert_eq!(c.max_width, 50.0);
    assert!(c.has_tight_width());
}

#[test]
fn constrain_clamps_into_bounds() {
    let c = Constraints::new(10.0, 100.0, 10.0, 100.0);
    assert_eq!(c.constrain(Size::new(200.0, 5.0)), Size::new(100.0, 10.0));
    assert_eq!(c.constrain(Size::new(50.0, 50.0)), Size::new(50.0, 50.0));
}

#[test]
fn unbounded_max_survives_deflate() {
    let c = Constraints::UNBOUNDED.deflate(10.0, 10.0);
    assert!(!c.has_bounded_width());
    assert!(!c.has_bounded_height());
    assert_eq!(c.min_width, 0.0);
}

#[test]
fn constrain_constraints_narrows_to_parent() {
    let parent = Constraints::loose(100.0, 100.0);
    let child = Constraints::new(20.0, 300.0, 150.0, f32::INFINITY);
    let narrowed = parent.constrain_constraints(child);
    assert_eq!(narrowed, Constraints::new(20.0, 100.0, 100.0, 100.0));
}

#[test]
fn max_bounded_size_falls_back_to_min_on_unbounded_axis() {
    let c = Constraints::new(5.0, f32::INFINITY, 0.0, 40.0);
    assert_eq!(c.max_bounded_size(), Size::new(5.0, 40.0));
}

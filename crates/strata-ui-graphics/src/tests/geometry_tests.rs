use super::*;

#[test]
fn rect_edges_follow_origin_and_size() {
    let rect = Rect::from_ltrb(10.0, 5.0, 30.0, 25.0);
    assert_eq!(rect.width, 20.0);
    assert_eq!(rect.height, 20.0);
    assert_eq!(rect.right(), 30.0);
    assert_eq!(rect.bottom(), 25.0);
    assert!(rect.contains(30.0, 25.0));
    assert!(!rect.contains(30.5, 25.0));
}

#[test]
fn union_covers_both_rects() {
    let a = Rect::from_ltrb(0.0, 0.0, 10.0, 10.0);
    let b = Rect::from_ltrb(20.0, 5.0, 30.0, 40.0);
    assert_eq!(a.union(&b), Rect::from_ltrb(0.0, 0.0, 30.0, 40.0));
}

#[test]
fn disjoint_rects_do_not_intersect() {
    let a = Rect::from_ltrb(0.0, 0.0, 10.0, 10.0);
    let b = Rect::from_ltrb(20.0, 20.0, 30.0, 30.0);
    assert_eq!(a.intersect(&b), None);
    let c = Rect::from_ltrb(5.0, 5.0, 15.0, 15.0);
    assert_eq!(a.intersect(&c), Some(Rect::from_ltrb(5.0, 5.0, 10.0, 10.0)));
}

#[test]
fn path_ignores_empty_rects_and_reports_bounds() {
    let mut path = Path::new();
    path.add_rect(Rect::from_ltrb(0.0, 0.0, 0.0, 10.0));
    assert!(path.is_empty());
    path.add_rect(Rect::from_ltrb(0.0, 0.0, 10.0, 10.0));
    path.add_rect(Rect::from_ltrb(0.0, 10.0, 4.0, 20.0));
    path.translate(1.0, 1.0);
    assert_eq!(path.bounds(), Rect::from_ltrb(1.0, 1.0, 11.0, 21.0));
}

#[test]
fn unspecified_point_is_not_finite() {
    assert!(!Point::UNSPECIFIED.is_finite());
    assert!(Point::new(1.0, 2.0).is_finite());
    assert_eq!(Point::new(3.0, 4.0).distance(), 5.0);
}

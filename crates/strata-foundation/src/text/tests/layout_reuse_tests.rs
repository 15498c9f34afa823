use super::*;

fn policy(soft_wrap: bool, overflow: TextOverflow, max_lines: usize) -> WrapPolicy {
    WrapPolicy {
        soft_wrap,
        overflow,
        max_lines,
    }
}

fn width(min: f32, max: f32) -> Constraints {
    Constraints::new(min, max, 0.0, f32::INFINITY)
}

#[test]
fn identical_constraints_are_unchanged() {
    let wrap = policy(true, TextOverflow::Clip, usize::MAX);
    let c = width(0.0, 100.0);
    assert_eq!(
        wrap.reuse_for(LineBreak::Heading, &c, &c, 100.0, 300.0),
        LayoutReuse::Unchanged
    );
}

#[test]
fn non_greedy_line_breaking_always_reshapes() {
    let wrap = policy(false, TextOverflow::Clip, usize::MAX);
    assert_eq!(
        wrap.reuse_for(LineBreak::Paragraph, &width(0.0, 100.0), &width(0.0, 120.0), 50.0, 50.0),
        LayoutReuse::Reshape
    );
}

#[test]
fn without_wrapping_only_bounds_that_matter_reshape() {
    let wrap = policy(false, TextOverflow::Clip, usize::MAX);
    assert_eq!(
        wrap.reuse_for(LineBreak::Simple, &width(0.0, 200.0), &width(0.0, 150.0), 100.0, 100.0),
        LayoutReuse::Reconstrain
    );
    assert_eq!(
        wrap.reuse_for(LineBreak::Simple, &width(0.0, 200.0), &width(10.0, 200.0), 100.0, 100.0),
        LayoutReuse::Reshape
    );

    let ellipsis = policy(false, TextOverflow::Ellipsis, usize::MAX);
    assert_eq!(
        ellipsis.reuse_for(LineBreak::Simple, &width(0.0, 200.0), &width(0.0, 150.0), 100.0, 100.0),
        LayoutReuse::Reshape
    );
}

#[test]
fn wrapping_text_pinned_to_its_natural_width() {
    let wrap = policy(true, TextOverflow::Clip, usize::MAX);
    let previous = width(0.0, 200.0);
    assert_eq!(
        wrap.reuse_for(LineBreak::Simple, &previous, &width(0.0, 150.0), 100.0, 99.5),
        LayoutReuse::Reconstrain
    );
    assert_eq!(
        wrap.reuse_for(LineBreak::Simple, &previous, &width(0.0, 80.0), 100.0, 99.5),
        LayoutReuse::Reshape
    );
}

#[test]
fn wrapping_text_narrower_than_its_natural_width() {
    let wrap = policy(true, TextOverflow::Clip, usize::MAX);
    let previous = width(0.0, 100.0);
    assert_eq!(
        wrap.reuse_for(LineBreak::Simple, &previous, &width(0.0, 120.0), 100.0, 300.0),
        LayoutReuse::Reshape
    );
    assert_eq!(
        wrap.reuse_for(
            LineBreak::Simple,
            &previous,
            &Constraints::new(0.0, 100.0, 0.0, 50.0),
            100.0,
            300.0
        ),
        LayoutReuse::Reshape
    );
    // Laid out wider than natural because of a minimum; shrinking the
    // maximum towards that width keeps the same breaks.
    assert_eq!(
        wrap.reuse_for(LineBreak::Simple, &width(100.0, 200.0), &width(100.0, 150.0), 100.0, 50.0),
        LayoutReuse::Reconstrain
    );
}

#[test]
fn single_line_ellipsis_shapes_one_line() {
    assert_eq!(policy(false, TextOverflow::Ellipsis, 5).effective_max_lines(), 1);
    assert_eq!(policy(true, TextOverflow::Ellipsis, 5).effective_max_lines(), 5);
    assert!(!policy(true, TextOverflow::Clip, 1).can_wrap());
}

#[test]
fn layout_width_clamps_natural_width() {
    let wrap = policy(true, TextOverflow::Clip, usize::MAX);
    assert_eq!(wrap.layout_width(&width(0.0, 50.0), 99.2), 50.0);
    assert_eq!(wrap.layout_width(&width(0.0, 500.0), 99.2), 100.0);
    assert_eq!(wrap.layout_width(&width(120.0, 500.0), 99.2), 120.0);
    assert_eq!(wrap.layout_width(&width(70.0, 70.0), 99.2), 70.0);
    let no_wrap = policy(false, TextOverflow::Clip, usize::MAX);
    assert_eq!(no_wrap.layout_width(&width(0.0, 50.0), 99.2), 100.0);
}

#[test]
fn visible_overflow_never_reports_clipping() {
    let c = Constraints::loose(50.0, 10.0);
    let (size, w, h) = policy(true, TextOverflow::Visible, usize::MAX).constrain(&c, Size::new(80.0, 20.0));
    assert_eq!(size, Size::new(50.0, 10.0));
    assert!(!w && !h);
    let (_, w, h) = policy(true, TextOverflow::Clip, usize::MAX).constrain(&c, Size::new(80.0, 20.0));
    assert!(w && h);
}

use super::*;
use crate::text::MonospaceFontResolver;

fn style() -> TextStyle {
    TextStyle::default().with_font_size(10.0)
}

fn cache(text: &str, soft_wrap: bool, overflow: TextOverflow, max_lines: usize) -> ParagraphLayoutCache {
    ParagraphLayoutCache::new(
        text,
        style(),
        Rc::new(MonospaceFontResolver::new()),
        overflow,
        soft_wrap,
        max_lines,
        1,
    )
}

fn max_width(width: f32) -> Constraints {
    Constraints::new(0.0, width, 0.0, f32::INFINITY)
}

#[test]
fn queries_before_layout_are_errors() {
    let mut cache = cache("aaa bbb", true, TextOverflow::Clip, usize::MAX);
    assert!(matches!(
        cache.paragraph(),
        Err(TextLayoutError::IllegalState(_))
    ));
    assert!(cache.min_intrinsic_width().is_err());
    assert!(cache.max_intrinsic_width().is_err());
    assert!(cache.text_layout_result().is_none());
    assert_eq!(cache.min_intrinsic_width_in(LayoutDirection::Ltr), 30.0);
    assert_eq!(cache.max_intrinsic_width().ok(), Some(70.0));
}

#[test]
fn unwrapped_text_is_shaped_once_across_width_changes() {
    let mut cache = cache("HHHHHHHHHH", false, TextOverflow::Clip, usize::MAX);

    assert!(cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr));
    assert_eq!(cache.layout_size(), Size::new(100.0, 10.0));
    assert_eq!(cache.reshape_count(), 1);

    assert!(!cache.layout_with_constraints(max_width(150.0), LayoutDirection::Ltr));
    assert!(!cache.layout_with_constraints(max_width(120.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);

    assert!(cache.layout_with_constraints(max_width(50.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);
    assert_eq!(cache.layout_size(), Size::new(50.0, 10.0));
    assert!(cache.did_overflow());
}

#[test]
fn wrapped_text_reshapes_only_when_narrower_than_its_lines() {
    let mut cache = cache("aaa bbb ccc", true, TextOverflow::Clip, usize::MAX);

    assert!(cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr));
    assert_eq!(cache.layout_size(), Size::new(110.0, 10.0));

    assert!(!cache.layout_with_constraints(max_width(150.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);

    assert!(cache.layout_with_constraints(max_width(60.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 2);
    assert_eq!(cache.layout_size(), Size::new(60.0, 30.0));
    assert_eq!(cache.paragraph().map(|p| p.line_count()).ok(), Some(3));
}

#[test]
fn identical_constraints_report_no_change() {
    let mut cache = cache("aaa", true, TextOverflow::Clip, usize::MAX);
    assert!(cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr));
    assert!(!cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);
}

#[test]
fn stale_fonts_force_a_reshape() {
    let resolver = Rc::new(MonospaceFontResolver::new());
    let mut cache = ParagraphLayoutCache::new(
        "HHHH",
        style(),
        resolver.clone(),
        TextOverflow::Clip,
        false,
        usize::MAX,
        1,
    );
    cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr);
    resolver.invalidate_fonts();
    assert!(cache.layout_with_constraints(max_width(150.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 2);
}

#[test]
fn direction_change_forces_a_reshape() {
    let mut cache = cache("HHHH", false, TextOverflow::Clip, usize::MAX);
    cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr);
    cache.layout_with_constraints(max_width(200.0), LayoutDirection::Rtl);
    assert_eq!(cache.reshape_count(), 2);
}

#[test]
fn max_lines_limit_the_height() {
    let mut cache = cache("aaa bbb ccc", true, TextOverflow::Clip, 2);
    cache.layout_with_constraints(max_width(60.0), LayoutDirection::Ltr);
    assert_eq!(cache.layout_size(), Size::new(60.0, 20.0));
    assert!(cache.paragraph().map(|p| p.did_exceed_max_lines()).unwrap_or(false));
}

#[test]
fn min_lines_reserve_height() {
    let mut cache = ParagraphLayoutCache::new(
        "aaa",
        style(),
        Rc::new(MonospaceFontResolver::new()),
        TextOverflow::Clip,
        true,
        usize::MAX,
        3,
    );
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);
    assert_eq!(cache.layout_size(), Size::new(30.0, 30.0));
}

#[test]
fn intrinsic_height_wraps_at_the_given_width() {
    let mut cache = cache("aaa bbb ccc", true, TextOverflow::Clip, usize::MAX);
    assert_eq!(cache.intrinsic_height(60.0, LayoutDirection::Ltr), 30.0);
    assert_eq!(cache.intrinsic_height(60.0, LayoutDirection::Ltr), 30.0);
    assert_eq!(cache.intrinsic_height(110.0, LayoutDirection::Ltr), 10.0);
    assert_eq!(cache.reshape_count(), 0);
}

#[test]
fn text_layout_result_is_built_once_per_layout() {
    let mut cache = cache("aaa bbb ccc", true, TextOverflow::Clip, usize::MAX);
    cache.layout_with_constraints(max_width(60.0), LayoutDirection::Ltr);

    let first = cache.text_layout_result().unwrap();
    assert_eq!(first.line_count(), 3);
    assert_eq!(first.size(), Size::new(60.0, 30.0));
    assert_eq!(first.input().constraints, max_width(60.0));
    let again = cache.text_layout_result().unwrap();
    assert!(Rc::ptr_eq(&first, &again));

    cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr);
    let relaid = cache.text_layout_result().unwrap();
    assert!(!Rc::ptr_eq(&first, &relaid));
    assert_eq!(relaid.line_count(), 1);
}

#[test]
fn update_discards_the_layout() {
    let mut cache = cache("aaa", true, TextOverflow::Clip, usize::MAX);
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);
    cache.update(
        "bbbb",
        style(),
        Rc::new(MonospaceFontResolver::new()),
        TextOverflow::Clip,
        true,
        usize::MAX,
        1,
    );
    assert!(cache.paragraph().is_err());
    assert!(cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr));
    assert_eq!(cache.layout_size(), Size::new(40.0, 10.0));
}

#[test]
fn update_with_the_same_inputs_keeps_the_layout() {
    let resolver: Rc<dyn FontFamilyResolver> = Rc::new(MonospaceFontResolver::new());
    let mut cache = ParagraphLayoutCache::new(
        "aaa bbb",
        style(),
        resolver.clone(),
        TextOverflow::Clip,
        true,
        usize::MAX,
        1,
    );
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);

    cache.update("aaa bbb", style(), resolver.clone(), TextOverflow::Clip, true, usize::MAX, 1);
    assert!(cache.paragraph().is_ok());
    assert!(!cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);

    cache.update("aaa bbb", style(), resolver, TextOverflow::Clip, true, usize::MAX, 2);
    assert!(cache.paragraph().is_err());
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);
    assert_eq!(cache.reshape_count(), 2);
}

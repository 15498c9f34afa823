use super::*;
use crate::text::{MonospaceFontResolver, Placeholder, PlaceholderVerticalAlign};

fn style() -> TextStyle {
    TextStyle::default().with_font_size(10.0)
}

fn cache(text: AnnotatedString) -> MultiParagraphLayoutCache {
    MultiParagraphLayoutCache::new(
        text,
        style(),
        Rc::new(MonospaceFontResolver::new()),
        TextOverflow::Clip,
        true,
        usize::MAX,
        1,
    )
}

fn max_width(width: f32) -> Constraints {
    Constraints::new(0.0, width, 0.0, f32::INFINITY)
}

#[test]
fn layout_is_an_error_before_measuring() {
    let cache = cache("ab".into());
    assert!(matches!(
        cache.layout(),
        Err(TextLayoutError::IllegalState(_))
    ));
    assert!(cache.layout_or_none().is_none());
}

#[test]
fn placeholders_take_their_width() {
    let text = AnnotatedString::new("ab\u{FFFC}").with_placeholder(Placeholder {
        start: 2,
        end: 3,
        width: 20.0,
        height: 10.0,
        vertical_align: PlaceholderVerticalAlign::AboveBaseline,
    });
    let mut cache = cache(text);
    cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr);
    let layout = cache.layout().unwrap();
    assert_eq!(layout.size().width, 40.0);
    let rect = layout.placeholder_rects()[0].unwrap();
    assert_eq!((rect.x, rect.width), (20.0, 20.0));
}

#[test]
fn hard_breaks_become_paragraphs() {
    let mut cache = cache("ab\ncd".into());
    cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr);
    let layout = cache.layout().unwrap();
    assert_eq!(layout.line_count(), 2);
    assert_eq!(layout.size(), Size::new(20.0, 20.0));
}

#[test]
fn reconstrain_shares_the_shaped_text() {
    let mut cache = cache("ab\ncd".into());
    assert!(cache.layout_with_constraints(max_width(200.0), LayoutDirection::Ltr));
    let first = cache.layout().unwrap().clone();

    assert!(!cache.layout_with_constraints(max_width(150.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);
    let second = cache.layout().unwrap();
    assert!(Rc::ptr_eq(first.multi_paragraph(), second.multi_paragraph()));
    assert_eq!(second.input().constraints, max_width(150.0));

    assert!(!cache.layout_with_constraints(max_width(150.0), LayoutDirection::Ltr));
    assert_eq!(cache.reshape_count(), 1);
}

#[test]
fn result_is_valid_only_for_its_own_input() {
    let mut cache = cache("ab".into());
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);
    let layout = cache.layout().unwrap();
    assert!(layout.is_valid_for(layout.input()));

    let mut other = layout.input().clone();
    other.constraints = max_width(90.0);
    assert!(!layout.is_valid_for(&other));

    let mut other = layout.input().clone();
    other.resolver = Rc::new(MonospaceFontResolver::new());
    assert!(!layout.is_valid_for(&other));
}

#[test]
fn intrinsic_widths_resolve_on_demand() {
    let mut cache = cache("aaa bb\ncccc".into());
    assert!(cache.min_intrinsic_width().is_err());
    assert_eq!(cache.min_intrinsic_width_in(LayoutDirection::Ltr), 40.0);
    assert_eq!(cache.max_intrinsic_width_in(LayoutDirection::Ltr), 60.0);
    assert_eq!(cache.intrinsic_height(40.0, LayoutDirection::Ltr), 30.0);
}

#[test]
fn update_reshapes_only_when_an_input_changed() {
    let resolver: Rc<dyn FontFamilyResolver> = Rc::new(MonospaceFontResolver::new());
    let mut cache = MultiParagraphLayoutCache::new(
        "ab\ncd".into(),
        style(),
        resolver.clone(),
        TextOverflow::Clip,
        true,
        usize::MAX,
        1,
    );
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);

    cache.update("ab\ncd".into(), style(), resolver.clone(), TextOverflow::Clip, true, usize::MAX, 1);
    assert!(cache.layout().is_ok());

    cache.update("ab\ncde".into(), style(), resolver, TextOverflow::Clip, true, usize::MAX, 1);
    assert!(cache.layout().is_err());
    cache.layout_with_constraints(max_width(100.0), LayoutDirection::Ltr);
    assert_eq!(cache.reshape_count(), 2);
}

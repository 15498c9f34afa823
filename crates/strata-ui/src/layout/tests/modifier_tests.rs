use super::*;
use std::cell::Cell;
use strata_core::NodeId;
use strata_ui_layout::AlignmentLine;

/// Fills whatever it is given, remembering the last constraints.
struct Filler {
    last: Cell<Option<Constraints>>,
}

impl Filler {
    fn new() -> Self {
        Self { last: Cell::new(None) }
    }
}

struct Measured(Size);

impl Placeable for Measured {
    fn width(&self) -> f32 {
        self.0.width
    }
    fn height(&self) -> f32 {
        self.0.height
    }
    fn node_id(&self) -> NodeId {
        0
    }
    fn get(&self, _line: AlignmentLine) -> Option<f32> {
        None
    }
}

impl Measurable for Filler {
    fn node_id(&self) -> NodeId {
        0
    }

    fn measure(&self, constraints: Constraints) -> Box<dyn Placeable> {
        self.last.set(Some(constraints));
        Box::new(Measured(constraints.max_bounded_size()))
    }

    fn min_intrinsic_width(&self, _height: f32) -> f32 {
        10.0
    }

    fn max_intrinsic_width(&self, _height: f32) -> f32 {
        20.0
    }

    fn min_intrinsic_height(&self, _width: f32) -> f32 {
        5.0
    }

    fn max_intrinsic_height(&self, _width: f32) -> f32 {
        5.0
    }
}

fn scope(direction: LayoutDirection) -> ModifierMeasureScope {
    ModifierMeasureScope::new(Density::ONE, direction, false, None)
}

#[test]
fn padding_deflates_constraints_and_offsets_content() {
    let padding = Padding::new(4.0, 2.0, 6.0, 8.0);
    let wrapped = Filler::new();

    let result = padding.measure(&scope(LayoutDirection::Ltr), &wrapped, Constraints::tight(100.0, 50.0));

    assert_eq!(wrapped.last.get(), Some(Constraints::tight(90.0, 40.0)));
    assert_eq!(result.size, Size::new(100.0, 50.0));
    assert_eq!(result.content_offset, Point::new(4.0, 2.0));

    let rtl = padding.measure(&scope(LayoutDirection::Rtl), &wrapped, Constraints::tight(100.0, 50.0));
    assert_eq!(rtl.content_offset, Point::new(6.0, 2.0));
}

#[test]
fn padding_adds_to_intrinsics() {
    let padding = Padding::symmetric(3.0, 1.0);
    let wrapped = Filler::new();
    assert_eq!(padding.min_intrinsic_width(&wrapped, 100.0), 16.0);
    assert_eq!(padding.max_intrinsic_width(&wrapped, 100.0), 26.0);
    assert_eq!(padding.min_intrinsic_height(&wrapped, 100.0), 7.0);
}

#[test]
fn fixed_size_forces_only_the_given_axis() {
    let fixed = FixedSize::width(30.0);
    let wrapped = Filler::new();

    let result = fixed.measure(&scope(LayoutDirection::Ltr), &wrapped, Constraints::loose(100.0, 40.0));

    assert_eq!(wrapped.last.get(), Some(Constraints::new(30.0, 30.0, 0.0, 40.0)));
    assert_eq!(result.size, Size::new(30.0, 40.0));
    assert_eq!(fixed.max_intrinsic_width(&wrapped, 0.0), 30.0);
    assert_eq!(fixed.max_intrinsic_height(&wrapped, 0.0), 5.0);
}

#[test]
fn intermediate_layout_sees_lookahead_size() {
    let modifier = intermediate_layout(|scope, wrapped, constraints| {
        let target = scope.lookahead_size().unwrap_or(Size::ZERO);
        let placeable = wrapped.measure(Constraints::tight(target.width, target.height));
        ModifierMeasureResult::new(constraints.constrain(placeable.size()), Point::ZERO)
    });
    assert!(modifier.is_intermediate());

    let scope = ModifierMeasureScope::new(Density::ONE, LayoutDirection::Ltr, false, Some(Size::new(12.0, 7.0)));
    let result = modifier.measure(&scope, &Filler::new(), Constraints::loose(100.0, 100.0));
    assert_eq!(result.size, Size::new(12.0, 7.0));
}

#[test]
fn default_place_keeps_measured_offset() {
    let measured = ModifierMeasureResult::new(Size::new(10.0, 10.0), Point::new(1.0, 2.0));
    let place_scope = ModifierPlaceScope::new(true, LayoutDirection::Ltr);
    assert_eq!(Padding::all(1.0).place(&place_scope, &measured), Some(Point::new(1.0, 2.0)));
    assert!(place_scope.is_lookahead_pass());
}

//! Layout modifiers: measure and place wrappers around a node's content.

use std::rc::Rc;
use strata_ui_graphics::{Density, Point, Size};
use strata_ui_layout::{Constraints, LayoutDirection, Measurable, MeasureScope, Placeable};

/// Outcome of a modifier's measure: its own size and where the wrapped
/// content sits inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifierMeasureResult {
    pub size: Size,
    pub content_offset: Point,
}

impl ModifierMeasureResult {
    pub fn new(size: Size, content_offset: Point) -> Self {
        Self {
            size,
            content_offset,
        }
    }

    /// Same size as the wrapped content, no offset.
    pub fn wrapping(placeable: &dyn Placeable) -> Self {
        Self::new(placeable.size(), Point::ZERO)
    }
}

/// Environment of a modifier's measure.
#[derive(Clone, Copy, Debug)]
pub struct ModifierMeasureScope {
    density: Density,
    direction: LayoutDirection,
    lookahead: bool,
    lookahead_size: Option<Size>,
}

impl ModifierMeasureScope {
    pub(crate) fn new(
        density: Density,
        direction: LayoutDirection,
        lookahead: bool,
        lookahead_size: Option<Size>,
    ) -> Self {
        Self {
            density,
            direction,
            lookahead,
            lookahead_size,
        }
    }

    /// For intermediate modifiers in the real pass: the size the content
    /// they wrap got in the lookahead pass.
    pub fn lookahead_size(&self) -> Option<Size> {
        self.lookahead_size
    }
}

impl MeasureScope for ModifierMeasureScope {
    fn density(&self) -> Density {
        self.density
    }

    fn layout_direction(&self) -> LayoutDirection {
        self.direction
    }

    fn is_lookahead_pass(&self) -> bool {
        self.lookahead
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ModifierPlaceScope {
    lookahead: bool,
    direction: LayoutDirection,
}

impl ModifierPlaceScope {
    pub(crate) fn new(lookahead: bool, direction: LayoutDirection) -> Self {
        Self {
            lookahead,
            direction,
        }
    }

    pub fn is_lookahead_pass(&self) -> bool {
        self.lookahead
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.direction
    }
}

/// A modifier that takes part in measuring and placing its node.
///
/// Modifiers wrap each other in list order, the first one outermost.
pub trait LayoutModifier {
    fn measure(
        &self,
        scope: &ModifierMeasureScope,
        wrapped: &dyn Measurable,
        constraints: Constraints,
    ) -> ModifierMeasureResult;

    fn min_intrinsic_width(&self, wrapped: &dyn Measurable, height: f32) -> f32 {
        wrapped.min_intrinsic_width(height)
    }

    fn max_intrinsic_width(&self, wrapped: &dyn Measurable, height: f32) -> f32 {
        wrapped.max_intrinsic_width(height)
    }

    fn min_intrinsic_height(&self, wrapped: &dyn Measurable, width: f32) -> f32 {
        wrapped.min_intrinsic_height(width)
    }

    fn max_intrinsic_height(&self, wrapped: &dyn Measurable, width: f32) -> f32 {
        wrapped.max_intrinsic_height(width)
    }

    /// Intermediate modifiers are left out of the lookahead pass and see
    /// its result through [`ModifierMeasureScope::lookahead_size`].
    fn is_intermediate(&self) -> bool {
        false
    }

    /// Offset of the wrapped content, or `None` to leave the node and its
    /// subtree unplaced.
    fn place(&self, scope: &ModifierPlaceScope, measured: &ModifierMeasureResult) -> Option<Point> {
        let _ = scope;
        Some(measured.content_offset)
    }
}

/// Insets the content; start and end follow the layout direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    pub start: f32,
    pub top: f32,
    pub end: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn new(start: f32, top: f32, end: f32, bottom: f32) -> Self {
        Self {
            start,
            top,
            end,
            bottom,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    fn horizontal(&self) -> f32 {
        self.start + self.end
    }

    fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl LayoutModifier for Padding {
    fn measure(
        &self,
        scope: &ModifierMeasureScope,
        wrapped: &dyn Measurable,
        constraints: Constraints,
    ) -> ModifierMeasureResult {
        let inner = constraints.deflate(self.horizontal(), self.vertical());
        let placeable = wrapped.measure(inner);
        let size = constraints.constrain(Size::new(
            placeable.width() + self.horizontal(),
            placeable.height() + self.vertical(),
        ));
        let left = match scope.layout_direction() {
            LayoutDirection::Ltr => self.start,
            LayoutDirection::Rtl => self.end,
        };
        ModifierMeasureResult::new(size, Point::new(left, self.top))
    }

    fn min_intrinsic_width(&self, wrapped: &dyn Measurable, height: f32) -> f32 {
        wrapped.min_intrinsic_width((height - self.vertical()).max(0.0)) + self.horizontal()
    }

    fn max_intrinsic_width(&self, wrapped: &dyn Measurable, height: f32) -> f32 {
        wrapped.max_intrinsic_width((height - self.vertical()).max(0.0)) + self.horizontal()
    }

    fn min_intrinsic_height(&self, wrapped: &dyn Measurable, width: f32) -> f32 {
        wrapped.min_intrinsic_height((width - self.horizontal()).max(0.0)) + self.vertical()
    }

    fn max_intrinsic_height(&self, wrapped: &dyn Measurable, width: f32) -> f32 {
        wrapped.max_intrinsic_height((width - self.horizontal()).max(0.0)) + self.vertical()
    }
}

/// Forces a width and/or height, within the incoming constraints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl FixedSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn width(width: f32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub fn height(height: f32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }
}

impl LayoutModifier for FixedSize {
    fn measure(
        &self,
        _scope: &ModifierMeasureScope,
        wrapped: &dyn Measurable,
        constraints: Constraints,
    ) -> ModifierMeasureResult {
        let width = self.width.map(|width| constraints.constrain_width(width));
        let height = self.height.map(|height| constraints.constrain_height(height));
        let inner = Constraints::new(
            width.unwrap_or(constraints.min_width),
            width.unwrap_or(constraints.max_width),
            height.unwrap_or(constraints.min_height),
            height.unwrap_or(constraints.max_height),
        );
        let placeable = wrapped.measure(inner);
        let size = Size::new(
            width.unwrap_or_else(|| placeable.width()),
            height.unwrap_or_else(|| placeable.height()),
        );
        ModifierMeasureResult::new(constraints.constrain(size), Point::ZERO)
    }

    fn min_intrinsic_width(&self, wrapped: &dyn Measurable, height: f32) -> f32 {
        self.width
            .unwrap_or_else(|| wrapped.min_intrinsic_width(self.height.unwrap_or(height)))
    }

    fn max_intrinsic_width(&self, wrapped: &dyn Measurable, height: f32) -> f32 {
        self.width
            .unwrap_or_else(|| wrapped.max_intrinsic_width(self.height.unwrap_or(height)))
    }

    fn min_intrinsic_height(&self, wrapped: &dyn Measurable, width: f32) -> f32 {
        self.height
            .unwrap_or_else(|| wrapped.min_intrinsic_height(self.width.unwrap_or(width)))
    }

    fn max_intrinsic_height(&self, wrapped: &dyn Measurable, width: f32) -> f32 {
        self.height
            .unwrap_or_else(|| wrapped.max_intrinsic_height(self.width.unwrap_or(width)))
    }
}

type IntermediateMeasure =
    dyn Fn(&ModifierMeasureScope, &dyn Measurable, Constraints) -> ModifierMeasureResult;

/// Modifier that only runs in the real pass and can size itself from the
/// lookahead result.
pub struct IntermediateLayout {
    measure: Box<IntermediateMeasure>,
}

impl LayoutModifier for IntermediateLayout {
    fn measure(
        &self,
        scope: &ModifierMeasureScope,
        wrapped: &dyn Measurable,
        constraints: Constraints,
    ) -> ModifierMeasureResult {
        (self.measure)(scope, wrapped, constraints)
    }

    fn is_intermediate(&self) -> bool {
        true
    }
}

pub fn intermediate_layout<F>(measure: F) -> Rc<dyn LayoutModifier>
where
    F: Fn(&ModifierMeasureScope, &dyn Measurable, Constraints) -> ModifierMeasureResult + 'static,
{
    Rc::new(IntermediateLayout {
        measure: Box::new(measure),
    })
}

#[cfg(test)]
#[path = "tests/modifier_tests.rs"]
mod tests;

use strata_ui_graphics::Size;
use strata_ui_layout::{
    Alignment, Axis, Constraints, HorizontalAlignment, IntrinsicKind, LayoutDirection, Measurable,
    MeasurePolicy, MeasureResult, MeasureScope, Placement, VerticalAlignment,
};

fn fold_max(measurables: &[Box<dyn Measurable>], query: impl Fn(&dyn Measurable) -> f32) -> f32 {
    measurables
        .iter()
        .map(|measurable| query(measurable.as_ref()))
        .fold(0.0, f32::max)
}

/// MeasurePolicy for Box layout - overlays children according to alignment.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxMeasurePolicy {
    pub content_alignment: Alignment,
    pub propagate_min_constraints: bool,
}

impl BoxMeasurePolicy {
    pub fn new(content_alignment: Alignment, propagate_min_constraints: bool) -> Self {
        Self {
            content_alignment,
            propagate_min_constraints,
        }
    }
}

impl Default for BoxMeasurePolicy {
    fn default() -> Self {
        Self::new(Alignment::TOP_START, false)
    }
}

impl MeasurePolicy for BoxMeasurePolicy {
    fn measure(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        let child_constraints = if self.propagate_min_constraints {
            constraints
        } else {
            constraints.loosen()
        };

        let placeables: Vec<_> = measurables
            .iter()
            .map(|measurable| measurable.measure(child_constraints))
            .collect();
        let content = placeables.iter().fold(Size::ZERO, |size, placeable| {
            Size::new(size.width.max(placeable.width()), size.height.max(placeable.height()))
        });
        let size = constraints.constrain(content);

        let placements = placeables
            .iter()
            .map(|placeable| {
                let offset =
                    self.content_alignment
                        .align(size, placeable.size(), scope.layout_direction());
                Placement::at(placeable.as_ref(), offset.x, offset.y)
            })
            .collect();
        MeasureResult::new(size, placements)
    }

    fn min_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        fold_max(measurables, |m| m.min_intrinsic_width(height))
    }

    fn max_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        fold_max(measurables, |m| m.max_intrinsic_width(height))
    }

    fn min_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        fold_max(measurables, |m| m.min_intrinsic_height(width))
    }

    fn max_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        fold_max(measurables, |m| m.max_intrinsic_height(width))
    }
}

/// Cross-axis alignment for linear layouts.
/// This is axis-agnostic and gets interpreted based on the main axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CrossAxisAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl CrossAxisAlignment {
    fn align(&self, available: f32, child: f32) -> f32 {
        match self {
            CrossAxisAlignment::Start => 0.0,
            CrossAxisAlignment::Center => ((available - child) / 2.0).max(0.0).round(),
            CrossAxisAlignment::End => (available - child).max(0.0),
        }
    }
}

impl From<HorizontalAlignment> for CrossAxisAlignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Start => CrossAxisAlignment::Start,
            HorizontalAlignment::CenterHorizontally => CrossAxisAlignment::Center,
            HorizontalAlignment::End => CrossAxisAlignment::End,
        }
    }
}

impl From<VerticalAlignment> for CrossAxisAlignment {
    fn from(alignment: VerticalAlignment) -> Self {
        match alignment {
            VerticalAlignment::Top => CrossAxisAlignment::Start,
            VerticalAlignment::CenterVertically => CrossAxisAlignment::Center,
            VerticalAlignment::Bottom => CrossAxisAlignment::End,
        }
    }
}

/// Row or column: children one after another along `axis`, `spacing`
/// apart.
///
/// Children may overflow the main axis; they are measured with the space
/// left after their predecessors and placed past the end when it runs out.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearMeasurePolicy {
    pub axis: Axis,
    pub spacing: f32,
    pub cross_axis_alignment: CrossAxisAlignment,
}

impl LinearMeasurePolicy {
    pub fn new(axis: Axis, spacing: f32, cross_axis_alignment: CrossAxisAlignment) -> Self {
        Self {
            axis,
            spacing: spacing.max(0.0),
            cross_axis_alignment,
        }
    }

    pub fn row(spacing: f32, vertical_alignment: VerticalAlignment) -> Self {
        Self::new(Axis::Horizontal, spacing, vertical_alignment.into())
    }

    pub fn column(spacing: f32, horizontal_alignment: HorizontalAlignment) -> Self {
        Self::new(Axis::Vertical, spacing, horizontal_alignment.into())
    }

    fn make_constraints(&self, max_main: f32, max_cross: f32) -> Constraints {
        let (max_width, max_height) = self.axis.width_height(max_main, max_cross);
        Constraints::new(0.0, max_width, 0.0, max_height)
    }

    fn total_spacing(&self, count: usize) -> f32 {
        self.spacing * count.saturating_sub(1) as f32
    }

    /// Intrinsic along the main axis: children summed.
    fn main_intrinsic(&self, measurables: &[Box<dyn Measurable>], query: impl Fn(&dyn Measurable) -> f32) -> f32 {
        measurables
            .iter()
            .map(|measurable| query(measurable.as_ref()))
            .sum::<f32>()
            + self.total_spacing(measurables.len())
    }
}

impl MeasurePolicy for LinearMeasurePolicy {
    fn measure(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        let (max_main, max_cross) = self
            .axis
            .main_cross(constraints.max_width, constraints.max_height);

        let mut used_main = 0.0_f32;
        let mut cross_size = 0.0_f32;
        let mut placeables = Vec::with_capacity(measurables.len());
        for (index, measurable) in measurables.iter().enumerate() {
            if index > 0 {
                used_main += self.spacing;
            }
            let remaining = (max_main - used_main).max(0.0);
            let placeable = measurable.measure(self.make_constraints(remaining, max_cross));
            let (main, cross) = self.axis.main_cross(placeable.width(), placeable.height());
            placeables.push((used_main, placeable));
            used_main += main;
            cross_size = cross_size.max(cross);
        }

        let (width, height) = self.axis.width_height(used_main, cross_size);
        let size = constraints.constrain(Size::new(width, height));
        let (main_size, cross_available) = self.axis.main_cross(size.width, size.height);

        let rtl_row = self.axis == Axis::Horizontal && scope.layout_direction() == LayoutDirection::Rtl;
        let placements = placeables
            .iter()
            .map(|(main_position, placeable)| {
                let (child_main, child_cross) = self.axis.main_cross(placeable.width(), placeable.height());
                let main = if rtl_row {
                    main_size - main_position - child_main
                } else {
                    *main_position
                };
                let cross = self.cross_axis_alignment.align(cross_available, child_cross);
                let (x, y) = self.axis.width_height(main, cross);
                Placement::at(placeable.as_ref(), x, y)
            })
            .collect();
        MeasureResult::new(size, placements)
    }

    fn min_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        match self.axis {
            Axis::Horizontal => self.main_intrinsic(measurables, |m| m.min_intrinsic_width(height)),
            Axis::Vertical => fold_max(measurables, |m| m.min_intrinsic_width(height)),
        }
    }

    fn max_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        match self.axis {
            Axis::Horizontal => self.main_intrinsic(measurables, |m| m.max_intrinsic_width(height)),
            Axis::Vertical => fold_max(measurables, |m| m.max_intrinsic_width(height)),
        }
    }

    fn min_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        match self.axis {
            Axis::Horizontal => fold_max(measurables, |m| m.min_intrinsic_height(width)),
            Axis::Vertical => self.main_intrinsic(measurables, |m| m.min_intrinsic_height(width)),
        }
    }

    fn max_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        match self.axis {
            Axis::Horizontal => fold_max(measurables, |m| m.max_intrinsic_height(width)),
            Axis::Vertical => self.main_intrinsic(measurables, |m| m.max_intrinsic_height(width)),
        }
    }
}

/// Fixed size regardless of content; children get loose constraints up to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSizePolicy {
    pub width: f32,
    pub height: f32,
}

impl FixedSizePolicy {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl MeasurePolicy for FixedSizePolicy {
    fn measure(
        &self,
        _scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        let size = constraints.constrain(Size::new(self.width, self.height));
        let child_constraints = Constraints::loose(size.width, size.height);
        let placements = measurables
            .iter()
            .map(|measurable| {
                let placeable = measurable.measure(child_constraints);
                Placement::at(placeable.as_ref(), 0.0, 0.0)
            })
            .collect();
        MeasureResult::new(size, placements)
    }

    fn min_intrinsic_width(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _height: f32) -> f32 {
        self.width
    }

    fn max_intrinsic_width(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _height: f32) -> f32 {
        self.width
    }

    fn min_intrinsic_height(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _width: f32) -> f32 {
        self.height
    }

    fn max_intrinsic_height(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _width: f32) -> f32 {
        self.height
    }
}

/// Takes the smallest size allowed and never measures its children.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmptyMeasurePolicy;

impl MeasurePolicy for EmptyMeasurePolicy {
    fn measure(
        &self,
        _scope: &dyn MeasureScope,
        _measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        MeasureResult::new(constraints.min_size(), Vec::new())
    }

    fn min_intrinsic_width(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _height: f32) -> f32 {
        0.0
    }

    fn max_intrinsic_width(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _height: f32) -> f32 {
        0.0
    }

    fn min_intrinsic_height(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _width: f32) -> f32 {
        0.0
    }

    fn max_intrinsic_height(&self, _scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _width: f32) -> f32 {
        0.0
    }
}

/// Sizes its children to one of their intrinsic measurements, like an
/// `IntrinsicWidth(Min)` wrapper: the answer becomes a tight constraint on
/// that axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntrinsicSizePolicy {
    pub kind: IntrinsicKind,
}

impl IntrinsicSizePolicy {
    pub fn new(kind: IntrinsicKind) -> Self {
        Self { kind }
    }

    fn child_constraints(&self, measurables: &[Box<dyn Measurable>], constraints: Constraints) -> Constraints {
        if self.kind.is_width() {
            let width = fold_max(measurables, |m| self.kind.query(m, constraints.max_height));
            constraints.tighten_width(constraints.constrain_width(width))
        } else {
            let height = fold_max(measurables, |m| self.kind.query(m, constraints.max_width));
            constraints.tighten_height(constraints.constrain_height(height))
        }
    }
}

impl MeasurePolicy for IntrinsicSizePolicy {
    fn measure(
        &self,
        _scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        let child_constraints = self.child_constraints(measurables, constraints);
        let mut size = Size::ZERO;
        let placements = measurables
            .iter()
            .map(|measurable| {
                let placeable = measurable.measure(child_constraints);
                size = Size::new(size.width.max(placeable.width()), size.height.max(placeable.height()));
                Placement::at(placeable.as_ref(), 0.0, 0.0)
            })
            .collect();
        MeasureResult::new(child_constraints.constrain(size), placements)
    }

    fn min_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        match self.kind {
            IntrinsicKind::MinWidth | IntrinsicKind::MaxWidth => fold_max(measurables, |m| self.kind.query(m, height)),
            _ => fold_max(measurables, |m| m.min_intrinsic_width(height)),
        }
    }

    fn max_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        match self.kind {
            IntrinsicKind::MinWidth | IntrinsicKind::MaxWidth => fold_max(measurables, |m| self.kind.query(m, height)),
            _ => fold_max(measurables, |m| m.max_intrinsic_width(height)),
        }
    }

    fn min_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        match self.kind {
            IntrinsicKind::MinHeight | IntrinsicKind::MaxHeight => fold_max(measurables, |m| self.kind.query(m, width)),
            _ => fold_max(measurables, |m| m.min_intrinsic_height(width)),
        }
    }

    fn max_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        match self.kind {
            IntrinsicKind::MinHeight | IntrinsicKind::MaxHeight => fold_max(measurables, |m| self.kind.query(m, width)),
            _ => fold_max(measurables, |m| m.max_intrinsic_height(width)),
        }
    }
}

#[cfg(test)]
#[path = "tests/policies_tests.rs"]
mod tests;

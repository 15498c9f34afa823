//! Core layout traits and types shared by layout nodes and policies.

use crate::{AlignmentLine, Constraints, LayoutDirection};
use strata_core::collections::map::HashMap;
use strata_core::NodeId;
use strata_ui_graphics::{Density, Size};

/// Object capable of measuring a layout child and exposing intrinsic sizes.
pub trait Measurable {
    fn node_id(&self) -> NodeId;

    /// Measures the child with the provided constraints, returning a [`Placeable`].
    ///
    /// Measuring the same child twice within one measure of its parent is a
    /// programming error.
    fn measure(&self, constraints: Constraints) -> Box<dyn Placeable>;

    fn min_intrinsic_width(&self, height: f32) -> f32;

    fn max_intrinsic_width(&self, height: f32) -> f32;

    fn min_intrinsic_height(&self, width: f32) -> f32;

    fn max_intrinsic_height(&self, width: f32) -> f32;
}

/// Result of measuring a single child.
pub trait Placeable {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn node_id(&self) -> NodeId;

    /// Position of `line` in the child's own space, if it provides one.
    ///
    /// Reading a line while measuring makes the parent depend on its value.
    fn get(&self, line: AlignmentLine) -> Option<f32>;

    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// Environment a measure policy runs in.
pub trait MeasureScope {
    fn density(&self) -> Density {
        Density::ONE
    }

    fn layout_direction(&self) -> LayoutDirection {
        LayoutDirection::Ltr
    }

    /// True while the speculative lookahead pass is running.
    fn is_lookahead_pass(&self) -> bool {
        false
    }
}

/// Receives the placement of children while a node lays out.
pub trait PlacementScope {
    fn layout_direction(&self) -> LayoutDirection;

    fn is_lookahead_pass(&self) -> bool {
        false
    }

    fn place_with_z(&mut self, node_id: NodeId, x: f32, y: f32, z_index: i32);

    fn place(&mut self, node_id: NodeId, x: f32, y: f32) {
        self.place_with_z(node_id, x, y, 0);
    }

    /// Places at `x` measured from the start edge, mirrored in RTL layouts.
    fn place_relative(&mut self, placeable: &dyn Placeable, x: f32, y: f32, parent_width: f32) {
        let x = match self.layout_direction() {
            LayoutDirection::Ltr => x,
            LayoutDirection::Rtl => parent_width - placeable.width() - x,
        };
        self.place(placeable.node_id(), x, y);
    }
}

/// Policy responsible for measuring and placing children.
pub trait MeasurePolicy {
    fn measure(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult;

    fn min_intrinsic_width(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        height: f32,
    ) -> f32;

    fn max_intrinsic_width(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        height: f32,
    ) -> f32;

    fn min_intrinsic_height(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        width: f32,
    ) -> f32;

    fn max_intrinsic_height(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        width: f32,
    ) -> f32;

    /// Places children after a successful measure.
    ///
    /// The default replays `result.placements`. Policies that measure
    /// children or query intrinsics while placing override this and place
    /// through `scope` directly.
    fn place_children(
        &self,
        scope: &mut dyn PlacementScope,
        measurables: &[Box<dyn Measurable>],
        result: &MeasureResult,
    ) {
        let _ = measurables;
        for placement in &result.placements {
            scope.place_with_z(placement.node_id, placement.x, placement.y, placement.z_index);
        }
    }
}

/// Result of a measurement operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureResult {
    pub size: Size,
    pub alignment_lines: HashMap<AlignmentLine, f32>,
    pub placements: Vec<Placement>,
}

impl MeasureResult {
    pub fn new(size: Size, placements: Vec<Placement>) -> Self {
        Self {
            size,
            alignment_lines: HashMap::default(),
            placements,
        }
    }

    pub fn with_alignment_line(mut self, line: AlignmentLine, value: f32) -> Self {
        self.alignment_lines.insert(line, value);
        self
    }
}

/// Placement of one measured child, recorded at measure time and executed
/// when the parent lays out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub node_id: NodeId,
    pub x: f32,
    pub y: f32,
    pub z_index: i32,
}

impl Placement {
    pub fn new(node_id: NodeId, x: f32, y: f32, z_index: i32) -> Self {
        Self {
            node_id,
            x,
            y,
            z_index,
        }
    }

    pub fn at(placeable: &dyn Placeable, x: f32, y: f32) -> Self {
        Self::new(placeable.node_id(), x, y, 0)
    }
}

#[cfg(test)]
#[path = "tests/core_tests.rs"]
mod tests;

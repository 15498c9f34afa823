//! Coordinator chain of a node.
//!
//! Each layout modifier gets a coordinator wrapping the next one inward,
//! and the innermost coordinator runs the node's measure policy. Measuring
//! the outermost coordinator measures the whole node.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strata_core::NodeId;
use strata_ui_graphics::{Density, Point, Size};
use strata_ui_layout::{
    AlignmentLine, Constraints, IntrinsicKind, LayoutDirection, Measurable, MeasurePolicy,
    MeasureResult, MeasureScope, Placeable,
};

use super::modifier::{LayoutModifier, ModifierMeasureResult, ModifierMeasureScope};
use crate::lookahead::LayoutPass;
use crate::node::NodeMeasurement;

/// Environment handed to measure policies.
pub(crate) struct NodeMeasureScope {
    density: Density,
    direction: LayoutDirection,
    pass: LayoutPass,
}

impl NodeMeasureScope {
    pub(crate) fn new(density: Density, direction: LayoutDirection, pass: LayoutPass) -> Self {
        Self {
            density,
            direction,
            pass,
        }
    }
}

impl MeasureScope for NodeMeasureScope {
    fn density(&self) -> Density {
        self.density
    }

    fn layout_direction(&self) -> LayoutDirection {
        self.direction
    }

    fn is_lookahead_pass(&self) -> bool {
        self.pass.is_lookahead()
    }
}

/// What one modifier decided during the last measure, kept for placement.
#[derive(Clone)]
pub(crate) struct MeasuredModifier {
    pub(crate) index: usize,
    pub(crate) modifier: Rc<dyn LayoutModifier>,
    pub(crate) result: ModifierMeasureResult,
}

trait NodeCoordinator: Measurable {
    /// Offset of the node's content inside this coordinator.
    fn total_content_offset(&self) -> Point;

    fn as_measurable(&self) -> &dyn Measurable;
}

struct LayoutModifierCoordinator<'a> {
    node_id: NodeId,
    index: usize,
    modifier: Rc<dyn LayoutModifier>,
    wrapped: Box<dyn NodeCoordinator + 'a>,
    scope: ModifierMeasureScope,
    accumulated_offset: Cell<Point>,
    results: Rc<RefCell<SmallVec<[MeasuredModifier; 2]>>>,
}

impl Measurable for LayoutModifierCoordinator<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn measure(&self, constraints: Constraints) -> Box<dyn Placeable> {
        let result = self
            .modifier
            .measure(&self.scope, self.wrapped.as_measurable(), constraints);
        let accumulated = result.content_offset + self.wrapped.total_content_offset();
        self.accumulated_offset.set(accumulated);
        let measured = MeasuredModifier {
            index: self.index,
            modifier: self.modifier.clone(),
            result,
        };
        let mut results = self.results.borrow_mut();
        match results.iter_mut().find(|entry| entry.index == self.index) {
            Some(entry) => *entry = measured,
            None => results.push(measured),
        }
        drop(results);
        Box::new(CoordinatorPlaceable {
            node_id: self.node_id,
            size: result.size,
        })
    }

    fn min_intrinsic_width(&self, height: f32) -> f32 {
        self.modifier.min_intrinsic_width(self.wrapped.as_measurable(), height)
    }

    fn max_intrinsic_width(&self, height: f32) -> f32 {
        self.modifier.max_intrinsic_width(self.wrapped.as_measurable(), height)
    }

    fn min_intrinsic_height(&self, width: f32) -> f32 {
        self.modifier.min_intrinsic_height(self.wrapped.as_measurable(), width)
    }

    fn max_intrinsic_height(&self, width: f32) -> f32 {
        self.modifier.max_intrinsic_height(self.wrapped.as_measurable(), width)
    }
}

impl NodeCoordinator for LayoutModifierCoordinator<'_> {
    fn total_content_offset(&self) -> Point {
        self.accumulated_offset.get()
    }

    fn as_measurable(&self) -> &dyn Measurable {
        self
    }
}

/// Runs the node's own measure policy.
struct InnerCoordinator<'a> {
    node_id: NodeId,
    policy: Rc<dyn MeasurePolicy>,
    measurables: &'a [Box<dyn Measurable>],
    scope: &'a NodeMeasureScope,
    result: Rc<RefCell<Option<MeasureResult>>>,
}

impl Measurable for InnerCoordinator<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn measure(&self, constraints: Constraints) -> Box<dyn Placeable> {
        let result = self.policy.measure(self.scope, self.measurables, constraints);
        let size = result.size;
        *self.result.borrow_mut() = Some(result);
        Box::new(CoordinatorPlaceable {
            node_id: self.node_id,
            size,
        })
    }

    fn min_intrinsic_width(&self, height: f32) -> f32 {
        self.policy
            .min_intrinsic_width(self.scope, self.measurables, height)
    }

    fn max_intrinsic_width(&self, height: f32) -> f32 {
        self.policy
            .max_intrinsic_width(self.scope, self.measurables, height)
    }

    fn min_intrinsic_height(&self, width: f32) -> f32 {
        self.policy
            .min_intrinsic_height(self.scope, self.measurables, width)
    }

    fn max_intrinsic_height(&self, width: f32) -> f32 {
        self.policy
            .max_intrinsic_height(self.scope, self.measurables, width)
    }
}

impl NodeCoordinator for InnerCoordinator<'_> {
    fn total_content_offset(&self) -> Point {
        Point::ZERO
    }

    fn as_measurable(&self) -> &dyn Measurable {
        self
    }
}

/// Size handed from a coordinator to the one wrapping it. Alignment lines
/// are resolved on the node, not on its coordinators.
struct CoordinatorPlaceable {
    node_id: NodeId,
    size: Size,
}

impl Placeable for CoordinatorPlaceable {
    fn width(&self) -> f32 {
        self.size.width
    }

    fn height(&self) -> f32 {
        self.size.height
    }

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn get(&self, _line: AlignmentLine) -> Option<f32> {
        None
    }
}

pub(crate) struct ChainMeasurement {
    pub(crate) content: MeasureResult,
    pub(crate) size: Size,
    pub(crate) content_offset: Point,
    pub(crate) modifiers: SmallVec<[MeasuredModifier; 2]>,
}

pub(crate) struct CoordinatorChain<'a> {
    outer: Box<dyn NodeCoordinator + 'a>,
    content: Rc<RefCell<Option<MeasureResult>>>,
    results: Rc<RefCell<SmallVec<[MeasuredModifier; 2]>>>,
}

impl<'a> CoordinatorChain<'a> {
    /// Builds the chain for one pass. Intermediate modifiers only run in the
    /// real pass, where `lookahead` supplies the size they target.
    pub(crate) fn new(
        node_id: NodeId,
        policy: Rc<dyn MeasurePolicy>,
        measurables: &'a [Box<dyn Measurable>],
        scope: &'a NodeMeasureScope,
        modifiers: &[Rc<dyn LayoutModifier>],
        lookahead: Option<&NodeMeasurement>,
    ) -> Self {
        let content = Rc::new(RefCell::new(None));
        let results = Rc::new(RefCell::new(SmallVec::new()));
        let mut outer: Box<dyn NodeCoordinator + 'a> = Box::new(InnerCoordinator {
            node_id,
            policy,
            measurables,
            scope,
            result: content.clone(),
        });
        for (index, modifier) in modifiers.iter().enumerate().rev() {
            let lookahead_size = if modifier.is_intermediate() {
                if scope.is_lookahead_pass() {
                    continue;
                }
                lookahead.map(|measurement| measurement.size_inside(index))
            } else {
                None
            };
            outer = Box::new(LayoutModifierCoordinator {
                node_id,
                index,
                modifier: modifier.clone(),
                wrapped: outer,
                scope: ModifierMeasureScope::new(
                    scope.density(),
                    scope.layout_direction(),
                    scope.is_lookahead_pass(),
                    lookahead_size,
                ),
                accumulated_offset: Cell::new(Point::ZERO),
                results: results.clone(),
            });
        }
        Self {
            outer,
            content,
            results,
        }
    }

    pub(crate) fn measure(self, constraints: Constraints) -> ChainMeasurement {
        let placeable = self.outer.measure(constraints);
        let content_offset = self.outer.total_content_offset();
        let content = self.content.borrow_mut().take().unwrap_or_else(|| {
            log::warn!(
                "node {} content was not measured by its modifiers",
                self.outer.node_id()
            );
            MeasureResult::default()
        });
        let mut modifiers = std::mem::take(&mut *self.results.borrow_mut());
        modifiers.sort_by_key(|measured| measured.index);
        ChainMeasurement {
            content,
            size: placeable.size(),
            content_offset,
            modifiers,
        }
    }

    pub(crate) fn intrinsic(&self, kind: IntrinsicKind, cross: f32) -> f32 {
        kind.query(self.outer.as_measurable(), cross)
    }
}

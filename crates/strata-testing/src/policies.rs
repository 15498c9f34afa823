//! Measure policies and modifiers that make the delegate observable.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strata_ui::layout::{LayoutModifier, ModifierMeasureResult, ModifierMeasureScope, ModifierPlaceScope};
use strata_ui_graphics::{Point, Size};
use strata_ui_layout::{
    Constraints, Measurable, MeasurePolicy, MeasureResult, MeasureScope, Placement, PlacementScope,
};

type Hook = RefCell<Option<Box<dyn FnOnce()>>>;

fn run_hook(hook: &Hook) {
    let block = hook.borrow_mut().take();
    if let Some(block) = block {
        block();
    }
}

fn replay(scope: &mut dyn PlacementScope, result: &MeasureResult) {
    for placement in &result.placements {
        scope.place_with_z(placement.node_id, placement.x, placement.y, placement.z_index);
    }
}

/// Configurable policy behind [`crate::TestNode`].
///
/// With a size the node is that size and its children are measured with
/// it as their maximum; without one it fills the incoming constraints.
pub struct TestPolicy {
    pub(crate) size: Cell<Option<f32>>,
    pub(crate) wrap_children: Cell<bool>,
    pub(crate) measure_in_layout_block: Cell<bool>,
    pub(crate) should_place_children: Cell<bool>,
    pub(crate) during_measure: Hook,
    pub(crate) during_layout: Hook,
    child_constraints: Cell<Option<Constraints>>,
}

impl Default for TestPolicy {
    fn default() -> Self {
        Self {
            size: Cell::new(None),
            wrap_children: Cell::new(false),
            measure_in_layout_block: Cell::new(false),
            should_place_children: Cell::new(true),
            during_measure: RefCell::new(None),
            during_layout: RefCell::new(None),
            child_constraints: Cell::new(None),
        }
    }
}

impl TestPolicy {
    fn constraints_for_children(&self, constraints: Constraints) -> Constraints {
        match self.size.get() {
            Some(size) => Constraints::new(
                constraints.min_width.min(size),
                size,
                constraints.min_height.min(size),
                size,
            ),
            None => constraints,
        }
    }

    /// Own size when set, otherwise the largest answer among the children.
    fn intrinsic(&self, measurables: &[Box<dyn Measurable>], query: impl Fn(&dyn Measurable) -> f32) -> f32 {
        match self.size.get() {
            Some(size) => size,
            None => measurables
                .iter()
                .map(|measurable| query(measurable.as_ref()))
                .fold(0.0, f32::max),
        }
    }
}

impl MeasurePolicy for TestPolicy {
    fn measure(
        &self,
        _scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        run_hook(&self.during_measure);
        let child_constraints = self.constraints_for_children(constraints);
        self.child_constraints.set(Some(child_constraints));

        let mut content = Size::ZERO;
        let mut placements = Vec::new();
        if !self.measure_in_layout_block.get() {
            for measurable in measurables {
                let placeable = measurable.measure(child_constraints);
                content = Size::new(
                    content.width.max(placeable.width()),
                    content.height.max(placeable.height()),
                );
                placements.push(Placement::at(placeable.as_ref(), 0.0, 0.0));
            }
        }

        let size = if self.wrap_children.get() {
            content
        } else {
            match self.size.get() {
                Some(size) => Size::new(size, size),
                None => constraints.max_bounded_size(),
            }
        };
        MeasureResult::new(constraints.constrain(size), placements)
    }

    fn min_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        self.intrinsic(measurables, |m| m.min_intrinsic_width(height))
    }

    fn max_intrinsic_width(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], height: f32) -> f32 {
        self.intrinsic(measurables, |m| m.max_intrinsic_width(height))
    }

    fn min_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        self.intrinsic(measurables, |m| m.min_intrinsic_height(width))
    }

    fn max_intrinsic_height(&self, _scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        self.intrinsic(measurables, |m| m.max_intrinsic_height(width))
    }

    fn place_children(
        &self,
        scope: &mut dyn PlacementScope,
        measurables: &[Box<dyn Measurable>],
        result: &MeasureResult,
    ) {
        run_hook(&self.during_layout);
        if !self.should_place_children.get() {
            return;
        }
        if self.measure_in_layout_block.get() {
            let constraints = self
                .child_constraints
                .get()
                .unwrap_or(Constraints::UNBOUNDED);
            for measurable in measurables {
                let placeable = measurable.measure(constraints);
                scope.place(placeable.node_id(), 0.0, 0.0);
            }
        } else {
            replay(scope, result);
        }
    }
}

/// One step of a recorded layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutEvent {
    Measure { node: &'static str, lookahead: bool },
    Place { node: &'static str, lookahead: bool },
}

impl LayoutEvent {
    pub fn measure(node: &'static str) -> Self {
        LayoutEvent::Measure {
            node,
            lookahead: false,
        }
    }

    pub fn lookahead_measure(node: &'static str) -> Self {
        LayoutEvent::Measure {
            node,
            lookahead: true,
        }
    }

    pub fn place(node: &'static str) -> Self {
        LayoutEvent::Place {
            node,
            lookahead: false,
        }
    }

    pub fn lookahead_place(node: &'static str) -> Self {
        LayoutEvent::Place {
            node,
            lookahead: true,
        }
    }
}

pub type EventLog = Rc<RefCell<Vec<LayoutEvent>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Logs every measure and placement under `name`. Children get the incoming
/// constraints, capped by `child_max` when set; the node fills its
/// constraints.
pub struct RecordingPolicy {
    name: &'static str,
    log: EventLog,
    pub child_max: Cell<Option<f32>>,
}

impl RecordingPolicy {
    pub fn new(name: &'static str, log: &EventLog) -> Rc<Self> {
        Rc::new(Self {
            name,
            log: log.clone(),
            child_max: Cell::new(None),
        })
    }
}

impl MeasurePolicy for RecordingPolicy {
    fn measure(
        &self,
        scope: &dyn MeasureScope,
        measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        self.log.borrow_mut().push(LayoutEvent::Measure {
            node: self.name,
            lookahead: scope.is_lookahead_pass(),
        });
        let child_constraints = match self.child_max.get() {
            Some(max) => Constraints::new(0.0, max, 0.0, max),
            None => constraints,
        };
        let placements = measurables
            .iter()
            .map(|measurable| {
                let placeable = measurable.measure(child_constraints);
                Placement::at(placeable.as_ref(), 0.0, 0.0)
            })
            .collect();
        MeasureResult::new(constraints.max_bounded_size(), placements)
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

    fn place_children(
        &self,
        scope: &mut dyn PlacementScope,
        _measurables: &[Box<dyn Measurable>],
        result: &MeasureResult,
    ) {
        self.log.borrow_mut().push(LayoutEvent::Place {
            node: self.name,
            lookahead: scope.is_lookahead_pass(),
        });
        replay(scope, result);
    }
}

/// Fills the constraints and sizes each child to its max intrinsic width
/// while placing, which ties the children's intrinsics to the layout block.
#[derive(Default)]
pub struct IntrinsicsInPlacementPolicy;

impl MeasurePolicy for IntrinsicsInPlacementPolicy {
    fn measure(
        &self,
        _scope: &dyn MeasureScope,
        _measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        MeasureResult::new(constraints.max_bounded_size(), Vec::new())
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

    fn place_children(
        &self,
        scope: &mut dyn PlacementScope,
        measurables: &[Box<dyn Measurable>],
        _result: &MeasureResult,
    ) {
        for measurable in measurables {
            let width = measurable.max_intrinsic_width(f32::INFINITY);
            let placeable = measurable.measure(Constraints::new(width, width, 0.0, f32::INFINITY));
            scope.place(placeable.node_id(), 0.0, 0.0);
        }
    }
}

/// Leaves its node unplaced in the real pass while `skip` is set. The
/// lookahead placement always happens.
pub struct SkipPlacement {
    pub skip: Rc<Cell<bool>>,
}

impl SkipPlacement {
    pub fn new(skip: &Rc<Cell<bool>>) -> Rc<Self> {
        Rc::new(Self { skip: skip.clone() })
    }
}

impl LayoutModifier for SkipPlacement {
    fn measure(
        &self,
        _scope: &ModifierMeasureScope,
        wrapped: &dyn Measurable,
        constraints: Constraints,
    ) -> ModifierMeasureResult {
        let placeable = wrapped.measure(constraints);
        ModifierMeasureResult::wrapping(placeable.as_ref())
    }

    fn place(&self, scope: &ModifierPlaceScope, measured: &ModifierMeasureResult) -> Option<Point> {
        if !scope.is_lookahead_pass() && self.skip.get() {
            None
        } else {
            Some(measured.content_offset)
        }
    }
}

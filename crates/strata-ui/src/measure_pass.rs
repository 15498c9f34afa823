//! Measuring and placing a single node.
//!
//! Parents reach their children through [`NodeMeasurable`]: measuring one
//! records in which block of the parent it happened, remeasures only when
//! the node is dirty or the constraints changed, and returns a
//! [`NodePlaceable`] whose alignment lines are read through the node.

use smallvec::SmallVec;
use std::rc::Rc;
use strata_core::NodeId;
use strata_ui_graphics::Point;
use strata_ui_layout::{
    AlignmentLine, Constraints, IntrinsicKind, LayoutDirection, Measurable, Placeable,
    PlacementScope,
};

use crate::intrinsics::UsageByParent;
use crate::layout::{CoordinatorChain, ModifierPlaceScope, NodeMeasureScope};
use crate::lookahead::LayoutPass;
use crate::node::{LayoutNode, LayoutState, NodeMeasurement, NOT_PLACED};

impl LayoutNode {
    pub(crate) fn child_measurables(&self, pass: LayoutPass) -> Vec<Box<dyn Measurable>> {
        self.children()
            .into_iter()
            .map(|child| Box::new(NodeMeasurable::new(child, pass)) as Box<dyn Measurable>)
            .collect()
    }

    fn measure_from_parent(self: &Rc<Self>, pass: LayoutPass, constraints: Constraints) {
        if self.intrinsics_usage.get() == UsageByParent::NotUsed {
            self.clear_subtree_intrinsics_usage();
        }
        if pass == LayoutPass::Real && self.is_outermost_lookahead_root() {
            self.lookahead.measured_by_parent.set(UsageByParent::NotUsed);
            self.track_measurement_by_parent(LayoutPass::Lookahead);
            self.remeasure(LayoutPass::Lookahead, constraints);
        }
        self.track_measurement_by_parent(pass);
        self.remeasure(pass, constraints);
    }

    fn track_measurement_by_parent(&self, pass: LayoutPass) {
        let state = self.pass_state(pass);
        let Some(parent) = self.parent() else {
            state.measured_by_parent.set(UsageByParent::NotUsed);
            return;
        };
        assert!(
            state.measured_by_parent.get() == UsageByParent::NotUsed,
            "node {} was measured twice by its parent {} in one pass",
            self.id(),
            parent.id()
        );
        let usage = match UsageByParent::from_parent_state(parent.layout_state()) {
            Some(usage) => usage,
            None => panic!(
                "node {} can only be measured while its parent {} measures or places, parent is {:?}",
                self.id(),
                parent.id(),
                parent.layout_state()
            ),
        };
        state.measured_by_parent.set(usage);
    }

    /// Measures with `constraints` when dirty or when they changed. Returns
    /// whether the parent could observe a difference: a new size or a new
    /// value for an alignment line it read.
    pub(crate) fn remeasure(self: &Rc<Self>, pass: LayoutPass, constraints: Constraints) -> bool {
        let state = self.pass_state(pass);
        if state.measure_pending.get() || state.constraints.get() != Some(constraints) {
            let previous = state.measurement().map(|measurement| measurement.size());
            state.constraints.set(Some(constraints));
            self.perform_measure(pass, constraints);
            let size = state.measurement().map(|measurement| measurement.size());
            previous != size || self.read_lines_changed(pass)
        } else {
            if let Some(owner) = self.owner() {
                owner.force_measure_the_subtree(self, pass);
            }
            self.reset_subtree_intrinsics_usage();
            false
        }
    }

    /// Remeasures with the constraints of the last measure, if there was one.
    pub(crate) fn remeasure_with_last_constraints(self: &Rc<Self>, pass: LayoutPass) -> bool {
        match self.pass_state(pass).constraints.get() {
            Some(constraints) => self.remeasure(pass, constraints),
            None => false,
        }
    }

    fn perform_measure(self: &Rc<Self>, pass: LayoutPass, constraints: Constraints) {
        log::trace!("measure node {} ({:?}) with {:?}", self.id(), pass, constraints);
        let state = self.pass_state(pass);
        self.set_layout_state(pass.measuring_state());
        state.measure_pending.set(false);
        self.counters.record_measure(pass);
        for child in self.children() {
            let child_state = child.pass_state(pass);
            child_state.measured_by_parent.set(UsageByParent::NotUsed);
            child_state.lines_read.borrow_mut().clear();
        }

        let measurables = self.child_measurables(pass);
        let scope = NodeMeasureScope::new(self.density(), self.layout_direction(), pass);
        let modifiers = self.modifiers();
        let lookahead = match pass {
            LayoutPass::Real => self.lookahead.measurement(),
            LayoutPass::Lookahead => None,
        };
        let measured = CoordinatorChain::new(
            self.id(),
            self.measure_policy(),
            &measurables,
            &scope,
            &modifiers,
            lookahead.as_deref(),
        )
        .measure(constraints);

        let size = constraints.constrain(measured.size);
        *state.measurement.borrow_mut() = Some(Rc::new(NodeMeasurement::new(
            measured.content,
            size,
            measured.content_offset,
            measured.modifiers,
        )));
        state.layout_pending.set(true);
        self.set_layout_state(LayoutState::Idle);
    }

    fn read_lines_changed(&self, pass: LayoutPass) -> bool {
        let reads = self.pass_state(pass).lines_read.borrow().clone();
        reads
            .iter()
            .any(|(line, value)| self.resolve_alignment_line(pass, *line, false) != *value)
    }

    /// Value of `line` from the policy result, or merged from the children
    /// that provide it. With `record`, the read is remembered so a later
    /// change is reported to the parent.
    pub(crate) fn resolve_alignment_line(&self, pass: LayoutPass, line: AlignmentLine, record: bool) -> Option<f32> {
        let measurement = self.pass_state(pass).measurement()?;
        let offset = measurement.content_offset();
        let content = measurement.content();
        let value = match content.alignment_lines.get(&line) {
            Some(value) => Some(line.offset_by(*value, offset.x, offset.y)),
            None => {
                let mut merged = None;
                for placement in &content.placements {
                    let Ok(child) = self.child(placement.node_id) else {
                        continue;
                    };
                    let Some(value) = child.resolve_alignment_line(pass, line, record) else {
                        continue;
                    };
                    let value = line.offset_by(value, placement.x + offset.x, placement.y + offset.y);
                    merged = Some(match merged {
                        Some(current) => line.merge(current, value),
                        None => value,
                    });
                }
                merged
            }
        };
        if record {
            let mut reads = self.pass_state(pass).lines_read.borrow_mut();
            match reads.iter_mut().find(|(read, _)| *read == line) {
                Some(entry) => entry.1 = value,
                None => reads.push((line, value)),
            }
        }
        value
    }

    /// Places the node at `placement`, relative to its parent's content.
    pub(crate) fn place_at(self: &Rc<Self>, pass: LayoutPass, placement: Point, z_index: i32) {
        if pass == LayoutPass::Real && self.is_outermost_lookahead_root() {
            let lookahead = &self.lookahead;
            if lookahead.layout_pending.get()
                || !lookahead.is_placed.get()
                || lookahead.placement.get() != placement
            {
                self.place_at(LayoutPass::Lookahead, placement, z_index);
            }
        }

        let state = self.pass_state(pass);
        state.placement.set(placement);
        state.z_index.set(z_index);
        if let Some(parent) = self.parent() {
            if parent.layout_state() == pass.placing_state() {
                let parent_state = parent.pass_state(pass);
                let order = parent_state.next_child_place_order.get();
                parent_state.next_child_place_order.set(order + 1);
                state.place_order.set(order);
            }
        }

        let Some(measurement) = state.measurement() else {
            log::warn!("node {} placed before it was measured ({:?})", self.id(), pass);
            return;
        };
        let scope = ModifierPlaceScope::new(pass.is_lookahead(), self.layout_direction());
        let mut origin = Point::ZERO;
        for measured in measurement.modifiers() {
            match measured.modifier.place(&scope, &measured.result) {
                Some(offset) => origin = origin + offset,
                None => {
                    log::trace!("node {} skipped its placement ({:?})", self.id(), pass);
                    self.mark_subtree_as_not_placed(pass);
                    return;
                }
            }
        }
        state.content_origin.set(origin);

        self.mark_node_and_subtree_as_placed(pass);
        if state.layout_pending.get() {
            self.layout_children(pass, &measurement);
        }
    }

    /// Places again where the parent placed the node last time.
    pub(crate) fn replace(self: &Rc<Self>, pass: LayoutPass) {
        let state = self.pass_state(pass);
        self.place_at(pass, state.placement.get(), state.z_index.get());
    }

    fn layout_children(self: &Rc<Self>, pass: LayoutPass, measurement: &NodeMeasurement) {
        if self.layout_state() == LayoutState::Idle {
            // measure-block children still dirty are measured before the
            // policy places them
            let mut changed = false;
            for child in self.children() {
                let child_state = child.pass_state(pass);
                if child_state.measure_pending.get()
                    && child_state.measured_by_parent.get() == UsageByParent::InMeasureBlock
                {
                    changed |= child.remeasure_with_last_constraints(pass);
                }
            }
            if changed {
                if let Some(owner) = self.owner() {
                    match pass {
                        LayoutPass::Real => owner.request_remeasure(self),
                        LayoutPass::Lookahead => owner.request_lookahead_remeasure(self),
                    };
                }
            }
        }

        log::trace!("lay out node {} ({:?})", self.id(), pass);
        let state = self.pass_state(pass);
        self.set_layout_state(pass.placing_state());
        state.layout_pending.set(false);
        self.counters.record_layout(pass);
        for child in self.children() {
            let child_state = child.pass_state(pass);
            child_state.previous_place_order.set(child_state.place_order.get());
            child_state.place_order.set(NOT_PLACED);
            if child_state.measured_by_parent.get() == UsageByParent::InLayoutBlock {
                child_state.measured_by_parent.set(UsageByParent::NotUsed);
            }
            if child.intrinsics_usage.get() == UsageByParent::InLayoutBlock {
                child.clear_subtree_placement_intrinsics_usage();
            }
        }
        state.next_child_place_order.set(0);

        let measurables = self.child_measurables(pass);
        let mut scope = NodePlacementScope {
            node: self,
            pass,
            direction: self.layout_direction(),
        };
        self.measure_policy()
            .place_children(&mut scope, &measurables, measurement.content());

        self.set_layout_state(LayoutState::Idle);
        for child in self.children() {
            if child.pass_state(pass).place_order.get() == NOT_PLACED {
                child.mark_subtree_as_not_placed(pass);
            }
        }
    }

    pub(crate) fn mark_subtree_as_not_placed(&self, pass: LayoutPass) {
        if self.pass_state(pass).is_placed.replace(false) {
            for child in self.children() {
                child.mark_subtree_as_not_placed(pass);
            }
        }
    }

    /// Requests ignored while the node was not placed are replayed here.
    fn mark_node_and_subtree_as_placed(self: &Rc<Self>, pass: LayoutPass) {
        let state = self.pass_state(pass);
        if state.is_placed.replace(true) {
            return;
        }
        if state.measure_pending.get() {
            self.reschedule(pass);
        }
        for child in self.children() {
            let child_state = child.pass_state(pass);
            if child_state.place_order.get() == NOT_PLACED {
                continue;
            }
            child.mark_node_and_subtree_as_placed(pass);
            if child_state.layout_pending.get() && !child_state.measure_pending.get() {
                child.reschedule(pass);
            }
        }
    }

    fn reschedule(self: &Rc<Self>, pass: LayoutPass) {
        let Some(owner) = self.owner() else {
            return;
        };
        let state = self.pass_state(pass);
        if state.measure_pending.get() {
            owner.schedule_remeasure(self, pass, true);
        } else if state.layout_pending.get() {
            owner.schedule_relayout(self, pass, true);
        }
    }
}

/// A child as its parent's policy sees it.
pub(crate) struct NodeMeasurable {
    node: Rc<LayoutNode>,
    pass: LayoutPass,
}

impl NodeMeasurable {
    pub(crate) fn new(node: Rc<LayoutNode>, pass: LayoutPass) -> Self {
        Self { node, pass }
    }
}

impl Measurable for NodeMeasurable {
    fn node_id(&self) -> NodeId {
        self.node.id()
    }

    fn measure(&self, constraints: Constraints) -> Box<dyn Placeable> {
        self.node.measure_from_parent(self.pass, constraints);
        Box::new(NodePlaceable {
            node: self.node.clone(),
            pass: self.pass,
        })
    }

    fn min_intrinsic_width(&self, height: f32) -> f32 {
        self.node.query_intrinsic(self.pass, IntrinsicKind::MinWidth, height)
    }

    fn max_intrinsic_width(&self, height: f32) -> f32 {
        self.node.query_intrinsic(self.pass, IntrinsicKind::MaxWidth, height)
    }

    fn min_intrinsic_height(&self, width: f32) -> f32 {
        self.node.query_intrinsic(self.pass, IntrinsicKind::MinHeight, width)
    }

    fn max_intrinsic_height(&self, width: f32) -> f32 {
        self.node.query_intrinsic(self.pass, IntrinsicKind::MaxHeight, width)
    }
}

pub(crate) struct NodePlaceable {
    node: Rc<LayoutNode>,
    pass: LayoutPass,
}

impl NodePlaceable {
    fn measurement(&self) -> Option<Rc<NodeMeasurement>> {
        self.node.pass_state(self.pass).measurement()
    }
}

impl Placeable for NodePlaceable {
    fn width(&self) -> f32 {
        self.measurement().map_or(0.0, |measurement| measurement.size().width)
    }

    fn height(&self) -> f32 {
        self.measurement().map_or(0.0, |measurement| measurement.size().height)
    }

    fn node_id(&self) -> NodeId {
        self.node.id()
    }

    fn get(&self, line: AlignmentLine) -> Option<f32> {
        let record = self
            .node
            .parent()
            .is_some_and(|parent| parent.layout_state().is_measuring());
        self.node.resolve_alignment_line(self.pass, line, record)
    }
}

struct NodePlacementScope<'a> {
    node: &'a Rc<LayoutNode>,
    pass: LayoutPass,
    direction: LayoutDirection,
}

impl PlacementScope for NodePlacementScope<'_> {
    fn layout_direction(&self) -> LayoutDirection {
        self.direction
    }

    fn is_lookahead_pass(&self) -> bool {
        self.pass.is_lookahead()
    }

    fn place_with_z(&mut self, node_id: NodeId, x: f32, y: f32, z_index: i32) {
        let child = match self.node.child(node_id) {
            Ok(child) => child,
            Err(_) => panic!("node {} placed {} which is not its child", self.node.id(), node_id),
        };
        child.place_at(self.pass, Point::new(x, y), z_index);
    }
}

//! Layout tree nodes.
//!
//! A [`LayoutNode`] is shared as `Rc<LayoutNode>`: the parent owns its
//! children and each child points back through a `Weak`. All mutable state
//! sits in `Cell`/`RefCell` so the delegate can walk and update the tree
//! through shared references while policies run.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use strata_core::collections::map::HashMap;
use strata_core::{next_node_id, NodeId};
use strata_ui_graphics::{Density, Point, Size};
use strata_ui_layout::{AlignmentLine, Constraints, IntrinsicKind, LayoutDirection, MeasurePolicy, MeasureResult};

use crate::coordinates::NodeCoordinates;
use crate::delegate::MeasureAndLayoutDelegate;
use crate::error::LayoutError;
use crate::intrinsics::UsageByParent;
use crate::layout::{LayoutModifier, MeasuredModifier};
use crate::lookahead::LayoutPass;

/// Place order of a child its parent did not place during its last layout.
pub(crate) const NOT_PLACED: usize = usize::MAX;

/// What a node is doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayoutState {
    #[default]
    Idle,
    LookaheadMeasuring,
    LookaheadPlacing,
    Measuring,
    Placing,
}

impl LayoutState {
    pub fn is_measuring(self) -> bool {
        matches!(self, LayoutState::Measuring | LayoutState::LookaheadMeasuring)
    }

    pub fn is_placing(self) -> bool {
        matches!(self, LayoutState::Placing | LayoutState::LookaheadPlacing)
    }
}

/// Pending work of a node in the real pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirtyState {
    Ready,
    NeedsRemeasure,
    NeedsRelayout,
}

/// One measurement of a node: what its policy produced plus what the
/// modifier chain wrapped around it.
pub struct NodeMeasurement {
    content: MeasureResult,
    size: Size,
    content_offset: Point,
    modifiers: SmallVec<[MeasuredModifier; 2]>,
}

impl NodeMeasurement {
    pub(crate) fn new(
        content: MeasureResult,
        size: Size,
        content_offset: Point,
        modifiers: SmallVec<[MeasuredModifier; 2]>,
    ) -> Self {
        Self {
            content,
            size,
            content_offset,
            modifiers,
        }
    }

    /// Result of the measure policy, in content coordinates.
    pub fn content(&self) -> &MeasureResult {
        &self.content
    }

    /// Outer size, constrained to the constraints the node was measured with.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Offset of the content inside the node as measured by its modifiers.
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    pub(crate) fn modifiers(&self) -> &[MeasuredModifier] {
        &self.modifiers
    }

    /// Size of the chain below the modifier at `index`.
    pub(crate) fn size_inside(&self, index: usize) -> Size {
        self.modifiers
            .iter()
            .find(|measured| measured.index > index)
            .map(|measured| measured.result.size)
            .unwrap_or(self.content.size)
    }
}

/// State a node keeps separately for the lookahead and the real pass.
pub(crate) struct PassState {
    pub(crate) measure_pending: Cell<bool>,
    pub(crate) layout_pending: Cell<bool>,
    pub(crate) constraints: Cell<Option<Constraints>>,
    pub(crate) measurement: RefCell<Option<Rc<NodeMeasurement>>>,
    /// Where the parent placed the node, relative to the parent's content.
    pub(crate) placement: Cell<Point>,
    /// Where the node's own content sits, as decided by its modifiers.
    pub(crate) content_origin: Cell<Point>,
    pub(crate) z_index: Cell<i32>,
    pub(crate) is_placed: Cell<bool>,
    pub(crate) place_order: Cell<usize>,
    pub(crate) previous_place_order: Cell<usize>,
    pub(crate) next_child_place_order: Cell<usize>,
    pub(crate) measured_by_parent: Cell<UsageByParent>,
    /// Alignment lines the parent read while measuring, with the value read.
    pub(crate) lines_read: RefCell<SmallVec<[(AlignmentLine, Option<f32>); 2]>>,
}

impl PassState {
    fn new(pending: bool) -> Self {
        Self {
            measure_pending: Cell::new(pending),
            layout_pending: Cell::new(pending),
            constraints: Cell::new(None),
            measurement: RefCell::new(None),
            placement: Cell::new(Point::ZERO),
            content_origin: Cell::new(Point::ZERO),
            z_index: Cell::new(0),
            is_placed: Cell::new(false),
            place_order: Cell::new(NOT_PLACED),
            previous_place_order: Cell::new(NOT_PLACED),
            next_child_place_order: Cell::new(0),
            measured_by_parent: Cell::new(UsageByParent::NotUsed),
            lines_read: RefCell::new(SmallVec::new()),
        }
    }

    pub(crate) fn measurement(&self) -> Option<Rc<NodeMeasurement>> {
        self.measurement.borrow().clone()
    }

    fn has_pending_work(&self) -> bool {
        self.measure_pending.get() || self.layout_pending.get()
    }
}

#[derive(Default)]
pub(crate) struct Counters {
    pub(crate) measures: Cell<usize>,
    pub(crate) layouts: Cell<usize>,
    pub(crate) lookahead_measures: Cell<usize>,
    pub(crate) lookahead_layouts: Cell<usize>,
}

impl Counters {
    pub(crate) fn record_measure(&self, pass: LayoutPass) {
        let counter = match pass {
            LayoutPass::Real => &self.measures,
            LayoutPass::Lookahead => &self.lookahead_measures,
        };
        counter.set(counter.get() + 1);
    }

    pub(crate) fn record_layout(&self, pass: LayoutPass) {
        let counter = match pass {
            LayoutPass::Real => &self.layouts,
            LayoutPass::Lookahead => &self.lookahead_layouts,
        };
        counter.set(counter.get() + 1);
    }
}

/// A node of the layout tree.
pub struct LayoutNode {
    id: NodeId,
    parent: RefCell<Weak<LayoutNode>>,
    children: RefCell<Vec<Rc<LayoutNode>>>,
    owner: RefCell<Weak<MeasureAndLayoutDelegate>>,
    depth: Cell<usize>,
    state: Cell<LayoutState>,
    pub(crate) real: PassState,
    pub(crate) lookahead: PassState,
    /// Set on every ancestor of a node that asked for work, up to the first
    /// ancestor already marked.
    child_needs_attention: Cell<bool>,
    pub(crate) intrinsics_usage: Cell<UsageByParent>,
    pub(crate) previous_intrinsics_usage: Cell<UsageByParent>,
    pub(crate) intrinsics_cache: RefCell<HashMap<(LayoutPass, IntrinsicKind, u32), f32>>,
    pub(crate) is_lookahead_root: Cell<bool>,
    pub(crate) lookahead_root: RefCell<Weak<LayoutNode>>,
    policy: RefCell<Rc<dyn MeasurePolicy>>,
    modifiers: RefCell<Vec<Rc<dyn LayoutModifier>>>,
    direction: Cell<LayoutDirection>,
    density: Cell<Density>,
    pub(crate) counters: Counters,
}

impl LayoutNode {
    pub fn new(policy: Rc<dyn MeasurePolicy>) -> Rc<Self> {
        Rc::new(Self {
            id: next_node_id(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            owner: RefCell::new(Weak::new()),
            depth: Cell::new(0),
            state: Cell::new(LayoutState::Idle),
            real: PassState::new(true),
            lookahead: PassState::new(false),
            child_needs_attention: Cell::new(false),
            intrinsics_usage: Cell::new(UsageByParent::NotUsed),
            previous_intrinsics_usage: Cell::new(UsageByParent::NotUsed),
            intrinsics_cache: RefCell::new(HashMap::default()),
            is_lookahead_root: Cell::new(false),
            lookahead_root: RefCell::new(Weak::new()),
            policy: RefCell::new(policy),
            modifiers: RefCell::new(Vec::new()),
            direction: Cell::new(LayoutDirection::Ltr),
            density: Cell::new(Density::ONE),
            counters: Counters::default(),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn parent(&self) -> Option<Rc<LayoutNode>> {
        self.parent.borrow().upgrade()
    }

    /// Snapshot of the children, in order.
    pub fn children(&self) -> Vec<Rc<LayoutNode>> {
        self.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn child_at(&self, index: usize) -> Option<Rc<LayoutNode>> {
        self.children.borrow().get(index).cloned()
    }

    pub fn child(&self, id: NodeId) -> Result<Rc<LayoutNode>, LayoutError> {
        self.children
            .borrow()
            .iter()
            .find(|child| child.id == id)
            .cloned()
            .ok_or(LayoutError::NodeNotFound(id))
    }

    pub(crate) fn owner(&self) -> Option<Rc<MeasureAndLayoutDelegate>> {
        self.owner.borrow().upgrade()
    }

    pub fn is_attached(&self) -> bool {
        self.owner().is_some()
    }

    pub fn layout_state(&self) -> LayoutState {
        self.state.get()
    }

    pub(crate) fn set_layout_state(&self, state: LayoutState) {
        self.state.set(state);
    }

    pub(crate) fn pass_state(&self, pass: LayoutPass) -> &PassState {
        match pass {
            LayoutPass::Real => &self.real,
            LayoutPass::Lookahead => &self.lookahead,
        }
    }

    // Tree mutation

    /// Inserts `child` at `index` and schedules a remeasure of this node.
    ///
    /// Panics if `child` already has a parent.
    pub fn insert_child(self: &Rc<Self>, index: usize, child: Rc<LayoutNode>) {
        assert!(
            child.parent().is_none(),
            "node {} already has a parent",
            child.id
        );
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().insert(index, child.clone());
        child.set_depth(self.depth() + 1);
        let owner = self.owner.borrow().clone();
        if owner.upgrade().is_some() {
            child.attach(&owner);
        } else {
            child.resolve_lookahead_root();
        }
        log::trace!("inserted node {} into {} at {}", child.id, self.id, index);
        self.invalidate_measure();
    }

    pub fn add_child(self: &Rc<Self>, child: Rc<LayoutNode>) {
        let index = self.child_count();
        self.insert_child(index, child);
    }

    /// Removes `child` and schedules a remeasure of this node.
    pub fn remove_child(self: &Rc<Self>, child: &Rc<LayoutNode>) -> Result<(), LayoutError> {
        let index = self
            .children
            .borrow()
            .iter()
            .position(|candidate| Rc::ptr_eq(candidate, child))
            .ok_or(LayoutError::NodeNotFound(child.id))?;
        self.remove_child_at(index)?;
        Ok(())
    }

    /// Removes and returns the child at `index`, scheduling a remeasure of
    /// this node.
    pub fn remove_child_at(self: &Rc<Self>, index: usize) -> Result<Rc<LayoutNode>, LayoutError> {
        if index >= self.child_count() {
            return Err(LayoutError::ChildIndexOutOfRange {
                parent: self.id,
                index,
            });
        }
        let child = self.children.borrow_mut().remove(index);
        if let Some(owner) = child.owner() {
            owner.invalidate_intrinsics_parent(&child);
        }
        child.detach();
        *child.parent.borrow_mut() = Weak::new();
        child.intrinsics_usage.set(UsageByParent::NotUsed);
        child.previous_intrinsics_usage.set(UsageByParent::NotUsed);
        child.set_depth(0);
        child.resolve_lookahead_root();
        log::trace!("removed node {} from {}", child.id, self.id);
        self.invalidate_measure();
        Ok(child)
    }

    fn set_depth(&self, depth: usize) {
        self.depth.set(depth);
        for child in self.children.borrow().iter() {
            child.set_depth(depth + 1);
        }
    }

    /// Connects the subtree to `owner`. Work requested while detached is
    /// redone once attached.
    pub(crate) fn attach(self: &Rc<Self>, owner: &Weak<MeasureAndLayoutDelegate>) {
        *self.owner.borrow_mut() = owner.clone();
        self.real.measure_pending.set(true);
        self.real.layout_pending.set(true);
        self.resolve_own_lookahead_root();
        if self.in_lookahead_scope() {
            self.lookahead.measure_pending.set(true);
            self.lookahead.layout_pending.set(true);
        }
        for child in self.children() {
            child.attach(owner);
        }
    }

    fn detach(&self) {
        if let Some(owner) = self.owner() {
            owner.forget(self);
        }
        *self.owner.borrow_mut() = Weak::new();
        for pass in [LayoutPass::Real, LayoutPass::Lookahead] {
            let state = self.pass_state(pass);
            state.is_placed.set(false);
            state.place_order.set(NOT_PLACED);
            state.previous_place_order.set(NOT_PLACED);
            state.measured_by_parent.set(UsageByParent::NotUsed);
            state.lines_read.borrow_mut().clear();
        }
        self.child_needs_attention.set(false);
        for child in self.children() {
            child.detach();
        }
    }

    // Configuration

    pub fn measure_policy(&self) -> Rc<dyn MeasurePolicy> {
        self.policy.borrow().clone()
    }

    pub fn set_measure_policy(self: &Rc<Self>, policy: Rc<dyn MeasurePolicy>) {
        *self.policy.borrow_mut() = policy;
        self.invalidate_measure();
    }

    pub fn modifiers(&self) -> Vec<Rc<dyn LayoutModifier>> {
        self.modifiers.borrow().clone()
    }

    /// Replaces the modifier chain, outermost first.
    pub fn set_modifiers(self: &Rc<Self>, modifiers: Vec<Rc<dyn LayoutModifier>>) {
        *self.modifiers.borrow_mut() = modifiers;
        self.invalidate_measure();
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.direction.get()
    }

    pub fn set_layout_direction(self: &Rc<Self>, direction: LayoutDirection) {
        if self.direction.replace(direction) != direction {
            self.invalidate_measure();
        }
    }

    pub fn density(&self) -> Density {
        self.density.get()
    }

    pub fn set_density(self: &Rc<Self>, density: Density) {
        if self.density.replace(density) != density {
            self.invalidate_measure();
        }
    }

    // Invalidation

    /// Asks for a remeasure, through the lookahead pass when the node is in
    /// a lookahead scope. Detached nodes only record the pending work.
    pub fn invalidate_measure(self: &Rc<Self>) {
        self.invalidate_intrinsics_cache();
        match self.owner() {
            Some(owner) if self.in_lookahead_scope() => {
                owner.request_lookahead_remeasure(self);
            }
            Some(owner) => {
                owner.request_remeasure(self);
            }
            None => {
                self.real.measure_pending.set(true);
                if self.in_lookahead_scope() {
                    self.lookahead.measure_pending.set(true);
                }
            }
        }
    }

    pub fn invalidate_layout(self: &Rc<Self>) {
        match self.owner() {
            Some(owner) if self.in_lookahead_scope() => {
                owner.request_lookahead_relayout(self);
            }
            Some(owner) => {
                owner.request_relayout(self);
            }
            None => self.real.layout_pending.set(true),
        }
    }

    /// Same as [`MeasureAndLayoutDelegate::request_remeasure`] on the owner.
    pub fn request_remeasure(self: &Rc<Self>) -> Result<bool, LayoutError> {
        let owner = self.owner().ok_or(LayoutError::Detached(self.id))?;
        Ok(owner.request_remeasure(self))
    }

    pub fn request_relayout(self: &Rc<Self>) -> Result<bool, LayoutError> {
        let owner = self.owner().ok_or(LayoutError::Detached(self.id))?;
        Ok(owner.request_relayout(self))
    }

    pub(crate) fn mark_needs_attention(&self) {
        let mut current = self.parent();
        while let Some(ancestor) = current {
            if ancestor.child_needs_attention.replace(true) {
                break;
            }
            current = ancestor.parent();
        }
    }

    /// True while some descendant still has measure or layout work.
    pub fn has_dirty_descendant(&self) -> bool {
        self.child_needs_attention.get()
    }

    /// Clears the attention marks of subtrees whose work is done. Returns
    /// whether this node or a descendant still has pending work.
    pub(crate) fn settle_attention(&self) -> bool {
        if self.child_needs_attention.get() {
            let mut pending = false;
            for child in self.children() {
                pending |= child.settle_attention();
            }
            self.child_needs_attention.set(pending);
        }
        self.child_needs_attention.get() || self.has_own_pending_work()
    }

    fn has_own_pending_work(&self) -> bool {
        self.real.has_pending_work()
            || (self.in_lookahead_scope() && self.lookahead.has_pending_work())
    }

    // Results

    pub fn dirty_state(&self) -> DirtyState {
        if self.real.measure_pending.get() {
            DirtyState::NeedsRemeasure
        } else if self.real.layout_pending.get() {
            DirtyState::NeedsRelayout
        } else {
            DirtyState::Ready
        }
    }

    pub fn is_measure_pending(&self) -> bool {
        self.real.measure_pending.get()
    }

    pub fn is_layout_pending(&self) -> bool {
        self.real.layout_pending.get()
    }

    pub fn is_placed(&self) -> bool {
        self.real.is_placed.get()
    }

    /// Last measurement of the real pass.
    pub fn measurement(&self) -> Result<Rc<NodeMeasurement>, LayoutError> {
        self.real
            .measurement()
            .ok_or(LayoutError::NotMeasured(self.id))
    }

    pub fn measure_result(&self) -> Result<MeasureResult, LayoutError> {
        self.measurement()
            .map(|measurement| measurement.content().clone())
    }

    pub fn size(&self) -> Result<Size, LayoutError> {
        self.measurement().map(|measurement| measurement.size())
    }

    pub fn constraints(&self) -> Option<Constraints> {
        self.real.constraints.get()
    }

    /// Offset from the parent's top-left corner.
    pub fn position(&self) -> Point {
        self.position_in(LayoutPass::Real)
    }

    pub(crate) fn position_in(&self, pass: LayoutPass) -> Point {
        let placement = self.pass_state(pass).placement.get();
        match self.parent() {
            Some(parent) => parent.pass_state(pass).content_origin.get() + placement,
            None => placement,
        }
    }

    pub fn position_in_root(&self) -> Point {
        let mut position = self.position();
        let mut current = self.parent();
        while let Some(ancestor) = current {
            position = position + ancestor.position();
            current = ancestor.parent();
        }
        position
    }

    pub fn z_index(&self) -> i32 {
        self.real.z_index.get()
    }

    /// Position of `line` in this node, if it or its children provide one.
    pub fn alignment_line(&self, line: AlignmentLine) -> Option<f32> {
        self.resolve_alignment_line(LayoutPass::Real, line, false)
    }

    pub fn measured_by_parent(&self) -> UsageByParent {
        self.real.measured_by_parent.get()
    }

    pub fn coordinates(self: &Rc<Self>) -> NodeCoordinates {
        NodeCoordinates::new(self)
    }

    pub fn measures_count(&self) -> usize {
        self.counters.measures.get()
    }

    pub fn layouts_count(&self) -> usize {
        self.counters.layouts.get()
    }
}

impl std::fmt::Debug for LayoutNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutNode")
            .field("id", &self.id)
            .field("depth", &self.depth.get())
            .field("state", &self.state.get())
            .field("dirty", &self.dirty_state())
            .field("placed", &self.real.is_placed.get())
            .field("children", &self.child_count())
            .finish()
    }
}

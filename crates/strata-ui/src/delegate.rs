//! The measure and layout delegate.
//!
//! Nodes report what changed through the `request_*` calls. The delegate
//! keeps the dirty nodes in a depth-ordered set and [`measure_and_layout`]
//! drains it, shallowest first, so a parent that remeasures anyway absorbs
//! the work of its children. Requests made while a node is busy are
//! postponed until that node is done.
//!
//! [`measure_and_layout`]: MeasureAndLayoutDelegate::measure_and_layout

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use strata_core::NodeId;
use strata_ui_graphics::Point;
use strata_ui_layout::Constraints;

use crate::depth_sorted_set::DepthSortedSet;
use crate::intrinsics::UsageByParent;
use crate::lookahead::LayoutPass;
use crate::node::{LayoutNode, LayoutState};

pub struct MeasureAndLayoutDelegate {
    root: Rc<LayoutNode>,
    relayout_nodes: RefCell<DepthSortedSet>,
    postponed: RefCell<IndexMap<(NodeId, LayoutPass), Weak<LayoutNode>>>,
    during_measure_layout: Cell<bool>,
    root_constraints: Cell<Option<Constraints>>,
    measure_iteration: Cell<u64>,
}

impl MeasureAndLayoutDelegate {
    /// Takes ownership of the layout of `root` and its subtree.
    ///
    /// Panics if `root` has a parent.
    #[must_use]
    pub fn new(root: Rc<LayoutNode>) -> Rc<Self> {
        assert!(
            root.parent().is_none(),
            "node {} has a parent and cannot be a layout root",
            root.id()
        );
        Rc::new_cyclic(|owner: &Weak<Self>| {
            root.attach(owner);
            root.real.is_placed.set(true);
            if root.in_lookahead_scope() {
                root.lookahead.is_placed.set(true);
            }
            Self {
                root,
                relayout_nodes: RefCell::new(DepthSortedSet::default()),
                postponed: RefCell::new(IndexMap::new()),
                during_measure_layout: Cell::new(false),
                root_constraints: Cell::new(None),
                measure_iteration: Cell::new(0),
            }
        })
    }

    pub fn root(&self) -> &Rc<LayoutNode> {
        &self.root
    }

    pub fn root_constraints(&self) -> Option<Constraints> {
        self.root_constraints.get()
    }

    /// Number of completed [`Self::measure_and_layout`] calls.
    pub fn measure_iteration(&self) -> u64 {
        self.measure_iteration.get()
    }

    pub fn has_pending_measure_or_layout(&self) -> bool {
        !self.relayout_nodes.borrow().is_empty()
    }

    pub fn update_root_constraints(&self, constraints: Constraints) {
        if self.root_constraints.get() == Some(constraints) {
            return;
        }
        log::debug!("root constraints changed to {:?}", constraints);
        self.root_constraints.set(Some(constraints));
        self.root.real.measure_pending.set(true);
        if self.root.in_lookahead_scope() {
            self.root.lookahead.measure_pending.set(true);
        }
        self.relayout_nodes.borrow_mut().add(&self.root);
    }

    /// Marks `node` for remeasure. Returns true when a
    /// [`Self::measure_and_layout`] call is now needed.
    pub fn request_remeasure(&self, node: &Rc<LayoutNode>) -> bool {
        self.schedule_remeasure(node, LayoutPass::Real, false)
    }

    /// Marks `node` for remeasure in both passes. Nodes outside a lookahead
    /// scope only get the real remeasure.
    pub fn request_lookahead_remeasure(&self, node: &Rc<LayoutNode>) -> bool {
        self.schedule_remeasure(node, LayoutPass::Lookahead, false)
    }

    pub fn request_relayout(&self, node: &Rc<LayoutNode>) -> bool {
        self.schedule_relayout(node, LayoutPass::Real, false)
    }

    pub fn request_lookahead_relayout(&self, node: &Rc<LayoutNode>) -> bool {
        self.schedule_relayout(node, LayoutPass::Lookahead, false)
    }

    pub(crate) fn schedule_remeasure(&self, node: &Rc<LayoutNode>, pass: LayoutPass, force: bool) -> bool {
        if !node.is_attached() {
            return false;
        }
        if pass == LayoutPass::Lookahead && !node.in_lookahead_scope() {
            return self.schedule_remeasure(node, LayoutPass::Real, force);
        }
        if node.layout_state() != LayoutState::Idle {
            log::trace!(
                "node {} is {:?}, remeasure ({:?}) postponed",
                node.id(),
                node.layout_state(),
                pass
            );
            self.postponed
                .borrow_mut()
                .insert((node.id(), pass), Rc::downgrade(node));
            return false;
        }

        let state = node.pass_state(pass);
        if state.measure_pending.get() && !force {
            return false;
        }
        state.measure_pending.set(true);
        if pass == LayoutPass::Lookahead {
            node.real.measure_pending.set(true);
        }
        node.invalidate_intrinsics_cache();
        node.mark_needs_attention();

        let enqueue = match pass {
            LayoutPass::Lookahead => {
                Self::affects_tree(node, LayoutPass::Lookahead)
                    || Self::affects_tree(node, LayoutPass::Real)
            }
            LayoutPass::Real => Self::affects_tree(node, LayoutPass::Real),
        };
        if enqueue {
            self.relayout_nodes.borrow_mut().add(node);
        }
        self.invalidate_intrinsics_dependent(node, pass);
        !self.during_measure_layout.get() && self.has_pending_measure_or_layout()
    }

    /// A dirty node needs its own entry in the set when it is placed or its
    /// parent measures it, unless the parent remeasures anyway.
    fn affects_tree(node: &LayoutNode, pass: LayoutPass) -> bool {
        let state = node.pass_state(pass);
        let relevant = state.is_placed.get() || node.can_affect_parent(pass);
        let parent_pending = node
            .parent()
            .is_some_and(|parent| parent.pass_state(pass).measure_pending.get());
        relevant && !parent_pending
    }

    pub(crate) fn schedule_relayout(&self, node: &Rc<LayoutNode>, pass: LayoutPass, force: bool) -> bool {
        if !node.is_attached() {
            return false;
        }
        if pass == LayoutPass::Lookahead && !node.in_lookahead_scope() {
            return self.schedule_relayout(node, LayoutPass::Real, force);
        }
        if node.layout_state() != LayoutState::Idle {
            // busy nodes lay out their children anyway
            log::trace!("node {} is {:?}, relayout dropped", node.id(), node.layout_state());
            return false;
        }

        let state = node.pass_state(pass);
        if !force && (state.measure_pending.get() || state.layout_pending.get()) {
            return false;
        }
        state.layout_pending.set(true);
        if pass == LayoutPass::Lookahead {
            node.real.layout_pending.set(true);
        }
        node.mark_needs_attention();

        let parent_pending = node.parent().is_some_and(|parent| {
            let parent_state = parent.pass_state(pass);
            parent_state.measure_pending.get() || parent_state.layout_pending.get()
        });
        if state.is_placed.get() && !parent_pending {
            self.relayout_nodes.borrow_mut().add(node);
        }
        !self.during_measure_layout.get() && self.has_pending_measure_or_layout()
    }

    /// A node whose intrinsics an ancestor used makes that ancestor redo
    /// the block that used them.
    pub(crate) fn invalidate_intrinsics_parent(&self, node: &LayoutNode) {
        self.invalidate_intrinsics_dependent(node, LayoutPass::Real);
    }

    fn invalidate_intrinsics_dependent(&self, node: &LayoutNode, pass: LayoutPass) {
        let Some((target, usage)) = node.intrinsics_dependent() else {
            return;
        };
        match usage {
            UsageByParent::InMeasureBlock => {
                self.schedule_remeasure(&target, pass, false);
            }
            UsageByParent::InLayoutBlock => {
                self.schedule_relayout(&target, pass, false);
            }
            UsageByParent::NotUsed => {}
        }
    }

    /// Drops a detached node from the queue.
    pub(crate) fn forget(&self, node: &LayoutNode) {
        self.relayout_nodes.borrow_mut().remove(node);
    }

    /// Runs all pending measures and layouts. Returns true when the root
    /// changed size.
    ///
    /// Panics when called from inside a measure or layout.
    pub fn measure_and_layout(&self) -> bool {
        if self.root_constraints.get().is_none() {
            log::debug!("measure_and_layout skipped, no root constraints");
            return false;
        }
        assert!(
            !self.during_measure_layout.get(),
            "measure_and_layout called while measuring or laying out"
        );
        log::trace!(
            "measure_and_layout: {} dirty nodes",
            self.relayout_nodes.borrow().len()
        );
        self.during_measure_layout.set(true);
        let mut root_resized = false;
        loop {
            let next = self.relayout_nodes.borrow_mut().pop();
            let Some(node) = next else {
                break;
            };
            let size_changed = self.remeasure_and_relayout_if_needed(&node);
            if size_changed && Rc::ptr_eq(&node, &self.root) {
                root_resized = true;
            }
        }
        self.during_measure_layout.set(false);
        self.root.settle_attention();
        self.measure_iteration.set(self.measure_iteration.get() + 1);
        root_resized
    }

    fn remeasure_and_relayout_if_needed(&self, node: &Rc<LayoutNode>) -> bool {
        if !node.is_attached() {
            return false;
        }
        let scoped = node.in_lookahead_scope();
        let relevant = node.real.is_placed.get()
            || node.can_affect_parent(LayoutPass::Real)
            || (scoped
                && (node.lookahead.is_placed.get()
                    || node.can_affect_parent(LayoutPass::Lookahead)));
        if !relevant {
            // replayed once the node is placed again
            return false;
        }

        let is_root = Rc::ptr_eq(node, &self.root);
        let constraints = if is_root {
            self.root_constraints.get()
        } else {
            None
        };

        let mut lookahead_changed = false;
        if scoped && node.lookahead.measure_pending.get() {
            lookahead_changed = self.do_remeasure(node, LayoutPass::Lookahead, constraints);
        }
        let mut size_changed = false;
        if node.real.measure_pending.get() {
            size_changed = self.do_remeasure(node, LayoutPass::Real, constraints);
        }

        if scoped
            && (lookahead_changed || node.lookahead.layout_pending.get())
            && node.lookahead.is_placed.get()
        {
            node.replace(LayoutPass::Lookahead);
        }
        let parent_placed = node.parent().map_or(is_root, |parent| parent.is_placed());
        if node.real.layout_pending.get() && node.real.is_placed.get() && parent_placed {
            if is_root {
                node.place_at(LayoutPass::Real, Point::ZERO, 0);
            } else {
                node.replace(LayoutPass::Real);
            }
        }

        self.drain_postponed();
        size_changed
    }

    /// Remeasures `node` and tells its parent when the result changed.
    fn do_remeasure(&self, node: &Rc<LayoutNode>, pass: LayoutPass, constraints: Option<Constraints>) -> bool {
        let changed = match constraints {
            Some(constraints) => node.remeasure(pass, constraints),
            None => node.remeasure_with_last_constraints(pass),
        };
        if !changed {
            return false;
        }
        let Some(parent) = node.parent() else {
            return true;
        };
        let usage = node.pass_state(pass).measured_by_parent.get();
        match pass {
            LayoutPass::Lookahead if !parent.in_lookahead_scope() => {
                self.request_remeasure(&parent);
            }
            LayoutPass::Lookahead => match usage {
                UsageByParent::InMeasureBlock => {
                    self.request_lookahead_remeasure(&parent);
                }
                UsageByParent::InLayoutBlock => {
                    self.request_lookahead_relayout(&parent);
                }
                UsageByParent::NotUsed => {}
            },
            LayoutPass::Real => match usage {
                UsageByParent::InMeasureBlock => {
                    self.request_remeasure(&parent);
                }
                UsageByParent::InLayoutBlock => {
                    self.request_relayout(&parent);
                }
                UsageByParent::NotUsed => {}
            },
        }
        true
    }

    /// Measures, ahead of their turn, the queued nodes under `node` whose
    /// size `node` is about to read. Used when `node` itself is skipped but
    /// its measure-block children may still be dirty.
    pub fn force_measure_the_subtree(&self, node: &Rc<LayoutNode>, pass: LayoutPass) {
        if self.relayout_nodes.borrow().is_empty() {
            return;
        }
        self.force_measure_subtree_internal(node, pass);
    }

    fn force_measure_subtree_internal(&self, node: &Rc<LayoutNode>, pass: LayoutPass) {
        for child in node.children() {
            let state = child.pass_state(pass);
            if state.measured_by_parent.get() != UsageByParent::InMeasureBlock {
                continue;
            }
            if !state.measure_pending.get() && !child.has_dirty_descendant() {
                continue;
            }
            if state.measure_pending.get() && self.relayout_nodes.borrow().contains(&child) {
                self.do_remeasure(&child, pass, None);
            }
            // still pending means it could not affect us, skip its subtree
            if !state.measure_pending.get() {
                self.force_measure_subtree_internal(&child, pass);
            }
        }
        if node.pass_state(pass).measure_pending.get() && self.relayout_nodes.borrow().contains(node) {
            self.do_remeasure(node, pass, None);
        }
    }

    fn drain_postponed(&self) {
        if self.postponed.borrow().is_empty() {
            return;
        }
        let requests: Vec<_> = self.postponed.borrow_mut().drain(..).collect();
        for ((_, pass), node) in requests {
            let Some(node) = node.upgrade() else {
                continue;
            };
            if node.is_attached() {
                self.schedule_remeasure(&node, pass, false);
            }
        }
    }
}

impl LayoutNode {
    /// Dirty and measured in the parent's measure block: the parent's size
    /// may depend on this node even if it is not placed.
    pub(crate) fn can_affect_parent(&self, pass: LayoutPass) -> bool {
        let state = self.pass_state(pass);
        state.measure_pending.get() && state.measured_by_parent.get() == UsageByParent::InMeasureBlock
    }
}

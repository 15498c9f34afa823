//! Lookahead scopes.
//!
//! A node marked as lookahead root opens a scope: every node below it is
//! measured and placed twice, first speculatively in the lookahead pass and
//! then for real. The real pass may read the lookahead results, for example
//! through an intermediate layout modifier. Nested roots join the scope of
//! the outermost one.

use std::rc::{Rc, Weak};
use strata_ui_graphics::{Point, Size};

use crate::error::LayoutError;
use crate::node::{DirtyState, LayoutNode, LayoutState};

/// Which of the two passes a piece of state belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutPass {
    Lookahead,
    Real,
}

impl LayoutPass {
    pub fn is_lookahead(self) -> bool {
        self == LayoutPass::Lookahead
    }

    pub(crate) fn measuring_state(self) -> LayoutState {
        match self {
            LayoutPass::Lookahead => LayoutState::LookaheadMeasuring,
            LayoutPass::Real => LayoutState::Measuring,
        }
    }

    pub(crate) fn placing_state(self) -> LayoutState {
        match self {
            LayoutPass::Lookahead => LayoutState::LookaheadPlacing,
            LayoutPass::Real => LayoutState::Placing,
        }
    }
}

impl LayoutNode {
    pub fn is_lookahead_root(&self) -> bool {
        self.is_lookahead_root.get()
    }

    /// Opens or closes a lookahead scope at this node.
    pub fn set_lookahead_root(self: &Rc<Self>, is_root: bool) {
        if self.is_lookahead_root.replace(is_root) == is_root {
            return;
        }
        self.resolve_lookahead_root();
        self.invalidate_measure();
    }

    /// Outermost lookahead root above (or at) this node.
    pub fn lookahead_root(&self) -> Option<Rc<LayoutNode>> {
        self.lookahead_root.borrow().upgrade()
    }

    pub fn in_lookahead_scope(&self) -> bool {
        self.lookahead_root.borrow().strong_count() > 0
    }

    /// True for the root of a scope whose parent runs no lookahead pass.
    /// Its real measure and placement drive its own lookahead pass.
    pub(crate) fn is_outermost_lookahead_root(&self) -> bool {
        std::ptr::eq(self.lookahead_root.borrow().as_ptr(), self)
    }

    /// Recomputes the scope of the whole subtree.
    pub(crate) fn resolve_lookahead_root(self: &Rc<Self>) {
        self.resolve_own_lookahead_root();
        for child in self.children() {
            child.resolve_lookahead_root();
        }
    }

    pub(crate) fn resolve_own_lookahead_root(self: &Rc<Self>) {
        let inherited = self.parent().and_then(|parent| parent.lookahead_root());
        let root = match inherited {
            Some(root) => Rc::downgrade(&root),
            None if self.is_lookahead_root.get() => Rc::downgrade(self),
            None => Weak::new(),
        };
        let entered = !self.in_lookahead_scope() && root.strong_count() > 0;
        *self.lookahead_root.borrow_mut() = root;
        if entered {
            self.lookahead.measure_pending.set(true);
            self.lookahead.layout_pending.set(true);
        }
    }

    /// Size decided by the last lookahead measure.
    pub fn lookahead_size(&self) -> Result<Size, LayoutError> {
        self.lookahead
            .measurement()
            .map(|measurement| measurement.size())
            .ok_or(LayoutError::LookaheadNotMeasured(self.id()))
    }

    pub fn lookahead_position(&self) -> Point {
        self.position_in(LayoutPass::Lookahead)
    }

    pub fn is_placed_in_lookahead(&self) -> bool {
        self.lookahead.is_placed.get()
    }

    pub fn lookahead_dirty_state(&self) -> DirtyState {
        if self.lookahead.measure_pending.get() {
            DirtyState::NeedsRemeasure
        } else if self.lookahead.layout_pending.get() {
            DirtyState::NeedsRelayout
        } else {
            DirtyState::Ready
        }
    }

    pub fn lookahead_measures_count(&self) -> usize {
        self.counters.lookahead_measures.get()
    }

    pub fn lookahead_layouts_count(&self) -> usize {
        self.counters.lookahead_layouts.get()
    }
}

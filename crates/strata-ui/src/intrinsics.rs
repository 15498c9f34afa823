//! Tracking of intrinsic-size queries.
//!
//! Intrinsic queries reach below the child that was asked, so a change deep
//! in the tree can alter an answer some ancestor already used. Each node
//! records how its answers were consumed and a change walks up to the
//! ancestor that has to redo its work.

use std::rc::Rc;
use strata_ui_layout::IntrinsicKind;

use crate::layout::{CoordinatorChain, NodeMeasureScope};
use crate::lookahead::LayoutPass;
use crate::node::{LayoutNode, LayoutState};

/// How a parent consumed a child's measurement or intrinsics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UsageByParent {
    #[default]
    NotUsed,
    InMeasureBlock,
    InLayoutBlock,
}

impl UsageByParent {
    pub(crate) fn from_parent_state(state: LayoutState) -> Option<Self> {
        if state.is_measuring() {
            Some(UsageByParent::InMeasureBlock)
        } else if state.is_placing() {
            Some(UsageByParent::InLayoutBlock)
        } else {
            None
        }
    }
}

impl LayoutNode {
    pub fn intrinsics_usage_by_parent(&self) -> UsageByParent {
        self.intrinsics_usage.get()
    }

    /// Answers an intrinsic query for `pass`, caching per kind and cross size.
    pub(crate) fn query_intrinsic(self: &Rc<Self>, pass: LayoutPass, kind: IntrinsicKind, cross: f32) -> f32 {
        self.on_intrinsics_queried();
        let key = (pass, kind, cross.to_bits());
        let cached = self.intrinsics_cache.borrow().get(&key).copied();
        if let Some(value) = cached {
            self.restore_descendant_usage();
            return value;
        }

        let measurables = self.child_measurables(pass);
        let scope = NodeMeasureScope::new(self.density(), self.layout_direction(), pass);
        let modifiers = self.modifiers();
        let lookahead = match pass {
            LayoutPass::Real => self.lookahead.measurement(),
            LayoutPass::Lookahead => None,
        };
        let chain = CoordinatorChain::new(
            self.id(),
            self.measure_policy(),
            &measurables,
            &scope,
            &modifiers,
            lookahead.as_deref(),
        );
        let value = chain.intrinsic(kind, cross);
        self.intrinsics_cache.borrow_mut().insert(key, value);
        value
    }

    fn on_intrinsics_queried(&self) {
        if self.intrinsics_usage.get() != UsageByParent::NotUsed {
            return;
        }
        let Some(parent) = self.parent() else {
            return;
        };
        let usage = UsageByParent::from_parent_state(parent.layout_state())
            .unwrap_or_else(|| parent.intrinsics_usage.get());
        self.intrinsics_usage.set(usage);
    }

    /// A cached answer stands for the queries that produced it; re-mark the
    /// descendants those queries reached.
    fn restore_descendant_usage(&self) {
        let usage = self.intrinsics_usage.get();
        for child in self.children() {
            if child.intrinsics_usage.get() == UsageByParent::NotUsed
                && child.previous_intrinsics_usage.get() != UsageByParent::NotUsed
            {
                child.intrinsics_usage.set(usage);
                child.restore_descendant_usage();
            }
        }
    }

    /// Clears the recorded usage before this node is measured again.
    pub(crate) fn clear_subtree_intrinsics_usage(&self) {
        self.previous_intrinsics_usage.set(self.intrinsics_usage.get());
        self.intrinsics_usage.set(UsageByParent::NotUsed);
        for child in self.children() {
            if child.intrinsics_usage.get() != UsageByParent::NotUsed {
                child.clear_subtree_intrinsics_usage();
            }
        }
    }

    /// Undoes [`Self::clear_subtree_intrinsics_usage`] when the measure was skipped.
    pub(crate) fn reset_subtree_intrinsics_usage(&self) {
        self.intrinsics_usage.set(self.previous_intrinsics_usage.get());
        for child in self.children() {
            if child.previous_intrinsics_usage.get() != UsageByParent::NotUsed {
                child.reset_subtree_intrinsics_usage();
            }
        }
    }

    pub(crate) fn clear_subtree_placement_intrinsics_usage(&self) {
        self.previous_intrinsics_usage.set(self.intrinsics_usage.get());
        self.intrinsics_usage.set(UsageByParent::NotUsed);
        for child in self.children() {
            if child.intrinsics_usage.get() == UsageByParent::InLayoutBlock {
                child.clear_subtree_placement_intrinsics_usage();
            }
        }
    }

    /// Highest ancestor whose work depends on this node's intrinsics, with
    /// the block that consumed them.
    pub(crate) fn intrinsics_dependent(&self) -> Option<(Rc<LayoutNode>, UsageByParent)> {
        let usage = self.intrinsics_usage.get();
        if usage == UsageByParent::NotUsed {
            return None;
        }
        let mut target = self.parent()?;
        while target.intrinsics_usage.get() == usage {
            match target.parent() {
                Some(parent) => target = parent,
                None => break,
            }
        }
        Some((target, usage))
    }

    /// Drops cached intrinsics here and on every ancestor.
    pub(crate) fn invalidate_intrinsics_cache(&self) {
        self.intrinsics_cache.borrow_mut().clear();
        let mut current = self.parent();
        while let Some(ancestor) = current {
            ancestor.intrinsics_cache.borrow_mut().clear();
            current = ancestor.parent();
        }
    }
}

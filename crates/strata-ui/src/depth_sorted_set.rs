//! Queue of nodes waiting for the delegate, popped shallowest first.

use std::collections::BTreeSet;
use std::rc::{Rc, Weak};
use strata_core::collections::map::HashMap;
use strata_core::NodeId;

use crate::node::LayoutNode;

/// Set of nodes ordered by tree depth.
///
/// Each node is present at most once. Popping always yields the node with
/// the smallest depth, so parents are processed before the children they
/// may remeasure anyway.
#[derive(Default)]
pub(crate) struct DepthSortedSet {
    order: BTreeSet<(usize, NodeId)>,
    nodes: HashMap<NodeId, (usize, Weak<LayoutNode>)>,
}

impl DepthSortedSet {
    pub(crate) fn add(&mut self, node: &Rc<LayoutNode>) {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return;
        }
        let depth = node.depth();
        self.order.insert((depth, id));
        self.nodes.insert(id, (depth, Rc::downgrade(node)));
    }

    pub(crate) fn contains(&self, node: &LayoutNode) -> bool {
        self.nodes.contains_key(&node.id())
    }

    pub(crate) fn remove(&mut self, node: &LayoutNode) -> bool {
        match self.nodes.remove(&node.id()) {
            Some((depth, _)) => self.order.remove(&(depth, node.id())),
            None => false,
        }
    }

    /// Removes and returns the shallowest node still alive.
    pub(crate) fn pop(&mut self) -> Option<Rc<LayoutNode>> {
        while let Some((depth, id)) = self.order.pop_first() {
            let entry = self.nodes.remove(&id);
            debug_assert!(matches!(entry, Some((d, _)) if d == depth));
            if let Some(node) = entry.and_then(|(_, weak)| weak.upgrade()) {
                return Some(node);
            }
        }
        None
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
#[path = "tests/depth_sorted_set_tests.rs"]
mod tests;

//! Node identifiers, hashing and collection aliases shared by the strata crates

pub mod collections;
pub mod hash;

use std::sync::atomic::{AtomicUsize, Ordering};

/// Identifier of a node in a layout tree.
pub type NodeId = usize;

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(1);

/// Allocates a process-unique [`NodeId`].
///
/// Ids are never reused, so a stale id can't alias a newer node.
pub fn next_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_unique_and_increasing() {
        let first = next_node_id();
        let second = next_node_id();
        assert!(second > first);
    }
}

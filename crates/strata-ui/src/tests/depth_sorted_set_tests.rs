use super::*;
use crate::layout::EmptyMeasurePolicy;

fn chain(depth: usize) -> Vec<Rc<LayoutNode>> {
    let mut nodes = vec![LayoutNode::new(Rc::new(EmptyMeasurePolicy))];
    for _ in 0..depth {
        let child = LayoutNode::new(Rc::new(EmptyMeasurePolicy));
        nodes.last().unwrap().add_child(child.clone());
        nodes.push(child);
    }
    nodes
}

#[test]
fn pops_shallowest_first() {
    let nodes = chain(3);
    let mut set = DepthSortedSet::default();
    set.add(&nodes[3]);
    set.add(&nodes[1]);
    set.add(&nodes[2]);

    let depths: Vec<usize> = std::iter::from_fn(|| set.pop()).map(|node| node.depth()).collect();
    assert_eq!(depths, vec![1, 2, 3]);
    assert!(set.is_empty());
}

#[test]
fn adding_twice_keeps_one_entry() {
    let nodes = chain(1);
    let mut set = DepthSortedSet::default();
    set.add(&nodes[1]);
    set.add(&nodes[1]);
    assert_eq!(set.len(), 1);
    assert!(set.contains(&nodes[1]));
    assert!(!set.contains(&nodes[0]));
}

#[test]
fn removed_and_dropped_nodes_are_not_popped() {
    let nodes = chain(2);
    let mut set = DepthSortedSet::default();
    set.add(&nodes[1]);
    assert!(set.remove(&nodes[1]));
    assert!(!set.remove(&nodes[1]));

    let orphan = LayoutNode::new(Rc::new(EmptyMeasurePolicy));
    set.add(&orphan);
    drop(orphan);
    assert!(set.pop().is_none());
}

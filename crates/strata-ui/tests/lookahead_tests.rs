use std::cell::Cell;
use std::rc::Rc;
use strata_testing::prelude::*;
use strata_ui::layout::{intermediate_layout, ModifierMeasureResult};
use strata_ui::{Constraints, DirtyState, LayoutError, LayoutNode};
use strata_ui_graphics::{Point, Size};

/// root -> scope (lookahead root) -> `node`
fn in_scope(node: Rc<LayoutNode>) -> (TestNode, TestNode) {
    let scope = TestNode::new();
    scope.add_child(node);
    scope.set_lookahead_root(true);
    let root = TestNode::new().add(scope);
    let scope = root.first().clone();
    (root, scope)
}

#[test]
fn nested_lookahead_runs_both_passes_in_order() {
    let log = event_log();
    let parent = LayoutNode::new(RecordingPolicy::new("parent", &log));
    let nested = TestNode::new();
    let child = LayoutNode::new(RecordingPolicy::new("child", &log));
    nested.add_child(child.clone());
    nested.set_lookahead_root(true);
    parent.add_child(nested.node().clone());
    let (root, scope) = in_scope(parent.clone());

    assert!(nested.in_lookahead_scope());
    assert_eq!(
        nested.lookahead_root().map(|node| node.id()),
        Some(scope.id())
    );
    let _delegate = create_delegate(&root);

    assert_eq!(
        *log.borrow(),
        vec![
            LayoutEvent::lookahead_measure("parent"),
            LayoutEvent::lookahead_measure("child"),
            LayoutEvent::measure("parent"),
            LayoutEvent::measure("child"),
            LayoutEvent::lookahead_place("parent"),
            LayoutEvent::lookahead_place("child"),
            LayoutEvent::place("parent"),
            LayoutEvent::place("child"),
        ]
    );
    assert!(child.is_placed());
    assert!(child.is_placed_in_lookahead());
    assert_eq!(parent.lookahead_measures_count(), 1);
    assert_eq!(parent.lookahead_layouts_count(), 1);
}

#[test]
fn invalidating_a_scoped_node_reruns_both_passes_once() {
    let log = event_log();
    let parent = LayoutNode::new(RecordingPolicy::new("parent", &log));
    let child = LayoutNode::new(RecordingPolicy::new("child", &log));
    parent.add_child(child.clone());
    let (root, _scope) = in_scope(parent.clone());
    let delegate = create_delegate(&root);
    log.borrow_mut().clear();

    child.invalidate_measure();
    assert_eq!(child.lookahead_dirty_state(), DirtyState::NeedsRemeasure);
    assert_eq!(child.dirty_state(), DirtyState::NeedsRemeasure);
    delegate.measure_and_layout();

    assert_eq!(
        *log.borrow(),
        vec![
            LayoutEvent::lookahead_measure("child"),
            LayoutEvent::measure("child"),
            LayoutEvent::lookahead_place("child"),
            LayoutEvent::place("child"),
        ]
    );
    assert_eq!(child.lookahead_dirty_state(), DirtyState::Ready);
}

#[test]
fn nodes_outside_a_scope_have_no_lookahead_size() {
    let root = TestNode::new().add(TestNode::new());
    let _delegate = create_delegate(&root);

    assert!(!root.first().in_lookahead_scope());
    assert_eq!(
        root.first().lookahead_size(),
        Err(LayoutError::LookaheadNotMeasured(root.first().id()))
    );
    assert!(root.first().size().is_ok());
}

#[test]
fn lookahead_request_outside_a_scope_falls_back_to_the_real_pass() {
    let root = TestNode::new().add(TestNode::new());
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_lookahead_remeasured(root.first(), 0, || {
            delegate.request_lookahead_remeasure(root.first());
            delegate.measure_and_layout();
        })
    });
}

#[test]
fn intermediate_modifier_sizes_itself_from_the_lookahead_result() {
    let node = TestNode::new().with_size(40.0);
    node.set_modifiers(vec![intermediate_layout(|scope, wrapped, _constraints| {
        let target = scope.lookahead_size().unwrap_or(Size::ZERO);
        let half = Size::new(target.width / 2.0, target.height / 2.0);
        wrapped.measure(Constraints::tight(half.width, half.height));
        ModifierMeasureResult::new(half, Point::ZERO)
    })]);
    let (root, _scope) = in_scope(node.node().clone());

    let _delegate = create_delegate(&root);

    assert_eq!(node.lookahead_size(), Ok(Size::new(40.0, 40.0)));
    assert_eq!(node.size(), Ok(Size::new(20.0, 20.0)));
}

#[test]
fn skipped_real_placement_keeps_the_lookahead_placement() {
    let skip = Rc::new(Cell::new(false));
    let node = TestNode::new().with_size(10.0).add(TestNode::new());
    node.set_modifiers(vec![SkipPlacement::new(&skip)]);
    let (root, scope) = in_scope(node.node().clone());
    let delegate = create_delegate(&root);
    assert!(node.is_placed());
    assert!(node.is_placed_in_lookahead());

    skip.set(true);
    scope.invalidate_layout();
    delegate.measure_and_layout();

    assert!(!node.is_placed());
    assert!(!node.first().is_placed());
    assert!(node.is_placed_in_lookahead());
    assert!(node.first().is_placed_in_lookahead());

    skip.set(false);
    scope.invalidate_layout();
    delegate.measure_and_layout();

    assert!(node.is_placed());
    assert!(node.first().is_placed());
}

#[test]
fn closing_a_scope_drops_the_lookahead_pass() {
    let node = TestNode::new();
    let (root, scope) = in_scope(node.node().clone());
    let delegate = create_delegate(&root);
    let measured = node.lookahead_measures_count();

    scope.set_lookahead_root(false);
    assert!(!node.in_lookahead_scope());
    delegate.measure_and_layout();
    assert_lookahead_remeasured(&node, 0, || {
        node.invalidate_measure();
        delegate.measure_and_layout();
    });
    assert_eq!(node.lookahead_measures_count(), measured);
}

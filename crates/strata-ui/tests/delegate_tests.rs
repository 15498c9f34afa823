use strata_testing::prelude::*;
use strata_ui::{Constraints, DirtyState, LayoutError};
use strata_ui_graphics::Size;

fn root_with_child() -> TestNode {
    TestNode::new().add(TestNode::new())
}

fn root_with_grandchild() -> TestNode {
    TestNode::new().add(TestNode::new().add(TestNode::new()))
}

fn two_branches() -> TestNode {
    TestNode::new()
        .add(TestNode::new().add(TestNode::new()))
        .add(TestNode::new().add(TestNode::new()))
}

#[test]
fn new_nodes_need_measure_until_the_first_pass() {
    let root = root_with_child();
    assert_eq!(root.dirty_state(), DirtyState::NeedsRemeasure);
    assert_eq!(root.first().dirty_state(), DirtyState::NeedsRemeasure);
    assert_eq!(root.size(), Err(LayoutError::NotMeasured(root.id())));

    let delegate = create_delegate(&root);

    assert_eq!(root.dirty_state(), DirtyState::Ready);
    assert_eq!(root.first().dirty_state(), DirtyState::Ready);
    assert!(root.is_placed());
    assert!(root.first().is_placed());
    assert_eq!(root.measures_count(), 1);
    assert_eq!(root.first().layouts_count(), 1);
    assert_eq!(delegate.measure_iteration(), 1);
}

#[test]
fn wrapping_root_takes_the_size_of_its_child() {
    let root = TestNode::new()
        .wrap_children()
        .add(TestNode::new().with_size(DIFFERENT_SIZE));

    let _delegate = create_delegate(&root);

    assert_eq!(root.size(), Ok(Size::new(DIFFERENT_SIZE, DIFFERENT_SIZE)));
}

#[test]
fn child_remeasure_request_needs_a_pass() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert!(delegate.request_remeasure(root.first()));
    assert_eq!(root.first().dirty_state(), DirtyState::NeedsRemeasure);
}

#[test]
fn child_remeasure_request_remeasures_and_relays_out_the_child() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_relaid_out(root.first(), 1, || {
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn child_with_the_same_result_leaves_the_parent_alone() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert_not_remeasured(&root, || {
        assert_not_relaid_out(&root, || {
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn child_with_a_different_result_remeasures_the_parent() {
    let root = TestNode::new()
        .wrap_children()
        .add(TestNode::new().with_size(DIFFERENT_SIZE));
    let delegate = create_delegate(&root);

    assert_remeasured(&root, 1, || {
        root.first().set_size(DIFFERENT_SIZE_2);
        delegate.request_remeasure(root.first());
        assert!(delegate.measure_and_layout());
    });
    assert_eq!(root.size(), Ok(Size::new(DIFFERENT_SIZE_2, DIFFERENT_SIZE_2)));
}

#[test]
fn child_measured_in_layout_block_is_remeasured() {
    let root = root_with_child().measure_in_layout_block();
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_relaid_out(root.first(), 1, || {
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn child_measured_in_layout_block_with_the_same_result_leaves_the_parent_alone() {
    let root = root_with_child().measure_in_layout_block();
    let delegate = create_delegate(&root);

    assert_not_remeasured(&root, || {
        assert_not_relaid_out(&root, || {
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn child_measured_in_layout_block_with_a_new_size_relays_out_the_parent() {
    let root = root_with_child().measure_in_layout_block();
    let delegate = create_delegate(&root);

    assert_not_remeasured(&root, || {
        assert_relaid_out(&root, 1, || {
            root.first().set_size(DIFFERENT_SIZE);
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
    assert_eq!(root.first().size(), Ok(Size::new(DIFFERENT_SIZE, DIFFERENT_SIZE)));
}

#[test]
fn root_remeasure_leaves_the_child_alone() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert_remeasured(&root, 1, || {
        assert_not_remeasured(root.first(), || {
            assert_not_relaid_out(root.first(), || {
                delegate.request_remeasure(&root);
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn parent_remeasure_leaves_the_child_alone() {
    let root = root_with_grandchild();
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_not_remeasured(root.first().first(), || {
            assert_not_relaid_out(root.first().first(), || {
                delegate.request_remeasure(root.first());
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn relayout_request_only_relays_out_the_child() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert!(delegate.request_relayout(root.first()));
    assert_eq!(root.first().dirty_state(), DirtyState::NeedsRelayout);

    assert_not_remeasured(root.first(), || {
        assert_relaid_out(root.first(), 1, || {
            assert_not_remeasured(&root, || {
                assert_not_relaid_out(&root, || {
                    assert!(!delegate.measure_and_layout());
                })
            })
        })
    });
}

#[test]
fn parent_relayout_leaves_the_child_alone() {
    let root = root_with_grandchild();
    let delegate = create_delegate(&root);

    assert_relaid_out(root.first(), 1, || {
        assert_not_remeasured(root.first().first(), || {
            assert_not_relaid_out(root.first().first(), || {
                delegate.request_relayout(root.first());
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn duplicate_requests_coalesce() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_relaid_out(root.first(), 1, || {
            assert!(delegate.request_remeasure(root.first()));
            assert!(!delegate.request_remeasure(root.first()));
            assert!(!delegate.request_relayout(root.first()));
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn relayout_then_remeasure_still_remeasures() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_relaid_out(root.first(), 1, || {
            delegate.request_relayout(root.first());
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn sibling_requests_touch_only_their_targets() {
    let root = TestNode::new().add(TestNode::new()).add(TestNode::new());
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_not_remeasured(root.second(), || {
            assert_relaid_out(root.second(), 1, || {
                delegate.request_remeasure(root.first());
                delegate.request_relayout(root.second());
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn requests_on_different_levels_leave_the_others_alone() {
    let root = TestNode::new()
        .add(TestNode::new())
        .add(TestNode::new().add(TestNode::new()));
    let delegate = create_delegate(&root);

    assert_not_remeasured(&root, || {
        assert_remeasured(root.first(), 1, || {
            assert_not_remeasured(root.second(), || {
                assert_remeasured(root.second().first(), 1, || {
                    delegate.request_remeasure(root.first());
                    delegate.request_remeasure(root.second().first());
                    assert!(!delegate.measure_and_layout());
                })
            })
        })
    });
}

#[test]
fn requests_under_different_parents_leave_the_parents_alone() {
    let root = two_branches();
    let delegate = create_delegate(&root);

    assert_not_relaid_out(&root, || {
        assert_not_relaid_out(root.first(), || {
            assert_remeasured(root.first().first(), 1, || {
                assert_not_relaid_out(root.second(), || {
                    assert_relaid_out(root.second().first(), 1, || {
                        delegate.request_remeasure(root.first().first());
                        delegate.request_relayout(root.second().first());
                        assert!(!delegate.measure_and_layout());
                    })
                })
            })
        })
    });
}

#[test]
fn leaf_size_change_stops_at_the_fixed_size_ancestor() {
    let root = TestNode::new().wrap_children().add(
        TestNode::new().with_size(DIFFERENT_SIZE).add(
            TestNode::new()
                .wrap_children()
                .add(TestNode::new().with_size(DIFFERENT_SIZE)),
        ),
    );
    let delegate = create_delegate(&root);
    let fixed = root.first();
    let wrapper = fixed.first();
    let leaf = wrapper.first();

    assert_not_remeasured(&root, || {
        assert_remeasured(fixed, 1, || {
            assert_remeasured(wrapper, 1, || {
                assert_remeasured(leaf, 1, || {
                    leaf.set_size(DIFFERENT_SIZE_2);
                    delegate.request_remeasure(leaf);
                    assert!(!delegate.measure_and_layout());
                })
            })
        })
    });
    assert_eq!(wrapper.size(), Ok(Size::new(DIFFERENT_SIZE_2, DIFFERENT_SIZE_2)));
}

#[test]
fn request_for_a_child_during_parent_measure_measures_it_once() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_remeasured(&root, 1, || {
        assert_remeasured(root.first(), 1, || {
            root.run_during_measure(move || {
                handle.request_remeasure(&child);
            });
            delegate.request_remeasure(&root);
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn request_for_a_grandchild_during_measure_skips_the_middle_node() {
    let root = root_with_grandchild();
    let delegate = create_delegate(&root);
    let grandchild = root.first().first().node().clone();
    let handle = delegate.clone();

    assert_remeasured(&root, 1, || {
        assert_not_remeasured(root.first(), || {
            assert_remeasured(root.first().first(), 1, || {
                root.run_during_measure(move || {
                    handle.request_remeasure(&grandchild);
                });
                delegate.request_remeasure(&root);
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn relayout_request_for_a_child_during_measure_is_honoured() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_remeasured(&root, 1, || {
        assert_relaid_out(root.first(), 1, || {
            root.run_during_measure(move || {
                handle.request_relayout(&child);
            });
            delegate.request_remeasure(&root);
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn request_for_a_child_during_parent_layout_measures_it_once() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_relaid_out(&root, 1, || {
        assert_remeasured(root.first(), 1, || {
            root.run_during_layout(move || {
                handle.request_remeasure(&child);
            });
            delegate.request_relayout(&root);
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn request_for_a_grandchild_during_layout_skips_the_middle_node() {
    let root = root_with_grandchild();
    let delegate = create_delegate(&root);
    let grandchild = root.first().first().node().clone();
    let handle = delegate.clone();

    assert_relaid_out(&root, 1, || {
        assert_not_relaid_out(root.first(), || {
            assert_remeasured(root.first().first(), 1, || {
                root.run_during_layout(move || {
                    handle.request_remeasure(&grandchild);
                });
                delegate.request_relayout(&root);
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn remeasure_requested_during_own_measure_runs_once_more() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_remeasured(root.first(), 2, || {
        root.first().run_during_measure(move || {
            handle.request_remeasure(&child);
        });
        delegate.request_remeasure(root.first());
        assert!(!delegate.measure_and_layout());
    });
    assert_eq!(root.first().dirty_state(), DirtyState::Ready);
}

#[test]
fn relayout_requested_during_own_measure_is_dropped() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_remeasured(root.first(), 1, || {
        assert_relaid_out(root.first(), 1, || {
            root.first().run_during_measure(move || {
                handle.request_relayout(&child);
            });
            delegate.request_remeasure(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn remeasure_requested_during_own_layout_relays_out_twice() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_remeasured(root.first(), 1, || {
        assert_relaid_out(root.first(), 2, || {
            root.first().run_during_layout(move || {
                handle.request_remeasure(&child);
            });
            delegate.request_relayout(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn relayout_requested_during_own_layout_is_dropped() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();
    let handle = delegate.clone();

    assert_not_remeasured(root.first(), || {
        assert_relaid_out(root.first(), 1, || {
            root.first().run_during_layout(move || {
                handle.request_relayout(&child);
            });
            delegate.request_relayout(root.first());
            assert!(!delegate.measure_and_layout());
        })
    });
}

#[test]
fn same_root_constraints_do_nothing() {
    let root = root_with_grandchild();
    let delegate = create_delegate(&root);

    assert_not_remeasured(&root, || {
        assert_not_remeasured(root.first(), || {
            assert_not_remeasured(root.first().first(), || {
                delegate.update_root_constraints(Constraints::new(0.0, 100.0, 0.0, 100.0));
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn new_root_constraints_remeasure_the_subtree() {
    let root = root_with_grandchild();
    let delegate = create_delegate(&root);

    assert_remeasured(&root, 1, || {
        assert_remeasured(root.first(), 1, || {
            assert_remeasured(root.first().first(), 1, || {
                delegate.update_root_constraints(Constraints::loose(DIFFERENT_SIZE, DIFFERENT_SIZE));
                assert!(delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn new_root_constraints_stop_at_unaffected_nodes() {
    let root = TestNode::new().add(TestNode::new().with_size(DIFFERENT_SIZE_2).add(TestNode::new()));
    let delegate = create_delegate(&root);

    assert_remeasured(root.first(), 1, || {
        assert_not_remeasured(root.first().first(), || {
            delegate.update_root_constraints(Constraints::loose(DIFFERENT_SIZE, DIFFERENT_SIZE));
            assert!(delegate.measure_and_layout());
        })
    });
}

#[test]
fn dirty_measure_block_child_is_measured_before_its_parent_places_it() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let child = root.first().node().clone();

    assert_not_remeasured(&root, || {
        assert_relaid_out(&root, 1, || {
            assert_remeasured(root.first(), 1, || {
                delegate.request_remeasure(root.first());
                delegate.request_relayout(&root);
                root.run_during_layout(move || {
                    assert!(!child.is_measure_pending());
                    assert!(child.is_layout_pending());
                });
                assert!(!delegate.measure_and_layout());
            })
        })
    });
}

#[test]
fn child_resized_before_placement_remeasures_the_parent() {
    let root = root_with_child().wrap_children();
    let delegate = create_delegate(&root);

    assert_remeasured(&root, 1, || {
        assert_remeasured(root.first(), 1, || {
            root.first().set_size(DIFFERENT_SIZE);
            delegate.request_remeasure(root.first());
            delegate.request_relayout(&root);
            assert!(delegate.measure_and_layout());
        })
    });
    assert_eq!(root.size(), Ok(Size::new(DIFFERENT_SIZE, DIFFERENT_SIZE)));
}

#[test]
fn pending_work_is_reported_until_the_pass_runs() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    assert!(!delegate.has_pending_measure_or_layout());
    delegate.request_remeasure(root.first());
    assert!(delegate.has_pending_measure_or_layout());
    assert!(root.has_dirty_descendant());
    delegate.measure_and_layout();
    assert!(!delegate.has_pending_measure_or_layout());
    assert!(!root.has_dirty_descendant());
}

#[test]
fn second_pass_without_requests_does_nothing() {
    let root = two_branches();
    let delegate = create_delegate(&root);
    let nodes = [
        root.node().clone(),
        root.first().node().clone(),
        root.first().first().node().clone(),
        root.second().node().clone(),
        root.second().first().node().clone(),
    ];
    let counts: Vec<_> = nodes
        .iter()
        .map(|node| (node.measures_count(), node.layouts_count()))
        .collect();

    assert!(!delegate.measure_and_layout());

    let after: Vec<_> = nodes
        .iter()
        .map(|node| (node.measures_count(), node.layouts_count()))
        .collect();
    assert_eq!(counts, after);
}

#[test]
fn unplaced_parent_leaves_the_whole_subtree_unplaced() {
    let root = root_with_grandchild();
    root.first().first().node().add_child(TestNode::new().node().clone());
    let delegate = create_delegate(&root);
    let great_grandchild = root.first().first().child_at(0);

    root.set_should_place_children(false);
    delegate.request_relayout(&root);
    delegate.measure_and_layout();

    assert!(root.is_placed());
    assert!(!root.first().is_placed());
    assert!(!root.first().first().is_placed());
    assert!(great_grandchild.is_some_and(|node| !node.is_placed()));
}

#[test]
fn placing_again_replays_work_requested_while_unplaced() {
    let root = root_with_child();
    let delegate = create_delegate(&root);

    root.set_should_place_children(false);
    delegate.request_relayout(&root);
    delegate.measure_and_layout();
    assert!(!root.first().is_placed());

    delegate.request_relayout(root.first());
    assert_eq!(root.first().dirty_state(), DirtyState::NeedsRelayout);

    root.set_should_place_children(true);
    assert_relaid_out(root.first(), 1, || {
        delegate.request_relayout(&root);
        delegate.measure_and_layout();
    });
    assert!(root.first().is_placed());
    assert_eq!(root.first().dirty_state(), DirtyState::Ready);
}

#[test]
fn node_is_remeasured_twice_when_an_ancestor_changes_its_constraints() {
    let node1 = TestNode::new()
        .with_size(50.0)
        .add(TestNode::new().add(TestNode::new()))
        .add(TestNode::new());
    let root = TestNode::new()
        .with_size(100.0)
        .add(node1)
        .add(TestNode::new());
    let delegate = create_delegate(&root);

    let node1 = root.first();
    let node2 = node1.first();
    let node3 = node2.first();
    let node4 = node1.second();
    let node5 = root.second();

    delegate.request_remeasure(&root);
    root.set_size(50.0);
    delegate.request_remeasure(node3);
    let handle = delegate.clone();
    let again = node1.node().clone();
    node5.run_during_measure(move || {
        handle.request_remeasure(&again);
    });

    assert_remeasured(&root, 1, || {
        assert_remeasured(node1, 2, || {
            assert_not_remeasured(node2, || {
                assert_remeasured(node3, 1, || {
                    assert_not_remeasured(node4, || {
                        assert_remeasured(node5, 1, || {
                            delegate.measure_and_layout();
                        })
                    })
                })
            })
        })
    });
}

#[test]
fn removing_past_the_last_child_is_an_error() {
    let root = TestNode::new().add(TestNode::new());
    let _delegate = create_delegate(&root);

    assert_eq!(
        root.remove_child_at(1).map(|child| child.id()),
        Err(LayoutError::ChildIndexOutOfRange {
            parent: root.id(),
            index: 1,
        })
    );
    assert_eq!(root.child_count(), 1);

    let only = root.first().node().clone();
    assert_eq!(root.remove_child_at(0).map(|child| child.id()), Ok(only.id()));
    assert!(!only.is_attached());
    assert_eq!(root.remove_child(&only), Err(LayoutError::NodeNotFound(only.id())));
}

#[test]
fn removed_child_is_not_measured() {
    let root = TestNode::new().add(TestNode::new()).add(TestNode::new());
    let delegate = create_delegate(&root);
    let removed = root.second().node().clone();

    delegate.request_remeasure(&removed);
    assert_eq!(root.remove_child(&removed), Ok(()));

    assert!(!removed.is_attached());
    assert_eq!(removed.request_remeasure(), Err(LayoutError::Detached(removed.id())));
    assert_not_remeasured(&removed, || {
        assert_remeasured(&root, 1, || {
            delegate.measure_and_layout();
        })
    });
    assert_eq!(root.child_count(), 1);
}

#[test]
fn inserted_child_is_measured_with_its_parent() {
    let root = root_with_child();
    let delegate = create_delegate(&root);
    let inserted = TestNode::new().with_size(DIFFERENT_SIZE);

    root.insert_child(0, inserted.node().clone());
    assert!(delegate.has_pending_measure_or_layout());
    assert_remeasured(&inserted, 1, || {
        assert_remeasured(&root, 1, || {
            delegate.measure_and_layout();
        })
    });
    assert!(inserted.is_placed());
    assert_eq!(inserted.size(), Ok(Size::new(DIFFERENT_SIZE, DIFFERENT_SIZE)));
    assert_eq!(inserted.depth(), 1);
}

#[test]
#[should_panic(expected = "measured twice")]
fn measuring_a_child_twice_panics() {
    use std::rc::Rc;
    use strata_ui::{LayoutNode, Measurable, MeasurePolicy, MeasureResult, MeasureScope};

    struct TwiceMeasuring;

    impl MeasurePolicy for TwiceMeasuring {
        fn measure(
            &self,
            _scope: &dyn MeasureScope,
            measurables: &[Box<dyn Measurable>],
            constraints: Constraints,
        ) -> MeasureResult {
            for measurable in measurables {
                measurable.measure(constraints);
                measurable.measure(constraints);
            }
            MeasureResult::new(constraints.max_bounded_size(), Vec::new())
        }

        fn min_intrinsic_width(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
            0.0
        }

        fn max_intrinsic_width(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
            0.0
        }

        fn min_intrinsic_height(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
            0.0
        }

        fn max_intrinsic_height(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
            0.0
        }
    }

    let root = LayoutNode::new(Rc::new(TwiceMeasuring));
    root.add_child(TestNode::new().node().clone());
    let _delegate = create_delegate(&root);
}

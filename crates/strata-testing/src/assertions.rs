//! Assertions over the measure and layout counters of a node.

use strata_ui::LayoutNode;

/// Runs `block` and asserts `node` was measured exactly `times` times in it.
#[track_caller]
pub fn assert_remeasured<R>(node: &LayoutNode, times: usize, block: impl FnOnce() -> R) -> R {
    let before = node.measures_count();
    let result = block();
    let actual = node.measures_count() - before;
    assert_eq!(
        actual, times,
        "node {} measured {actual} times, expected {times}",
        node.id()
    );
    result
}

#[track_caller]
pub fn assert_not_remeasured<R>(node: &LayoutNode, block: impl FnOnce() -> R) -> R {
    assert_remeasured(node, 0, block)
}

/// Runs `block` and asserts `node` was laid out exactly `times` times in it.
#[track_caller]
pub fn assert_relaid_out<R>(node: &LayoutNode, times: usize, block: impl FnOnce() -> R) -> R {
    let before = node.layouts_count();
    let result = block();
    let actual = node.layouts_count() - before;
    assert_eq!(
        actual, times,
        "node {} laid out {actual} times, expected {times}",
        node.id()
    );
    result
}

#[track_caller]
pub fn assert_not_relaid_out<R>(node: &LayoutNode, block: impl FnOnce() -> R) -> R {
    assert_relaid_out(node, 0, block)
}

/// Like [`assert_remeasured`] but for the lookahead pass.
#[track_caller]
pub fn assert_lookahead_remeasured<R>(
    node: &LayoutNode,
    times: usize,
    block: impl FnOnce() -> R,
) -> R {
    let before = node.lookahead_measures_count();
    let result = block();
    let actual = node.lookahead_measures_count() - before;
    assert_eq!(
        actual, times,
        "node {} lookahead-measured {actual} times, expected {times}",
        node.id()
    );
    result
}

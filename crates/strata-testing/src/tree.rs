//! Tree builders for delegate tests.

use std::ops::Deref;
use std::rc::Rc;
use strata_ui::{LayoutNode, MeasureAndLayoutDelegate};
use strata_ui_layout::Constraints;

use crate::policies::TestPolicy;

/// A size different from what [`create_delegate`] gives the root.
pub const DIFFERENT_SIZE: f32 = 50.0;
pub const DIFFERENT_SIZE_2: f32 = 30.0;

/// A [`LayoutNode`] driven by a [`TestPolicy`], with its test children.
///
/// Dereferences to the node so it can be handed to the delegate directly.
#[derive(Clone)]
pub struct TestNode {
    node: Rc<LayoutNode>,
    policy: Rc<TestPolicy>,
    children: Vec<TestNode>,
}

impl Default for TestNode {
    fn default() -> Self {
        Self::new()
    }
}

impl TestNode {
    pub fn new() -> Self {
        let policy = Rc::new(TestPolicy::default());
        Self {
            node: LayoutNode::new(policy.clone()),
            policy,
            children: Vec::new(),
        }
    }

    pub fn with_size(self, size: f32) -> Self {
        self.policy.size.set(Some(size));
        self
    }

    /// Takes the size of the largest child instead of its own.
    pub fn wrap_children(self) -> Self {
        self.policy.wrap_children.set(true);
        self
    }

    /// Measures children while placing them instead of while measuring.
    pub fn measure_in_layout_block(self) -> Self {
        self.policy.measure_in_layout_block.set(true);
        self
    }

    pub fn add(mut self, child: TestNode) -> Self {
        self.node.add_child(child.node.clone());
        self.children.push(child);
        self
    }

    pub fn node(&self) -> &Rc<LayoutNode> {
        &self.node
    }

    pub fn child(&self, index: usize) -> &TestNode {
        &self.children[index]
    }

    pub fn first(&self) -> &TestNode {
        self.child(0)
    }

    pub fn second(&self) -> &TestNode {
        self.child(1)
    }

    /// Changes the size the policy reports; the caller requests the remeasure.
    pub fn set_size(&self, size: f32) {
        self.policy.size.set(Some(size));
    }

    pub fn set_wrap_children(&self, wrap: bool) {
        self.policy.wrap_children.set(wrap);
    }

    pub fn set_should_place_children(&self, place: bool) {
        self.policy.should_place_children.set(place);
    }

    /// Runs `block` once, inside the next measure of this node.
    pub fn run_during_measure(&self, block: impl FnOnce() + 'static) {
        *self.policy.during_measure.borrow_mut() = Some(Box::new(block));
    }

    /// Runs `block` once, inside the next layout of this node.
    pub fn run_during_layout(&self, block: impl FnOnce() + 'static) {
        *self.policy.during_layout.borrow_mut() = Some(Box::new(block));
    }
}

impl Deref for TestNode {
    type Target = Rc<LayoutNode>;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

/// Delegate for `root` with 100x100 loose root constraints, already
/// measured and laid out once. Dropping the delegate detaches the tree.
#[must_use]
pub fn create_delegate(root: &Rc<LayoutNode>) -> Rc<MeasureAndLayoutDelegate> {
    create_delegate_with(root, Constraints::new(0.0, 100.0, 0.0, 100.0))
}

#[must_use]
pub fn create_delegate_with(
    root: &Rc<LayoutNode>,
    constraints: Constraints,
) -> Rc<MeasureAndLayoutDelegate> {
    let delegate = MeasureAndLayoutDelegate::new(root.clone());
    delegate.update_root_constraints(constraints);
    assert!(delegate.measure_and_layout(), "first layout must size the root");
    delegate
}

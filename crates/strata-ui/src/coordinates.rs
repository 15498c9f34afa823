use std::rc::{Rc, Weak};
use strata_ui_graphics::{Point, Size};
use strata_ui_layout::LayoutCoordinates;

use crate::node::LayoutNode;

/// Coordinates of a node in the real pass.
///
/// Holds the node weakly; once it is dropped or detached the coordinates
/// report themselves as not attached.
#[derive(Clone, Debug)]
pub struct NodeCoordinates {
    node: Weak<LayoutNode>,
}

impl NodeCoordinates {
    pub(crate) fn new(node: &Rc<LayoutNode>) -> Self {
        Self {
            node: Rc::downgrade(node),
        }
    }

    fn offset_in_root(&self) -> Point {
        self.node
            .upgrade()
            .map_or(Point::ZERO, |node| node.position_in_root())
    }
}

impl LayoutCoordinates for NodeCoordinates {
    fn size(&self) -> Size {
        self.node
            .upgrade()
            .and_then(|node| node.size().ok())
            .unwrap_or(Size::ZERO)
    }

    fn is_attached(&self) -> bool {
        self.node
            .upgrade()
            .is_some_and(|node| node.is_attached() && node.is_placed())
    }

    fn local_to_root(&self, local: Point) -> Point {
        local + self.offset_in_root()
    }

    fn root_to_local(&self, root: Point) -> Point {
        root - self.offset_in_root()
    }
}

//! Coordinate spaces of placed layout content

use strata_ui_graphics::{Point, Rect, Size};

/// Position and size of a placed node, with conversions between its local
/// space and the root's.
pub trait LayoutCoordinates {
    fn size(&self) -> Size;

    /// False once the node is detached; positions are then meaningless.
    fn is_attached(&self) -> bool;

    fn local_to_root(&self, local: Point) -> Point;

    fn root_to_local(&self, root: Point) -> Point;

    fn position_in_root(&self) -> Point {
        self.local_to_root(Point::ZERO)
    }

    fn bounds_in_root(&self) -> Rect {
        Rect::from_origin_size(self.position_in_root(), self.size())
    }

    /// Converts `relative`, given in `source`'s space, into this space.
    fn local_position_of(&self, source: &dyn LayoutCoordinates, relative: Point) -> Point {
        self.root_to_local(source.local_to_root(relative))
    }
}

//! Pure math/data for geometry, units, typography and drawing in strata
//!
//! Nothing here knows about layout nodes; the types are shared by the layout
//! contracts, the text engine and the selection layer.

mod color;
mod draw;
mod geometry;
mod typography;
mod unit;

pub use color::*;
pub use draw::*;
pub use geometry::*;
pub use typography::*;
pub use unit::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::draw::{DrawPrimitive, DrawScope, RecordingDrawScope};
    pub use crate::geometry::{Path, Point, Rect, Size};
    pub use crate::typography::{TextStyle, TextOverflow};
    pub use crate::unit::{Density, Dp, Sp};
}

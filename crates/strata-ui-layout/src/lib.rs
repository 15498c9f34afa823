//! Layout contracts for strata

mod alignment;
mod alignment_line;
mod axis;
mod constraints;
mod coordinates;
mod core;
mod direction;
mod intrinsics;

pub use alignment::*;
pub use alignment_line::*;
pub use axis::*;
pub use constraints::*;
pub use coordinates::*;
pub use core::*;
pub use direction::*;
pub use intrinsics::*;

pub mod prelude {
    pub use crate::alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
    pub use crate::alignment_line::AlignmentLine;
    pub use crate::constraints::Constraints;
    pub use crate::core::{
        Measurable, MeasurePolicy, MeasureResult, MeasureScope, Placeable, Placement,
        PlacementScope,
    };
    pub use crate::direction::LayoutDirection;
}

//! Layout engine for strata: layout nodes, the measure/layout delegate,
//! intrinsics tracking and the lookahead pass.

mod coordinates;
mod delegate;
mod depth_sorted_set;
mod error;
mod intrinsics;
pub mod layout;
mod lookahead;
mod measure_pass;
mod node;

pub use coordinates::NodeCoordinates;
pub use delegate::MeasureAndLayoutDelegate;
pub use error::LayoutError;
pub use intrinsics::UsageByParent;
pub use lookahead::LayoutPass;
pub use node::{DirtyState, LayoutNode, LayoutState, NodeMeasurement};

pub use strata_ui_layout::{
    Alignment, AlignmentLine, Constraints, IntrinsicKind, LayoutCoordinates, LayoutDirection,
    Measurable, MeasurePolicy, MeasureResult, MeasureScope, Placeable, Placement, PlacementScope,
};

pub mod prelude {
    pub use crate::layout::{
        BoxMeasurePolicy, LayoutModifier, LinearMeasurePolicy, TextMeasurePolicy,
    };
    pub use crate::{LayoutError, LayoutNode, MeasureAndLayoutDelegate};
    pub use strata_ui_layout::prelude::*;
}

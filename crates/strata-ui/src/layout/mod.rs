//! Modifier chain, stock measure policies and the text policy.

mod coordinator;
mod modifier;
mod policies;
mod text;

pub(crate) use coordinator::{CoordinatorChain, MeasuredModifier, NodeMeasureScope};
pub use modifier::{
    intermediate_layout, FixedSize, IntermediateLayout, LayoutModifier, ModifierMeasureResult,
    ModifierMeasureScope, ModifierPlaceScope, Padding,
};
pub use policies::{
    BoxMeasurePolicy, CrossAxisAlignment, EmptyMeasurePolicy, FixedSizePolicy,
    IntrinsicSizePolicy, LinearMeasurePolicy,
};
pub use text::TextMeasurePolicy;

//! Intrinsic measurement APIs

use crate::Measurable;

/// Specifies how to size a component based on its intrinsic measurements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntrinsicSize {
    Min,
    Max,
}

/// One of the four intrinsic queries a measurable answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
}

impl IntrinsicKind {
    pub fn width(size: IntrinsicSize) -> Self {
        match size {
            IntrinsicSize::Min => IntrinsicKind::MinWidth,
            IntrinsicSize::Max => IntrinsicKind::MaxWidth,
        }
    }

    pub fn height(size: IntrinsicSize) -> Self {
        match size {
            IntrinsicSize::Min => IntrinsicKind::MinHeight,
            IntrinsicSize::Max => IntrinsicKind::MaxHeight,
        }
    }

    pub fn is_width(self) -> bool {
        matches!(self, IntrinsicKind::MinWidth | IntrinsicKind::MaxWidth)
    }

    /// Runs this query against `measurable`; `cross` is the height for width
    /// queries and the width for height queries.
    pub fn query(self, measurable: &dyn Measurable, cross: f32) -> f32 {
        match self {
            IntrinsicKind::MinWidth => measurable.min_intrinsic_width(cross),
            IntrinsicKind::MaxWidth => measurable.max_intrinsic_width(cross),
            IntrinsicKind::MinHeight => measurable.min_intrinsic_height(cross),
            IntrinsicKind::MaxHeight => measurable.max_intrinsic_height(cross),
        }
    }
}

//! Alignment lines reported by measured content

/// How values of the same line reported by several children combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlignmentLineMerge {
    Min,
    Max,
}

/// A reference line a child exposes to its ancestors.
///
/// Horizontal lines (baselines) are positioned along the y axis, vertical
/// lines along the x axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlignmentLine {
    FirstBaseline,
    LastBaseline,
    Custom {
        id: u32,
        horizontal: bool,
        merge: AlignmentLineMerge,
    },
}

impl AlignmentLine {
    pub const fn horizontal(id: u32, merge: AlignmentLineMerge) -> Self {
        AlignmentLine::Custom {
            id,
            horizontal: true,
            merge,
        }
    }

    pub const fn vertical(id: u32, merge: AlignmentLineMerge) -> Self {
        AlignmentLine::Custom {
            id,
            horizontal: false,
            merge,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        match self {
            AlignmentLine::FirstBaseline | AlignmentLine::LastBaseline => true,
            AlignmentLine::Custom { horizontal, .. } => *horizontal,
        }
    }

    /// Combines two positions of this line. The first baseline is the
    /// topmost one, the last baseline the bottommost.
    pub fn merge(&self, a: f32, b: f32) -> f32 {
        match self {
            AlignmentLine::FirstBaseline => a.min(b),
            AlignmentLine::LastBaseline => a.max(b),
            AlignmentLine::Custom { merge, .. } => match merge {
                AlignmentLineMerge::Min => a.min(b),
                AlignmentLineMerge::Max => a.max(b),
            },
        }
    }

    /// Moves a line position from a child's space into its parent's, given
    /// where the child was placed.
    pub fn offset_by(&self, value: f32, x: f32, y: f32) -> f32 {
        if self.is_horizontal() {
            value + y
        } else {
            value + x
        }
    }
}

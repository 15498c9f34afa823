//! Alignment utilities for positioning content

use crate::LayoutDirection;
use strata_ui_graphics::{Point, Size};

/// Alignment across both axes used for positioning content within a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl Alignment {
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const TOP_START: Self = Self::new(HorizontalAlignment::Start, VerticalAlignment::Top);

    pub const CENTER: Self = Self::new(
        HorizontalAlignment::CenterHorizontally,
        VerticalAlignment::CenterVertically,
    );

    pub const BOTTOM_END: Self = Self::new(HorizontalAlignment::End, VerticalAlignment::Bottom);

    /// Offset of a `child` sized box inside `available`.
    pub fn align(&self, available: Size, child: Size, direction: LayoutDirection) -> Point {
        Point::new(
            self.horizontal
                .align(available.width, child.width, direction),
            self.vertical.align(available.height, child.height),
        )
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::TOP_START
    }
}

/// Alignment along the horizontal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Leading edge; the right edge in right-to-left layouts.
    #[default]
    Start,
    CenterHorizontally,
    End,
}

impl HorizontalAlignment {
    pub fn align(&self, available: f32, child: f32, direction: LayoutDirection) -> f32 {
        let free = available - child;
        let resolved = match (self, direction) {
            (HorizontalAlignment::Start, LayoutDirection::Rtl) => HorizontalAlignment::End,
            (HorizontalAlignment::End, LayoutDirection::Rtl) => HorizontalAlignment::Start,
            (other, _) => *other,
        };
        match resolved {
            HorizontalAlignment::Start => 0.0,
            HorizontalAlignment::CenterHorizontally => (free / 2.0).round(),
            HorizontalAlignment::End => free,
        }
    }
}

/// Alignment along the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    CenterVertically,
    Bottom,
}

impl VerticalAlignment {
    pub fn align(&self, available: f32, child: f32) -> f32 {
        let free = available - child;
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::CenterVertically => (free / 2.0).round(),
            VerticalAlignment::Bottom => free,
        }
    }
}

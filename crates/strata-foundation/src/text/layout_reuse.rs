//! Decides whether text laid out under old constraints can be reused under
//! new ones, by reasoning about first-fit line breaking.

use strata_ui_graphics::{LineBreak, Size, TextOverflow};
use strata_ui_layout::Constraints;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LayoutReuse {
    /// Same constraints; nothing to do.
    Unchanged,
    /// Line breaks are known to be identical; only the size and clip state
    /// need recomputing.
    Reconstrain,
    Reshape,
}

/// Wrapping and overflow configuration shared by both text caches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WrapPolicy {
    pub soft_wrap: bool,
    pub overflow: TextOverflow,
    pub max_lines: usize,
}

impl WrapPolicy {
    /// Width text may wrap at. Without soft wrap (and no ellipsis to fit)
    /// text is never broken, so the bound is dropped.
    pub fn effective_max_width(&self, constraints: &Constraints) -> f32 {
        if (self.soft_wrap || self.overflow == TextOverflow::Ellipsis)
            && constraints.has_bounded_width()
        {
            constraints.max_width
        } else {
            f32::INFINITY
        }
    }

    pub fn can_wrap(&self) -> bool {
        self.soft_wrap && self.max_lines > 1
    }

    /// Line limit used for shaping. One ellipsis per line is only possible
    /// on a single line when wrapping is off.
    pub fn effective_max_lines(&self) -> usize {
        if !self.soft_wrap && self.overflow == TextOverflow::Ellipsis {
            1
        } else {
            self.max_lines.max(1)
        }
    }

    pub fn ellipsis(&self) -> bool {
        self.overflow == TextOverflow::Ellipsis
    }

    /// Width to shape at: exact for tight constraints, otherwise the
    /// natural width clamped into range.
    pub fn layout_width(&self, constraints: &Constraints, max_intrinsic_width: f32) -> f32 {
        if constraints.has_tight_width() {
            constraints.max_width
        } else {
            max_intrinsic_width
                .ceil()
                .max(constraints.min_width)
                .min(self.effective_max_width(constraints))
        }
    }

    /// Final size and (width, height) overflow of a shaped result.
    pub fn constrain(&self, constraints: &Constraints, shaped: Size) -> (Size, bool, bool) {
        let size = constraints.constrain(shaped.ceil());
        if self.overflow == TextOverflow::Visible {
            return (size, false, false);
        }
        (
            size,
            size.width < shaped.width,
            size.height < shaped.height,
        )
    }

    /// Steps after the fonts/direction check, which callers do first since
    /// it needs their cached intrinsics.
    pub fn reuse_for(
        &self,
        line_break: LineBreak,
        previous: &Constraints,
        next: &Constraints,
        laid_out_width: f32,
        max_intrinsic_width: f32,
    ) -> LayoutReuse {
        if previous == next {
            return LayoutReuse::Unchanged;
        }
        if line_break != LineBreak::Simple {
            return LayoutReuse::Reshape;
        }

        let previous_max = self.effective_max_width(previous);
        let next_max = self.effective_max_width(next);

        let reshape = if self.can_wrap() {
            if next.min_width > laid_out_width || next.has_tight_width() != previous.has_tight_width()
            {
                true
            } else if laid_out_width == max_intrinsic_width.ceil() {
                next_max < laid_out_width
            } else {
                next_max > previous_max || next_max <= laid_out_width
            }
        } else {
            next.min_width != previous.min_width || next_max != previous_max
        };

        if reshape {
            LayoutReuse::Reshape
        } else {
            LayoutReuse::Reconstrain
        }
    }
}

#[cfg(test)]
#[path = "tests/layout_reuse_tests.rs"]
mod tests;

//! Layout constraints system

use strata_ui_graphics::Size;

/// Constraints used during layout measurement.
///
/// `f32::INFINITY` marks an unbounded maximum. Equality is bit-for-bit on the
/// four bounds, which is what measurement caches compare against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Constraints {
    /// Sentinel for an unbounded maximum.
    pub const INFINITY: f32 = f32::INFINITY;

    /// No minimum, no maximum.
    pub const UNBOUNDED: Constraints = Constraints {
        min_width: 0.0,
        max_width: f32::INFINITY,
        min_height: 0.0,
        max_height: f32::INFINITY,
    };

    /// Creates constraints, raising each maximum to its minimum if needed.
    pub fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        let min_width = min_width.max(0.0);
        let min_height = min_height.max(0.0);
        Self {
            min_width,
            max_width: max_width.max(min_width),
            min_height,
            max_height: max_height.max(min_height),
        }
    }

    /// Creates constraints with exact width and height.
    pub fn tight(width: f32, height: f32) -> Self {
        Self::new(width, width, height, height)
    }

    /// Creates constraints with loose bounds (min = 0, max = given values).
    pub fn loose(max_width: f32, max_height: f32) -> Self {
        Self::new(0.0, max_width, 0.0, max_height)
    }

    /// Exact width, unbounded height.
    pub fn fixed_width(width: f32) -> Self {
        Self::new(width, width, 0.0, f32::INFINITY)
    }

    /// Exact height, unbounded width.
    pub fn fixed_height(height: f32) -> Self {
        Self::new(0.0, f32::INFINITY, height, height)
    }

    /// Returns true if these constraints have a single size that satisfies them.
    pub fn is_tight(&self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }

    /// Returns true if all bounds are finite.
    pub fn is_bounded(&self) -> bool {
        self.max_width.is_finite() && self.max_height.is_finite()
    }

    #[inline]
    pub fn has_bounded_width(&self) -> bool {
        self.max_width.is_finite()
    }

    #[inline]
    pub fn has_bounded_height(&self) -> bool {
        self.max_height.is_finite()
    }

    #[inline]
    pub fn has_tight_width(&self) -> bool {
        self.min_width == self.max_width
    }

    #[inline]
    pub fn has_tight_height(&self) -> bool {
        self.min_height == self.max_height
    }

    pub fn constrain_width(&self, width: f32) -> f32 {
        width.max(self.min_width).min(self.max_width)
    }

    pub fn constrain_height(&self, height: f32) -> f32 {
        height.max(self.min_height).min(self.max_height)
    }

    /// Constrains the provided size to fit within these constraints.
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            self.constrain_width(size.width),
            self.constrain_height(size.height),
        )
    }

    /// Narrows `other` so that it also satisfies these constraints.
    pub fn constrain_constraints(&self, other: Constraints) -> Constraints {
        Constraints::new(
            self.constrain_width(other.min_width),
            self.constrain_width(other.max_width),
            self.constrain_height(other.min_height),
            self.constrain_height(other.max_height),
        )
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// Largest satisfying size; unbounded axes fall back to the minimum.
    pub fn max_bounded_size(&self) -> Size {
        Size::new(
            if self.has_bounded_width() {
                self.max_width
            } else {
                self.min_width
            },
            if self.has_bounded_height() {
                self.max_height
            } else {
                self.min_height
            },
        )
    }

    /// Creates new constraints with tightened width (min = max = given width).
    pub fn tighten_width(self, width: f32) -> Self {
        Self::new(width, width, self.min_height, self.max_height)
    }

    /// Creates new constraints with tightened height (min = max = given height).
    pub fn tighten_height(self, height: f32) -> Self {
        Self::new(self.min_width, self.max_width, height, height)
    }

    pub fn copy_with_width(self, min_width: f32, max_width: f32) -> Self {
        Self::new(min_width, max_width, self.min_height, self.max_height)
    }

    pub fn copy_with_height(self, min_height: f32, max_height: f32) -> Self {
        Self::new(self.min_width, self.max_width, min_height, max_height)
    }

    /// Shrinks the bounds by the given insets, used to apply padding before
    /// measuring content. Unbounded maximums stay unbounded.
    pub fn deflate(self, horizontal: f32, vertical: f32) -> Self {
        Self::new(
            (self.min_width - horizontal).max(0.0),
            (self.max_width - horizontal).max(0.0),
            (self.min_height - vertical).max(0.0),
            (self.max_height - vertical).max(0.0),
        )
    }

    /// Creates new constraints with loosened minimums (min = 0).
    pub fn loosen(self) -> Self {
        Self {
            min_width: 0.0,
            min_height: 0.0,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "tests/constraints_tests.rs"]
mod tests;

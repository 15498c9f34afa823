/// Main axis of a linear layout (Row or Column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Main axis: left to right. Cross axis: top to bottom.
    Horizontal,
    /// Main axis: top to bottom. Cross axis: left to right.
    Vertical,
}

impl Axis {
    #[inline]
    pub fn cross_axis(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    /// Splits `(width, height)` into `(main, cross)` for this axis.
    #[inline]
    pub fn main_cross(self, width: f32, height: f32) -> (f32, f32) {
        match self {
            Axis::Horizontal => (width, height),
            Axis::Vertical => (height, width),
        }
    }

    /// Inverse of [`Axis::main_cross`].
    #[inline]
    pub fn width_height(self, main: f32, cross: f32) -> (f32, f32) {
        self.main_cross(main, cross)
    }
}

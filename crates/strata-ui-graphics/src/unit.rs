//! Unit types: Dp, Sp, Density

/// Density-independent pixels
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Dp(pub f32);

impl Dp {
    pub fn to_px(&self, density: Density) -> f32 {
        self.0 * density.density
    }

    pub fn from_px(px: f32, density: Density) -> Self {
        Self(px / density.density)
    }
}

/// Scale-independent pixels (for text)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Sp(pub f32);

impl Sp {
    pub fn to_px(&self, density: Density) -> f32 {
        self.0 * density.density * density.font_scale
    }
}

/// Screen density and the user's font scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    pub density: f32,
    pub font_scale: f32,
}

impl Density {
    pub const fn new(density: f32, font_scale: f32) -> Self {
        Self {
            density,
            font_scale,
        }
    }

    pub const ONE: Density = Density::new(1.0, 1.0);

    /// Bit pattern usable as a hash/equality key.
    pub fn key(&self) -> (u32, u32) {
        (self.density.to_bits(), self.font_scale.to_bits())
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::ONE
    }
}

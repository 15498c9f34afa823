//! Typography data structures (font styles, weights, text styles)

use crate::Color;
use std::hash::{Hash, Hasher};

/// Font style (normal, italic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Font weight (100-900)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const BOLD: FontWeight = FontWeight(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// How lines are broken when text soft-wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineBreak {
    /// Greedy, first-fit breaking at whitespace.
    #[default]
    Simple,
    /// Balanced line lengths, as used for headings.
    Heading,
    /// Breaking that optimises whole paragraphs.
    Paragraph,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
}

/// What happens to text that does not fit its constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextOverflow {
    #[default]
    Clip,
    Ellipsis,
    Visible,
}

pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Text style (data only, no rendering)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub letter_spacing: Option<f32>,
    /// Line height in pixels; falls back to font metrics when unset.
    pub line_height: Option<f32>,
    pub line_break: LineBreak,
    pub text_align: TextAlign,
    pub color: Option<Color>,
}

impl TextStyle {
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = Some(height);
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    pub fn with_line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn font_size_or_default(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Fills every unset field with its default value.
    pub fn resolve_defaults(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: Some(self.font_size_or_default()),
            font_weight: Some(self.font_weight.unwrap_or_default()),
            font_style: Some(self.font_style.unwrap_or_default()),
            letter_spacing: Some(self.letter_spacing.unwrap_or(0.0)),
            line_height: self.line_height,
            line_break: self.line_break,
            text_align: self.text_align,
            color: Some(self.color.unwrap_or(Color::BLACK)),
        }
    }
}

// Floats are hashed by bit pattern so styles can key memo tables.
impl Hash for TextStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_family.hash(state);
        self.font_size.map(f32::to_bits).hash(state);
        self.font_weight.hash(state);
        self.font_style.hash(state);
        self.letter_spacing.map(f32::to_bits).hash(state);
        self.line_height.map(f32::to_bits).hash(state);
        self.line_break.hash(state);
        self.text_align.hash(state);
        self.color
            .map(|c| [c.0.to_bits(), c.1.to_bits(), c.2.to_bits(), c.3.to_bits()])
            .hash(state);
    }
}

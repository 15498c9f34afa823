//! Font-dependent measurements of a single paragraph, computed once and
//! shared by every layout of it.

use super::annotated::AnnotatedString;
use super::font::{FontFamilyResolver, FontRequest};
use std::rc::Rc;
use strata_ui_graphics::{Density, Sp, TextStyle};
use strata_ui_layout::LayoutDirection;

pub struct ParagraphIntrinsics {
    text: AnnotatedString,
    chars: Vec<char>,
    style: TextStyle,
    density: Density,
    direction: LayoutDirection,
    resolver: Rc<dyn FontFamilyResolver>,
    resolved_generation: u64,
    pub(crate) advances: Vec<f32>,
    pub(crate) ascents: Vec<f32>,
    pub(crate) descents: Vec<f32>,
    placeholder_chars: Vec<bool>,
    pub(crate) default_ascent: f32,
    pub(crate) default_descent: f32,
    pub(crate) font_size_px: f32,
    pub(crate) ellipsis_advance: f32,
    min_intrinsic_width: f32,
    max_intrinsic_width: f32,
}

pub(crate) const ELLIPSIS: char = '\u{2026}';

impl ParagraphIntrinsics {
    pub fn new(
        text: AnnotatedString,
        style: &TextStyle,
        density: Density,
        direction: LayoutDirection,
        resolver: Rc<dyn FontFamilyResolver>,
    ) -> Self {
        let style = style.resolve_defaults();
        let resolved_generation = resolver.generation();
        let font = resolver.resolve(&FontRequest::from_style(&style));
        let font_size_px = Sp(style.font_size_or_default()).to_px(density);
        let letter_spacing = Sp(style.letter_spacing.unwrap_or(0.0)).to_px(density);

        let chars: Vec<char> = text.text().chars().collect();
        let mut advances = Vec::with_capacity(chars.len());
        let mut ascents = Vec::with_capacity(chars.len());
        let mut descents = Vec::with_capacity(chars.len());
        for (index, ch) in chars.iter().enumerate() {
            let span = text
                .spans()
                .iter()
                .rev()
                .find(|span| span.start <= index && index < span.end);
            let size = span
                .and_then(|span| span.style.font_size)
                .map(|size| Sp(size).to_px(density))
                .unwrap_or(font_size_px);
            let spacing = span
                .and_then(|span| span.style.letter_spacing)
                .map(|spacing| Sp(spacing).to_px(density))
                .unwrap_or(letter_spacing);
            let advance = font.advance(*ch) * size;
            advances.push(if advance > 0.0 { advance + spacing } else { 0.0 });
            ascents.push(font.ascent() * size);
            descents.push(font.descent() * size);
        }

        let mut placeholder_chars = vec![false; chars.len()];
        for placeholder in text.placeholders() {
            let end = placeholder.end.min(chars.len());
            for index in placeholder.start.min(end)..end {
                placeholder_chars[index] = true;
                advances[index] = if index == placeholder.start {
                    placeholder.width
                } else {
                    0.0
                };
            }
        }

        let mut intrinsics = Self {
            ellipsis_advance: font.advance(ELLIPSIS) * font_size_px,
            default_ascent: font.ascent() * font_size_px,
            default_descent: font.descent() * font_size_px,
            font_size_px,
            text,
            chars,
            style,
            density,
            direction,
            resolver,
            resolved_generation,
            advances,
            ascents,
            descents,
            placeholder_chars,
            min_intrinsic_width: 0.0,
            max_intrinsic_width: 0.0,
        };
        intrinsics.min_intrinsic_width = intrinsics.widest_word();
        intrinsics.max_intrinsic_width = intrinsics.widest_hard_line();
        intrinsics
    }

    fn widest_word(&self) -> f32 {
        let mut widest = 0.0f32;
        let mut current = 0.0f32;
        for index in 0..self.chars.len() {
            if self.is_break_opportunity(index) {
                widest = widest.max(current);
                current = 0.0;
            } else {
                current += self.advances[index];
            }
        }
        widest.max(current)
    }

    fn widest_hard_line(&self) -> f32 {
        let mut widest = 0.0f32;
        let mut start = 0;
        for index in 0..=self.chars.len() {
            if index == self.chars.len() || self.chars[index] == '\n' {
                widest = widest.max(self.visible_width(start, index));
                start = index + 1;
            }
        }
        widest
    }

    /// Width of `start..end` without its trailing whitespace.
    pub(crate) fn visible_width(&self, start: usize, end: usize) -> f32 {
        let visible_end = self.trim_trailing_whitespace(start, end);
        self.advances[start..visible_end].iter().sum()
    }

    pub(crate) fn trim_trailing_whitespace(&self, start: usize, end: usize) -> usize {
        let mut visible_end = end;
        while visible_end > start && self.is_break_opportunity(visible_end - 1) {
            visible_end -= 1;
        }
        visible_end
    }

    pub(crate) fn is_break_opportunity(&self, index: usize) -> bool {
        !self.placeholder_chars[index] && self.chars[index].is_whitespace()
    }

    pub fn text(&self) -> &AnnotatedString {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    pub fn resolver(&self) -> &Rc<dyn FontFamilyResolver> {
        &self.resolver
    }

    /// Width of the longest unbreakable run.
    pub fn min_intrinsic_width(&self) -> f32 {
        self.min_intrinsic_width
    }

    /// Width of the longest hard line, laid out without wrapping.
    pub fn max_intrinsic_width(&self) -> f32 {
        self.max_intrinsic_width
    }

    /// True once the resolver has replaced fonts this was measured with.
    pub fn has_stale_resolved_fonts(&self) -> bool {
        self.resolver.generation() != self.resolved_generation
    }
}

//! Immutable result of laying out text, and the inputs it was built from.

use super::annotated::AnnotatedString;
use super::font::{same_resolver, FontFamilyResolver};
use super::multi_paragraph::MultiParagraph;
use super::paragraph::LineMetrics;
use super::{TextLayoutError, TextRange};
use std::fmt;
use std::rc::Rc;
use strata_ui_graphics::{Color, Density, DrawScope, Path, Point, Rect, Size, TextOverflow, TextStyle};
use strata_ui_layout::{Constraints, LayoutDirection};

/// Everything a [`TextLayoutResult`] depends on.
#[derive(Clone)]
pub struct TextLayoutInput {
    pub text: AnnotatedString,
    pub style: TextStyle,
    pub max_lines: usize,
    pub soft_wrap: bool,
    pub overflow: TextOverflow,
    pub density: Density,
    pub layout_direction: LayoutDirection,
    /// Compared by identity.
    pub resolver: Rc<dyn FontFamilyResolver>,
    pub constraints: Constraints,
}

impl PartialEq for TextLayoutInput {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.style == other.style
            && self.max_lines == other.max_lines
            && self.soft_wrap == other.soft_wrap
            && self.overflow == other.overflow
            && self.density == other.density
            && self.layout_direction == other.layout_direction
            && same_resolver(&self.resolver, &other.resolver)
            && self.constraints == other.constraints
    }
}

impl fmt::Debug for TextLayoutInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLayoutInput")
            .field("text", &self.text.text())
            .field("max_lines", &self.max_lines)
            .field("soft_wrap", &self.soft_wrap)
            .field("overflow", &self.overflow)
            .field("layout_direction", &self.layout_direction)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

pub struct TextLayoutResult {
    input: TextLayoutInput,
    multi_paragraph: Rc<MultiParagraph>,
    size: Size,
}

impl TextLayoutResult {
    pub fn new(input: TextLayoutInput, multi_paragraph: Rc<MultiParagraph>, size: Size) -> Self {
        Self {
            input,
            multi_paragraph,
            size,
        }
    }

    pub fn input(&self) -> &TextLayoutInput {
        &self.input
    }

    pub fn multi_paragraph(&self) -> &Rc<MultiParagraph> {
        &self.multi_paragraph
    }

    /// Laid-out size after constraining.
    pub fn size(&self) -> Size {
        self.size
    }

    /// True when `input` would produce exactly this layout.
    pub fn is_valid_for(&self, input: &TextLayoutInput) -> bool {
        self.input == *input
    }

    pub fn text_len(&self) -> usize {
        self.multi_paragraph.len()
    }

    pub fn did_overflow_width(&self) -> bool {
        self.size.width < self.multi_paragraph.width()
    }

    pub fn did_overflow_height(&self) -> bool {
        self.multi_paragraph.did_exceed_max_lines() || self.size.height < self.multi_paragraph.height()
    }

    pub fn has_visual_overflow(&self) -> bool {
        self.did_overflow_width() || self.did_overflow_height()
    }

    pub fn first_baseline(&self) -> f32 {
        self.multi_paragraph.first_baseline()
    }

    pub fn last_baseline(&self) -> f32 {
        self.multi_paragraph.last_baseline()
    }

    pub fn line_count(&self) -> usize {
        self.multi_paragraph.line_count()
    }

    pub fn line(&self, index: usize) -> Option<LineMetrics> {
        self.multi_paragraph.line(index)
    }

    pub fn placeholder_rects(&self) -> &[Option<Rect>] {
        self.multi_paragraph.placeholder_rects()
    }

    pub fn offset_for_position(&self, position: Point) -> usize {
        self.multi_paragraph.offset_for_position(position)
    }

    /// Like [`TextLayoutResult::offset_for_position`], but `None` for a
    /// position that could not be resolved.
    pub fn try_offset_for_position(&self, position: Point) -> Option<usize> {
        position
            .is_finite()
            .then(|| self.offset_for_position(position))
    }

    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.multi_paragraph.line_for_offset(offset)
    }

    pub fn line_for_vertical_position(&self, y: f32) -> usize {
        self.multi_paragraph.line_for_vertical_position(y)
    }

    pub fn horizontal_position(&self, offset: usize) -> f32 {
        self.multi_paragraph.horizontal_position(offset)
    }

    pub fn bounding_box(&self, offset: usize) -> Result<Rect, TextLayoutError> {
        self.multi_paragraph.bounding_box(offset)
    }

    pub fn cursor_rect(&self, offset: usize) -> Rect {
        self.multi_paragraph.cursor_rect(offset)
    }

    pub fn path_for_range(&self, start: usize, end: usize) -> Result<Path, TextLayoutError> {
        self.multi_paragraph.path_for_range(start, end)
    }

    pub fn word_boundary(&self, offset: usize) -> TextRange {
        self.multi_paragraph.word_boundary(offset)
    }

    /// Offset just past the last character that is actually shown, taking
    /// height clipping and ellipsis into account.
    pub fn last_visible_offset(&self) -> usize {
        if !self.did_overflow_height() {
            return self.text_len();
        }
        let visible_lines = self
            .multi_paragraph
            .lines()
            .into_iter()
            .take_while(|line| line.top < self.size.height)
            .last();
        match visible_lines.or_else(|| self.multi_paragraph.line(0)) {
            Some(line) => line.visible_end,
            None => 0,
        }
    }

    /// Draws the text, clipped to its size when it overflows.
    pub fn paint(&self, scope: &mut dyn DrawScope, origin: Point) {
        let color = self.input.style.color.unwrap_or(Color::BLACK);
        let clip = self.has_visual_overflow() && self.input.overflow != TextOverflow::Visible;
        if clip {
            scope.clip_rect(Rect::from_origin_size(origin, self.size));
        }
        self.multi_paragraph.paint(scope, origin, color);
        if clip {
            scope.restore_clip();
        }
    }
}

impl fmt::Debug for TextLayoutResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLayoutResult")
            .field("input", &self.input)
            .field("size", &self.size)
            .field("line_count", &self.line_count())
            .finish()
    }
}

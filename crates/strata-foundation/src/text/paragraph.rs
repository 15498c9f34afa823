//! Greedy line breaking and hit-testing for one paragraph of text.

use super::annotated::PlaceholderVerticalAlign;
use super::intrinsics::{ParagraphIntrinsics, ELLIPSIS};
use super::word_boundaries::find_word_boundaries;
use super::{TextLayoutError, TextRange};
use smallvec::SmallVec;
use std::rc::Rc;
use strata_ui_graphics::{Color, DrawScope, Path, Point, Rect, TextAlign};
use strata_ui_layout::LayoutDirection;

// Tolerates float noise when a run exactly fills the width.
const WIDTH_EPSILON: f32 = 0.001;

/// Geometry of one laid-out line. Offsets are character indices; `end`
/// includes trailing whitespace and the terminating line break.
#[derive(Clone, Debug, PartialEq)]
pub struct LineMetrics {
    pub start: usize,
    pub end: usize,
    pub visible_end: usize,
    pub top: f32,
    pub bottom: f32,
    pub baseline: f32,
    pub left: f32,
    pub width: f32,
    pub ellipsized: bool,
}

impl LineMetrics {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

struct LineBreak {
    start: usize,
    end: usize,
    visible_end: usize,
    width: f32,
    ellipsized: bool,
}

/// A paragraph shaped at a fixed width.
pub struct Paragraph {
    intrinsics: Rc<ParagraphIntrinsics>,
    width: f32,
    height: f32,
    lines: SmallVec<[LineMetrics; 4]>,
    char_left: Vec<f32>,
    placeholder_rects: Vec<Option<Rect>>,
    did_exceed_max_lines: bool,
}

impl Paragraph {
    /// Breaks the text into lines no wider than `width`, keeping at most
    /// `max_lines` of them. With `ellipsis` the last kept line is shortened
    /// to make room for an ellipsis when text was cut off.
    pub fn new(
        intrinsics: Rc<ParagraphIntrinsics>,
        width: f32,
        max_lines: usize,
        ellipsis: bool,
    ) -> Self {
        let max_lines = max_lines.max(1);
        let len = intrinsics.chars().len();

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        let mut segment_start = 0;
        for index in 0..=len {
            if index == len || intrinsics.chars()[index] == '\n' {
                break_segment(&intrinsics, segment_start, index, width, &mut ranges);
                if index < len {
                    if let Some(last) = ranges.last_mut() {
                        last.1 = index + 1;
                    }
                }
                segment_start = index + 1;
            }
        }

        let did_exceed_max_lines = ranges.len() > max_lines;
        ranges.truncate(max_lines);

        let kept = ranges.len();
        let breaks: Vec<LineBreak> = ranges
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let ellipsized = ellipsis && did_exceed_max_lines && index + 1 == kept;
                let mut visible_end = intrinsics.trim_trailing_whitespace(start, end);
                let mut line_width: f32 = intrinsics.advances[start..visible_end].iter().sum();
                if ellipsized {
                    while visible_end > start
                        && line_width + intrinsics.ellipsis_advance > width + WIDTH_EPSILON
                    {
                        visible_end -= 1;
                        line_width -= intrinsics.advances[visible_end];
                    }
                    line_width += intrinsics.ellipsis_advance;
                }
                LineBreak {
                    start,
                    end,
                    visible_end,
                    width: line_width,
                    ellipsized,
                }
            })
            .collect();

        let paragraph_width = if width.is_finite() {
            width
        } else {
            breaks.iter().map(|line| line.width).fold(0.0, f32::max)
        };

        let style = intrinsics.style();
        let mut char_left = vec![0.0; len];
        let mut lines: SmallVec<[LineMetrics; 4]> = SmallVec::new();
        let mut top = 0.0;
        for line in breaks {
            let (mut ascent, mut descent) = if line.visible_end > line.start {
                (
                    max_of(&intrinsics.ascents[line.start..line.visible_end]),
                    max_of(&intrinsics.descents[line.start..line.visible_end]),
                )
            } else {
                (intrinsics.default_ascent, intrinsics.default_descent)
            };
            for placeholder in intrinsics.text().placeholders() {
                if placeholder.start < line.start || placeholder.start >= line.visible_end {
                    continue;
                }
                match placeholder.vertical_align {
                    PlaceholderVerticalAlign::AboveBaseline => {
                        ascent = ascent.max(placeholder.height)
                    }
                    _ => {
                        if placeholder.height > ascent + descent {
                            descent = placeholder.height - ascent;
                        }
                    }
                }
            }
            let content = ascent + descent;
            let (height, padding) = match style.line_height {
                Some(line_height) => (line_height, (line_height - content) / 2.0),
                None => (content, 0.0),
            };
            let left = align_offset(
                style.text_align,
                intrinsics.direction(),
                paragraph_width,
                line.width,
            );
            let mut x = left;
            for index in line.start..line.end {
                char_left[index] = x;
                x += intrinsics.advances[index];
            }
            lines.push(LineMetrics {
                start: line.start,
                end: line.end,
                visible_end: line.visible_end,
                top,
                bottom: top + height,
                baseline: top + padding + ascent,
                left,
                width: line.width,
                ellipsized: line.ellipsized,
            });
            top += height;
        }

        let mut paragraph = Self {
            intrinsics,
            width: paragraph_width,
            height: top,
            lines,
            char_left,
            placeholder_rects: Vec::new(),
            did_exceed_max_lines,
        };
        paragraph.placeholder_rects = paragraph.compute_placeholder_rects();
        paragraph
    }

    fn compute_placeholder_rects(&self) -> Vec<Option<Rect>> {
        self.intrinsics
            .text()
            .placeholders()
            .iter()
            .map(|placeholder| {
                let line = self.lines.iter().find(|line| {
                    placeholder.start >= line.start && placeholder.start < line.visible_end
                })?;
                let left = self.char_left[placeholder.start];
                let top = match placeholder.vertical_align {
                    PlaceholderVerticalAlign::AboveBaseline => line.baseline - placeholder.height,
                    PlaceholderVerticalAlign::Top => line.top,
                    PlaceholderVerticalAlign::Bottom => line.bottom - placeholder.height,
                    PlaceholderVerticalAlign::Center => {
                        line.top + (line.height() - placeholder.height) / 2.0
                    }
                };
                Some(Rect::new(left, top, placeholder.width, placeholder.height))
            })
            .collect()
    }

    pub fn intrinsics(&self) -> &Rc<ParagraphIntrinsics> {
        &self.intrinsics
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.char_left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.char_left.is_empty()
    }

    pub fn min_intrinsic_width(&self) -> f32 {
        self.intrinsics.min_intrinsic_width()
    }

    pub fn max_intrinsic_width(&self) -> f32 {
        self.intrinsics.max_intrinsic_width()
    }

    pub fn did_exceed_max_lines(&self) -> bool {
        self.did_exceed_max_lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[LineMetrics] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&LineMetrics> {
        self.lines.get(index)
    }

    pub fn first_baseline(&self) -> f32 {
        self.lines.first().map(|line| line.baseline).unwrap_or(0.0)
    }

    pub fn last_baseline(&self) -> f32 {
        self.lines.last().map(|line| line.baseline).unwrap_or(0.0)
    }

    /// Rectangles reserved for placeholders, `None` for those cut off by
    /// the line limit.
    pub fn placeholder_rects(&self) -> &[Option<Rect>] {
        &self.placeholder_rects
    }

    fn last_line_index(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// Line containing `offset`; offsets past the shown text map to the last line.
    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.lines
            .iter()
            .position(|line| offset < line.end)
            .unwrap_or(self.last_line_index())
    }

    /// Line at `y`, clamped to the first and last line.
    pub fn line_for_vertical_position(&self, y: f32) -> usize {
        self.lines
            .iter()
            .position(|line| y < line.bottom)
            .unwrap_or(self.last_line_index())
    }

    fn boundary_x(&self, line: &LineMetrics, offset: usize) -> f32 {
        if offset < line.end && offset < self.len() && offset >= line.start {
            return self.char_left[offset];
        }
        if line.end > line.start {
            let last = line.end - 1;
            self.char_left[last] + self.intrinsics.advances[last]
        } else {
            line.left
        }
    }

    /// X of the caret placed before `offset`.
    pub fn horizontal_position(&self, offset: usize) -> f32 {
        let offset = offset.min(self.len());
        match self.lines.get(self.line_for_offset(offset)) {
            Some(line) => self.boundary_x(line, offset).min(self.width.max(line.right())),
            None => 0.0,
        }
    }

    /// Character offset closest to `position`.
    pub fn offset_for_position(&self, position: Point) -> usize {
        let Some(line) = self.lines.get(self.line_for_vertical_position(position.y)) else {
            return 0;
        };
        let mut best = line.start;
        let mut best_distance = f32::INFINITY;
        for offset in line.start..=line.visible_end {
            let distance = (self.boundary_x(line, offset) - position.x).abs();
            if distance < best_distance {
                best = offset;
                best_distance = distance;
            }
        }
        best
    }

    /// Box of the character at `offset`.
    pub fn bounding_box(&self, offset: usize) -> Result<Rect, TextLayoutError> {
        if offset >= self.len() {
            return Err(TextLayoutError::OffsetOutOfRange {
                offset,
                len: self.len(),
            });
        }
        let line = &self.lines[self.line_for_offset(offset)];
        let left = self.boundary_x(line, offset);
        let right = left + self.intrinsics.advances[offset];
        Ok(Rect::from_ltrb(left, line.top, right, line.bottom))
    }

    /// Zero-width rectangle spanning the line at the caret position.
    pub fn cursor_rect(&self, offset: usize) -> Rect {
        let offset = offset.min(self.len());
        match self.lines.get(self.line_for_offset(offset)) {
            Some(line) => {
                let x = self.boundary_x(line, offset);
                Rect::from_ltrb(x, line.top, x, line.bottom)
            }
            None => Rect::ZERO,
        }
    }

    /// Highlight area covering `start..end`, one rectangle per line.
    pub fn path_for_range(&self, start: usize, end: usize) -> Result<Path, TextLayoutError> {
        if start > end || end > self.len() {
            return Err(TextLayoutError::OffsetOutOfRange {
                offset: start.max(end),
                len: self.len(),
            });
        }
        let mut path = Path::new();
        for line in &self.lines {
            let from = start.max(line.start);
            let to = end.min(line.end);
            if from >= to {
                continue;
            }
            let left = self.boundary_x(line, from);
            let right = self.boundary_x(line, to);
            path.add_rect(Rect::from_ltrb(left, line.top, right, line.bottom));
        }
        Ok(path)
    }

    pub fn word_boundary(&self, offset: usize) -> TextRange {
        let (start, end) = find_word_boundaries(self.intrinsics.chars(), offset);
        TextRange::new(start, end)
    }

    /// Draws every shown line, offset by `origin`.
    pub fn paint(&self, scope: &mut dyn DrawScope, origin: Point, color: Color) {
        let chars = self.intrinsics.chars();
        for line in &self.lines {
            let mut text: String = chars[line.start..line.visible_end].iter().collect();
            if line.ellipsized {
                text.push(ELLIPSIS);
            }
            if text.is_empty() {
                continue;
            }
            scope.draw_text(
                &text,
                Point::new(origin.x + line.left, origin.y + line.top),
                origin.y + line.baseline,
                self.intrinsics.font_size_px,
                color,
            );
        }
    }
}

fn max_of(values: &[f32]) -> f32 {
    values.iter().copied().fold(0.0, f32::max)
}

fn align_offset(
    align: TextAlign,
    direction: LayoutDirection,
    container: f32,
    line_width: f32,
) -> f32 {
    let free = (container - line_width).max(0.0);
    match (align, direction) {
        (TextAlign::Left, _)
        | (TextAlign::Start, LayoutDirection::Ltr)
        | (TextAlign::End, LayoutDirection::Rtl) => 0.0,
        (TextAlign::Right, _)
        | (TextAlign::End, LayoutDirection::Ltr)
        | (TextAlign::Start, LayoutDirection::Rtl) => free,
        (TextAlign::Center, _) => free / 2.0,
    }
}

/// First-fit breaking of `start..end` (no hard breaks inside). A word is
/// split only when it alone is wider than `width`.
fn break_segment(
    intrinsics: &ParagraphIntrinsics,
    start: usize,
    end: usize,
    width: f32,
    out: &mut Vec<(usize, usize)>,
) {
    if start == end {
        out.push((start, end));
        return;
    }
    let mut line_start = start;
    while line_start < end {
        let mut x = 0.0;
        let mut last_break: Option<usize> = None;
        let mut line_end = end;
        let mut index = line_start;
        while index < end {
            let advance = intrinsics.advances[index];
            if intrinsics.is_break_opportunity(index) {
                x += advance;
                last_break = Some(index + 1);
            } else if x + advance > width + WIDTH_EPSILON && index > line_start {
                line_end = match last_break {
                    Some(at) if at > line_start => at,
                    _ => index,
                };
                break;
            } else {
                x += advance;
            }
            index += 1;
        }
        out.push((line_start, line_end));
        line_start = line_end;
    }
}

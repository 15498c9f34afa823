//! Text made of several paragraphs, one per hard line break, stacked
//! vertically and addressed with global offsets and line indices.

use super::annotated::AnnotatedString;
use super::font::FontFamilyResolver;
use super::intrinsics::ParagraphIntrinsics;
use super::paragraph::{LineMetrics, Paragraph};
use super::{TextLayoutError, TextRange};
use std::rc::Rc;
use strata_ui_graphics::{Color, Density, DrawScope, Path, Point, Rect, TextStyle};
use strata_ui_layout::LayoutDirection;

struct IntrinsicsInfo {
    intrinsics: Rc<ParagraphIntrinsics>,
    start: usize,
    end: usize,
}

/// Font-dependent measurements of every paragraph of an [`AnnotatedString`].
pub struct MultiParagraphIntrinsics {
    text: AnnotatedString,
    infos: Vec<IntrinsicsInfo>,
    min_intrinsic_width: f32,
    max_intrinsic_width: f32,
}

impl MultiParagraphIntrinsics {
    pub fn new(
        text: AnnotatedString,
        style: &TextStyle,
        density: Density,
        direction: LayoutDirection,
        resolver: Rc<dyn FontFamilyResolver>,
    ) -> Self {
        let chars: Vec<char> = text.text().chars().collect();
        let mut infos = Vec::new();
        let mut start = 0;
        for index in 0..=chars.len() {
            let at_break = index < chars.len() && chars[index] == '\n';
            if index == chars.len() || at_break {
                let intrinsics = ParagraphIntrinsics::new(
                    text.sub_sequence(start, index),
                    style,
                    density,
                    direction,
                    resolver.clone(),
                );
                // The break belongs to the paragraph it terminates.
                let end = if at_break { index + 1 } else { index };
                infos.push(IntrinsicsInfo {
                    intrinsics: Rc::new(intrinsics),
                    start,
                    end,
                });
                start = index + 1;
            }
        }
        let min_intrinsic_width = infos
            .iter()
            .map(|info| info.intrinsics.min_intrinsic_width())
            .fold(0.0, f32::max);
        let max_intrinsic_width = infos
            .iter()
            .map(|info| info.intrinsics.max_intrinsic_width())
            .fold(0.0, f32::max);
        Self {
            text,
            infos,
            min_intrinsic_width,
            max_intrinsic_width,
        }
    }

    pub fn text(&self) -> &AnnotatedString {
        &self.text
    }

    pub fn min_intrinsic_width(&self) -> f32 {
        self.min_intrinsic_width
    }

    pub fn max_intrinsic_width(&self) -> f32 {
        self.max_intrinsic_width
    }

    pub fn has_stale_resolved_fonts(&self) -> bool {
        self.infos
            .iter()
            .any(|info| info.intrinsics.has_stale_resolved_fonts())
    }
}

struct ParagraphInfo {
    paragraph: Paragraph,
    start: usize,
    end: usize,
    start_line: usize,
    end_line: usize,
    top: f32,
    bottom: f32,
}

impl ParagraphInfo {
    fn to_local(&self, offset: usize) -> usize {
        offset.saturating_sub(self.start).min(self.paragraph.len())
    }

    fn to_global_line(&self, metrics: &LineMetrics) -> LineMetrics {
        LineMetrics {
            start: metrics.start + self.start,
            end: if metrics.end >= self.paragraph.len() {
                self.end
            } else {
                metrics.end + self.start
            },
            visible_end: metrics.visible_end + self.start,
            top: metrics.top + self.top,
            bottom: metrics.bottom + self.top,
            baseline: metrics.baseline + self.top,
            ..metrics.clone()
        }
    }
}

pub struct MultiParagraph {
    infos: Vec<ParagraphInfo>,
    len: usize,
    width: f32,
    height: f32,
    line_count: usize,
    did_exceed_max_lines: bool,
    placeholder_rects: Vec<Option<Rect>>,
    min_intrinsic_width: f32,
    max_intrinsic_width: f32,
}

impl MultiParagraph {
    pub fn new(
        intrinsics: &MultiParagraphIntrinsics,
        width: f32,
        max_lines: usize,
        ellipsis: bool,
    ) -> Self {
        let max_lines = max_lines.max(1);
        let mut infos: Vec<ParagraphInfo> = Vec::with_capacity(intrinsics.infos.len());
        let mut current_height = 0.0;
        let mut current_line_count = 0;
        let mut did_exceed_max_lines = false;
        let last_index = intrinsics.infos.len().saturating_sub(1);

        for (index, info) in intrinsics.infos.iter().enumerate() {
            let paragraph = Paragraph::new(
                info.intrinsics.clone(),
                width,
                max_lines - current_line_count,
                ellipsis,
            );
            let top = current_height;
            let bottom = top + paragraph.height();
            current_height = bottom;
            let start_line = current_line_count;
            let end_line = start_line + paragraph.line_count();
            current_line_count = end_line;
            let exceeded = paragraph.did_exceed_max_lines();
            infos.push(ParagraphInfo {
                paragraph,
                start: info.start,
                end: info.end,
                start_line,
                end_line,
                top,
                bottom,
            });
            if exceeded || (end_line == max_lines && index != last_index) {
                did_exceed_max_lines = true;
                break;
            }
        }

        let total_placeholders = intrinsics.text.placeholders().len();
        let mut placeholder_rects: Vec<Option<Rect>> = infos
            .iter()
            .flat_map(|info| {
                info.paragraph
                    .placeholder_rects()
                    .iter()
                    .map(move |rect| rect.map(|rect| rect.translate(0.0, info.top)))
            })
            .collect();
        // Ellipsized paragraphs drop their placeholders; keep one entry per input.
        if placeholder_rects.len() < total_placeholders {
            placeholder_rects.resize(total_placeholders, None);
        }

        let width = if width.is_finite() {
            width
        } else {
            infos
                .iter()
                .map(|info| info.paragraph.width())
                .fold(0.0, f32::max)
        };

        Self {
            infos,
            len: intrinsics.text.char_len(),
            width,
            height: current_height,
            line_count: current_line_count,
            did_exceed_max_lines,
            placeholder_rects,
            min_intrinsic_width: intrinsics.min_intrinsic_width,
            max_intrinsic_width: intrinsics.max_intrinsic_width,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn did_exceed_max_lines(&self) -> bool {
        self.did_exceed_max_lines
    }

    pub fn min_intrinsic_width(&self) -> f32 {
        self.min_intrinsic_width
    }

    pub fn max_intrinsic_width(&self) -> f32 {
        self.max_intrinsic_width
    }

    pub fn placeholder_rects(&self) -> &[Option<Rect>] {
        &self.placeholder_rects
    }

    pub fn first_baseline(&self) -> f32 {
        self.infos
            .first()
            .map(|info| info.top + info.paragraph.first_baseline())
            .unwrap_or(0.0)
    }

    pub fn last_baseline(&self) -> f32 {
        self.infos
            .last()
            .map(|info| info.top + info.paragraph.last_baseline())
            .unwrap_or(0.0)
    }

    fn last_info(&self) -> usize {
        self.infos.len().saturating_sub(1)
    }

    fn info_by_offset(&self, offset: usize) -> usize {
        self.infos
            .iter()
            .position(|info| info.start <= offset && offset < info.end)
            .unwrap_or(self.last_info())
    }

    fn info_by_y(&self, y: f32) -> usize {
        if y <= 0.0 {
            return 0;
        }
        self.infos
            .iter()
            .position(|info| info.top <= y && y < info.bottom)
            .unwrap_or(self.last_info())
    }

    fn info_by_line(&self, line: usize) -> usize {
        self.infos
            .iter()
            .position(|info| info.start_line <= line && line < info.end_line)
            .unwrap_or(self.last_info())
    }

    /// Line `index` in global offsets and coordinates.
    pub fn line(&self, index: usize) -> Option<LineMetrics> {
        let info = self.infos.get(self.info_by_line(index))?;
        let metrics = info.paragraph.line(index.checked_sub(info.start_line)?)?;
        Some(info.to_global_line(metrics))
    }

    pub fn lines(&self) -> Vec<LineMetrics> {
        self.infos
            .iter()
            .flat_map(|info| {
                info.paragraph
                    .lines()
                    .iter()
                    .map(move |metrics| info.to_global_line(metrics))
            })
            .collect()
    }

    pub fn line_for_offset(&self, offset: usize) -> usize {
        match self.infos.get(self.info_by_offset(offset)) {
            Some(info) => {
                info.start_line + info.paragraph.line_for_offset(info.to_local(offset))
            }
            None => 0,
        }
    }

    pub fn line_for_vertical_position(&self, y: f32) -> usize {
        match self.infos.get(self.info_by_y(y)) {
            Some(info) => {
                info.start_line + info.paragraph.line_for_vertical_position(y - info.top)
            }
            None => 0,
        }
    }

    pub fn offset_for_position(&self, position: Point) -> usize {
        match self.infos.get(self.info_by_y(position.y)) {
            Some(info) => {
                let local = Point::new(position.x, position.y - info.top);
                info.start + info.paragraph.offset_for_position(local)
            }
            None => 0,
        }
    }

    pub fn horizontal_position(&self, offset: usize) -> f32 {
        match self.infos.get(self.info_by_offset(offset)) {
            Some(info) => info.paragraph.horizontal_position(info.to_local(offset)),
            None => 0.0,
        }
    }

    pub fn bounding_box(&self, offset: usize) -> Result<Rect, TextLayoutError> {
        if offset >= self.len {
            return Err(TextLayoutError::OffsetOutOfRange {
                offset,
                len: self.len,
            });
        }
        let info = &self.infos[self.info_by_offset(offset)];
        let local = info.to_local(offset);
        if local >= info.paragraph.len() {
            // The line break closing a paragraph, or text cut off by the line limit.
            let x = info.paragraph.horizontal_position(local);
            let line = info.paragraph.line_for_offset(local);
            return Ok(info
                .paragraph
                .line(line)
                .map(|line| Rect::from_ltrb(x, line.top, x, line.bottom))
                .unwrap_or(Rect::ZERO)
                .translate(0.0, info.top));
        }
        Ok(info.paragraph.bounding_box(local)?.translate(0.0, info.top))
    }

    pub fn cursor_rect(&self, offset: usize) -> Rect {
        match self.infos.get(self.info_by_offset(offset.min(self.len))) {
            Some(info) => info
                .paragraph
                .cursor_rect(info.to_local(offset))
                .translate(0.0, info.top),
            None => Rect::ZERO,
        }
    }

    pub fn path_for_range(&self, start: usize, end: usize) -> Result<Path, TextLayoutError> {
        if start > end || end > self.len {
            return Err(TextLayoutError::OffsetOutOfRange {
                offset: start.max(end),
                len: self.len,
            });
        }
        let mut path = Path::new();
        if start == end {
            return Ok(path);
        }
        for info in &self.infos[self.info_by_offset(start)..] {
            if info.start >= end {
                break;
            }
            if info.start == info.end {
                continue;
            }
            let mut local = info
                .paragraph
                .path_for_range(info.to_local(start), info.to_local(end))?;
            local.translate(0.0, info.top);
            for rect in local.rects() {
                path.add_rect(*rect);
            }
        }
        Ok(path)
    }

    pub fn word_boundary(&self, offset: usize) -> TextRange {
        match self.infos.get(self.info_by_offset(offset)) {
            Some(info) => {
                let local = info.paragraph.word_boundary(info.to_local(offset));
                TextRange::new(local.start + info.start, local.end + info.start)
            }
            None => TextRange::cursor(offset),
        }
    }

    pub fn paint(&self, scope: &mut dyn DrawScope, origin: Point, color: Color) {
        for info in &self.infos {
            info.paragraph
                .paint(scope, Point::new(origin.x, origin.y + info.top), color);
        }
    }
}

//! Layout cache for plain text in a single style.

use super::annotated::AnnotatedString;
use super::coercer::MinMaxLinesCoercer;
use super::font::{same_resolver, FontFamilyResolver};
use super::intrinsics::ParagraphIntrinsics;
use super::layout_result::{TextLayoutInput, TextLayoutResult};
use super::layout_reuse::{LayoutReuse, WrapPolicy};
use super::multi_paragraph::{MultiParagraph, MultiParagraphIntrinsics};
use super::paragraph::Paragraph;
use super::TextLayoutError;
use std::rc::Rc;
use strata_core::hash::fingerprint;
use strata_ui_graphics::{Density, Size, TextOverflow, TextStyle};
use strata_ui_layout::{Constraints, LayoutDirection};

/// Keeps the last shaped [`Paragraph`] and reshapes only when new
/// constraints could break lines differently.
pub struct ParagraphLayoutCache {
    text: String,
    text_fingerprint: u64,
    style: TextStyle,
    resolver: Rc<dyn FontFamilyResolver>,
    wrap: WrapPolicy,
    min_lines: usize,
    density: Option<Density>,

    intrinsics: Option<Rc<ParagraphIntrinsics>>,
    intrinsics_direction: Option<LayoutDirection>,
    paragraph: Option<Paragraph>,
    previous_constraints: Option<Constraints>,
    layout_size: Size,
    did_overflow: bool,
    coercer: Option<Rc<MinMaxLinesCoercer>>,
    cached_intrinsic_height: Option<(u32, LayoutDirection, f32)>,
    layout_result: Option<Rc<TextLayoutResult>>,
    reshape_count: usize,
}

impl ParagraphLayoutCache {
    pub fn new(
        text: impl Into<String>,
        style: TextStyle,
        resolver: Rc<dyn FontFamilyResolver>,
        overflow: TextOverflow,
        soft_wrap: bool,
        max_lines: usize,
        min_lines: usize,
    ) -> Self {
        let text = text.into();
        Self {
            text_fingerprint: fingerprint(&text),
            text,
            style,
            resolver,
            wrap: WrapPolicy {
                soft_wrap,
                overflow,
                max_lines,
            },
            min_lines,
            density: None,
            intrinsics: None,
            intrinsics_direction: None,
            paragraph: None,
            previous_constraints: None,
            layout_size: Size::ZERO,
            did_overflow: false,
            coercer: None,
            cached_intrinsic_height: None,
            layout_result: None,
            reshape_count: 0,
        }
    }

    /// Replaces the inputs. The next layout reshapes unless every input is
    /// the same as before.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        text: impl Into<String>,
        style: TextStyle,
        resolver: Rc<dyn FontFamilyResolver>,
        overflow: TextOverflow,
        soft_wrap: bool,
        max_lines: usize,
        min_lines: usize,
    ) {
        let text = text.into();
        let text_fingerprint = fingerprint(&text);
        let wrap = WrapPolicy {
            soft_wrap,
            overflow,
            max_lines,
        };
        if text_fingerprint == self.text_fingerprint
            && text.len() == self.text.len()
            && style == self.style
            && same_resolver(&resolver, &self.resolver)
            && wrap == self.wrap
            && min_lines == self.min_lines
        {
            return;
        }
        self.text = text;
        self.text_fingerprint = text_fingerprint;
        self.style = style;
        self.resolver = resolver;
        self.wrap = wrap;
        self.min_lines = min_lines;
        self.mark_dirty();
    }

    pub fn set_density(&mut self, density: Density) {
        if self.density != Some(density) {
            self.density = Some(density);
            self.mark_dirty();
        }
    }

    fn mark_dirty(&mut self) {
        self.intrinsics = None;
        self.intrinsics_direction = None;
        self.paragraph = None;
        self.previous_constraints = None;
        self.cached_intrinsic_height = None;
        self.layout_result = None;
    }

    fn density(&self) -> Density {
        self.density.unwrap_or_default()
    }

    fn ensure_intrinsics(&mut self, direction: LayoutDirection) -> Rc<ParagraphIntrinsics> {
        if let Some(intrinsics) = &self.intrinsics {
            if self.intrinsics_direction == Some(direction) && !intrinsics.has_stale_resolved_fonts()
            {
                return intrinsics.clone();
            }
        }
        let intrinsics = Rc::new(ParagraphIntrinsics::new(
            AnnotatedString::new(self.text.as_str()),
            &self.style,
            self.density(),
            direction,
            self.resolver.clone(),
        ));
        self.intrinsics = Some(intrinsics.clone());
        self.intrinsics_direction = Some(direction);
        self.cached_intrinsic_height = None;
        intrinsics
    }

    fn uses_line_limits(&self) -> bool {
        self.min_lines > 1 || self.wrap.max_lines != usize::MAX
    }

    fn coerce(&mut self, constraints: Constraints, direction: LayoutDirection) -> Constraints {
        if !self.uses_line_limits() {
            return constraints;
        }
        let coercer = MinMaxLinesCoercer::from(
            self.coercer.as_ref(),
            direction,
            &self.style,
            self.density(),
            &self.resolver,
        );
        let coerced = coercer.coerce_max_min_lines(constraints, self.min_lines, self.wrap.max_lines);
        self.coercer = Some(coercer);
        coerced
    }

    /// Lays the text out for `constraints`, reusing the previous shape when
    /// it is known to wrap identically. Returns whether the size or overflow
    /// state changed.
    pub fn layout_with_constraints(
        &mut self,
        constraints: Constraints,
        direction: LayoutDirection,
    ) -> bool {
        let constraints = self.coerce(constraints, direction);

        let reuse = match (&self.paragraph, &self.intrinsics, &self.previous_constraints) {
            (Some(paragraph), Some(intrinsics), Some(previous))
                if self.intrinsics_direction == Some(direction)
                    && !intrinsics.has_stale_resolved_fonts() =>
            {
                self.wrap.reuse_for(
                    self.style.line_break,
                    previous,
                    &constraints,
                    paragraph.width(),
                    intrinsics.max_intrinsic_width(),
                )
            }
            _ => LayoutReuse::Reshape,
        };

        match reuse {
            LayoutReuse::Unchanged => false,
            LayoutReuse::Reconstrain => {
                let Some(paragraph) = &self.paragraph else {
                    return false;
                };
                let shaped = Size::new(paragraph.width(), paragraph.height());
                let (size, overflow_width, overflow_height) =
                    self.wrap.constrain(&constraints, shaped);
                let did_overflow = overflow_width || overflow_height;
                self.previous_constraints = Some(constraints);
                let changed = size != self.layout_size || did_overflow != self.did_overflow;
                if changed {
                    self.layout_size = size;
                    self.did_overflow = did_overflow;
                    self.layout_result = None;
                }
                changed
            }
            LayoutReuse::Reshape => {
                let paragraph = self.layout_text(constraints, direction);
                let shaped = Size::new(paragraph.width(), paragraph.height());
                let (size, overflow_width, overflow_height) =
                    self.wrap.constrain(&constraints, shaped);
                log::trace!(
                    "reshaped {} chars at {:?}: {:?}",
                    paragraph.len(),
                    constraints,
                    size
                );
                self.layout_size = size;
                self.did_overflow = overflow_width || overflow_height;
                self.paragraph = Some(paragraph);
                self.previous_constraints = Some(constraints);
                self.layout_result = None;
                self.reshape_count += 1;
                true
            }
        }
    }

    fn layout_text(&mut self, constraints: Constraints, direction: LayoutDirection) -> Paragraph {
        let intrinsics = self.ensure_intrinsics(direction);
        let width = self
            .wrap
            .layout_width(&constraints, intrinsics.max_intrinsic_width());
        Paragraph::new(
            intrinsics,
            width,
            self.wrap.effective_max_lines(),
            self.wrap.ellipsis(),
        )
    }

    pub fn layout_size(&self) -> Size {
        self.layout_size
    }

    pub fn did_overflow(&self) -> bool {
        self.did_overflow
    }

    pub fn reshape_count(&self) -> usize {
        self.reshape_count
    }

    pub fn paragraph(&self) -> Result<&Paragraph, TextLayoutError> {
        self.paragraph
            .as_ref()
            .ok_or(TextLayoutError::IllegalState("paragraph queried before layout"))
    }

    pub fn min_intrinsic_width(&self) -> Result<f32, TextLayoutError> {
        self.intrinsics
            .as_ref()
            .map(|intrinsics| intrinsics.min_intrinsic_width().ceil())
            .ok_or(TextLayoutError::IllegalState(
                "intrinsics queried before layout",
            ))
    }

    pub fn max_intrinsic_width(&self) -> Result<f32, TextLayoutError> {
        self.intrinsics
            .as_ref()
            .map(|intrinsics| intrinsics.max_intrinsic_width().ceil())
            .ok_or(TextLayoutError::IllegalState(
                "intrinsics queried before layout",
            ))
    }

    /// Resolves intrinsics for `direction` on demand.
    pub fn min_intrinsic_width_in(&mut self, direction: LayoutDirection) -> f32 {
        self.ensure_intrinsics(direction)
            .min_intrinsic_width()
            .ceil()
    }

    pub fn max_intrinsic_width_in(&mut self, direction: LayoutDirection) -> f32 {
        self.ensure_intrinsics(direction)
            .max_intrinsic_width()
            .ceil()
    }

    /// Height of the text wrapped at `width`, memoised for the last width.
    pub fn intrinsic_height(&mut self, width: f32, direction: LayoutDirection) -> f32 {
        if let Some((bits, cached_direction, height)) = self.cached_intrinsic_height {
            if bits == width.to_bits() && cached_direction == direction {
                return height;
            }
        }
        let constraints = self.coerce(
            Constraints::new(0.0, width, 0.0, f32::INFINITY),
            direction,
        );
        let paragraph = self.layout_text(constraints, direction);
        let height = paragraph.height().ceil().max(constraints.min_height);
        self.cached_intrinsic_height = Some((width.to_bits(), direction, height));
        height
    }

    /// Full layout result for the current layout, built on first request.
    pub fn text_layout_result(&mut self) -> Option<Rc<TextLayoutResult>> {
        if let Some(result) = &self.layout_result {
            return Some(result.clone());
        }
        let paragraph = self.paragraph.as_ref()?;
        let constraints = self.previous_constraints?;
        let direction = self.intrinsics_direction?;
        let text = AnnotatedString::new(self.text.as_str());
        let intrinsics = MultiParagraphIntrinsics::new(
            text.clone(),
            &self.style,
            self.density(),
            direction,
            self.resolver.clone(),
        );
        let multi_paragraph = MultiParagraph::new(
            &intrinsics,
            paragraph.width(),
            self.wrap.effective_max_lines(),
            self.wrap.ellipsis(),
        );
        let input = TextLayoutInput {
            text,
            style: self.style.clone(),
            max_lines: self.wrap.max_lines,
            soft_wrap: self.wrap.soft_wrap,
            overflow: self.wrap.overflow,
            density: self.density(),
            layout_direction: direction,
            resolver: self.resolver.clone(),
            constraints,
        };
        let result = Rc::new(TextLayoutResult::new(
            input,
            Rc::new(multi_paragraph),
            self.layout_size,
        ));
        self.layout_result = Some(result.clone());
        Some(result)
    }
}

#[cfg(test)]
#[path = "tests/paragraph_cache_tests.rs"]
mod tests;

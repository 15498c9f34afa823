//! Layout cache for styled text with inline placeholders.

use super::annotated::AnnotatedString;
use super::coercer::MinMaxLinesCoercer;
use super::font::{same_resolver, FontFamilyResolver};
use super::layout_result::{TextLayoutInput, TextLayoutResult};
use super::layout_reuse::{LayoutReuse, WrapPolicy};
use super::multi_paragraph::{MultiParagraph, MultiParagraphIntrinsics};
use super::TextLayoutError;
use std::rc::Rc;
use strata_ui_graphics::{Density, Size, TextOverflow, TextStyle};
use strata_ui_layout::{Constraints, LayoutDirection};

/// Counterpart of [`super::ParagraphLayoutCache`] for an [`AnnotatedString`];
/// every layout produces a full [`TextLayoutResult`].
pub struct MultiParagraphLayoutCache {
    text: AnnotatedString,
    style: TextStyle,
    resolver: Rc<dyn FontFamilyResolver>,
    wrap: WrapPolicy,
    min_lines: usize,
    density: Option<Density>,

    intrinsics: Option<Rc<MultiParagraphIntrinsics>>,
    intrinsics_direction: Option<LayoutDirection>,
    layout: Option<Rc<TextLayoutResult>>,
    coercer: Option<Rc<MinMaxLinesCoercer>>,
    cached_intrinsic_height: Option<(u32, LayoutDirection, f32)>,
    reshape_count: usize,
}

impl MultiParagraphLayoutCache {
    pub fn new(
        text: AnnotatedString,
        style: TextStyle,
        resolver: Rc<dyn FontFamilyResolver>,
        overflow: TextOverflow,
        soft_wrap: bool,
        max_lines: usize,
        min_lines: usize,
    ) -> Self {
        Self {
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
            layout: None,
            coercer: None,
            cached_intrinsic_height: None,
            reshape_count: 0,
        }
    }

    /// Replaces the inputs; unchanged inputs keep the current layout.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        text: AnnotatedString,
        style: TextStyle,
        resolver: Rc<dyn FontFamilyResolver>,
        overflow: TextOverflow,
        soft_wrap: bool,
        max_lines: usize,
        min_lines: usize,
    ) {
        let wrap = WrapPolicy {
            soft_wrap,
            overflow,
            max_lines,
        };
        if text == self.text
            && style == self.style
            && same_resolver(&resolver, &self.resolver)
            && wrap == self.wrap
            && min_lines == self.min_lines
        {
            return;
        }
        self.text = text;
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
        self.layout = None;
        self.cached_intrinsic_height = None;
    }

    fn density(&self) -> Density {
        self.density.unwrap_or_default()
    }

    fn ensure_intrinsics(&mut self, direction: LayoutDirection) -> Rc<MultiParagraphIntrinsics> {
        if let Some(intrinsics) = &self.intrinsics {
            if self.intrinsics_direction == Some(direction) && !intrinsics.has_stale_resolved_fonts()
            {
                return intrinsics.clone();
            }
        }
        let intrinsics = Rc::new(MultiParagraphIntrinsics::new(
            self.text.clone(),
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

    fn coerce(&mut self, constraints: Constraints, direction: LayoutDirection) -> Constraints {
        if self.min_lines <= 1 && self.wrap.max_lines == usize::MAX {
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

    fn input(&self, constraints: Constraints, direction: LayoutDirection) -> TextLayoutInput {
        TextLayoutInput {
            text: self.text.clone(),
            style: self.style.clone(),
            max_lines: self.wrap.max_lines,
            soft_wrap: self.wrap.soft_wrap,
            overflow: self.wrap.overflow,
            density: self.density(),
            layout_direction: direction,
            resolver: self.resolver.clone(),
            constraints,
        }
    }

    /// Lays the text out for `constraints`. Returns whether the size or
    /// overflow state changed.
    pub fn layout_with_constraints(
        &mut self,
        constraints: Constraints,
        direction: LayoutDirection,
    ) -> bool {
        let constraints = self.coerce(constraints, direction);

        let reuse = match (&self.layout, &self.intrinsics) {
            (Some(layout), Some(intrinsics))
                if self.intrinsics_direction == Some(direction)
                    && !intrinsics.has_stale_resolved_fonts() =>
            {
                self.wrap.reuse_for(
                    self.style.line_break,
                    &layout.input().constraints,
                    &constraints,
                    layout.multi_paragraph().width(),
                    intrinsics.max_intrinsic_width(),
                )
            }
            _ => LayoutReuse::Reshape,
        };

        match reuse {
            LayoutReuse::Unchanged => false,
            LayoutReuse::Reconstrain => {
                let Some(previous) = self.layout.clone() else {
                    return false;
                };
                let multi_paragraph = previous.multi_paragraph().clone();
                let shaped = Size::new(multi_paragraph.width(), multi_paragraph.height());
                let (size, _, _) = self.wrap.constrain(&constraints, shaped);
                let next = TextLayoutResult::new(
                    self.input(constraints, direction),
                    multi_paragraph,
                    size,
                );
                let changed = size != previous.size()
                    || next.has_visual_overflow() != previous.has_visual_overflow();
                self.layout = Some(Rc::new(next));
                changed
            }
            LayoutReuse::Reshape => {
                let multi_paragraph = self.layout_text(constraints, direction);
                let shaped = Size::new(multi_paragraph.width(), multi_paragraph.height());
                let (size, _, _) = self.wrap.constrain(&constraints, shaped);
                self.layout = Some(Rc::new(TextLayoutResult::new(
                    self.input(constraints, direction),
                    Rc::new(multi_paragraph),
                    size,
                )));
                self.reshape_count += 1;
                true
            }
        }
    }

    fn layout_text(&mut self, constraints: Constraints, direction: LayoutDirection) -> MultiParagraph {
        let intrinsics = self.ensure_intrinsics(direction);
        let width = self
            .wrap
            .layout_width(&constraints, intrinsics.max_intrinsic_width());
        MultiParagraph::new(
            &intrinsics,
            width,
            self.wrap.effective_max_lines(),
            self.wrap.ellipsis(),
        )
    }

    pub fn layout(&self) -> Result<&Rc<TextLayoutResult>, TextLayoutError> {
        self.layout
            .as_ref()
            .ok_or(TextLayoutError::IllegalState("text queried before layout"))
    }

    pub fn layout_or_none(&self) -> Option<&Rc<TextLayoutResult>> {
        self.layout.as_ref()
    }

    pub fn reshape_count(&self) -> usize {
        self.reshape_count
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
        let height = self
            .layout_text(constraints, direction)
            .height()
            .ceil()
            .max(constraints.min_height);
        self.cached_intrinsic_height = Some((width.to_bits(), direction, height));
        height
    }
}

#[cfg(test)]
#[path = "tests/multi_paragraph_cache_tests.rs"]
mod tests;

//! Measure policy for a node showing plain text.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use strata_foundation::text::{FontFamilyResolver, ParagraphLayoutCache, TextLayoutResult};
use strata_ui_graphics::{TextOverflow, TextStyle};
use strata_ui_layout::{
    AlignmentLine, Constraints, Measurable, MeasurePolicy, MeasureResult, MeasureScope,
};

/// Lays out text through a [`ParagraphLayoutCache`] and exposes its first
/// and last baselines as alignment lines.
pub struct TextMeasurePolicy {
    cache: RefCell<ParagraphLayoutCache>,
}

impl TextMeasurePolicy {
    /// Soft-wrapping, clipped text without line limits.
    pub fn new(text: impl Into<String>, style: TextStyle, resolver: Rc<dyn FontFamilyResolver>) -> Self {
        Self::with_cache(ParagraphLayoutCache::new(
            text,
            style,
            resolver,
            TextOverflow::Clip,
            true,
            usize::MAX,
            1,
        ))
    }

    pub fn with_cache(cache: ParagraphLayoutCache) -> Self {
        Self {
            cache: RefCell::new(cache),
        }
    }

    pub fn cache(&self) -> Ref<'_, ParagraphLayoutCache> {
        self.cache.borrow()
    }

    /// Changes the cached inputs. The owning node has to be invalidated
    /// afterwards for the change to show.
    pub fn update(&self, update: impl FnOnce(&mut ParagraphLayoutCache)) {
        update(&mut self.cache.borrow_mut());
    }

    pub fn text_layout_result(&self) -> Option<Rc<TextLayoutResult>> {
        self.cache.borrow_mut().text_layout_result()
    }
}

impl MeasurePolicy for TextMeasurePolicy {
    fn measure(
        &self,
        scope: &dyn MeasureScope,
        _measurables: &[Box<dyn Measurable>],
        constraints: Constraints,
    ) -> MeasureResult {
        let mut cache = self.cache.borrow_mut();
        cache.set_density(scope.density());
        cache.layout_with_constraints(constraints, scope.layout_direction());
        let mut result = MeasureResult::new(cache.layout_size(), Vec::new());
        if let Ok(paragraph) = cache.paragraph() {
            result = result
                .with_alignment_line(AlignmentLine::FirstBaseline, paragraph.first_baseline())
                .with_alignment_line(AlignmentLine::LastBaseline, paragraph.last_baseline());
        }
        result
    }

    fn min_intrinsic_width(&self, scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _height: f32) -> f32 {
        let mut cache = self.cache.borrow_mut();
        cache.set_density(scope.density());
        cache.min_intrinsic_width_in(scope.layout_direction())
    }

    fn max_intrinsic_width(&self, scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], _height: f32) -> f32 {
        let mut cache = self.cache.borrow_mut();
        cache.set_density(scope.density());
        cache.max_intrinsic_width_in(scope.layout_direction())
    }

    fn min_intrinsic_height(&self, scope: &dyn MeasureScope, _measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        let mut cache = self.cache.borrow_mut();
        cache.set_density(scope.density());
        cache.intrinsic_height(width, scope.layout_direction())
    }

    fn max_intrinsic_height(&self, scope: &dyn MeasureScope, measurables: &[Box<dyn Measurable>], width: f32) -> f32 {
        self.min_intrinsic_height(scope, measurables, width)
    }
}

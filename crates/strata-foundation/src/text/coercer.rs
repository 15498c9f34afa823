//! Height bounds derived from a line count.

use super::annotated::AnnotatedString;
use super::font::{same_resolver, FontFamilyResolver};
use super::intrinsics::ParagraphIntrinsics;
use super::paragraph::Paragraph;
use super::TextLayoutError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strata_ui_graphics::{Density, TextStyle};
use strata_ui_layout::{Constraints, LayoutDirection};

const ONE_LINE_PROBE: &str = "HHHHHHHHHH";
const TWO_LINE_PROBE: &str = "HHHHHHHHHH\nHHHHHHHHHH";

thread_local! {
    // Single slot; the last created coercer wins.
    static LAST_COERCER: RefCell<Option<Rc<MinMaxLinesCoercer>>> = const { RefCell::new(None) };
}

/// Rejects line limits that can never be satisfied.
pub fn validate_min_max_lines(min_lines: usize, max_lines: usize) -> Result<(), TextLayoutError> {
    if min_lines == 0 || max_lines == 0 {
        return Err(TextLayoutError::InvalidArgument(format!(
            "both min_lines ({min_lines}) and max_lines ({max_lines}) must be greater than zero"
        )));
    }
    if min_lines > max_lines {
        return Err(TextLayoutError::InvalidArgument(format!(
            "min_lines ({min_lines}) must be less than or equal to max_lines ({max_lines})"
        )));
    }
    Ok(())
}

/// Turns min/max line counts into height constraints by measuring one and
/// two lines of probe text and extrapolating linearly.
pub struct MinMaxLinesCoercer {
    layout_direction: LayoutDirection,
    style: TextStyle,
    density: Density,
    resolver: Rc<dyn FontFamilyResolver>,
    probe_heights: Cell<Option<(f32, f32)>>,
}

impl MinMaxLinesCoercer {
    fn new(
        layout_direction: LayoutDirection,
        style: &TextStyle,
        density: Density,
        resolver: &Rc<dyn FontFamilyResolver>,
    ) -> Self {
        Self {
            layout_direction,
            style: style.clone(),
            density,
            resolver: resolver.clone(),
            probe_heights: Cell::new(None),
        }
    }

    fn matches(
        &self,
        layout_direction: LayoutDirection,
        style: &TextStyle,
        density: Density,
        resolver: &Rc<dyn FontFamilyResolver>,
    ) -> bool {
        self.layout_direction == layout_direction
            && self.style == *style
            && self.density == density
            && same_resolver(&self.resolver, resolver)
    }

    /// Returns `previous` when it was built for the same inputs, otherwise
    /// the thread's last coercer if that matches, otherwise a new one that
    /// replaces it.
    pub fn from(
        previous: Option<&Rc<MinMaxLinesCoercer>>,
        layout_direction: LayoutDirection,
        style: &TextStyle,
        density: Density,
        resolver: &Rc<dyn FontFamilyResolver>,
    ) -> Rc<MinMaxLinesCoercer> {
        if let Some(previous) = previous {
            if previous.matches(layout_direction, style, density, resolver) {
                return previous.clone();
            }
        }
        LAST_COERCER.with(|slot| {
            let cached = slot
                .borrow()
                .as_ref()
                .filter(|last| last.matches(layout_direction, style, density, resolver))
                .cloned();
            if let Some(cached) = cached {
                return cached;
            }
            let created = Rc::new(MinMaxLinesCoercer::new(
                layout_direction,
                style,
                density,
                resolver,
            ));
            *slot.borrow_mut() = Some(created.clone());
            created
        })
    }

    fn probe(&self, text: &str, max_lines: usize) -> f32 {
        let intrinsics = ParagraphIntrinsics::new(
            AnnotatedString::new(text),
            &self.style,
            self.density,
            self.layout_direction,
            self.resolver.clone(),
        );
        Paragraph::new(Rc::new(intrinsics), f32::INFINITY, max_lines, false).height()
    }

    /// Heights of one and two probe lines.
    pub fn probe_heights(&self) -> (f32, f32) {
        if let Some(heights) = self.probe_heights.get() {
            return heights;
        }
        let heights = (self.probe(ONE_LINE_PROBE, 1), self.probe(TWO_LINE_PROBE, 2));
        log::trace!(
            "min/max lines probes measured {} and {}",
            heights.0,
            heights.1
        );
        self.probe_heights.set(Some(heights));
        heights
    }

    /// Narrows the height bounds of `constraints` to fit between `min_lines`
    /// and `max_lines` lines. `usize::MAX` lines means no maximum.
    pub fn coerce_max_min_lines(
        &self,
        constraints: Constraints,
        min_lines: usize,
        max_lines: usize,
    ) -> Constraints {
        let (one_line_height, two_line_height) = self.probe_heights();
        let line_height = two_line_height - one_line_height;

        let max_height = if max_lines != usize::MAX {
            (one_line_height + line_height * (max_lines as f32 - 1.0))
                .round()
                .max(0.0)
                .min(constraints.max_height)
        } else {
            constraints.max_height
        };
        let min_height = if min_lines != 1 {
            (one_line_height + line_height * (min_lines as f32 - 1.0))
                .round()
                .max(0.0)
                .min(max_height)
        } else {
            constraints.min_height
        };
        Constraints::new(
            constraints.min_width,
            constraints.max_width,
            min_height,
            max_height,
        )
    }
}

#[cfg(test)]
#[path = "tests/coercer_tests.rs"]
mod tests;

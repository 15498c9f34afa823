//! Font resolution consumed by the paragraph shaper.

use std::cell::Cell;
use std::rc::Rc;
use strata_ui_graphics::{FontStyle, FontWeight, TextStyle};

/// What a run of text asks the resolver for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FontRequest {
    pub family: Option<String>,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontRequest {
    pub fn from_style(style: &TextStyle) -> Self {
        Self {
            family: style.font_family.clone(),
            weight: style.font_weight.unwrap_or_default(),
            style: style.font_style.unwrap_or_default(),
        }
    }
}

/// Metrics of a resolved font. All values are in em units and are scaled by
/// the font size of the run they apply to.
pub trait ResolvedFont {
    fn advance(&self, ch: char) -> f32;

    fn ascent(&self) -> f32;

    fn descent(&self) -> f32;
}

/// Resolves font requests to loaded fonts.
///
/// `generation` changes whenever previously resolved fonts go stale, for
/// example when an asynchronously loaded font arrives. Caches compare it to
/// decide whether to reshape.
pub trait FontFamilyResolver {
    fn resolve(&self, request: &FontRequest) -> Rc<dyn ResolvedFont>;

    fn generation(&self) -> u64 {
        0
    }
}

struct MonospaceFont {
    advance_em: f32,
}

impl ResolvedFont for MonospaceFont {
    fn advance(&self, ch: char) -> f32 {
        match ch {
            '\n' | '\r' => 0.0,
            _ => self.advance_em,
        }
    }

    fn ascent(&self) -> f32 {
        0.8
    }

    fn descent(&self) -> f32 {
        0.2
    }
}

/// Resolver whose every glyph is one em wide and one em tall.
///
/// Stands in for a platform font stack in headless use and tests.
pub struct MonospaceFontResolver {
    font: Rc<MonospaceFont>,
    generation: Cell<u64>,
}

impl MonospaceFontResolver {
    pub fn new() -> Self {
        Self::with_advance(1.0)
    }

    pub fn with_advance(advance_em: f32) -> Self {
        Self {
            font: Rc::new(MonospaceFont { advance_em }),
            generation: Cell::new(0),
        }
    }

    /// Marks previously resolved fonts as stale.
    pub fn invalidate_fonts(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

impl Default for MonospaceFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontFamilyResolver for MonospaceFontResolver {
    fn resolve(&self, _request: &FontRequest) -> Rc<dyn ResolvedFont> {
        self.font.clone()
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }
}

/// Identity comparison of two resolver handles.
///
/// Resolvers are long-lived shared instances; two distinct resolvers are
/// never considered equal even if they would resolve identically.
pub fn same_resolver(a: &Rc<dyn FontFamilyResolver>, b: &Rc<dyn FontFamilyResolver>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

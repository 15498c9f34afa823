//! Text shaping, layout caches and hit-testing.
//!
//! Shaping goes through a [`FontFamilyResolver`]; the built-in
//! [`MonospaceFontResolver`] gives deterministic metrics for headless use.

mod annotated;
mod coercer;
mod error;
mod font;
mod intrinsics;
mod layout_result;
mod layout_reuse;
mod multi_paragraph;
mod multi_paragraph_cache;
mod paragraph;
mod paragraph_cache;
mod range;
pub mod word_boundaries;

pub use annotated::{AnnotatedString, Placeholder, PlaceholderVerticalAlign, SpanStyle, StyleRange};
pub use coercer::{validate_min_max_lines, MinMaxLinesCoercer};
pub use error::TextLayoutError;
pub use font::{same_resolver, FontFamilyResolver, FontRequest, MonospaceFontResolver, ResolvedFont};
pub use intrinsics::ParagraphIntrinsics;
pub use layout_result::{TextLayoutInput, TextLayoutResult};
pub use multi_paragraph::{MultiParagraph, MultiParagraphIntrinsics};
pub use multi_paragraph_cache::MultiParagraphLayoutCache;
pub use paragraph::{LineMetrics, Paragraph};
pub use paragraph_cache::ParagraphLayoutCache;
pub use range::TextRange;

#[cfg(test)]
#[path = "tests/paragraph_tests.rs"]
mod paragraph_tests;

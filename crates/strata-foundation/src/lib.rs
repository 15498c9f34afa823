//! Text layout, layout caches and text selection for strata

pub mod selection;
pub mod text;

pub use text::{TextLayoutError, TextLayoutResult, TextRange};

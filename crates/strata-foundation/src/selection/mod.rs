//! Text selection across one or more selectable regions.
//!
//! A [`SelectionManager`] is the shared [`SelectionRegistrar`]. Each text
//! region owns a [`SelectionController`], which subscribes a
//! [`MultiWidgetSelectionDelegate`] and turns gestures into registrar calls.

mod adjustment;
mod controller;
mod manager;
mod model;
mod registrar;
mod selectable;

pub use adjustment::SelectionAdjustment;
pub use controller::{
    out_of_boundary, MouseSelectionObserver, SelectionController, SelectionDragObserver,
    SelectionMouseObserver, StaticTextSelectionParams, TextDragObserver,
};
pub use manager::SelectionManager;
pub use model::{AnchorInfo, SelectableId, Selection, INVALID_SELECTABLE_ID};
pub use registrar::SelectionRegistrar;
pub use selectable::{MultiWidgetSelectionDelegate, Selectable, SelectionUpdate};

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;

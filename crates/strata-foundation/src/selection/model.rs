//! Selection values shared by selectables and the registrar.

use crate::text::TextRange;
use strata_ui_layout::LayoutDirection;

/// Identifies one selectable region. Allocated by the registrar, never zero.
pub type SelectableId = u64;

/// Id that no registered selectable ever has.
pub const INVALID_SELECTABLE_ID: SelectableId = 0;

/// One end of a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorInfo {
    pub direction: LayoutDirection,
    pub offset: usize,
    pub selectable_id: SelectableId,
}

/// A selection that may span several selectables. `start` is where the
/// selection began, so it can lie after `end`; `handles_crossed` says so.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub start: AnchorInfo,
    pub end: AnchorInfo,
    pub handles_crossed: bool,
}

impl Selection {
    /// Joins a selection from a later selectable onto this one.
    pub fn merge(self, other: Option<Selection>) -> Selection {
        let Some(other) = other else {
            return self;
        };
        if self.handles_crossed {
            Selection {
                start: other.start,
                ..self
            }
        } else {
            Selection {
                end: other.end,
                ..self
            }
        }
    }

    /// Offsets only; meaningful when both anchors are in one selectable.
    pub fn to_text_range(&self) -> TextRange {
        TextRange::new(self.start.offset, self.end.offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start.selectable_id == self.end.selectable_id && self.start.offset == self.end.offset
    }
}

pub(crate) fn merge(lhs: Option<Selection>, rhs: Option<Selection>) -> Option<Selection> {
    match lhs {
        Some(lhs) => Some(lhs.merge(rhs)),
        None => rhs,
    }
}

//! Shared coordination point for every selectable under one selection.

use super::adjustment::SelectionAdjustment;
use super::model::{SelectableId, Selection};
use super::selectable::Selectable;
use std::rc::Rc;
use strata_core::collections::map::HashMap;
use strata_ui_graphics::Point;
use strata_ui_layout::LayoutCoordinates;

/// Positions passed to the `notify_*` calls are in the local space of the
/// `coordinates` passed alongside them.
pub trait SelectionRegistrar {
    /// Registers `selectable`. Its id must come from
    /// [`SelectionRegistrar::next_selectable_id`] and not be registered yet.
    fn subscribe(&self, selectable: Rc<dyn Selectable>) -> Rc<dyn Selectable>;

    fn unsubscribe(&self, selectable: &Rc<dyn Selectable>);

    fn next_selectable_id(&self) -> SelectableId;

    /// The selectable moved on screen.
    fn notify_position_change(&self, selectable_id: SelectableId);

    /// Starts a new selection with both handles at `start_position`.
    fn notify_selection_update_start(
        &self,
        coordinates: &dyn LayoutCoordinates,
        start_position: Point,
        adjustment: SelectionAdjustment,
    );

    fn notify_selection_update_select_all(&self, selectable_id: SelectableId);

    /// Moves one handle. Returns whether the movement was consumed; callers
    /// accumulate unconsumed movement into the next update.
    fn notify_selection_update(
        &self,
        coordinates: &dyn LayoutCoordinates,
        new_position: Point,
        previous_position: Point,
        is_start_handle: bool,
        adjustment: SelectionAdjustment,
    ) -> bool;

    fn notify_selection_update_end(&self);

    /// The selectable's content changed, invalidating offsets into it.
    fn notify_selectable_change(&self, selectable_id: SelectableId);

    fn subselection(&self, selectable_id: SelectableId) -> Option<Selection>;

    fn subselections(&self) -> HashMap<SelectableId, Selection>;

    fn has_selection(&self, selectable_id: SelectableId) -> bool {
        self.subselection(selectable_id).is_some()
    }
}

//! The registrar implementation that owns the current selection.

use super::adjustment::SelectionAdjustment;
use super::model::{merge, SelectableId, Selection, INVALID_SELECTABLE_ID};
use super::registrar::SelectionRegistrar;
use super::selectable::{Selectable, SelectionUpdate};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strata_core::collections::map::HashMap;
use strata_ui_graphics::Point;
use strata_ui_layout::LayoutCoordinates;

/// Handles sit on the line bottom; hit-test one pixel above it so the
/// position resolves to the handle's own line.
fn adjusted_handle(position: Point) -> Point {
    Point::new(position.x, position.y - 1.0)
}

/// Tracks every subscribed [`Selectable`] and turns handle movements into
/// per-selectable sub-selections. Positions are resolved in root space.
pub struct SelectionManager {
    selectables: RefCell<IndexMap<SelectableId, Rc<dyn Selectable>>>,
    sorted: Cell<bool>,
    next_id: Cell<SelectableId>,
    subselections: RefCell<HashMap<SelectableId, Selection>>,
    selection: Cell<Option<Selection>>,
    start_handle_position: Cell<Option<Point>>,
    end_handle_position: Cell<Option<Point>>,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionManager {
    pub fn new() -> Self {
        Self {
            selectables: RefCell::new(IndexMap::new()),
            sorted: Cell::new(true),
            next_id: Cell::new(INVALID_SELECTABLE_ID + 1),
            subselections: RefCell::new(HashMap::default()),
            selection: Cell::new(None),
            start_handle_position: Cell::new(None),
            end_handle_position: Cell::new(None),
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.get()
    }

    /// Start handle in root coordinates, when both anchors are on screen.
    pub fn start_handle_position(&self) -> Option<Point> {
        self.start_handle_position.get()
    }

    pub fn end_handle_position(&self) -> Option<Point> {
        self.end_handle_position.get()
    }

    pub fn selectable_count(&self) -> usize {
        self.selectables.borrow().len()
    }

    fn selectable(&self, id: SelectableId) -> Option<Rc<dyn Selectable>> {
        self.selectables.borrow().get(&id).cloned()
    }

    /// Selectables in reading order of their root position.
    fn sorted_selectables(&self) -> Vec<Rc<dyn Selectable>> {
        let mut selectables = self.selectables.borrow_mut();
        if !self.sorted.get() {
            selectables.sort_by(|_, a, _, b| {
                let a = a.layout_coordinates().map(|c| c.position_in_root());
                let b = b.layout_coordinates().map(|c| c.position_in_root());
                match (a, b) {
                    (Some(a), Some(b)) => a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
            self.sorted.set(true);
        }
        selectables.values().cloned().collect()
    }

    fn set_selection(&self, selection: Option<Selection>) {
        self.selection.set(selection);
        self.update_handle_offsets();
    }

    fn update_handle_offsets(&self) {
        let handles = self.selection.get().and_then(|selection| {
            let handle = |is_start: bool| {
                let anchor = if is_start { selection.start } else { selection.end };
                let selectable = self.selectable(anchor.selectable_id)?;
                let coordinates = selectable.layout_coordinates()?;
                Some(coordinates.local_to_root(selectable.handle_position(&selection, is_start)))
            };
            Some((handle(true)?, handle(false)?))
        });
        self.start_handle_position.set(handles.map(|(start, _)| start));
        self.end_handle_position.set(handles.map(|(_, end)| end));
    }

    /// Clears the selection everywhere.
    pub fn on_release(&self) {
        self.subselections.borrow_mut().clear();
        if self.selection.get().is_some() {
            self.set_selection(None);
        }
    }

    /// Selects the whole content of `selectable_id`.
    pub fn select_all(&self, selectable_id: SelectableId) {
        let mut subselections = HashMap::default();
        let mut merged = None;
        for selectable in self.sorted_selectables() {
            let selection = if selectable.selectable_id() == selectable_id {
                selectable.select_all_selection()
            } else {
                None
            };
            if let Some(selection) = selection {
                subselections.insert(selectable.selectable_id(), selection);
            }
            merged = merge(merged, selection);
        }
        if merged != self.selection.get() {
            *self.subselections.borrow_mut() = subselections;
            self.set_selection(merged);
        }
    }

    /// Moves one handle to `new_position` (root space), keeping the other
    /// where the current selection puts it.
    pub fn update_selection(
        &self,
        new_position: Point,
        previous_position: Option<Point>,
        is_start_handle: bool,
        adjustment: SelectionAdjustment,
    ) -> bool {
        let Some(selection) = self.selection.get() else {
            return false;
        };
        let other_id = if is_start_handle {
            selection.end.selectable_id
        } else {
            selection.start.selectable_id
        };
        let Some(other) = self.selectable(other_id) else {
            return false;
        };
        let Some(coordinates) = other.layout_coordinates() else {
            return false;
        };
        let other_position = coordinates.local_to_root(adjusted_handle(
            other.handle_position(&selection, !is_start_handle),
        ));

        let (start, end) = if is_start_handle {
            (new_position, other_position)
        } else {
            (other_position, new_position)
        };
        self.update_selection_between(start, end, previous_position, is_start_handle, adjustment)
    }

    fn update_selection_between(
        &self,
        start_handle_position: Point,
        end_handle_position: Point,
        previous_handle_position: Option<Point>,
        is_start_handle: bool,
        adjustment: SelectionAdjustment,
    ) -> bool {
        let update = SelectionUpdate {
            start_handle_position,
            end_handle_position,
            previous_handle_position,
            is_start_handle,
            adjustment,
        };
        let previous_subselections = self.subselections.borrow().clone();
        let mut subselections = HashMap::default();
        let mut consumed = false;
        let mut merged = None;
        for selectable in self.sorted_selectables() {
            let id = selectable.selectable_id();
            let (selection, moved) =
                selectable.update_selection(&update, previous_subselections.get(&id));
            consumed |= moved;
            if let Some(selection) = selection {
                subselections.insert(id, selection);
            }
            merged = merge(merged, selection);
        }
        if merged != self.selection.get() {
            log::trace!("selection updated: {:?}", merged);
            *self.subselections.borrow_mut() = subselections;
            self.set_selection(merged);
        }
        consumed
    }

    /// Text covered by the selection, across selectables in reading order.
    pub fn selected_text(&self) -> Option<String> {
        let selection = self.selection.get()?;
        let mut selected: Option<String> = None;
        for selectable in self.sorted_selectables() {
            let id = selectable.selectable_id();
            let is_start = id == selection.start.selectable_id;
            let is_end = id == selection.end.selectable_id;
            if !is_start && !is_end && selected.is_none() {
                continue;
            }

            let chars: Vec<char> = selectable.text().text().chars().collect();
            let len = chars.len();
            let (from, to) = match (is_start, is_end, selection.handles_crossed) {
                (false, false, _) => (0, len),
                (true, true, false) => (selection.start.offset, selection.end.offset),
                (true, true, true) => (selection.end.offset, selection.start.offset),
                (true, false, false) => (selection.start.offset, len),
                (true, false, true) => (0, selection.start.offset),
                (false, true, false) => (0, selection.end.offset),
                (false, true, true) => (selection.end.offset, len),
            };
            let (from, to) = (from.min(len), to.min(len));
            let part: String = chars[from..to.max(from)].iter().collect();
            selected.get_or_insert_with(String::new).push_str(&part);

            let last = if selection.handles_crossed { is_start } else { is_end };
            if last {
                break;
            }
        }
        selected
    }
}

impl SelectionRegistrar for SelectionManager {
    fn subscribe(&self, selectable: Rc<dyn Selectable>) -> Rc<dyn Selectable> {
        let id = selectable.selectable_id();
        assert!(
            id != INVALID_SELECTABLE_ID,
            "selectable subscribed with the invalid id"
        );
        let previous = self
            .selectables
            .borrow_mut()
            .insert(id, selectable.clone());
        assert!(previous.is_none(), "selectable {id} subscribed twice");
        self.sorted.set(false);
        selectable
    }

    fn unsubscribe(&self, selectable: &Rc<dyn Selectable>) {
        let id = selectable.selectable_id();
        if self.selectables.borrow_mut().shift_remove(&id).is_none() {
            return;
        }
        self.subselections.borrow_mut().remove(&id);
        let anchors_here = self
            .selection
            .get()
            .is_some_and(|s| s.start.selectable_id == id || s.end.selectable_id == id);
        if anchors_here {
            self.start_handle_position.set(None);
            self.end_handle_position.set(None);
        }
    }

    fn next_selectable_id(&self) -> SelectableId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn notify_position_change(&self, selectable_id: SelectableId) {
        self.sorted.set(false);
        let anchors_here = self.selection.get().is_some_and(|s| {
            s.start.selectable_id == selectable_id || s.end.selectable_id == selectable_id
        });
        if anchors_here {
            self.update_handle_offsets();
        }
    }

    fn notify_selection_update_start(
        &self,
        coordinates: &dyn LayoutCoordinates,
        start_position: Point,
        adjustment: SelectionAdjustment,
    ) {
        if !coordinates.is_attached() {
            return;
        }
        let position = coordinates.local_to_root(start_position);
        self.update_selection_between(position, position, None, false, adjustment);
    }

    fn notify_selection_update_select_all(&self, selectable_id: SelectableId) {
        self.select_all(selectable_id);
    }

    fn notify_selection_update(
        &self,
        coordinates: &dyn LayoutCoordinates,
        new_position: Point,
        previous_position: Point,
        is_start_handle: bool,
        adjustment: SelectionAdjustment,
    ) -> bool {
        if !coordinates.is_attached() {
            return false;
        }
        self.update_selection(
            coordinates.local_to_root(new_position),
            Some(coordinates.local_to_root(previous_position)),
            is_start_handle,
            adjustment,
        )
    }

    fn notify_selection_update_end(&self) {
        log::trace!("selection drag finished: {:?}", self.selection.get());
    }

    fn notify_selectable_change(&self, selectable_id: SelectableId) {
        if self.subselections.borrow().contains_key(&selectable_id) {
            self.on_release();
        }
    }

    fn subselection(&self, selectable_id: SelectableId) -> Option<Selection> {
        self.subselections.borrow().get(&selectable_id).copied()
    }

    fn subselections(&self) -> HashMap<SelectableId, Selection> {
        self.subselections.borrow().clone()
    }
}

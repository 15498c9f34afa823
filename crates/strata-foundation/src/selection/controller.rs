//! Per-text glue between a laid out text node and the shared registrar.

use super::adjustment::SelectionAdjustment;
use super::model::SelectableId;
use super::registrar::SelectionRegistrar;
use super::selectable::{MultiWidgetSelectionDelegate, Selectable};
use crate::text::TextLayoutResult;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use strata_ui_graphics::{Color, DrawScope, Point};
use strata_ui_layout::LayoutCoordinates;

/// What hit-testing and painting of one text region need from the last
/// layout pass.
#[derive(Clone, Default)]
pub struct StaticTextSelectionParams {
    pub layout_coordinates: Option<Rc<dyn LayoutCoordinates>>,
    pub text_layout_result: Option<Rc<TextLayoutResult>>,
}

/// Long-press drag callbacks. Positions are in the text's local space.
pub trait TextDragObserver {
    fn on_down(&mut self, _point: Point) {}
    fn on_up(&mut self) {}
    fn on_start(&mut self, start_point: Point);
    fn on_drag(&mut self, delta: Point);
    fn on_stop(&mut self);
    fn on_cancel(&mut self);
}

/// Mouse selection callbacks. The `bool` results say whether the event was
/// consumed.
pub trait MouseSelectionObserver {
    /// Shift-click: extends the existing selection to `down_position`.
    fn on_extend(&mut self, down_position: Point) -> bool;
    fn on_extend_drag(&mut self, drag_position: Point) -> bool;
    fn on_start(&mut self, down_position: Point, adjustment: SelectionAdjustment) -> bool;
    fn on_drag(&mut self, drag_position: Point, adjustment: SelectionAdjustment) -> bool;
    fn on_drag_done(&mut self);
}

/// True when both positions fall past the last character (one offset of
/// slack) or neither resolves; a drag there selects everything instead.
pub fn out_of_boundary(layout: Option<&TextLayoutResult>, start: Point, end: Point) -> bool {
    let Some(layout) = layout else {
        return false;
    };
    let last = layout.text_len();
    match (
        layout.try_offset_for_position(start),
        layout.try_offset_for_position(end),
    ) {
        (Some(start), Some(end)) => start + 1 >= last && end + 1 >= last,
        (None, None) => true,
        _ => false,
    }
}

struct ControllerState {
    selectable_id: SelectableId,
    registrar: Rc<dyn SelectionRegistrar>,
    background_color: Color,
    params: RefCell<StaticTextSelectionParams>,
    selectable: RefCell<Option<Rc<dyn Selectable>>>,
    previous_global_position: Cell<Point>,
}

impl ControllerState {
    fn attached_coordinates(&self) -> Option<Rc<dyn LayoutCoordinates>> {
        self.params
            .borrow()
            .layout_coordinates
            .clone()
            .filter(|coordinates| coordinates.is_attached())
    }

    fn out_of_boundary(&self, start: Point, end: Point) -> bool {
        let layout = self.params.borrow().text_layout_result.clone();
        out_of_boundary(layout.as_deref(), start, end)
    }

    fn has_selection(&self) -> bool {
        self.registrar.has_selection(self.selectable_id)
    }
}

/// Connects one text region to a [`SelectionRegistrar`]: subscribes while
/// remembered, feeds it gestures and paints this region's part of the
/// selection.
pub struct SelectionController {
    state: Rc<ControllerState>,
}

impl SelectionController {
    pub fn new(
        selectable_id: SelectableId,
        registrar: Rc<dyn SelectionRegistrar>,
        background_color: Color,
    ) -> Self {
        Self {
            state: Rc::new(ControllerState {
                selectable_id,
                registrar,
                background_color,
                params: RefCell::new(StaticTextSelectionParams::default()),
                selectable: RefCell::new(None),
                previous_global_position: Cell::new(Point::ZERO),
            }),
        }
    }

    pub fn selectable_id(&self) -> SelectableId {
        self.state.selectable_id
    }

    pub fn params(&self) -> StaticTextSelectionParams {
        self.state.params.borrow().clone()
    }

    pub fn on_remembered(&self) {
        let coordinates: Weak<ControllerState> = Rc::downgrade(&self.state);
        let layout = coordinates.clone();
        let delegate = MultiWidgetSelectionDelegate::new(
            self.state.selectable_id,
            move || {
                let state = coordinates.upgrade()?;
                let params = state.params.borrow();
                params.layout_coordinates.clone()
            },
            move || {
                let state = layout.upgrade()?;
                let params = state.params.borrow();
                params.text_layout_result.clone()
            },
        );
        let selectable = self.state.registrar.subscribe(Rc::new(delegate));
        *self.state.selectable.borrow_mut() = Some(selectable);
    }

    pub fn on_forgotten(&self) {
        let selectable = self.state.selectable.borrow_mut().take();
        if let Some(selectable) = selectable {
            self.state.registrar.unsubscribe(&selectable);
        }
    }

    pub fn on_abandoned(&self) {
        self.on_forgotten();
    }

    /// Records a new layout. A change of text invalidates any selection
    /// that reaches into this region.
    pub fn update_text_layout(&self, result: Rc<TextLayoutResult>) {
        let text_changed = self
            .state
            .params
            .borrow()
            .text_layout_result
            .as_ref()
            .is_some_and(|previous| previous.input().text != result.input().text);
        self.state.params.borrow_mut().text_layout_result = Some(result);
        if text_changed {
            self.state
                .registrar
                .notify_selectable_change(self.state.selectable_id);
        }
    }

    pub fn update_global_position(&self, coordinates: Rc<dyn LayoutCoordinates>) {
        let position = coordinates.position_in_root();
        self.state.params.borrow_mut().layout_coordinates = Some(coordinates);
        if self.state.has_selection() {
            if position != self.state.previous_global_position.get() {
                self.state
                    .registrar
                    .notify_position_change(self.state.selectable_id);
            }
            self.state.previous_global_position.set(position);
        }
    }

    /// Paints this region's part of the selection behind the text.
    pub fn draw(&self, scope: &mut dyn DrawScope) {
        let Some(selection) = self.state.registrar.subselection(self.state.selectable_id) else {
            return;
        };
        let Some(layout) = self.state.params.borrow().text_layout_result.clone() else {
            return;
        };

        let (start, end) = if selection.handles_crossed {
            (selection.end.offset, selection.start.offset)
        } else {
            (selection.start.offset, selection.end.offset)
        };
        let last_visible = self
            .state
            .selectable
            .borrow()
            .as_ref()
            .map_or_else(|| layout.last_visible_offset(), |s| s.last_visible_offset());
        let (start, end) = (start.min(last_visible), end.min(last_visible));
        if start == end {
            return;
        }
        match layout.path_for_range(start, end) {
            Ok(path) => scope.draw_path(&path, self.state.background_color),
            Err(err) => log::warn!("selection {start}..{end} not drawn: {err}"),
        }
    }

    pub fn drag_observer(&self) -> SelectionDragObserver {
        SelectionDragObserver {
            state: self.state.clone(),
            last_position: Point::ZERO,
            drag_total_distance: Point::ZERO,
        }
    }

    pub fn mouse_observer(&self) -> SelectionMouseObserver {
        SelectionMouseObserver {
            state: self.state.clone(),
            last_position: Point::ZERO,
        }
    }
}

/// Long press starts a word selection; dragging extends it.
pub struct SelectionDragObserver {
    state: Rc<ControllerState>,
    last_position: Point,
    drag_total_distance: Point,
}

impl TextDragObserver for SelectionDragObserver {
    fn on_start(&mut self, start_point: Point) {
        let Some(coordinates) = self.state.attached_coordinates() else {
            return;
        };
        if self.state.out_of_boundary(start_point, start_point) {
            self.state
                .registrar
                .notify_selection_update_select_all(self.state.selectable_id);
        } else {
            self.state.registrar.notify_selection_update_start(
                coordinates.as_ref(),
                start_point,
                SelectionAdjustment::Word,
            );
        }
        self.last_position = start_point;

        if self.state.has_selection() {
            self.drag_total_distance = Point::ZERO;
        }
    }

    fn on_drag(&mut self, delta: Point) {
        let Some(coordinates) = self.state.attached_coordinates() else {
            return;
        };
        if !self.state.has_selection() {
            return;
        }

        self.drag_total_distance = self.drag_total_distance + delta;
        let new_position = self.last_position + self.drag_total_distance;
        if self.state.out_of_boundary(self.last_position, new_position) {
            return;
        }
        // Only the end handle moves; the start stays on the long-pressed word.
        let consumed = self.state.registrar.notify_selection_update(
            coordinates.as_ref(),
            new_position,
            self.last_position,
            false,
            SelectionAdjustment::CharacterWithWordAccelerate,
        );
        if consumed {
            self.last_position = new_position;
            self.drag_total_distance = Point::ZERO;
        }
    }

    fn on_stop(&mut self) {
        if self.state.has_selection() {
            self.state.registrar.notify_selection_update_end();
        }
    }

    fn on_cancel(&mut self) {
        self.on_stop();
    }
}

pub struct SelectionMouseObserver {
    state: Rc<ControllerState>,
    last_position: Point,
}

impl SelectionMouseObserver {
    fn update(&mut self, coordinates: &dyn LayoutCoordinates, position: Point, adjustment: SelectionAdjustment) {
        let consumed = self.state.registrar.notify_selection_update(
            coordinates,
            position,
            self.last_position,
            false,
            adjustment,
        );
        if consumed {
            self.last_position = position;
        }
    }
}

impl MouseSelectionObserver for SelectionMouseObserver {
    fn on_extend(&mut self, down_position: Point) -> bool {
        let Some(coordinates) = self.state.attached_coordinates() else {
            return false;
        };
        self.update(coordinates.as_ref(), down_position, SelectionAdjustment::None);
        self.state.has_selection()
    }

    fn on_extend_drag(&mut self, drag_position: Point) -> bool {
        let Some(coordinates) = self.state.attached_coordinates() else {
            return false;
        };
        if !self.state.has_selection() {
            return false;
        }
        self.update(coordinates.as_ref(), drag_position, SelectionAdjustment::None);
        true
    }

    fn on_start(&mut self, down_position: Point, adjustment: SelectionAdjustment) -> bool {
        let Some(coordinates) = self.state.attached_coordinates() else {
            return false;
        };
        self.state.registrar.notify_selection_update_start(
            coordinates.as_ref(),
            down_position,
            adjustment,
        );
        self.last_position = down_position;
        self.state.has_selection()
    }

    fn on_drag(&mut self, drag_position: Point, adjustment: SelectionAdjustment) -> bool {
        let Some(coordinates) = self.state.attached_coordinates() else {
            return false;
        };
        if !self.state.has_selection() {
            return false;
        }
        self.update(coordinates.as_ref(), drag_position, adjustment);
        true
    }

    fn on_drag_done(&mut self) {
        self.state.registrar.notify_selection_update_end();
    }
}

//! Selectable regions and the text implementation of one.

use super::adjustment::SelectionAdjustment;
use super::model::{AnchorInfo, SelectableId, Selection};
use crate::text::{AnnotatedString, TextLayoutResult, TextRange};
use std::cmp::Ordering;
use std::rc::Rc;
use strata_ui_graphics::{Point, Rect};
use strata_ui_layout::LayoutCoordinates;

/// Handle positions for one selection update, in root coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionUpdate {
    pub start_handle_position: Point,
    pub end_handle_position: Point,
    /// Where the moving handle was before; `None` when a selection starts.
    pub previous_handle_position: Option<Point>,
    pub is_start_handle: bool,
    pub adjustment: SelectionAdjustment,
}

/// A region of content that can take part in a selection.
pub trait Selectable {
    fn selectable_id(&self) -> SelectableId;

    /// Computes this region's part of the selection between the two handles.
    /// Returns the sub-selection, if the region is covered, and whether the
    /// handle movement was consumed.
    fn update_selection(
        &self,
        update: &SelectionUpdate,
        previous_selection: Option<&Selection>,
    ) -> (Option<Selection>, bool);

    fn select_all_selection(&self) -> Option<Selection>;

    /// Where the given handle sits, in this region's local coordinates.
    fn handle_position(&self, selection: &Selection, is_start_handle: bool) -> Point;

    fn layout_coordinates(&self) -> Option<Rc<dyn LayoutCoordinates>>;

    fn text(&self) -> AnnotatedString;

    fn bounding_box(&self, offset: usize) -> Rect;

    fn range_of_line_containing(&self, offset: usize) -> TextRange;

    /// Offset past the last character that is actually rendered.
    fn last_visible_offset(&self) -> usize;
}

type CoordinatesCallback = Box<dyn Fn() -> Option<Rc<dyn LayoutCoordinates>>>;
type LayoutResultCallback = Box<dyn Fn() -> Option<Rc<TextLayoutResult>>>;

/// [`Selectable`] over laid out text. Coordinates and layout are read
/// through callbacks so the delegate always sees the latest pass.
pub struct MultiWidgetSelectionDelegate {
    selectable_id: SelectableId,
    coordinates: CoordinatesCallback,
    layout_result: LayoutResultCallback,
}

impl MultiWidgetSelectionDelegate {
    pub fn new(
        selectable_id: SelectableId,
        coordinates: impl Fn() -> Option<Rc<dyn LayoutCoordinates>> + 'static,
        layout_result: impl Fn() -> Option<Rc<TextLayoutResult>> + 'static,
    ) -> Self {
        Self {
            selectable_id,
            coordinates: Box::new(coordinates),
            layout_result: Box::new(layout_result),
        }
    }
}

impl Selectable for MultiWidgetSelectionDelegate {
    fn selectable_id(&self) -> SelectableId {
        self.selectable_id
    }

    fn update_selection(
        &self,
        update: &SelectionUpdate,
        previous_selection: Option<&Selection>,
    ) -> (Option<Selection>, bool) {
        let Some(coordinates) = (self.coordinates)() else {
            return (None, false);
        };
        if !coordinates.is_attached() {
            return (None, false);
        }
        let Some(layout) = (self.layout_result)() else {
            return (None, false);
        };

        let local = |position: Point| coordinates.root_to_local(position);
        text_selection_info(
            &layout,
            &SelectionUpdate {
                start_handle_position: local(update.start_handle_position),
                end_handle_position: local(update.end_handle_position),
                previous_handle_position: update.previous_handle_position.map(local),
                ..*update
            },
            self.selectable_id,
            previous_selection,
        )
    }

    fn select_all_selection(&self) -> Option<Selection> {
        let layout = (self.layout_result)()?;
        let direction = layout.input().layout_direction;
        Some(Selection {
            start: AnchorInfo {
                direction,
                offset: 0,
                selectable_id: self.selectable_id,
            },
            end: AnchorInfo {
                direction,
                offset: layout.text_len(),
                selectable_id: self.selectable_id,
            },
            handles_crossed: false,
        })
    }

    fn handle_position(&self, selection: &Selection, is_start_handle: bool) -> Point {
        let anchor = if is_start_handle {
            selection.start
        } else {
            selection.end
        };
        if anchor.selectable_id != self.selectable_id || (self.coordinates)().is_none() {
            return Point::ZERO;
        }
        let Some(layout) = (self.layout_result)() else {
            return Point::ZERO;
        };

        let offset = anchor.offset.min(layout.text_len());
        let leading = is_start_handle != selection.handles_crossed;
        if !leading && offset > 0 {
            // The trailing handle hugs the last selected character, which may
            // end a line the offset itself is past.
            let line = layout.line_for_offset(offset - 1);
            if let Ok(rect) = layout.bounding_box(offset - 1) {
                let bottom = layout.line(line).map_or(rect.bottom(), |line| line.bottom);
                return Point::new(rect.right(), bottom);
            }
        }
        let line = layout.line_for_offset(offset);
        let bottom = layout.line(line).map_or(0.0, |line| line.bottom);
        Point::new(layout.horizontal_position(offset), bottom)
    }

    fn layout_coordinates(&self) -> Option<Rc<dyn LayoutCoordinates>> {
        (self.coordinates)().filter(|coordinates| coordinates.is_attached())
    }

    fn text(&self) -> AnnotatedString {
        (self.layout_result)()
            .map(|layout| layout.input().text.clone())
            .unwrap_or_default()
    }

    fn bounding_box(&self, offset: usize) -> Rect {
        let Some(layout) = (self.layout_result)() else {
            return Rect::ZERO;
        };
        let len = layout.text_len();
        if len == 0 {
            return Rect::ZERO;
        }
        layout.bounding_box(offset.min(len - 1)).unwrap_or(Rect::ZERO)
    }

    fn range_of_line_containing(&self, offset: usize) -> TextRange {
        let Some(layout) = (self.layout_result)() else {
            return TextRange::cursor(0);
        };
        let line = layout.line_for_offset(offset);
        layout
            .line(line)
            .map_or(TextRange::cursor(0), |line| TextRange::new(line.start, line.visible_end))
    }

    fn last_visible_offset(&self) -> usize {
        (self.layout_result)().map_or(0, |layout| layout.last_visible_offset())
    }
}

/// Where a handle lies relative to a region, in reading order: before it,
/// inside it or after it.
pub(crate) fn compare_to_bounds(position: Point, bounds: &Rect) -> Ordering {
    if bounds.contains(position.x, position.y) {
        return Ordering::Equal;
    }
    if position.y < bounds.top() {
        return Ordering::Less;
    }
    if position.x < bounds.left() && position.y < bounds.bottom() {
        return Ordering::Less;
    }
    Ordering::Greater
}

/// A region is covered when a handle is inside it or the handles lie on
/// opposite sides of it.
fn is_selected(bounds: &Rect, start: Point, end: Point) -> bool {
    if bounds.contains(start.x, start.y) || bounds.contains(end.x, end.y) {
        return true;
    }
    (compare_to_bounds(start, bounds) == Ordering::Greater)
        != (compare_to_bounds(end, bounds) == Ordering::Greater)
}

fn offset_in_bounds(layout: &TextLayoutResult, bounds: &Rect, position: Point) -> usize {
    let len = layout.text_len();
    match compare_to_bounds(position, bounds) {
        Ordering::Equal => layout.offset_for_position(position).min(len),
        Ordering::Less => 0,
        Ordering::Greater => len,
    }
}

/// Sub-selection of one text region for handles given in its local space.
pub(crate) fn text_selection_info(
    layout: &TextLayoutResult,
    update: &SelectionUpdate,
    selectable_id: SelectableId,
    previous_selection: Option<&Selection>,
) -> (Option<Selection>, bool) {
    let bounds = Rect::from_size(layout.size());
    if !is_selected(&bounds, update.start_handle_position, update.end_handle_position) {
        return (None, false);
    }

    let raw = TextRange::new(
        offset_in_bounds(layout, &bounds, update.start_handle_position),
        offset_in_bounds(layout, &bounds, update.end_handle_position),
    );
    let previous_handle_offset = update
        .previous_handle_position
        .map(|position| offset_in_bounds(layout, &bounds, position));
    let adjusted = update.adjustment.adjust(
        layout,
        raw,
        previous_handle_offset,
        update.is_start_handle,
        previous_selection.map(Selection::to_text_range),
    );

    let direction = layout.input().layout_direction;
    let selection = Selection {
        start: AnchorInfo {
            direction,
            offset: adjusted.start,
            selectable_id,
        },
        end: AnchorInfo {
            direction,
            offset: adjusted.end,
            selectable_id,
        },
        handles_crossed: adjusted.reversed(),
    };
    let consumed = previous_selection != Some(&selection);
    (Some(selection), consumed)
}

//! Snapping raw handle offsets to characters, words or paragraphs.

use crate::text::{TextLayoutResult, TextRange};

/// How a raw selection range produced by hit-testing is adjusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionAdjustment {
    /// Raw offsets as hit-tested.
    #[default]
    None,
    /// At least one character is selected.
    Character,
    /// Both ends snap outwards to word boundaries.
    Word,
    /// Both ends snap outwards to hard line breaks.
    Paragraph,
    /// Word snapping while a handle grows the selection, character
    /// precision while it shrinks or stays within a word.
    CharacterWithWordAccelerate,
}

impl SelectionAdjustment {
    /// Adjusts `raw`. `previous_handle_offset` is the raw offset the moving
    /// handle had before this update and `previous_selection` the adjusted
    /// range it produced, when there was one.
    pub fn adjust(
        &self,
        layout: &TextLayoutResult,
        raw: TextRange,
        previous_handle_offset: Option<usize>,
        is_start_handle: bool,
        previous_selection: Option<TextRange>,
    ) -> TextRange {
        match self {
            SelectionAdjustment::None => raw,
            SelectionAdjustment::Character => {
                if raw.collapsed() {
                    ensure_at_least_one_char(
                        raw.start,
                        layout.text_len(),
                        is_start_handle,
                        previous_selection.is_some_and(|range| range.reversed()),
                    )
                } else {
                    raw
                }
            }
            SelectionAdjustment::Word => {
                adjust_by_boundary(layout, raw, |offset| layout.word_boundary(offset))
            }
            SelectionAdjustment::Paragraph => {
                let chars: Vec<char> = layout.input().text.text().chars().collect();
                adjust_by_boundary(layout, raw, |offset| paragraph_boundary(&chars, offset))
            }
            SelectionAdjustment::CharacterWithWordAccelerate => accelerate(
                layout,
                raw,
                previous_handle_offset,
                is_start_handle,
                previous_selection,
            ),
        }
    }
}

fn adjust_by_boundary(
    layout: &TextLayoutResult,
    raw: TextRange,
    boundary: impl Fn(usize) -> TextRange,
) -> TextRange {
    let len = layout.text_len();
    if len == 0 {
        return TextRange::cursor(0);
    }
    let start = boundary(raw.start.min(len - 1));
    let end = boundary(raw.end.min(len - 1));
    if raw.reversed() {
        TextRange::new(start.end, end.start)
    } else {
        TextRange::new(start.start, end.end)
    }
}

/// Hard-line-break delimited range around `offset`, excluding the break.
pub(crate) fn paragraph_boundary(chars: &[char], offset: usize) -> TextRange {
    let offset = offset.min(chars.len());
    let start = chars[..offset]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |index| index + 1);
    let end = chars[offset..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |index| offset + index);
    TextRange::new(start, end)
}

/// Widens a collapsed range to one character. The moving handle keeps the
/// side of the fixed one it was on, unless the text edge forces the other.
fn ensure_at_least_one_char(
    offset: usize,
    len: usize,
    is_start_handle: bool,
    previous_handles_crossed: bool,
) -> TextRange {
    if len == 0 {
        return TextRange::cursor(offset);
    }
    let offset = offset.min(len);
    let before = offset.checked_sub(1);
    let after = (offset < len).then_some(offset + 1);
    let moving = if is_start_handle != previous_handles_crossed {
        before.or(after)
    } else {
        after.or(before)
    };
    match moving {
        Some(moving) if is_start_handle => TextRange::new(moving, offset),
        Some(moving) => TextRange::new(offset, moving),
        None => TextRange::cursor(offset),
    }
}

fn accelerate(
    layout: &TextLayoutResult,
    raw: TextRange,
    previous_handle_offset: Option<usize>,
    is_start_handle: bool,
    previous_selection: Option<TextRange>,
) -> TextRange {
    let Some(previous) = previous_selection else {
        return SelectionAdjustment::Word.adjust(layout, raw, previous_handle_offset, is_start_handle, None);
    };
    if raw.collapsed() {
        return ensure_at_least_one_char(
            raw.start,
            layout.text_len(),
            is_start_handle,
            previous.reversed(),
        );
    }

    if is_start_handle {
        let start = update_boundary(
            layout,
            BoundaryMove {
                new_raw: raw.start,
                previous_raw: previous_handle_offset,
                previous_adjusted: previous.start,
                other: raw.end,
                is_start: true,
                reversed: raw.reversed(),
                previous_reversed: previous.reversed(),
            },
        );
        TextRange::new(start, raw.end)
    } else {
        let end = update_boundary(
            layout,
            BoundaryMove {
                new_raw: raw.end,
                previous_raw: previous_handle_offset,
                previous_adjusted: previous.end,
                other: raw.start,
                is_start: false,
                reversed: raw.reversed(),
                previous_reversed: previous.reversed(),
            },
        );
        TextRange::new(raw.start, end)
    }
}

struct BoundaryMove {
    new_raw: usize,
    previous_raw: Option<usize>,
    previous_adjusted: usize,
    /// Adjusted offset of the handle that is not moving.
    other: usize,
    is_start: bool,
    reversed: bool,
    previous_reversed: bool,
}

fn update_boundary(layout: &TextLayoutResult, step: BoundaryMove) -> usize {
    if step.previous_raw == Some(step.new_raw) {
        return step.previous_adjusted;
    }
    let current_line = layout.line_for_offset(step.new_raw);
    if current_line != layout.line_for_offset(step.previous_adjusted) {
        return snap_to_word_boundary(layout, &step, current_line);
    }

    let expanding = match step.previous_raw {
        None => true,
        Some(previous_raw) => {
            if step.is_start != step.previous_reversed {
                step.new_raw < previous_raw
            } else {
                step.new_raw > previous_raw
            }
        }
    };
    // Shrinking, or growing from inside a word, stays character precise.
    if !expanding || !is_at_word_boundary(layout, step.previous_adjusted) {
        return step.new_raw;
    }
    snap_to_word_boundary(layout, &step, current_line)
}

fn is_at_word_boundary(layout: &TextLayoutResult, offset: usize) -> bool {
    let word = layout.word_boundary(offset);
    offset == word.start || offset == word.end
}

fn snap_to_word_boundary(layout: &TextLayoutResult, step: &BoundaryMove, current_line: usize) -> usize {
    let word = layout.word_boundary(step.new_raw);
    let line = layout.line(current_line);

    // Words wrapped over several lines snap to this line's edge instead.
    let start = if layout.line_for_offset(word.start) == current_line {
        word.start
    } else {
        line.as_ref().map_or(word.start, |line| line.start)
    };
    let end = if layout.line_for_offset(word.end) == current_line {
        word.end
    } else {
        line.as_ref().map_or(word.end, |line| line.end)
    };

    if start == step.other {
        return end;
    }
    if end == step.other {
        return start;
    }
    let threshold = (start + end) / 2;
    if step.is_start != step.reversed {
        if step.new_raw <= threshold {
            start
        } else {
            end
        }
    } else if step.new_raw >= threshold {
        end
    } else {
        start
    }
}

#[cfg(test)]
#[path = "tests/adjustment_tests.rs"]
mod tests;

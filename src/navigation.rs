//! Keyboard navigation over the selected cell.
//!
//! [`target_cell`] is the pure part: given the current address and the grid
//! shape it computes where a movement key lands. [`handle_key`] applies the
//! result to the interaction state and scrolls the target row into view.

use log::debug;

use crate::editor::CellInteraction;
use crate::layout::{ScrollAlign, WindowingEngine};
use crate::types::CellAddress;

/// Keys the table reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    /// Shift+Tab.
    BackTab,
    Enter,
    F2,
    Escape,
}

impl NavKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str, shift: bool) -> Option<Self> {
        Some(match key {
            "ArrowUp" => NavKey::Up,
            "ArrowDown" => NavKey::Down,
            "ArrowLeft" => NavKey::Left,
            "ArrowRight" => NavKey::Right,
            "Tab" if shift => NavKey::BackTab,
            "Tab" => NavKey::Tab,
            "Enter" => NavKey::Enter,
            "F2" => NavKey::F2,
            "Escape" => NavKey::Escape,
            _ => return None,
        })
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            NavKey::Up | NavKey::Down | NavKey::Left | NavKey::Right | NavKey::Tab | NavKey::BackTab
        )
    }
}

/// Element the key event was dispatched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// The table's scroll container (or a cell inside it).
    Container,
    /// The multi-line edit surface of the editable cell.
    EditSurface,
}

/// Row count and navigable columns in display order.
#[derive(Debug, Clone, Copy)]
pub struct GridShape<'a> {
    pub total_rows: usize,
    pub column_ids: &'a [String],
}

impl<'a> GridShape<'a> {
    pub fn new(total_rows: usize, column_ids: &'a [String]) -> Self {
        Self {
            total_rows,
            column_ids,
        }
    }

    fn column_at(&self, index: usize) -> Option<&'a str> {
        self.column_ids.get(index).map(String::as_str)
    }
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; the browser default applies.
    Ignored,
    /// Selection moved to a new cell.
    Moved(CellAddress),
    /// Handled, but the selection stayed where it was.
    Unchanged,
    EditStarted,
    EditCancelled,
    /// Enter while editing: left to the edit surface.
    DelegatedToEditor,
}

impl KeyOutcome {
    /// Whether the host should call `preventDefault` on the event.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored | KeyOutcome::DelegatedToEditor)
    }
}

/// Cell a movement key lands on, or `None` for non-movement keys and empty
/// grids.
///
/// A column id missing from `shape` is treated as the first column.
pub fn target_cell(current: &CellAddress, key: NavKey, shape: GridShape<'_>) -> Option<CellAddress> {
    if shape.total_rows == 0 || shape.column_ids.is_empty() {
        return None;
    }
    let last_row = shape.total_rows - 1;
    let last_col = shape.column_ids.len() - 1;
    let row = current.row_index.min(last_row);
    let position = shape
        .column_ids
        .iter()
        .position(|id| id == &current.column_id);
    let col = position.unwrap_or(0);

    let (row, col) = match key {
        NavKey::Up => (row.saturating_sub(1), col),
        NavKey::Down => ((row + 1).min(last_row), col),
        // An unknown column lands on the first column for horizontal moves.
        NavKey::Left | NavKey::Right | NavKey::Tab | NavKey::BackTab if position.is_none() => {
            (row, 0)
        }
        NavKey::Left => (row, col.saturating_sub(1)),
        NavKey::Right => (row, (col + 1).min(last_col)),
        NavKey::Tab => {
            if col < last_col {
                (row, col + 1)
            } else if row < last_row {
                (row + 1, 0)
            } else {
                (row, col)
            }
        }
        NavKey::BackTab => {
            if col > 0 {
                (row, col - 1)
            } else if row > 0 {
                (row - 1, last_col)
            } else {
                (row, col)
            }
        }
        NavKey::Enter | NavKey::F2 | NavKey::Escape => return None,
    };
    let column_id = shape.column_at(col)?;
    Some(CellAddress::new(row, column_id))
}

/// Apply a key press to the interaction state.
///
/// `current_value` is the text of the selected cell, used as the starting
/// draft when Enter or F2 opens the editor.
///
/// From the edit surface only Escape, Tab and Shift+Tab are handled; Tab
/// discards the draft and moves on like any other navigation key.
pub fn handle_key(
    interaction: &mut CellInteraction,
    key: NavKey,
    source: KeySource,
    shape: GridShape<'_>,
    window: &mut dyn WindowingEngine,
    current_value: &str,
) -> KeyOutcome {
    if source == KeySource::EditSurface
        && !matches!(key, NavKey::Escape | NavKey::Tab | NavKey::BackTab)
    {
        return KeyOutcome::Ignored;
    }
    let Some(selected) = interaction.selected().cloned() else {
        return KeyOutcome::Ignored;
    };

    match key {
        NavKey::Escape => {
            if interaction.cancel_edit() {
                KeyOutcome::EditCancelled
            } else {
                KeyOutcome::Ignored
            }
        }
        NavKey::Enter if interaction.is_editing() => KeyOutcome::DelegatedToEditor,
        NavKey::Enter | NavKey::F2 => {
            if interaction.enter_edit(current_value) {
                KeyOutcome::EditStarted
            } else {
                KeyOutcome::Unchanged
            }
        }
        _ => {
            let Some(target) = target_cell(&selected, key, shape) else {
                return KeyOutcome::Unchanged;
            };
            if target == selected && !interaction.is_editing() {
                return KeyOutcome::Unchanged;
            }
            debug!("{key:?}: {selected} -> {target}");
            interaction.select(target.clone());
            window.scroll_to_index(target.row_index, ScrollAlign::Auto);
            KeyOutcome::Moved(target)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn cols() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test_case("ArrowUp", false => Some(NavKey::Up))]
    #[test_case("Tab", false => Some(NavKey::Tab))]
    #[test_case("Tab", true => Some(NavKey::BackTab))]
    #[test_case("F2", false => Some(NavKey::F2))]
    #[test_case("a", false => None)]
    fn test_from_dom(key: &str, shift: bool) -> Option<NavKey> {
        NavKey::from_dom(key, shift)
    }

    #[test_case(0, "a", NavKey::Up => (0, "a".to_string()); "up clamps at top")]
    #[test_case(1, "a", NavKey::Down => (1, "a".to_string()); "down clamps at bottom")]
    #[test_case(0, "a", NavKey::Left => (0, "a".to_string()); "left clamps at first column")]
    #[test_case(0, "c", NavKey::Right => (0, "c".to_string()); "right clamps at last column")]
    #[test_case(0, "c", NavKey::Tab => (1, "a".to_string()); "tab wraps to next row")]
    #[test_case(1, "a", NavKey::BackTab => (0, "c".to_string()); "back tab wraps to previous row")]
    #[test_case(1, "c", NavKey::Tab => (1, "c".to_string()); "tab at last cell stays")]
    #[test_case(0, "a", NavKey::BackTab => (0, "a".to_string()); "back tab at first cell stays")]
    #[test_case(0, "gone", NavKey::Right => (0, "a".to_string()); "missing column falls back")]
    #[test_case(0, "gone", NavKey::Down => (1, "a".to_string()); "missing column keeps row motion")]
    fn test_target_cell(row: usize, col: &str, key: NavKey) -> (usize, String) {
        let ids = cols();
        let t = target_cell(&CellAddress::new(row, col), key, GridShape::new(2, &ids)).unwrap();
        (t.row_index, t.column_id)
    }

    #[test]
    fn test_non_movement_keys_have_no_target() {
        let ids = cols();
        let shape = GridShape::new(2, &ids);
        assert!(target_cell(&CellAddress::new(0, "a"), NavKey::Enter, shape).is_none());
    }

    #[test]
    fn test_empty_grid_has_no_target() {
        let ids: Vec<String> = Vec::new();
        assert!(target_cell(&CellAddress::new(0, "a"), NavKey::Down, GridShape::new(3, &ids)).is_none());
    }

    #[test]
    fn test_outcome_default_prevention() {
        assert!(!KeyOutcome::Ignored.prevents_default());
        assert!(!KeyOutcome::DelegatedToEditor.prevents_default());
        assert!(KeyOutcome::Unchanged.prevents_default());
    }
}

//! Tests for keyboard navigation through a `TableController`.
//!
//! Covers clamping, Tab / Shift+Tab row wrap, edit entry and exit keys,
//! scroll-into-view and column fallback.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{harness, harness_with, people_columns, readonly_harness};
use serde_json::json;
use test_case::test_case;
use vtable::editor::CellInteraction;
use vtable::grid::GridModel;
use vtable::layout::{RowWindow, WindowingEngine};
use vtable::navigation::{handle_key, GridShape, KeyOutcome, KeySource, NavKey};
use vtable::types::{CellAddress, ColumnDef, TableConfig};

fn selected(h: &common::Harness) -> (usize, String) {
    let a = h.table.selected().unwrap();
    (a.row_index, a.column_id.clone())
}

// ============================================================================
// Movement
// ============================================================================

#[test_case(0, "name", NavKey::Up => (0, "name".to_string()); "up at first row")]
#[test_case(1, "name", NavKey::Down => (1, "name".to_string()); "down at last row")]
#[test_case(0, "name", NavKey::Left => (0, "name".to_string()); "left at first column")]
#[test_case(0, "city", NavKey::Right => (0, "city".to_string()); "right at last column")]
#[test_case(0, "name", NavKey::Down => (1, "name".to_string()); "down")]
#[test_case(1, "age", NavKey::Left => (1, "name".to_string()); "left")]
fn test_arrows_clamp(row: usize, col: &str, key: NavKey) -> (usize, String) {
    let mut h = harness(2);
    h.table.click(row, col);
    h.table.key(key, KeySource::Container);
    selected(&h)
}

#[test]
fn test_tab_wraps_to_next_row() {
    let mut h = harness(2);
    h.table.click(0, "city");
    let outcome = h.table.key(NavKey::Tab, KeySource::Container);
    assert_eq!(outcome, KeyOutcome::Moved(CellAddress::new(1, "name")));
}

#[test]
fn test_shift_tab_wraps_to_previous_row() {
    let mut h = harness(2);
    h.table.click(1, "name");
    h.table.key(NavKey::BackTab, KeySource::Container);
    assert_eq!(selected(&h), (0, "city".to_string()));
}

#[test]
fn test_tab_on_last_cell_is_noop() {
    let mut h = harness(2);
    h.table.click(1, "city");
    let outcome = h.table.key(NavKey::Tab, KeySource::Container);
    assert_eq!(outcome, KeyOutcome::Unchanged);
    assert_eq!(selected(&h), (1, "city".to_string()));
}

#[test]
fn test_shift_tab_on_first_cell_is_noop() {
    let mut h = harness(2);
    h.table.click(0, "name");
    assert_eq!(
        h.table.key(NavKey::BackTab, KeySource::Container),
        KeyOutcome::Unchanged
    );
}

#[test]
fn test_keys_without_selection_are_ignored() {
    let mut h = harness(3);
    assert_eq!(h.table.key(NavKey::Down, KeySource::Container), KeyOutcome::Ignored);
    assert_eq!(h.table.key(NavKey::Enter, KeySource::Container), KeyOutcome::Ignored);
}

#[test]
fn test_dom_key_names() {
    let mut h = harness(3);
    h.table.click(0, "name");
    assert_eq!(
        h.table.key_from_dom("ArrowDown", false, KeySource::Container),
        KeyOutcome::Moved(CellAddress::new(1, "name"))
    );
    assert_eq!(
        h.table.key_from_dom("Tab", true, KeySource::Container),
        KeyOutcome::Moved(CellAddress::new(0, "city"))
    );
    assert_eq!(
        h.table.key_from_dom("x", false, KeySource::Container),
        KeyOutcome::Ignored
    );
}

// ============================================================================
// Edit keys
// ============================================================================

#[test]
fn test_enter_and_f2_open_editor() {
    for key in [NavKey::Enter, NavKey::F2] {
        let mut h = harness(3);
        h.table.click(1, "age");
        assert_eq!(h.table.key(key, KeySource::Container), KeyOutcome::EditStarted);
        assert_eq!(h.table.editable(), Some(&CellAddress::new(1, "age")));
        assert_eq!(h.table.interaction().edit_session().unwrap().original, "31");
    }
}

#[test]
fn test_enter_while_editing_is_left_to_editor() {
    let mut h = harness(3);
    h.table.double_click(1, "age");
    assert_eq!(
        h.table.key(NavKey::Enter, KeySource::Container),
        KeyOutcome::DelegatedToEditor
    );
    assert!(h.table.interaction().is_editing());
}

#[test]
fn test_escape_without_edit_is_noop() {
    let mut h = harness(3);
    h.table.click(1, "age");
    assert_eq!(h.table.key(NavKey::Escape, KeySource::Container), KeyOutcome::Ignored);
    assert_eq!(selected(&h), (1, "age".to_string()));
}

#[test]
fn test_navigation_discards_pending_edit() {
    let mut h = harness(3);
    h.table.double_click(1, "age");
    h.table.edit_input("99");
    h.table.key(NavKey::Down, KeySource::Container);
    assert_eq!(selected(&h), (2, "age".to_string()));
    assert!(h.table.editable().is_none());
    assert!(h.changes().is_empty());
}

#[test]
fn test_edit_surface_keys_stay_in_editor() {
    let mut h = harness(3);
    h.table.double_click(1, "age");
    assert_eq!(h.table.key(NavKey::Down, KeySource::EditSurface), KeyOutcome::Ignored);
    assert_eq!(h.table.key(NavKey::Left, KeySource::EditSurface), KeyOutcome::Ignored);
    assert_eq!(h.table.key(NavKey::F2, KeySource::EditSurface), KeyOutcome::Ignored);
    assert!(h.table.interaction().is_editing());
    assert_eq!(
        h.table.key(NavKey::Escape, KeySource::EditSurface),
        KeyOutcome::EditCancelled
    );
}

#[test_case(NavKey::Tab => (1, "city".to_string()); "tab")]
#[test_case(NavKey::BackTab => (1, "name".to_string()); "shift tab")]
fn test_tab_from_edit_surface_discards_and_moves(key: NavKey) -> (usize, String) {
    let mut h = harness(3);
    h.table.double_click(1, "age");
    h.table.edit_input("99");

    let outcome = h.table.key(key, KeySource::EditSurface);
    assert!(matches!(outcome, KeyOutcome::Moved(_)));
    assert!(outcome.prevents_default());
    assert!(h.table.editable().is_none());
    // Nothing left for a later blur to commit.
    h.table.commit_edit();
    assert!(h.changes().is_empty());
    assert_eq!(h.table.grid().cell_value(1, "age"), Some("31".to_string()));
    selected(&h)
}

#[test]
fn test_readonly_still_navigates() {
    let mut h = readonly_harness(3);
    h.table.click(0, "name");
    assert_eq!(h.table.key(NavKey::F2, KeySource::Container), KeyOutcome::Unchanged);
    h.table.key(NavKey::Right, KeySource::Container);
    assert_eq!(selected(&h), (0, "age".to_string()));
}

// ============================================================================
// Column fallback
// ============================================================================

#[test]
fn test_missing_column_falls_back_to_first() {
    let mut interaction = CellInteraction::new(false);
    interaction.click(CellAddress::new(1, "removed"), false);
    let ids: Vec<String> = vec!["a".into(), "b".into()];
    let mut window = RowWindow::new(3, 40.0, 400.0);
    let outcome = handle_key(
        &mut interaction,
        NavKey::Right,
        KeySource::Container,
        GridShape::new(3, &ids),
        &mut window,
        "",
    );
    assert_eq!(outcome, KeyOutcome::Moved(CellAddress::new(1, "a")));
}

#[test]
fn test_columns_replaced_under_selection() {
    let mut h = harness(3);
    h.table.click(1, "city");
    h.table.set_columns(
        vec![ColumnDef::field("name", "Name"), ColumnDef::field("age", "Age")],
        0.0,
    );
    assert_eq!(selected(&h), (1, "city".to_string()));
    assert_eq!(
        h.table.key(NavKey::Right, KeySource::Container),
        KeyOutcome::Moved(CellAddress::new(1, "name"))
    );

    h.table.set_columns(people_columns(), 0.0);
    h.table.click(1, "city");
    h.table.set_columns(
        vec![ColumnDef::field("name", "Name"), ColumnDef::field("city", "City")],
        0.0,
    );
    h.table.key(NavKey::Left, KeySource::Container);
    assert_eq!(selected(&h), (1, "name".to_string()));
}

#[test]
fn test_edit_on_dropped_column_is_discarded() {
    let mut h = harness(3);
    h.table.double_click(2, "city");
    h.table.edit_input("Bergen");
    h.table.set_columns(people_columns()[..2].to_vec(), 0.0);

    assert!(h.table.editable().is_none());
    assert_eq!(selected(&h), (2, "city".to_string()));
    h.table.commit_edit();
    assert!(h.changes().is_empty());
    assert_eq!(
        h.table.key(NavKey::Up, KeySource::Container),
        KeyOutcome::Moved(CellAddress::new(1, "name"))
    );
}

// ============================================================================
// Scroll into view
// ============================================================================

#[test]
fn test_moving_below_viewport_scrolls_minimum() {
    // 400px viewport, no header: rows 0..=9 fully visible.
    let config = TableConfig {
        show_column_header: false,
        ..TableConfig::default()
    };
    let mut h = harness_with(config, 100);
    h.table.click(9, "name");
    assert_eq!(h.table.scroll_offset(), 0.0);
    h.table.key(NavKey::Down, KeySource::Container);
    // Row 10 spans 400..440; bottom aligned with the viewport.
    assert_eq!(h.table.scroll_offset(), 40.0);
    h.table.key(NavKey::Up, KeySource::Container);
    assert_eq!(h.table.scroll_offset(), 40.0);
}

#[test]
fn test_moving_above_viewport_aligns_top() {
    let mut h = harness(100);
    h.table.on_scroll(800.0);
    h.table.click(20, "age");
    h.table.key(NavKey::Up, KeySource::Container);
    assert_eq!(h.table.scroll_offset(), 19.0 * 40.0);
}

#[test]
fn test_visible_target_does_not_scroll() {
    let mut window = RowWindow::new(50, 40.0, 400.0);
    window.set_scroll_offset(200.0);
    let mut interaction = CellInteraction::new(false);
    interaction.click(CellAddress::new(7, "a"), false);
    let ids: Vec<String> = vec!["a".into()];
    handle_key(
        &mut interaction,
        NavKey::Down,
        KeySource::Container,
        GridShape::new(50, &ids),
        &mut window,
        "",
    );
    assert_eq!(window.scroll_offset(), 200.0);
    assert!(window.visible_window().iter().any(|item| item.index == 8));
}

#[test]
fn test_sorted_rows_navigate_in_display_order() {
    let mut h = harness(3);
    h.table.set_data(
        vec![json!({"name": "C"}), json!({"name": "A"}), json!({"name": "B"})],
        0.0,
    );
    h.table.header_click("name");
    h.table.click(0, "name");
    h.table.key(NavKey::Enter, KeySource::Container);
    assert_eq!(h.table.interaction().edit_session().unwrap().original, "A");
}

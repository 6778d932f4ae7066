//! Common test utilities for the table integration tests.
//!
//! Provides a small people dataset, a controller builder that records value
//! changes, and rectangle-backed stand-ins for DOM nodes.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use vtable::render::{MeasureNode, ScrollContainer};
use vtable::types::{CellChange, ColumnDef, Rect, TableConfig};
use vtable::TableController;

// ============================================================================
// Data
// ============================================================================

/// `name`, `age`, `city` columns.
pub fn people_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::field("name", "Name"),
        ColumnDef::field("age", "Age"),
        ColumnDef::field("city", "City"),
    ]
}

/// `count` rows; row `i` has age `30 + i`.
pub fn people_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": format!("Person {i}"),
                "age": 30 + i,
                "city": if i % 2 == 0 { "Oslo" } else { "Lima" },
            })
        })
        .collect()
}

// ============================================================================
// Controller
// ============================================================================

/// Controller plus every change it reported.
pub struct Harness {
    pub table: TableController,
    pub changes: Rc<RefCell<Vec<CellChange>>>,
}

impl Harness {
    pub fn changes(&self) -> Vec<CellChange> {
        self.changes.borrow().clone()
    }
}

pub fn harness_with(config: TableConfig, rows: usize) -> Harness {
    let mut table =
        TableController::new(config, people_columns(), people_rows(rows)).expect("valid config");
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    table.set_on_change(move |change| sink.borrow_mut().push(change.clone()));
    Harness { table, changes }
}

pub fn harness(rows: usize) -> Harness {
    harness_with(TableConfig::default(), rows)
}

pub fn readonly_harness(rows: usize) -> Harness {
    harness_with(
        TableConfig {
            readonly: true,
            ..TableConfig::default()
        },
        rows,
    )
}

// ============================================================================
// Fake DOM
// ============================================================================

/// A node with a fixed box.
#[derive(Debug, Clone, Copy)]
pub struct FakeNode(pub Rect);

impl MeasureNode for FakeNode {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(self.0)
    }
}

/// A detached node: cannot be measured.
#[derive(Debug, Clone, Copy)]
pub struct DetachedNode;

impl MeasureNode for DetachedNode {
    fn bounding_rect(&self) -> Option<Rect> {
        None
    }
}

/// Scroll container at a fixed position with a settable scroll offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeContainer {
    pub rect: Rect,
    pub scroll_top: f64,
    pub scroll_left: f64,
}

impl ScrollContainer for FakeContainer {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(self.rect)
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }
}

/// Box of a cell as the browser would report it for a container at
/// `container` scrolled by `scroll_top`, with rows of `row_height` below a
/// header of `header_height`.
pub fn cell_rect(
    container: Rect,
    scroll_top: f64,
    header_height: f64,
    row_index: usize,
    row_height: f64,
    left: f64,
    width: f64,
) -> Rect {
    let top = container.top + header_height + row_index as f64 * row_height - scroll_top;
    Rect::new(top, container.left + left, width, row_height)
}

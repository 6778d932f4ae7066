//! Render planning.
//!
//! This module provides:
//! - Row and header plans: what each visible cell shows and which classes it
//!   carries, computed without touching the DOM
//! - Focus ring positioning ([`focus_ring`])
//!
//! The wasm front-end turns plans into elements; tests inspect them directly.

pub mod focus_ring;

pub use focus_ring::{
    compute_geometry, CellAnchors, MeasureNode, OverlayPositioner, ScrollContainer,
    WindowSignature,
};

use crate::editor::CellInteraction;
use crate::grid::GridModel;
use crate::types::{CellAddress, VirtualItem, ROW_HEADER_COLUMN_ID};

/// CSS class names shared with the stylesheet.
pub mod class {
    pub const CONTAINER: &str = "vt-container";
    pub const TABLE: &str = "vt-table";
    pub const THEAD: &str = "vt-thead";
    pub const TBODY: &str = "vt-tbody";
    pub const TR: &str = "vt-tr";
    pub const TR_VIRTUAL: &str = "vt-tr--virtual";
    pub const TH: &str = "vt-th";
    pub const TH_ROW_HEADER: &str = "vt-th--row-header";
    pub const TH_ACTIVE: &str = "vt-th--active";
    pub const TH_SORTABLE: &str = "vt-th--sortable";
    pub const TD: &str = "vt-td";
    pub const TD_ROW_HEADER: &str = "vt-td--row-header";
    pub const TD_ROW_HEADER_ACTIVE: &str = "vt-td--row-header-active";
    pub const CELL_SELECTED: &str = "vt-cell-selected";
    pub const CELL_EDITABLE: &str = "vt-cell-editable";
    pub const FOCUS_RING: &str = "vt-focus-ring";
    pub const FOCUS_RING_VISIBLE: &str = "vt-focus-ring--visible";
}

/// What a body cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Static(String),
    /// Multi-line edit surface holding the current draft.
    EditSurface { value: String, height: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellPlan {
    pub column_id: String,
    pub width: f64,
    pub classes: Vec<&'static str>,
    pub content: CellContent,
    pub is_row_header: bool,
    /// The focus ring follows this cell.
    pub is_anchor: bool,
}

impl CellPlan {
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowPlan {
    pub index: usize,
    /// Offset from the top of the body (`translateY`).
    pub start: f64,
    pub cells: Vec<CellPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCellPlan {
    pub column_id: String,
    /// Header text with the sort indicator appended.
    pub label: String,
    pub width: f64,
    pub classes: Vec<&'static str>,
    pub sortable: bool,
}

impl HeaderCellPlan {
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}

fn is_at(addr: Option<&CellAddress>, row: usize, column_id: &str) -> bool {
    addr.is_some_and(|a| a.row_index == row && a.column_id == column_id)
}

/// Plan the rendered rows of `items`.
pub fn plan_rows(
    interaction: &CellInteraction,
    grid: &dyn GridModel,
    items: &[VirtualItem],
) -> Vec<RowPlan> {
    let selected = interaction.selected();
    let editable = interaction.editable();
    let active = interaction.active_cell();
    let draft = interaction.edit_session().map(|s| s.draft.as_str());

    items
        .iter()
        .map(|item| {
            let row = item.index;
            let row_active = selected.is_some_and(|a| a.row_index == row)
                || editable.is_some_and(|a| a.row_index == row);
            let cells = grid
                .visible_cells(row)
                .into_iter()
                .map(|cell| {
                    let is_row_header = cell.column_id == ROW_HEADER_COLUMN_ID;
                    let is_selected = is_at(selected, row, &cell.column_id);
                    let is_editable = is_at(editable, row, &cell.column_id);

                    let mut classes = vec![class::TD];
                    if is_row_header {
                        classes.push(class::TD_ROW_HEADER);
                        if row_active {
                            classes.push(class::TD_ROW_HEADER_ACTIVE);
                        }
                    }
                    if is_selected {
                        classes.push(class::CELL_SELECTED);
                    }

                    let content = if is_editable && !interaction.readonly() {
                        CellContent::EditSurface {
                            value: draft.map_or_else(|| cell.value.clone(), str::to_string),
                            height: item.size,
                        }
                    } else {
                        CellContent::Static(cell.rendered)
                    };

                    CellPlan {
                        width: grid.column_size(&cell.column_id),
                        is_anchor: is_at(active, row, &cell.column_id),
                        column_id: cell.column_id,
                        classes,
                        content,
                        is_row_header,
                    }
                })
                .collect();
            RowPlan {
                index: row,
                start: item.start,
                cells,
            }
        })
        .collect()
}

/// Plan the header row. The active cell's column is highlighted.
pub fn plan_header(interaction: &CellInteraction, grid: &dyn GridModel) -> Vec<HeaderCellPlan> {
    let active_column = interaction.active_cell().map(|a| a.column_id.as_str());
    grid.header_groups()
        .into_iter()
        .flat_map(|group| group.headers)
        .map(|header| {
            let is_row_header = header.column_id == ROW_HEADER_COLUMN_ID;
            let mut classes = vec![class::TH];
            if is_row_header {
                classes.push(class::TH_ROW_HEADER);
            } else if active_column == Some(header.column_id.as_str()) {
                classes.push(class::TH_ACTIVE);
            }
            if header.sortable {
                classes.push(class::TH_SORTABLE);
            }
            let mut label = header.rendered_header;
            if let Some(dir) = header.sort_direction {
                label.push_str(dir.indicator());
            }
            HeaderCellPlan {
                column_id: header.column_id,
                label,
                width: header.width,
                classes,
                sortable: header.sortable,
            }
        })
        .collect()
}

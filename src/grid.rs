//! Tabular data model: columns, ordered rows, sizing and sort state.
//!
//! [`GridModel`] is the seam the table consumes; [`DataGrid`] implements it
//! over JSON row objects.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::types::{
    CellView, ColumnDef, HeaderGroup, HeaderView, SortDirection, DEFAULT_COLUMN_WIDTH,
    ROW_HEADER_COLUMN_ID,
};

/// Resolves column definitions, rows and sort order into renderable cells.
pub trait GridModel {
    /// Number of rows in the ordered row model.
    fn row_count(&self) -> usize;

    /// Cells of the row at `row_index`, row-header column first when shown.
    fn visible_cells(&self, row_index: usize) -> Vec<CellView>;

    fn header_groups(&self) -> Vec<HeaderGroup>;

    /// Navigable column ids in display order (row-header column excluded).
    fn ordered_column_ids(&self) -> Vec<String>;

    fn column_size(&self, column_id: &str) -> f64;

    fn set_column_size(&mut self, column_id: &str, px: f64);

    /// Raw text of one cell, if the address exists.
    fn cell_value(&self, row_index: usize, column_id: &str) -> Option<String>;
}

/// In-memory grid over JSON row objects.
#[derive(Debug, Clone)]
pub struct DataGrid {
    columns: Vec<ColumnDef>,
    rows: Vec<Value>,
    /// `order[i]` = index into `rows` of the i-th displayed row.
    order: Vec<usize>,
    sizes: HashMap<String, f64>,
    sort: Option<(String, SortDirection)>,
    show_row_header: bool,
    row_header_width: f64,
}

impl DataGrid {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Value>) -> Self {
        let order = (0..rows.len()).collect();
        Self {
            columns,
            rows,
            order,
            sizes: HashMap::new(),
            sort: None,
            show_row_header: false,
            row_header_width: 60.0,
        }
    }

    #[must_use]
    pub fn with_row_header(mut self, show: bool, width: f64) -> Self {
        self.show_row_header = show;
        self.row_header_width = width;
        self
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn show_row_header(&self) -> bool {
        self.show_row_header
    }

    /// Row object displayed at `row_index`.
    pub fn row(&self, row_index: usize) -> Option<&Value> {
        self.order
            .get(row_index)
            .and_then(|&source| self.rows.get(source))
    }

    /// Index into the original dataset of the row displayed at `row_index`.
    pub fn source_index(&self, row_index: usize) -> Option<usize> {
        self.order.get(row_index).copied()
    }

    /// Replace the dataset, keeping column sizes and the sort state.
    pub fn set_rows(&mut self, rows: Vec<Value>) {
        self.rows = rows;
        self.apply_sort();
    }

    /// Replace the column definitions. Sizes of surviving columns are kept.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.sizes
            .retain(|id, _| columns.iter().any(|c| &c.id == id));
        if let Some((id, _)) = &self.sort {
            if !columns.iter().any(|c| &c.id == id) {
                self.sort = None;
            }
        }
        self.columns = columns;
        self.apply_sort();
    }

    pub fn sort_state(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(id, dir)| (id.as_str(), *dir))
    }

    /// Cycle a column's sort: none → ascending → descending → none.
    ///
    /// Returns false for unknown or non-sortable columns.
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.id == column_id && c.sortable);
        if !sortable {
            return false;
        }
        self.sort = match &self.sort {
            Some((id, SortDirection::Asc)) if id == column_id => {
                Some((id.clone(), SortDirection::Desc))
            }
            Some((id, SortDirection::Desc)) if id == column_id => None,
            _ => Some((column_id.to_string(), SortDirection::Asc)),
        };
        self.apply_sort();
        true
    }

    fn apply_sort(&mut self) {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        if let Some((id, dir)) = &self.sort {
            if let Some(column) = self.columns.iter().find(|c| &c.id == id) {
                let keys: Vec<String> = self
                    .rows
                    .iter()
                    .map(|row| column.accessor.project(row))
                    .collect();
                order.sort_by(|&a, &b| {
                    let ord = match (keys.get(a), keys.get(b)) {
                        (Some(ka), Some(kb)) => compare_text(ka, kb),
                        _ => Ordering::Equal,
                    };
                    match dir {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                });
            }
        }
        self.order = order;
    }

    fn column(&self, column_id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == column_id)
    }
}

/// Numeric-aware comparison: numbers by value, everything else as text.
fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

impl GridModel for DataGrid {
    fn row_count(&self) -> usize {
        self.order.len()
    }

    fn visible_cells(&self, row_index: usize) -> Vec<CellView> {
        let Some(row) = self.row(row_index) else {
            return Vec::new();
        };
        let mut cells = Vec::with_capacity(self.columns.len() + 1);
        if self.show_row_header {
            let number = (row_index + 1).to_string();
            cells.push(CellView {
                column_id: ROW_HEADER_COLUMN_ID.to_string(),
                value: number.clone(),
                rendered: number,
            });
        }
        for column in &self.columns {
            let text = column.accessor.project(row);
            cells.push(CellView {
                column_id: column.id.clone(),
                value: text.clone(),
                rendered: text,
            });
        }
        cells
    }

    fn header_groups(&self) -> Vec<HeaderGroup> {
        let mut headers = Vec::with_capacity(self.columns.len() + 1);
        if self.show_row_header {
            headers.push(HeaderView {
                column_id: ROW_HEADER_COLUMN_ID.to_string(),
                rendered_header: String::new(),
                sort_direction: None,
                sortable: false,
                width: self.row_header_width,
            });
        }
        for column in &self.columns {
            headers.push(HeaderView {
                column_id: column.id.clone(),
                rendered_header: column.header.text(),
                sort_direction: self
                    .sort
                    .as_ref()
                    .filter(|(id, _)| id == &column.id)
                    .map(|(_, dir)| *dir),
                sortable: column.sortable,
                width: self.column_size(&column.id),
            });
        }
        vec![HeaderGroup {
            id: "0".to_string(),
            headers,
        }]
    }

    fn ordered_column_ids(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    fn column_size(&self, column_id: &str) -> f64 {
        if column_id == ROW_HEADER_COLUMN_ID {
            return self.row_header_width;
        }
        self.sizes
            .get(column_id)
            .copied()
            .or_else(|| self.column(column_id).and_then(|c| c.size))
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    fn set_column_size(&mut self, column_id: &str, px: f64) {
        // The row-header column is sized by configuration only.
        if column_id == ROW_HEADER_COLUMN_ID || self.column(column_id).is_none() {
            return;
        }
        self.sizes.insert(column_id.to_string(), px);
    }

    fn cell_value(&self, row_index: usize, column_id: &str) -> Option<String> {
        let row = self.row(row_index)?;
        if column_id == ROW_HEADER_COLUMN_ID {
            return self.show_row_header.then(|| (row_index + 1).to_string());
        }
        self.column(column_id).map(|c| c.accessor.project(row))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid() -> DataGrid {
        DataGrid::new(
            vec![
                ColumnDef::field("name", "Name"),
                ColumnDef::field("age", "Age").with_size(80.0),
            ],
            vec![
                json!({"name": "Carol", "age": 41}),
                json!({"name": "Alice", "age": 9}),
                json!({"name": "Bob", "age": 30}),
            ],
        )
        .with_row_header(true, 60.0)
    }

    #[test]
    fn test_row_header_cell_first() {
        let g = grid();
        let cells = g.visible_cells(1);
        assert_eq!(cells[0].column_id, ROW_HEADER_COLUMN_ID);
        assert_eq!(cells[0].rendered, "2");
        assert_eq!(cells[1].value, "Alice");
    }

    #[test]
    fn test_ordered_column_ids_exclude_row_header() {
        assert_eq!(grid().ordered_column_ids(), vec!["name", "age"]);
    }

    #[test]
    fn test_sort_cycle_is_numeric_aware() {
        let mut g = grid();
        assert!(g.toggle_sort("age"));
        assert_eq!(g.cell_value(0, "age").unwrap(), "9");
        assert!(g.toggle_sort("age"));
        assert_eq!(g.cell_value(0, "age").unwrap(), "41");
        assert!(g.toggle_sort("age"));
        assert_eq!(g.sort_state(), None);
        assert_eq!(g.cell_value(0, "name").unwrap(), "Carol");
    }

    #[test]
    fn test_sort_indicator_in_headers() {
        let mut g = grid();
        g.toggle_sort("name");
        let headers = &g.header_groups()[0].headers;
        assert_eq!(headers[1].sort_direction, Some(SortDirection::Asc));
        assert_eq!(headers[2].sort_direction, None);
    }

    #[test]
    fn test_column_size_fallbacks() {
        let mut g = grid();
        assert_eq!(g.column_size("age"), 80.0);
        assert_eq!(g.column_size("name"), DEFAULT_COLUMN_WIDTH);
        g.set_column_size("name", 120.0);
        assert_eq!(g.column_size("name"), 120.0);
        g.set_column_size(ROW_HEADER_COLUMN_ID, 10.0);
        assert_eq!(g.column_size(ROW_HEADER_COLUMN_ID), 60.0);
    }

    #[test]
    fn test_source_index_follows_sort() {
        let mut g = grid();
        g.toggle_sort("name");
        assert_eq!(g.source_index(0), Some(1));
    }
}

use serde::{Deserialize, Serialize};

/// Column id reserved for the synthetic row-number column.
pub const ROW_HEADER_COLUMN_ID: &str = "__rowHeader";

/// Logical address of a cell: row position in the ordered row model plus the
/// column's stable id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellAddress {
    pub row_index: usize,
    pub column_id: String,
}

impl CellAddress {
    pub fn new(row_index: usize, column_id: impl Into<String>) -> Self {
        Self {
            row_index,
            column_id: column_id.into(),
        }
    }

    /// Whether this address points into the row-number column.
    pub fn is_row_header(&self) -> bool {
        self.column_id == ROW_HEADER_COLUMN_ID
    }
}

impl std::fmt::Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row_index, self.column_id)
    }
}

/// Payload of the value-change notification emitted by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub row_index: usize,
    pub column_id: String,
    pub value: String,
}

/// One visible cell as resolved by the grid model for a given row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub column_id: String,
    /// Raw text of the value (what the edit surface starts from).
    pub value: String,
    /// Display content (row number for the row-header column).
    pub rendered: String,
}

/// Sort direction of a column, as computed by the grid model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Indicator appended to the header label.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => " 🔼",
            SortDirection::Desc => " 🔽",
        }
    }
}

/// One header cell of a header group.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub column_id: String,
    pub rendered_header: String,
    pub sort_direction: Option<SortDirection>,
    pub sortable: bool,
    pub width: f64,
}

/// A row of headers.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderGroup {
    pub id: String,
    pub headers: Vec<HeaderView>,
}

/// One row of the rendered window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    pub index: usize,
    /// Offset of the row's top edge from the start of the body, in px.
    pub start: f64,
    pub size: f64,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

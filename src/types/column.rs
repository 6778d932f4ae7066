use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, VtableError};

/// Where a column's header label comes from.
#[derive(Clone)]
pub enum HeaderSource {
    Text(String),
    /// Rendered on demand (function-like header definition).
    Render(Rc<dyn Fn() -> String>),
}

impl HeaderSource {
    pub fn text(&self) -> String {
        match self {
            HeaderSource::Text(s) => s.clone(),
            HeaderSource::Render(f) => f(),
        }
    }
}

impl fmt::Debug for HeaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderSource::Text(s) => f.debug_tuple("Text").field(s).finish(),
            HeaderSource::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// How a row object is projected to the text shown in a column.
#[derive(Clone)]
pub enum Accessor {
    /// Read a field of the row object.
    Field(String),
    /// Derive the text from the whole row.
    Derive(Rc<dyn Fn(&Value) -> String>),
    /// Column without data (renders empty).
    None,
}

impl Accessor {
    pub fn project(&self, row: &Value) -> String {
        match self {
            Accessor::Field(key) => row.get(key).map(value_to_text).unwrap_or_default(),
            Accessor::Derive(f) => f(row),
            Accessor::None => String::new(),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(key) => f.debug_tuple("Field").field(key).finish(),
            Accessor::Derive(_) => f.write_str("Derive(..)"),
            Accessor::None => f.write_str("None"),
        }
    }
}

/// Column definition supplied by the host.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub id: String,
    pub header: HeaderSource,
    pub accessor: Accessor,
    /// Default width in px; the grid falls back to [`DEFAULT_COLUMN_WIDTH`].
    pub size: Option<f64>,
    pub sortable: bool,
}

/// Width used when neither the definition nor auto-fit provides one.
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;

impl ColumnDef {
    /// Column reading `key` from each row, with `key` as its id.
    pub fn field(key: impl Into<String>, header: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: key.clone(),
            header: HeaderSource::Text(header.into()),
            accessor: Accessor::Field(key),
            size: None,
            sortable: true,
        }
    }

    /// Column whose text is derived from the whole row.
    pub fn derived(
        id: impl Into<String>,
        header: impl Into<String>,
        derive: impl Fn(&Value) -> String + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: HeaderSource::Text(header.into()),
            accessor: Accessor::Derive(Rc::new(derive)),
            size: None,
            sortable: true,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_sorting(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    #[must_use]
    pub fn with_header_renderer(mut self, render: impl Fn() -> String + 'static) -> Self {
        self.header = HeaderSource::Render(Rc::new(render));
        self
    }
}

/// Serializable column description as passed from JavaScript.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub accessor_key: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default = "default_true")]
    pub enable_sorting: bool,
}

fn default_true() -> bool {
    true
}

impl TryFrom<ColumnSpec> for ColumnDef {
    type Error = VtableError;

    fn try_from(spec: ColumnSpec) -> Result<Self> {
        let id = spec
            .id
            .or_else(|| spec.accessor_key.clone())
            .ok_or_else(|| VtableError::Config("column needs an id or accessorKey".into()))?;
        let accessor = match spec.accessor_key {
            Some(key) => Accessor::Field(key),
            None => Accessor::None,
        };
        Ok(Self {
            header: HeaderSource::Text(spec.header.unwrap_or_default()),
            id,
            accessor,
            size: spec.size,
            sortable: spec.enable_sorting,
        })
    }
}

/// Display text of a JSON value. Strings are shown unquoted, null as empty.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

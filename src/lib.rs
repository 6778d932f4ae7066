//! vtable - virtualized editable data table for the web
//!
//! Renders large row sets in a scrollable container via WebAssembly and the
//! DOM, creating only the rows in view:
//! - Single-cell selection, double-click / Enter / F2 editing
//! - Keyboard navigation with scroll-into-view
//! - Floating focus ring that survives row recycling
//! - Content-fitted column widths, cached per column and dataset length
//!
//! Everything except the `viewer` module is platform-neutral and tested
//! natively; [`table::TableController`] is the entry point there.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { VirtualTable } from 'vtable';
//! await init();
//! const table = new VirtualTable(host, columns, rows, {
//!   height: 400,
//!   autoFitColumnWidth: true,
//!   onChange: (rowIndex, columnId, value) => save(rowIndex, columnId, value),
//! });
//! // later
//! table.free();
//! ```

pub mod editor;
pub mod error;
pub mod grid;
pub mod layout;
pub mod navigation;
pub mod render;
pub mod sizing;
pub mod table;
pub mod theme;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::VirtualTable;

pub use error::{Result, VtableError};
pub use table::TableController;
pub use types::*;

/// Crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

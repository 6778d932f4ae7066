//! Row windowing: which rows are rendered and where.
//!
//! This module handles:
//! - The [`WindowingEngine`] seam the table consumes
//! - [`RowWindow`], an estimate-then-measure row virtualizer
//! - Scroll-into-view alignment

mod row_window;

pub use row_window::{RowWindow, DEFAULT_OVERSCAN};

use crate::types::VirtualItem;

/// Alignment policy for [`WindowingEngine::scroll_to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Scroll the minimum amount to bring the row fully into view.
    #[default]
    Auto,
    Start,
    Center,
    End,
}

/// Decides which rows are rendered and at which offsets.
pub trait WindowingEngine {
    /// Rendered rows ordered by index, overscan included.
    fn visible_window(&self) -> Vec<VirtualItem>;

    /// Height of all rows together, in px.
    fn total_extent(&self) -> f64;

    /// Scroll so that `index` is visible. Returns the new scroll offset when
    /// the offset changed.
    fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) -> Option<f64>;

    /// Report the rendered size of a row. Returns whether the layout changed.
    fn measure(&mut self, index: usize, size: f64) -> bool;
}

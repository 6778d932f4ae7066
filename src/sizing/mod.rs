//! Automatic column sizing.
//!
//! Each column is fitted to its widest text (header or any value) plus
//! padding, clamped to the configured bounds. Results are cached per
//! `(column id, dataset length)`.
//!
//! Two strategies share the cache: [`AutoColumnSizer::measure_all`] runs
//! synchronously (initial layout), while [`AutoColumnSizer::schedule`] and
//! [`AutoColumnSizer::poll`] coalesce data and zoom churn into one pass after
//! a quiet period.

mod cache;
mod debounce;
mod measure;

pub use cache::{ColumnWidthCache, WidthKey};
pub use debounce::Debounce;
pub use measure::{MonospaceMeasurer, TextMeasurer, DEFAULT_FONT};

#[cfg(target_arch = "wasm32")]
pub use measure::CanvasTextMeasurer;

use log::trace;
use serde_json::Value;

use crate::grid::{DataGrid, GridModel};
use crate::types::{AutoFitOptions, ColumnDef, ROW_HEADER_COLUMN_ID};

/// Quiet period before a scheduled sizing pass runs.
pub const SIZING_DEBOUNCE_MS: f64 = 100.0;

/// Fitted width of one column, in whole px.
///
/// Returns `None` when the measurer cannot measure or the result is not
/// finite.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn measure_column_width<'a>(
    measurer: &dyn TextMeasurer,
    font: &str,
    header: &str,
    values: impl IntoIterator<Item = &'a str>,
    options: &AutoFitOptions,
) -> Option<u32> {
    let mut widest = measurer.text_width(header, font)?;
    for value in values {
        widest = widest.max(measurer.text_width(value, font)?);
    }
    // max/min instead of clamp: unvalidated bounds must not panic
    let width = (widest + options.padding)
        .ceil()
        .max(options.min_width)
        .min(options.max_width);
    if !width.is_finite() {
        return None;
    }
    Some(width.max(0.0) as u32)
}

/// Fits column widths and remembers the results.
#[derive(Debug)]
pub struct AutoColumnSizer {
    enabled: bool,
    options: AutoFitOptions,
    font: String,
    cache: ColumnWidthCache,
    debounce: Debounce,
    measuring: bool,
}

impl AutoColumnSizer {
    pub fn new(enabled: bool, options: AutoFitOptions) -> Self {
        Self {
            enabled,
            options,
            font: DEFAULT_FONT.to_string(),
            cache: ColumnWidthCache::new(),
            debounce: Debounce::new(SIZING_DEBOUNCE_MS),
            measuring: false,
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn options(&self) -> &AutoFitOptions {
        &self.options
    }

    pub fn cache(&self) -> &ColumnWidthCache {
        &self.cache
    }

    pub fn is_measuring(&self) -> bool {
        self.measuring
    }

    /// Width of one column, from the cache or freshly measured.
    ///
    /// Returns `None` for the row-header column, while another pass is
    /// running, or when measurement is unavailable.
    pub fn measure_column(
        &mut self,
        column: &ColumnDef,
        rows: &[Value],
        measurer: &dyn TextMeasurer,
    ) -> Option<u32> {
        if column.id == ROW_HEADER_COLUMN_ID || self.measuring {
            return None;
        }
        if let Some(width) = self.cache.get(&column.id, rows.len()) {
            return Some(width);
        }
        self.measuring = true;
        let header = column.header.text();
        let values: Vec<String> = rows.iter().map(|row| column.accessor.project(row)).collect();
        let width = measure_column_width(
            measurer,
            &self.font,
            &header,
            values.iter().map(String::as_str),
            &self.options,
        );
        self.measuring = false;
        let width = width?;
        trace!("column {} fitted to {width}px", column.id);
        self.cache.insert(&column.id, rows.len(), width);
        Some(width)
    }

    /// Fit every column of `grid` and apply the widths. Returns the number of
    /// columns sized.
    pub fn measure_all(&mut self, grid: &mut DataGrid, measurer: &dyn TextMeasurer) -> usize {
        if !self.enabled {
            return 0;
        }
        let columns = grid.columns().to_vec();
        let widths: Vec<(String, u32)> = columns
            .iter()
            .filter_map(|column| {
                self.measure_column(column, grid.rows(), measurer)
                    .map(|w| (column.id.clone(), w))
            })
            .collect();
        for (id, width) in &widths {
            grid.set_column_size(id, f64::from(*width));
        }
        widths.len()
    }

    /// Data or column count changed. Returns true if the caller must start
    /// the debounce timer.
    pub fn schedule(&mut self, now_ms: f64) -> bool {
        self.enabled && self.debounce.trigger(now_ms)
    }

    /// Zoom or device-pixel-ratio changed: forget every width and schedule a
    /// pass.
    pub fn on_zoom(&mut self, now_ms: f64) -> bool {
        if !self.enabled {
            return false;
        }
        self.cache.clear();
        self.debounce.trigger(now_ms)
    }

    /// Timer fired. Runs the pass if the quiet period has elapsed.
    ///
    /// Returns `Some(count)` when a pass ran, `None` when it is still waiting
    /// (see [`remaining_ms`](Self::remaining_ms)).
    pub fn poll(
        &mut self,
        now_ms: f64,
        grid: &mut DataGrid,
        measurer: &dyn TextMeasurer,
    ) -> Option<usize> {
        if !self.debounce.due(now_ms) {
            return None;
        }
        Some(self.measure_all(grid, measurer))
    }

    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.debounce.remaining_ms(now_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }
}

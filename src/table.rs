//! Platform-neutral table controller.
//!
//! Owns the grid model, the row window, the interaction state, the focus ring
//! positioner and the column sizer, and routes every host event through them.
//! The browser front-end wraps one of these; tests drive it directly.

use std::fmt;

use log::{debug, trace};
use serde_json::Value;

use crate::editor::{CellInteraction, CommitOutcome};
use crate::error::Result;
use crate::grid::{DataGrid, GridModel};
use crate::layout::{RowWindow, WindowingEngine};
use crate::navigation::{handle_key, GridShape, KeyOutcome, KeySource, NavKey};
use crate::render::{
    plan_header, plan_rows, CellAnchors, HeaderCellPlan, MeasureNode, OverlayPositioner,
    RowPlan, ScrollContainer, WindowSignature,
};
use crate::sizing::{AutoColumnSizer, TextMeasurer};
use crate::types::{CellAddress, CellChange, ColumnDef, FocusRingGeometry, TableConfig};

/// Value-change notification: `(row_index, column_id, value)` of a commit
/// whose value differs from the cell's current value.
pub type ChangeCallback = Box<dyn FnMut(&CellChange)>;

/// Everything the render layer needs for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    pub header: Vec<HeaderCellPlan>,
    pub rows: Vec<RowPlan>,
    /// Height of the body (all rows), in px.
    pub total_height: f64,
}

pub struct TableController {
    config: TableConfig,
    grid: DataGrid,
    window: RowWindow,
    interaction: CellInteraction,
    positioner: OverlayPositioner,
    sizer: AutoColumnSizer,
    on_change: Option<ChangeCallback>,
    /// (selected, editable) at the last overlay sync.
    last_cells: (Option<CellAddress>, Option<CellAddress>),
    frame_requested: bool,
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("rows", &self.grid.row_count())
            .field("mode", &self.interaction.mode())
            .field("geometry", &self.positioner.current_geometry())
            .finish_non_exhaustive()
    }
}

impl TableController {
    pub fn new(config: TableConfig, columns: Vec<ColumnDef>, rows: Vec<Value>) -> Result<Self> {
        config.validate()?;
        let grid = DataGrid::new(columns, rows)
            .with_row_header(config.show_row_header, config.row_header_width);
        let window = RowWindow::new(grid.row_count(), config.estimate_row_height, config.height);
        let sizer = AutoColumnSizer::new(config.auto_fit_column_width, config.auto_fit_options);
        debug!(
            "table created: {} rows, {} columns",
            grid.row_count(),
            grid.columns().len()
        );
        Ok(Self {
            interaction: CellInteraction::new(config.readonly),
            config,
            grid,
            window,
            positioner: OverlayPositioner::new(),
            sizer,
            on_change: None,
            last_cells: (None, None),
            frame_requested: false,
        })
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&CellChange) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn grid(&self) -> &DataGrid {
        &self.grid
    }

    pub fn window(&self) -> &RowWindow {
        &self.window
    }

    pub fn interaction(&self) -> &CellInteraction {
        &self.interaction
    }

    pub fn selected(&self) -> Option<&CellAddress> {
        self.interaction.selected()
    }

    pub fn editable(&self) -> Option<&CellAddress> {
        self.interaction.editable()
    }

    pub fn current_geometry(&self) -> FocusRingGeometry {
        self.positioner.current_geometry()
    }

    pub fn sizer(&self) -> &AutoColumnSizer {
        &self.sizer
    }

    // ---- pointer ----

    /// Single click on a body cell.
    pub fn click(&mut self, row_index: usize, column_id: &str) {
        let addr = CellAddress::new(row_index, column_id);
        let is_row_header = addr.is_row_header();
        let outcome = self.interaction.click(addr, is_row_header);
        self.notify(&outcome);
        self.sync_overlay();
    }

    /// Double click on a body cell.
    pub fn double_click(&mut self, row_index: usize, column_id: &str) {
        let addr = CellAddress::new(row_index, column_id);
        let is_row_header = addr.is_row_header();
        let current = self
            .grid
            .cell_value(row_index, column_id)
            .unwrap_or_default();
        self.interaction.double_click(addr, is_row_header, &current);
        self.sync_overlay();
    }

    /// Click on a header cell: cycles the column's sort.
    pub fn header_click(&mut self, column_id: &str) -> bool {
        let toggled = self.grid.toggle_sort(column_id);
        if toggled {
            debug!("sort {column_id}: {:?}", self.grid.sort_state());
        }
        toggled
    }

    // ---- keyboard ----

    pub fn key(&mut self, key: NavKey, source: KeySource) -> KeyOutcome {
        let current = self
            .interaction
            .selected()
            .and_then(|a| self.grid.cell_value(a.row_index, &a.column_id))
            .unwrap_or_default();
        let column_ids = self.grid.ordered_column_ids();
        let shape = GridShape::new(self.grid.row_count(), &column_ids);
        let outcome = handle_key(
            &mut self.interaction,
            key,
            source,
            shape,
            &mut self.window,
            &current,
        );
        self.sync_overlay();
        outcome
    }

    /// `KeyboardEvent.key` entry point. Unknown keys are ignored.
    pub fn key_from_dom(&mut self, key: &str, shift: bool, source: KeySource) -> KeyOutcome {
        match NavKey::from_dom(key, shift) {
            Some(key) => self.key(key, source),
            None => KeyOutcome::Ignored,
        }
    }

    // ---- edit surface ----

    pub fn edit_input(&mut self, text: &str) {
        self.interaction.update_draft(text);
    }

    /// Commit the draft (edit surface Enter or blur).
    pub fn commit_edit(&mut self) -> CommitOutcome {
        let outcome = self.interaction.commit_draft();
        self.notify(&outcome);
        self.sync_overlay();
        outcome
    }

    /// Commit an explicit value for `addr`.
    pub fn commit(&mut self, addr: &CellAddress, value: &str) -> CommitOutcome {
        let outcome = self.interaction.commit(addr, value);
        self.notify(&outcome);
        self.sync_overlay();
        outcome
    }

    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.interaction.cancel_edit();
        self.sync_overlay();
        cancelled
    }

    fn notify(&mut self, outcome: &CommitOutcome) {
        if let (Some(change), Some(callback)) = (outcome.change(), self.on_change.as_mut()) {
            callback(change);
        }
    }

    // ---- viewport ----

    pub fn on_scroll(&mut self, scroll_top: f64) {
        self.window.set_scroll_offset(scroll_top);
        self.request_frame();
    }

    pub fn on_resize(&mut self) {
        self.request_frame();
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.window.set_viewport_height(height);
    }

    /// Height of the sticky column header inside the scroll container.
    pub fn set_header_height(&mut self, height: f64) {
        self.window.set_padding_start(height);
    }

    /// Report a rendered row's height. Returns whether the layout changed.
    pub fn measure_row(&mut self, index: usize, size: f64) -> bool {
        self.window.measure(index, size)
    }

    /// Keyboard navigation moved the window; the host must apply this offset
    /// to the scroll container.
    pub fn scroll_offset(&self) -> f64 {
        self.window.scroll_offset()
    }

    // ---- data ----

    /// Replace the rows. Selection and edit state are dropped.
    pub fn set_data(&mut self, rows: Vec<Value>, now_ms: f64) -> bool {
        self.grid.set_rows(rows);
        self.window.set_count(self.grid.row_count());
        self.interaction.reset();
        self.sync_overlay();
        self.sizer.schedule(now_ms)
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnDef>, now_ms: f64) -> bool {
        let count_changed = columns.len() != self.grid.columns().len();
        self.grid.set_columns(columns);
        // The selection survives; navigation falls back to the first column.
        let edit_orphaned = self.interaction.editable().is_some_and(|addr| {
            !self.grid.columns().iter().any(|c| c.id == addr.column_id)
        });
        if edit_orphaned {
            self.interaction.cancel_edit();
        }
        self.sync_overlay();
        count_changed && self.sizer.schedule(now_ms)
    }

    /// Manual resize. Ignored while auto-fit owns the widths.
    pub fn set_column_size(&mut self, column_id: &str, px: f64) -> bool {
        if self.sizer.enabled() {
            return false;
        }
        self.grid.set_column_size(column_id, px);
        true
    }

    // ---- sizing ----

    /// Synchronous pass for the initial layout.
    pub fn fit_columns(&mut self, measurer: &dyn TextMeasurer) -> usize {
        self.sizer.measure_all(&mut self.grid, measurer)
    }

    pub fn on_zoom(&mut self, now_ms: f64) -> bool {
        self.sizer.on_zoom(now_ms)
    }

    /// Debounce timer fired. `Some(count)` when the pass ran.
    pub fn poll_sizing(&mut self, now_ms: f64, measurer: &dyn TextMeasurer) -> Option<usize> {
        self.sizer.poll(now_ms, &mut self.grid, measurer)
    }

    pub fn sizing_remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.sizer.remaining_ms(now_ms)
    }

    pub fn cancel_sizing(&mut self) {
        self.sizer.cancel();
    }

    // ---- render + overlay ----

    /// Plan the next render pass and record the window signature.
    pub fn plan(&mut self) -> TablePlan {
        let items = self.window.visible_window();
        if self.positioner.observe_window(WindowSignature::from_items(&items)) {
            self.frame_requested = true;
        }
        TablePlan {
            header: if self.config.show_column_header {
                plan_header(&self.interaction, &self.grid)
            } else {
                Vec::new()
            },
            rows: plan_rows(&self.interaction, &self.grid, &items),
            total_height: self.window.total_extent(),
        }
    }

    /// Whether a deferred overlay flush must be scheduled. Clears the flag.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Deferred recomputation of the focus ring.
    pub fn flush_overlay<N, C>(&mut self, anchors: &CellAnchors<N>, container: &C) -> FocusRingGeometry
    where
        N: MeasureNode,
        C: ScrollContainer + ?Sized,
    {
        self.positioner.flush(anchors, container)
    }

    /// Drop pending deferred work (teardown).
    pub fn cancel_pending(&mut self) {
        self.positioner.cancel();
        self.sizer.cancel();
        self.frame_requested = false;
    }

    fn request_frame(&mut self) {
        if self.positioner.request() {
            self.frame_requested = true;
        }
    }

    fn sync_overlay(&mut self) {
        let cells = (
            self.interaction.selected().cloned(),
            self.interaction.editable().cloned(),
        );
        if cells == self.last_cells {
            return;
        }
        trace!("overlay target {:?}", self.interaction.active_cell());
        self.last_cells = cells;
        if self
            .positioner
            .set_target(self.interaction.active_cell().cloned())
        {
            self.frame_requested = true;
        } else {
            // Same target, edit state changed: the cell content was replaced.
            self.request_frame();
        }
        if self.interaction.active_cell().is_none() {
            self.frame_requested = false;
        }
    }
}

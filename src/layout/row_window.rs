//! Estimate-then-measure row virtualizer.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::{ScrollAlign, WindowingEngine};
use crate::types::VirtualItem;

/// Extra rows rendered above and below the visible region.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Sizes below this difference are treated as unchanged.
const SIZE_EPSILON: f64 = 0.5;

/// Row virtualizer over a vertical scroll container.
///
/// Rows start with the estimated height and are corrected once measured.
/// Offsets are relative to the top of the body; `padding_start` is the space
/// above the body inside the scroll container (the sticky column header),
/// which the visible region must exclude.
#[derive(Debug, Clone)]
pub struct RowWindow {
    count: usize,
    estimate: f64,
    overscan: usize,
    measured: HashMap<usize, f64>,
    /// `offsets[i]` = top of row i; `offsets[count]` = total extent.
    offsets: Vec<f64>,
    scroll_offset: f64,
    viewport_height: f64,
    padding_start: f64,
}

impl RowWindow {
    pub fn new(count: usize, estimate: f64, viewport_height: f64) -> Self {
        let mut window = Self {
            count,
            estimate,
            overscan: DEFAULT_OVERSCAN,
            measured: HashMap::new(),
            offsets: Vec::new(),
            scroll_offset: 0.0,
            viewport_height,
            padding_start: 0.0,
        };
        window.rebuild_offsets(0);
        window
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn padding_start(&self) -> f64 {
        self.padding_start
    }

    /// Change the row count. Measurements of rows that still exist are kept.
    pub fn set_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        self.count = count;
        self.measured.retain(|&index, _| index < count);
        self.rebuild_offsets(0);
        self.clamp_scroll();
    }

    /// Record the container's scroll position (from a scroll event).
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset.max(0.0);
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
    }

    pub fn set_padding_start(&mut self, padding: f64) {
        self.padding_start = padding.max(0.0);
    }

    /// Top offset and size of a row.
    pub fn item(&self, index: usize) -> Option<VirtualItem> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(VirtualItem {
            index,
            start,
            size: end - start,
        })
    }

    fn size_of(&self, index: usize) -> f64 {
        self.measured.get(&index).copied().unwrap_or(self.estimate)
    }

    fn rebuild_offsets(&mut self, from: usize) {
        let from = from.min(self.count);
        self.offsets.truncate(from + 1);
        if self.offsets.is_empty() {
            self.offsets.push(0.0);
        }
        let mut y = self.offsets.last().copied().unwrap_or(0.0);
        for index in from..self.count {
            y += self.size_of(index);
            self.offsets.push(y);
        }
    }

    fn max_scroll(&self) -> f64 {
        (self.total_extent() + self.padding_start - self.viewport_height).max(0.0)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
    }

    /// First row whose bottom edge is below `y`.
    fn row_at(&self, y: f64) -> usize {
        // offsets[1..] are row bottoms
        let bottoms = self.offsets.get(1..).unwrap_or(&[]);
        bottoms.partition_point(|&bottom| bottom <= y)
    }
}

impl WindowingEngine for RowWindow {
    fn visible_window(&self) -> Vec<VirtualItem> {
        if self.count == 0 {
            return Vec::new();
        }
        let body_height = (self.viewport_height - self.padding_start).max(0.0);
        let first = self.row_at(self.scroll_offset).min(self.count - 1);
        let last = self
            .row_at(self.scroll_offset + body_height)
            .min(self.count - 1);
        let start = first.saturating_sub(self.overscan);
        let end = (last + self.overscan).min(self.count - 1);
        (start..=end).filter_map(|index| self.item(index)).collect()
    }

    fn total_extent(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) -> Option<f64> {
        let item = self.item(index)?;
        let body_height = (self.viewport_height - self.padding_start).max(0.0);
        let target = match align {
            ScrollAlign::Start => item.start,
            ScrollAlign::End => item.end() - body_height,
            ScrollAlign::Center => item.start + item.size / 2.0 - body_height / 2.0,
            ScrollAlign::Auto => {
                if item.start < self.scroll_offset {
                    item.start
                } else if item.end() > self.scroll_offset + body_height {
                    item.end() - body_height
                } else {
                    return None;
                }
            }
        };
        let target = target.clamp(0.0, self.max_scroll());
        match target.partial_cmp(&self.scroll_offset) {
            Some(Ordering::Equal) | None => None,
            Some(_) => {
                self.scroll_offset = target;
                Some(target)
            }
        }
    }

    fn measure(&mut self, index: usize, size: f64) -> bool {
        if index >= self.count || !size.is_finite() || size < 0.0 {
            return false;
        }
        if (self.size_of(index) - size).abs() < SIZE_EPSILON {
            return false;
        }
        self.measured.insert(index, size);
        self.rebuild_offsets(index);
        true
    }
}

//! Focus ring positioning.
//!
//! The ring floats above the table body and tracks the active cell. Rows are
//! recreated as the window scrolls, so only the logical address is durable;
//! the node backing it is looked up in [`CellAnchors`] at each recomputation.
//! These helpers keep the geometry math testable without a DOM.

use std::fmt::Write as _;

use log::trace;

use crate::types::{CellAddress, FocusRingGeometry, Rect, VirtualItem};

/// Width of the cell border the ring wraps.
const BORDER_OFFSET: f64 = 1.0;

/// A rendered node whose box can be measured.
pub trait MeasureNode {
    /// Box in viewport coordinates, or `None` when the node is detached.
    fn bounding_rect(&self) -> Option<Rect>;
}

/// The scroll container the ring is positioned in.
pub trait ScrollContainer {
    fn bounding_rect(&self) -> Option<Rect>;
    fn scroll_top(&self) -> f64;
    fn scroll_left(&self) -> f64;
}

/// Ring geometry for a cell box inside a scrolled container.
pub fn compute_geometry(
    cell: Rect,
    container: Rect,
    scroll_top: f64,
    scroll_left: f64,
) -> FocusRingGeometry {
    FocusRingGeometry {
        top: cell.top - container.top + scroll_top - BORDER_OFFSET,
        left: cell.left - container.left + scroll_left - BORDER_OFFSET,
        width: cell.width,
        height: cell.height,
        visible: true,
    }
}

/// Node of the active address as attached by the last render pass.
#[derive(Debug)]
pub struct CellAnchors<N> {
    entry: Option<(CellAddress, N)>,
}

impl<N> Default for CellAnchors<N> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<N> CellAnchors<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` as the current backing node of `address`.
    pub fn attach(&mut self, address: CellAddress, node: N) {
        self.entry = Some((address, node));
    }

    pub fn resolve(&self, address: &CellAddress) -> Option<&N> {
        match &self.entry {
            Some((attached, node)) if attached == address => Some(node),
            _ => None,
        }
    }

    /// Drop the attachment. Called before every render pass.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// Fingerprint of the rendered window: changes whenever the set of rendered
/// rows or their offsets changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowSignature(String);

impl WindowSignature {
    pub fn from_items(items: &[VirtualItem]) -> Self {
        let mut sig = String::with_capacity(items.len() * 8);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                sig.push(',');
            }
            let _ = write!(sig, "{}-{}", item.index, item.start);
        }
        Self(sig)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tracks the active address and coalesces recomputation requests.
///
/// Callers ask with [`request`](Self::request); when it returns true they
/// schedule one deferred [`flush`](Self::flush) (next animation frame).
/// Further requests before the flush are absorbed by the in-flight guard.
#[derive(Debug, Default)]
pub struct OverlayPositioner {
    target: Option<CellAddress>,
    geometry: FocusRingGeometry,
    in_flight: bool,
    signature: Option<WindowSignature>,
}

impl OverlayPositioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_geometry(&self) -> FocusRingGeometry {
        self.geometry
    }

    pub fn target(&self) -> Option<&CellAddress> {
        self.target.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Ask for a recomputation. Returns true when the caller must schedule
    /// the flush.
    pub fn request(&mut self) -> bool {
        if self.target.is_none() || self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Follow a new active address.
    ///
    /// Losing the address hides the ring at once and drops the pending flush.
    /// Returns true when the caller must schedule a flush.
    pub fn set_target(&mut self, target: Option<CellAddress>) -> bool {
        if self.target == target {
            return false;
        }
        self.target = target;
        if self.target.is_none() {
            self.in_flight = false;
            self.geometry = self.geometry.hidden();
            return false;
        }
        self.request()
    }

    /// Record the rendered window. A changed signature requests a flush.
    pub fn observe_window(&mut self, signature: WindowSignature) -> bool {
        if self.signature.as_ref() == Some(&signature) {
            return false;
        }
        self.signature = Some(signature);
        self.request()
    }

    /// Drop a pending flush. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(&mut self.in_flight)
    }

    /// Deferred recomputation: resolve the active node and measure it.
    ///
    /// An unresolved node hides the ring and leaves the position stale.
    pub fn flush<N, C>(&mut self, anchors: &CellAnchors<N>, container: &C) -> FocusRingGeometry
    where
        N: MeasureNode,
        C: ScrollContainer + ?Sized,
    {
        self.in_flight = false;
        let measured = self.target.as_ref().and_then(|target| {
            let cell = anchors.resolve(target)?.bounding_rect()?;
            let outer = container.bounding_rect()?;
            Some(compute_geometry(
                cell,
                outer,
                container.scroll_top(),
                container.scroll_left(),
            ))
        });
        self.geometry = match measured {
            Some(geometry) => geometry,
            None => self.geometry.hidden(),
        };
        trace!("focus ring {:?}", self.geometry);
        self.geometry
    }
}

//! Render passes and deferred work for `VirtualTable`.
//!
//! Includes the focus ring frame (one per animation frame, coalesced by the
//! positioner's in-flight guard) and the column sizing debounce timer.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use super::{now_ms, SharedState, VirtualTable};
use crate::render::MeasureNode;
use crate::sizing::SIZING_DEBOUNCE_MS;

/// Row or header heights closer than this are treated as unchanged.
const LAYOUT_EPSILON: f64 = 0.5;

impl VirtualTable {
    /// Render the visible window, then feed measured row and header heights
    /// back to the row window. A second pass runs if the layout moved.
    pub(crate) fn render_state(state: &Rc<RefCell<SharedState>>) {
        let needs_frame = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.rendering = true;
            for _pass in 0..2 {
                let plan = s.table.plan();
                let rows = match s.dom.render(&plan, &mut s.anchors) {
                    Ok(rows) => rows,
                    Err(e) => {
                        warn!("render failed: {e}");
                        break;
                    }
                };
                let mut moved = false;
                let header = s.dom.header_height();
                if (header - s.table.window().padding_start()).abs() > LAYOUT_EPSILON {
                    s.table.set_header_height(header);
                    moved = true;
                }
                for (index, tr) in &rows {
                    if let Some(rect) = tr.bounding_rect() {
                        moved |= s.table.measure_row(*index, rect.height);
                    }
                }
                if !moved {
                    break;
                }
            }
            s.rendering = false;
            s.table.take_frame_request()
        };
        if needs_frame {
            Self::schedule_frame(state);
        }
    }

    /// Run the focus ring recomputation on the next animation frame.
    pub(crate) fn schedule_frame(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.frame_handle.is_some() {
            return;
        }
        if s.frame_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    VirtualTable::handle_frame(&state);
                }
            }) as Box<dyn FnMut()>);
            s.frame_closure = Some(closure);
        }
        let Some(callback) = s.frame_closure.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => s.frame_handle = Some(id),
            Err(_) => s.frame_handle = None,
        }
    }

    pub(crate) fn handle_frame(state: &Rc<RefCell<SharedState>>) {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.frame_handle = None;
        let geometry = s.table.flush_overlay(&s.anchors, &s.dom.container);
        s.dom.apply_ring(geometry);
    }

    /// (Re)start the sizing debounce timer for the time left in the quiet
    /// period.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn schedule_sizing(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Some(timer_id) = s.sizing_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        let delay = s
            .table
            .sizing_remaining_ms(now_ms())
            .unwrap_or(SIZING_DEBOUNCE_MS)
            .ceil()
            .clamp(0.0, f64::from(i32::MAX));
        if s.sizing_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    VirtualTable::handle_sizing_timer(&state);
                }
            }) as Box<dyn FnMut()>);
            s.sizing_closure = Some(closure);
        }
        let Some(callback) = s.sizing_closure.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay as i32,
        ) {
            Ok(id) => s.sizing_timer = Some(id),
            Err(_) => s.sizing_timer = None,
        }
    }

    pub(crate) fn handle_sizing_timer(state: &Rc<RefCell<SharedState>>) {
        let (ran, still_pending) = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.sizing_timer = None;
            let Some(measurer) = s.measurer.as_ref() else {
                // No text metrics: columns keep their configured widths.
                s.table.cancel_sizing();
                return;
            };
            let ran = s.table.poll_sizing(now_ms(), measurer);
            (ran, s.table.sizing_remaining_ms(now_ms()).is_some())
        };
        if ran.is_some() {
            Self::render_state(state);
        } else if still_pending {
            // Triggered again during the quiet period.
            Self::schedule_sizing(state);
        }
    }

    /// Cancel the pending animation frame and sizing timer.
    pub(crate) fn cancel_scheduled(state: &Rc<RefCell<SharedState>>) {
        let mut s = state.borrow_mut();
        if let Some(window) = web_sys::window() {
            if let Some(id) = s.frame_handle.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(id) = s.sizing_timer.take() {
                window.clear_timeout_with_handle(id);
            }
        }
        s.table.cancel_pending();
    }
}

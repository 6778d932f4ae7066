//! Pointer, keyboard and edit surface handlers for `VirtualTable`.
//!
//! All listeners are delegated from the scroll container; the cell an event
//! belongs to is recovered from `data-index` / `data-col` attributes.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent};

use super::dom::{cell_address_of, set_scroll_top};
use super::{now_ms, SharedState, VirtualTable};
use crate::editor::input::edit_surface_of;
use crate::navigation::{KeyOutcome, KeySource};
use crate::render::ScrollContainer;

/// Scroll differences below this are not applied to the container.
const SCROLL_EPSILON: f64 = 0.5;

impl VirtualTable {
    pub(crate) fn on_click(state: &Rc<RefCell<SharedState>>, event: &Event) {
        // Clicks inside the edit surface belong to the textarea.
        if edit_surface_of(event.target()).is_some() {
            return;
        }
        if let Some((Some(row), column_id)) = cell_address_of(event.target(), "td") {
            {
                let mut s = state.borrow_mut();
                s.table.click(row, &column_id);
                let _ = s.dom.container.focus();
            }
            Self::render_state(state);
            Self::flush_changes(state);
            return;
        }
        if let Some((_, column_id)) = cell_address_of(event.target(), "th") {
            let toggled = state.borrow_mut().table.header_click(&column_id);
            if toggled {
                Self::render_state(state);
            }
        }
    }

    pub(crate) fn on_double_click(state: &Rc<RefCell<SharedState>>, event: &Event) {
        if edit_surface_of(event.target()).is_some() {
            return;
        }
        let Some((Some(row), column_id)) = cell_address_of(event.target(), "td") else {
            return;
        };
        state.borrow_mut().table.double_click(row, &column_id);
        Self::render_state(state);
    }

    pub(crate) fn on_key_down(state: &Rc<RefCell<SharedState>>, event: &Event) {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = event.key();
        let shift = event.shift_key();
        let from_surface = edit_surface_of(event.target()).is_some();

        // Enter commits the edit surface; Shift+Enter inserts a newline.
        if from_surface && key == "Enter" && !shift {
            event.prevent_default();
            {
                let mut s = state.borrow_mut();
                s.table.commit_edit();
                let _ = s.dom.container.focus();
            }
            Self::render_state(state);
            Self::flush_changes(state);
            return;
        }

        let source = if from_surface {
            KeySource::EditSurface
        } else {
            KeySource::Container
        };
        let outcome = {
            let mut s = state.borrow_mut();
            let outcome = s.table.key_from_dom(&key, shift, source);
            if matches!(outcome, KeyOutcome::Moved(_)) {
                let target = s.table.scroll_offset();
                let current = ScrollContainer::scroll_top(&s.dom.container);
                if (target - current).abs() > SCROLL_EPSILON {
                    set_scroll_top(&s.dom.container, target);
                }
            }
            // Tab out of the surface: the draft is already discarded, so the
            // blur below must not find anything to commit.
            let left_surface = from_surface && matches!(outcome, KeyOutcome::Moved(_));
            if outcome == KeyOutcome::EditCancelled || left_surface {
                let _ = s.dom.container.focus();
            }
            outcome
        };
        if outcome.prevents_default() {
            event.prevent_default();
        }
        if outcome != KeyOutcome::Ignored && outcome != KeyOutcome::DelegatedToEditor {
            Self::render_state(state);
        }
    }

    pub(crate) fn on_input(state: &Rc<RefCell<SharedState>>, event: &Event) {
        let Some(textarea) = edit_surface_of(event.target()) else {
            return;
        };
        if let Ok(mut s) = state.try_borrow_mut() {
            s.table.edit_input(&textarea.value());
        }
    }

    /// Focus leaving the edit surface commits the draft.
    pub(crate) fn on_focus_out(state: &Rc<RefCell<SharedState>>, event: &Event) {
        if edit_surface_of(event.target()).is_none() {
            return;
        }
        {
            // Busy means a render pass is detaching the textarea.
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            if s.rendering || !s.table.interaction().is_editing() {
                return;
            }
            s.table.commit_edit();
        }
        Self::render_state(state);
        Self::flush_changes(state);
    }

    pub(crate) fn on_scroll(state: &Rc<RefCell<SharedState>>, _event: &Event) {
        {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let top = ScrollContainer::scroll_top(&s.dom.container);
            s.table.on_scroll(top);
        }
        Self::render_state(state);
    }

    pub(crate) fn on_window_resize(state: &Rc<RefCell<SharedState>>, _event: &Event) {
        {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let height = f64::from(s.dom.container.client_height());
            if height > 0.0 {
                s.table.set_viewport_height(height);
            }
            s.table.on_resize();
        }
        Self::render_state(state);
    }

    pub(crate) fn on_zoom(state: &Rc<RefCell<SharedState>>, _event: &Event) {
        let schedule = state.borrow_mut().table.on_zoom(now_ms());
        if schedule {
            Self::schedule_sizing(state);
        }
    }
}

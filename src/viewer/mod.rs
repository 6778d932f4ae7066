//! `VirtualTable` - the wasm-exported browser front-end.
//!
//! This module provides the `VirtualTable` struct that:
//! - Builds the table DOM inside a host element
//! - Routes pointer, keyboard, input and scroll events to a [`TableController`]
//! - Schedules focus ring updates on the next animation frame and column
//!   sizing after a quiet period
//!
//! Every listener is registered at construction and removed again on drop.

mod dom;
mod events;
mod scroll;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlElement};

use crate::error::{Result, VtableError};
use crate::render::CellAnchors;
use crate::sizing::CanvasTextMeasurer;
use crate::table::TableController;
use crate::types::{Accessor, CellChange, ColumnDef, HeaderSource, TableConfig};

use dom::TableDom;

/// State reachable from event handlers and timer callbacks.
pub(crate) struct SharedState {
    pub(crate) table: TableController,
    pub(crate) dom: TableDom,
    pub(crate) anchors: CellAnchors<HtmlElement>,
    pub(crate) measurer: Option<CanvasTextMeasurer>,
    /// Commits waiting to be reported to the host once the borrow is released.
    pub(crate) pending_changes: Rc<RefCell<Vec<CellChange>>>,
    pub(crate) change_callback: Option<Function>,
    pub(crate) frame_handle: Option<i32>,
    pub(crate) frame_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) sizing_timer: Option<i32>,
    pub(crate) sizing_closure: Option<Closure<dyn FnMut()>>,
    /// True while a render pass replaces the body (focus loss is not a commit).
    pub(crate) rendering: bool,
}

/// A registered DOM listener, kept so it can be removed.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

// Timing helper.
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// The virtualized table exported to JavaScript.
#[wasm_bindgen]
pub struct VirtualTable {
    state: Rc<RefCell<SharedState>>,
    listeners: Vec<Listener>,
    destroyed: bool,
}

#[wasm_bindgen]
impl VirtualTable {
    /// Build a table inside `parent`.
    ///
    /// `columns` is an array of `{id, accessorKey, accessorFn, header, size,
    /// enableSorting}`; `data` an array of row objects; `options` the table
    /// configuration plus an optional `onChange(rowIndex, columnId, value)`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        parent: HtmlElement,
        columns: JsValue,
        data: JsValue,
        options: JsValue,
    ) -> std::result::Result<VirtualTable, JsValue> {
        console_error_panic_hook::set_once();

        let config: TableConfig = if options.is_undefined() || options.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options.clone()).map_err(VtableError::from)?
        };
        let change_callback = Reflect::get(&options, &JsValue::from_str("onChange"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());

        let columns = columns_from_js(&columns)?;
        let rows = rows_from_js(data)?;
        let mut table = TableController::new(config, columns, rows)?;

        let pending_changes: Rc<RefCell<Vec<CellChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pending_changes);
        table.set_on_change(move |change| sink.borrow_mut().push(change.clone()));

        let dom = TableDom::build(&parent, table.config())?;
        let measurer = CanvasTextMeasurer::new();
        if let Some(measurer) = &measurer {
            // Synchronous first pass: the initial layout never flickers.
            table.fit_columns(measurer);
        }

        let state = Rc::new(RefCell::new(SharedState {
            table,
            dom,
            anchors: CellAnchors::new(),
            measurer,
            pending_changes,
            change_callback,
            frame_handle: None,
            frame_closure: None,
            sizing_timer: None,
            sizing_closure: None,
            rendering: false,
        }));

        let listeners = Self::register_listeners(&state);
        Self::render_state(&state);
        log::debug!("virtual table mounted");

        Ok(VirtualTable {
            state,
            listeners,
            destroyed: false,
        })
    }

    /// Replace the row data. Selection is cleared.
    #[wasm_bindgen(js_name = "setData")]
    pub fn set_data(&self, data: JsValue) -> std::result::Result<(), JsValue> {
        let rows = rows_from_js(data)?;
        let schedule = self.state.borrow_mut().table.set_data(rows, now_ms());
        if schedule {
            Self::schedule_sizing(&self.state);
        }
        Self::render_state(&self.state);
        Ok(())
    }

    /// Replace the column definitions.
    #[wasm_bindgen(js_name = "setColumns")]
    pub fn set_columns(&self, columns: JsValue) -> std::result::Result<(), JsValue> {
        let columns = columns_from_js(&columns)?;
        let schedule = self.state.borrow_mut().table.set_columns(columns, now_ms());
        if schedule {
            Self::schedule_sizing(&self.state);
        }
        Self::render_state(&self.state);
        Ok(())
    }

    /// Resize a column. Returns false while auto-fit owns the widths.
    #[wasm_bindgen(js_name = "setColumnSize")]
    pub fn set_column_size(&self, column_id: &str, px: f64) -> bool {
        let applied = self.state.borrow_mut().table.set_column_size(column_id, px);
        if applied {
            Self::render_state(&self.state);
        }
        applied
    }

    /// `{rowIndex, columnId}` of the selected cell, or `null`.
    #[wasm_bindgen(js_name = "selectedCell")]
    pub fn selected_cell(&self) -> JsValue {
        let s = self.state.borrow();
        s.table
            .selected()
            .and_then(|a| serde_wasm_bindgen::to_value(a).ok())
            .unwrap_or(JsValue::NULL)
    }

    /// `{rowIndex, columnId}` of the cell being edited, or `null`.
    #[wasm_bindgen(js_name = "editableCell")]
    pub fn editable_cell(&self) -> JsValue {
        let s = self.state.borrow();
        s.table
            .editable()
            .and_then(|a| serde_wasm_bindgen::to_value(a).ok())
            .unwrap_or(JsValue::NULL)
    }

    /// Last computed focus ring geometry.
    #[wasm_bindgen(js_name = "focusRing")]
    pub fn focus_ring(&self) -> JsValue {
        let geometry = self.state.borrow().table.current_geometry();
        serde_wasm_bindgen::to_value(&geometry).unwrap_or(JsValue::NULL)
    }

    /// Re-render the visible rows.
    #[wasm_bindgen]
    pub fn render(&self) {
        Self::render_state(&self.state);
    }

    /// Remove listeners, cancel pending work and detach the DOM. Idempotent;
    /// also runs on drop (`free()` from JavaScript).
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        if std::mem::replace(&mut self.destroyed, true) {
            return;
        }
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        Self::cancel_scheduled(&self.state);
        let s = self.state.borrow();
        s.dom.remove();
        log::debug!("virtual table unmounted");
    }
}

impl VirtualTable {
    fn register_listeners(state: &Rc<RefCell<SharedState>>) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let container: EventTarget = state.borrow().dom.container.clone().into();

        let mut add = |target: &EventTarget,
                       event: &'static str,
                       handler: Box<dyn Fn(&Rc<RefCell<SharedState>>, &Event)>| {
            let weak = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move |e: Event| {
                if let Some(state) = weak.upgrade() {
                    handler(&state, &e);
                }
            }) as Box<dyn FnMut(Event)>);
            if target
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                .is_ok()
            {
                listeners.push(Listener {
                    target: target.clone(),
                    event,
                    closure,
                });
            }
        };

        add(&container, "click", Box::new(Self::on_click));
        add(&container, "dblclick", Box::new(Self::on_double_click));
        add(&container, "keydown", Box::new(Self::on_key_down));
        add(&container, "input", Box::new(Self::on_input));
        add(&container, "focusout", Box::new(Self::on_focus_out));
        add(&container, "scroll", Box::new(Self::on_scroll));

        if let Some(window) = web_sys::window() {
            let window_target: EventTarget = window.clone().into();
            add(&window_target, "resize", Box::new(Self::on_window_resize));
            // Zoom changes resize the visual viewport.
            match window.visual_viewport() {
                Some(viewport) => {
                    let target: EventTarget = viewport.into();
                    add(&target, "resize", Box::new(Self::on_zoom));
                }
                None => add(&window_target, "resize", Box::new(Self::on_zoom)),
            }
        }
        listeners
    }

    /// Report queued commits to the host. Must run with the state unborrowed:
    /// the callback may call back into the table.
    pub(crate) fn flush_changes(state: &Rc<RefCell<SharedState>>) {
        let (changes, callback) = {
            let s = state.borrow();
            let changes: Vec<CellChange> = s.pending_changes.borrow_mut().drain(..).collect();
            (changes, s.change_callback.clone())
        };
        let Some(callback) = callback else {
            return;
        };
        for change in changes {
            let row_index = u32::try_from(change.row_index).unwrap_or(u32::MAX);
            let _ = callback.call3(
                &JsValue::NULL,
                &JsValue::from(row_index),
                &JsValue::from_str(&change.column_id),
                &JsValue::from_str(&change.value),
            );
        }
    }
}

impl Drop for VirtualTable {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn get_prop(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// Read column definitions. Function-valued `header` and `accessorFn` are
/// called on demand.
fn columns_from_js(columns: &JsValue) -> Result<Vec<ColumnDef>> {
    let array: js_sys::Array = columns
        .clone()
        .dyn_into()
        .map_err(|_| VtableError::Config("columns must be an array".into()))?;
    array
        .iter()
        .map(|col| {
            let accessor_key = get_prop(&col, "accessorKey").as_string();
            let id = get_prop(&col, "id")
                .as_string()
                .or_else(|| accessor_key.clone())
                .ok_or_else(|| VtableError::Config("column needs an id or accessorKey".into()))?;

            let header = match get_prop(&col, "header") {
                h if h.is_function() => {
                    let f: Function = h.unchecked_into();
                    HeaderSource::Render(Rc::new(move || {
                        f.call0(&JsValue::NULL)
                            .ok()
                            .and_then(|v| v.as_string())
                            .unwrap_or_default()
                    }))
                }
                h => HeaderSource::Text(h.as_string().unwrap_or_default()),
            };

            let accessor_fn = get_prop(&col, "accessorFn");
            let accessor = if accessor_fn.is_function() {
                let f: Function = accessor_fn.unchecked_into();
                Accessor::Derive(Rc::new(move |row: &Value| {
                    let js_row = row
                        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                        .unwrap_or(JsValue::NULL);
                    f.call1(&JsValue::NULL, &js_row)
                        .ok()
                        .map(|v| v.as_string().unwrap_or_else(|| js_text(&v)))
                        .unwrap_or_default()
                }))
            } else if let Some(key) = accessor_key {
                Accessor::Field(key)
            } else {
                Accessor::None
            };

            Ok(ColumnDef {
                id,
                header,
                accessor,
                size: get_prop(&col, "size").as_f64(),
                sortable: get_prop(&col, "enableSorting").as_bool().unwrap_or(true),
            })
        })
        .collect()
}

/// Text of a non-string JS value (numbers, booleans); empty for null/undefined.
fn js_text(value: &JsValue) -> String {
    if value.is_null() || value.is_undefined() {
        return String::new();
    }
    if let Some(n) = value.as_f64() {
        return n.to_string();
    }
    if let Some(b) = value.as_bool() {
        return b.to_string();
    }
    String::new()
}

fn rows_from_js(data: JsValue) -> Result<Vec<Value>> {
    if data.is_undefined() || data.is_null() {
        return Ok(Vec::new());
    }
    let value: Value = serde_wasm_bindgen::from_value(data)?;
    match value {
        Value::Array(rows) => Ok(rows),
        other => Err(VtableError::Data(format!(
            "expected an array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

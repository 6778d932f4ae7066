//! Browser tests for the `VirtualTable` front-end.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

use vtable::VirtualTable;

wasm_bindgen_test_configure!(run_in_browser);

fn host() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn object(pairs: &[(&str, JsValue)]) -> JsValue {
    let obj = Object::new();
    for (key, value) in pairs {
        Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
    }
    obj.into()
}

fn columns() -> JsValue {
    let cols = Array::new();
    for id in ["name", "age"] {
        cols.push(&object(&[
            ("id", JsValue::from_str(id)),
            ("accessorKey", JsValue::from_str(id)),
            ("header", JsValue::from_str(id)),
        ]));
    }
    cols.into()
}

fn rows(count: u32) -> JsValue {
    let rows = Array::new();
    for i in 0..count {
        rows.push(&object(&[
            ("name", JsValue::from_str(&format!("Person {i}"))),
            ("age", JsValue::from_f64(f64::from(30 + i))),
        ]));
    }
    rows.into()
}

fn cell(parent: &HtmlElement, row: u32, column: &str) -> HtmlElement {
    parent
        .query_selector(&format!("tr[data-index=\"{row}\"] td[data-col=\"{column}\"]"))
        .unwrap()
        .expect("cell rendered")
        .dyn_into::<HtmlElement>()
        .unwrap()
}

#[wasm_bindgen_test]
fn mounts_only_a_window_of_rows() {
    let parent = host();
    let mut table = VirtualTable::new(
        parent.clone(),
        columns(),
        rows(10_000),
        object(&[("height", JsValue::from_f64(400.0))]),
    )
    .unwrap();
    let rendered = parent.query_selector_all("tr[data-index]").unwrap().length();
    assert!(rendered > 0);
    assert!(rendered < 100);
    table.destroy();
}

#[wasm_bindgen_test]
fn click_selects_cell() {
    let parent = host();
    let mut table = VirtualTable::new(parent.clone(), columns(), rows(20), JsValue::UNDEFINED).unwrap();
    assert!(table.selected_cell().is_null());

    cell(&parent, 2, "age").click();
    let selected = table.selected_cell();
    assert_eq!(
        Reflect::get(&selected, &JsValue::from_str("rowIndex")).unwrap().as_f64(),
        Some(2.0)
    );
    assert_eq!(
        Reflect::get(&selected, &JsValue::from_str("columnId")).unwrap().as_string(),
        Some("age".to_string())
    );
    assert!(table.editable_cell().is_null());
    table.destroy();
}

#[wasm_bindgen_test]
fn rejects_non_array_data() {
    let parent = host();
    let result = VirtualTable::new(parent, columns(), JsValue::from_str("rows"), JsValue::UNDEFINED);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn destroy_detaches_and_is_idempotent() {
    let parent = host();
    let mut table = VirtualTable::new(parent.clone(), columns(), rows(5), JsValue::UNDEFINED).unwrap();
    assert_eq!(parent.child_element_count(), 1);
    table.destroy();
    table.destroy();
    assert_eq!(parent.child_element_count(), 0);
}

//! Multi-line edit surface for the editable cell.
//!
//! A `<textarea>` rendered inside the editable `<td>`, as tall as its row.
//! Input, key and focus events bubble to the container, where the table
//! routes them; this only builds and recognises the element.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlTextAreaElement};

use crate::error::{Result, VtableError};
use crate::render::class;

/// Create the textarea holding `value`, sized to `height` px.
pub(crate) fn create_edit_surface(
    document: &Document,
    value: &str,
    height: f64,
) -> Result<HtmlTextAreaElement> {
    let textarea: HtmlTextAreaElement = document
        .create_element("textarea")
        .map_err(|_| VtableError::Dom("failed to create textarea".into()))?
        .dyn_into()
        .map_err(|_| VtableError::Dom("textarea element has unexpected type".into()))?;
    textarea.set_class_name(class::CELL_EDITABLE);
    textarea.set_value(value);
    let _ = textarea
        .style()
        .set_property("height", &format!("{height}px"));
    Ok(textarea)
}

/// The edit surface an event originated from, if any.
pub(crate) fn edit_surface_of(target: Option<EventTarget>) -> Option<HtmlTextAreaElement> {
    let element: Element = target?.dyn_into().ok()?;
    if !element.class_list().contains(class::CELL_EDITABLE) {
        return None;
    }
    element.dyn_into().ok()
}

/// Focus the surface and put the caret at the end of its text.
pub(crate) fn focus_at_end(textarea: &HtmlTextAreaElement) {
    let _ = textarea.focus();
    let len = u32::try_from(textarea.value().encode_utf16().count()).unwrap_or(u32::MAX);
    let _ = textarea.set_selection_range(len, len);
}

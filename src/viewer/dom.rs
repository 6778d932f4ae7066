//! DOM construction and render passes for `VirtualTable`.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlDivElement, HtmlElement, HtmlTextAreaElement};

use crate::editor::input::{create_edit_surface, focus_at_end};
use crate::error::{Result, VtableError};
use crate::render::{class, CellAnchors, CellContent, MeasureNode, ScrollContainer};
use crate::table::TablePlan;
use crate::theme;
use crate::types::{CellAddress, FocusRingGeometry, Rect, TableConfig};

/// Attribute carrying the row index on `<tr>`.
pub(crate) const ROW_INDEX_ATTR: &str = "data-index";
/// Attribute carrying the column id on `<td>` / `<th>`.
pub(crate) const COLUMN_ID_ATTR: &str = "data-col";

impl MeasureNode for HtmlElement {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.is_connected() {
            return None;
        }
        let r = self.get_bounding_client_rect();
        Some(Rect::new(r.top(), r.left(), r.width(), r.height()))
    }
}

impl ScrollContainer for HtmlDivElement {
    fn bounding_rect(&self) -> Option<Rect> {
        let r = self.get_bounding_client_rect();
        Some(Rect::new(r.top(), r.left(), r.width(), r.height()))
    }

    fn scroll_top(&self) -> f64 {
        scroll_f64(self, "scrollTop", Element::scroll_top(self))
    }

    fn scroll_left(&self) -> f64 {
        scroll_f64(self, "scrollLeft", Element::scroll_left(self))
    }
}

/// Fractional scroll position (the typed getter rounds to an integer).
fn scroll_f64(element: &HtmlDivElement, prop: &str, fallback: i32) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str(prop))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::from(fallback))
}

pub(crate) fn set_scroll_top(element: &HtmlDivElement, top: f64) {
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str("scrollTop"),
        &JsValue::from_f64(top),
    );
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)
        .map_err(|_| VtableError::Dom(format!("failed to create <{tag}>")))?
        .dyn_into::<T>()
        .map_err(|_| VtableError::Dom(format!("<{tag}> has unexpected type")))
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Elements owned by one table.
pub(crate) struct TableDom {
    pub(crate) document: Document,
    pub(crate) container: HtmlDivElement,
    pub(crate) thead: HtmlElement,
    pub(crate) tbody: HtmlElement,
    pub(crate) ring: HtmlDivElement,
}

impl TableDom {
    /// Build the container tree and append it to `parent`.
    pub(crate) fn build(parent: &HtmlElement, config: &TableConfig) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| VtableError::Dom("no document".into()))?;

        let container: HtmlDivElement = create(&document, "div")?;
        container.set_class_name(&theme::container_class(config.class_name.as_deref()));
        let _ = container.set_attribute(theme::THEME_ATTRIBUTE, theme::theme_attribute_value(config.theme));
        let _ = container.set_attribute("tabindex", "0");
        let style = container.style();
        let _ = style.set_property("height", &px(config.height));
        for (name, value) in theme::css_declarations(&config.theme_override) {
            let _ = style.set_property(&name, &value);
        }

        let table: HtmlElement = create(&document, "table")?;
        table.set_class_name(class::TABLE);
        let thead: HtmlElement = create(&document, "thead")?;
        thead.set_class_name(class::THEAD);
        let tbody: HtmlElement = create(&document, "tbody")?;
        tbody.set_class_name(class::TBODY);
        let ring: HtmlDivElement = create(&document, "div")?;
        ring.set_class_name(class::FOCUS_RING);

        let append_err = |_| VtableError::Dom("failed to append element".into());
        if config.show_column_header {
            table.append_child(&thead).map_err(append_err)?;
        }
        table.append_child(&tbody).map_err(append_err)?;
        container.append_child(&table).map_err(append_err)?;
        container.append_child(&ring).map_err(append_err)?;
        parent.append_child(&container).map_err(append_err)?;

        Ok(Self {
            document,
            container,
            thead,
            tbody,
            ring,
        })
    }

    /// Replace header and body with `plan`. Attaches the active cell's node
    /// to `anchors` and returns the rendered rows for measurement.
    pub(crate) fn render(
        &self,
        plan: &TablePlan,
        anchors: &mut CellAnchors<HtmlElement>,
    ) -> Result<Vec<(usize, HtmlElement)>> {
        anchors.clear();
        let append_err = |_| VtableError::Dom("failed to append element".into());

        self.thead.set_inner_html("");
        if !plan.header.is_empty() {
            let tr: HtmlElement = create(&self.document, "tr")?;
            tr.set_class_name(class::TR);
            for header in &plan.header {
                let th: HtmlElement = create(&self.document, "th")?;
                th.set_class_name(&header.class_name());
                let _ = th.set_attribute(COLUMN_ID_ATTR, &header.column_id);
                let _ = th.style().set_property("width", &px(header.width));
                let label: HtmlElement = create(&self.document, "div")?;
                label.set_text_content(Some(&header.label));
                th.append_child(&label).map_err(append_err)?;
                tr.append_child(&th).map_err(append_err)?;
            }
            self.thead.append_child(&tr).map_err(append_err)?;
        }

        self.tbody.set_inner_html("");
        let _ = self
            .tbody
            .style()
            .set_property("height", &px(plan.total_height));

        let mut rendered = Vec::with_capacity(plan.rows.len());
        let mut surface: Option<HtmlTextAreaElement> = None;
        for row in &plan.rows {
            let tr: HtmlElement = create(&self.document, "tr")?;
            tr.set_class_name(class::TR_VIRTUAL);
            let _ = tr.set_attribute(ROW_INDEX_ATTR, &row.index.to_string());
            let _ = tr
                .style()
                .set_property("transform", &format!("translateY({}px)", row.start));
            for cell in &row.cells {
                let td: HtmlElement = create(&self.document, "td")?;
                td.set_class_name(&cell.class_name());
                let _ = td.set_attribute(COLUMN_ID_ATTR, &cell.column_id);
                let _ = td.style().set_property("width", &px(cell.width));
                match &cell.content {
                    CellContent::Static(text) => td.set_text_content(Some(text)),
                    CellContent::EditSurface { value, height } => {
                        let textarea = create_edit_surface(&self.document, value, *height)?;
                        td.append_child(&textarea).map_err(append_err)?;
                        surface = Some(textarea);
                    }
                }
                if cell.is_anchor {
                    anchors.attach(CellAddress::new(row.index, cell.column_id.as_str()), td.clone());
                }
                tr.append_child(&td).map_err(append_err)?;
            }
            self.tbody.append_child(&tr).map_err(append_err)?;
            rendered.push((row.index, tr));
        }

        if let Some(textarea) = surface {
            focus_at_end(&textarea);
        }
        Ok(rendered)
    }

    pub(crate) fn header_height(&self) -> f64 {
        if self.thead.is_connected() {
            self.thead.get_bounding_client_rect().height()
        } else {
            0.0
        }
    }

    pub(crate) fn apply_ring(&self, geometry: FocusRingGeometry) {
        let style = self.ring.style();
        let _ = style.set_property("top", &px(geometry.top));
        let _ = style.set_property("left", &px(geometry.left));
        let _ = style.set_property("width", &px(geometry.width));
        let _ = style.set_property("height", &px(geometry.height));
        let _ = self
            .ring
            .class_list()
            .toggle_with_force(class::FOCUS_RING_VISIBLE, geometry.visible);
    }

    /// Detach the container from the page.
    pub(crate) fn remove(&self) {
        self.container.remove();
    }
}

/// Row index and column id of the cell an event landed in.
pub(crate) fn cell_address_of(target: Option<web_sys::EventTarget>, tag: &str) -> Option<(Option<usize>, String)> {
    let element: Element = target?.dyn_into().ok()?;
    let cell = element.closest(tag).ok()??;
    let column_id = cell.get_attribute(COLUMN_ID_ATTR)?;
    let row_index = cell
        .closest("tr")
        .ok()
        .flatten()
        .and_then(|tr| tr.get_attribute(ROW_INDEX_ATTR))
        .and_then(|attr| attr.parse().ok());
    Some((row_index, column_id))
}

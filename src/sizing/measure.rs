//! Text width measurement.

use unicode_width::UnicodeWidthStr;

/// Font used for header and cell text when fitting columns.
pub const DEFAULT_FONT: &str = "14px arial, sans-serif";

/// Measures the rendered width of a string in px.
///
/// `None` means measurement is unavailable (no document, no 2D context);
/// callers keep the column's configured width.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, font: &str) -> Option<f64>;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn text_width(&self, text: &str, _font: &str) -> Option<f64> {
        self(text)
    }
}

/// Fixed advance per terminal display column.
///
/// Used off the browser; wide (CJK, emoji) characters count double.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub glyph_width: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { glyph_width: 8.0 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, _font: &str) -> Option<f64> {
        Some(text.width() as f64 * self.glyph_width)
    }
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasTextMeasurer;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use std::cell::RefCell;

    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use super::TextMeasurer;

    /// `measureText` on a detached 2D canvas.
    pub struct CanvasTextMeasurer {
        ctx: CanvasRenderingContext2d,
        font: RefCell<String>,
    }

    impl CanvasTextMeasurer {
        /// `None` when there is no document or no 2D context.
        pub fn new() -> Option<Self> {
            let document = web_sys::window()?.document()?;
            let canvas: HtmlCanvasElement = document
                .create_element("canvas")
                .ok()?
                .dyn_into()
                .ok()?;
            let ctx: CanvasRenderingContext2d = canvas
                .get_context("2d")
                .ok()??
                .dyn_into()
                .ok()?;
            Some(Self {
                ctx,
                font: RefCell::new(String::new()),
            })
        }
    }

    impl TextMeasurer for CanvasTextMeasurer {
        fn text_width(&self, text: &str, font: &str) -> Option<f64> {
            let mut current = self.font.borrow_mut();
            if current.as_str() != font {
                self.ctx.set_font(font);
                current.clear();
                current.push_str(font);
            }
            self.ctx.measure_text(text).ok().map(|m| m.width())
        }
    }
}

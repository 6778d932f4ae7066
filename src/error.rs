//! Structured error types for vtable.
//!
//! Interaction logic never fails; these cover the host boundary only
//! (configuration, row data, DOM construction).

/// All errors that can occur while building or feeding a table.
#[derive(Debug, thiserror::Error)]
pub enum VtableError {
    /// Configuration object could not be read.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Auto-fit bounds are inconsistent.
    #[error("Invalid auto-fit options: min width {min} exceeds max width {max}")]
    InvalidAutoFit { min: f64, max: f64 },

    /// Row data is not an array of objects.
    #[error("Invalid row data: {0}")]
    Data(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// DOM construction failed.
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VtableError>;

#[cfg(target_arch = "wasm32")]
impl From<VtableError> for wasm_bindgen::JsValue {
    fn from(e: VtableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for VtableError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Config(e.to_string())
    }
}

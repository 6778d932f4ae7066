use serde::Serialize;

/// Axis-aligned box in viewport (client) coordinates, as reported by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Geometry of the floating focus ring, relative to the scroll container's
/// content box.
///
/// Derived from a live measurement; never set directly. When `visible` is
/// false the position fields hold whatever was last measured.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FocusRingGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

impl FocusRingGeometry {
    /// Same position, hidden.
    pub fn hidden(self) -> Self {
        Self {
            visible: false,
            ..self
        }
    }
}

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Result, VtableError};

/// Visual theme selected through the `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }
}

/// Constraints applied to auto-fitted column widths.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoFitOptions {
    pub min_width: f64,
    pub max_width: f64,
    /// Horizontal padding added to the widest text, in px.
    pub padding: f64,
}

impl Default for AutoFitOptions {
    fn default() -> Self {
        Self {
            min_width: 50.0,
            max_width: 500.0,
            padding: 16.0,
        }
    }
}

impl AutoFitOptions {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("minWidth", self.min_width),
            ("maxWidth", self.max_width),
            ("padding", self.padding),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(VtableError::Config(format!(
                    "autoFitOptions.{field} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.min_width > self.max_width {
            return Err(VtableError::InvalidAutoFit {
                min: self.min_width,
                max: self.max_width,
            });
        }
        Ok(())
    }
}

/// Construction-time table configuration.
///
/// Field names follow the JavaScript option object (`estimateRowHeight`,
/// `showRowHeader`, ...); every field is optional there.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    /// Height of the scroll container in px.
    pub height: f64,
    pub estimate_row_height: f64,
    pub readonly: bool,
    pub show_row_header: bool,
    pub row_header_width: f64,
    pub show_column_header: bool,
    pub auto_fit_column_width: bool,
    pub auto_fit_options: AutoFitOptions,
    pub theme: ThemeName,
    /// CSS variable overrides (`"vt-bg"` or `"--vt-bg"` → value).
    pub theme_override: BTreeMap<String, String>,
    /// Extra class name for the container.
    pub class_name: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            height: 400.0,
            estimate_row_height: 40.0,
            readonly: false,
            show_row_header: true,
            row_header_width: 60.0,
            show_column_header: true,
            auto_fit_column_width: false,
            auto_fit_options: AutoFitOptions::default(),
            theme: ThemeName::Light,
            theme_override: BTreeMap::new(),
            class_name: None,
        }
    }
}

impl TableConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.estimate_row_height.is_finite() && self.estimate_row_height > 0.0) {
            return Err(VtableError::Config(format!(
                "estimateRowHeight must be positive, got {}",
                self.estimate_row_height
            )));
        }
        if !(self.height.is_finite() && self.height >= 0.0) {
            return Err(VtableError::Config(format!(
                "height must be non-negative, got {}",
                self.height
            )));
        }
        self.auto_fit_options.validate()
    }
}

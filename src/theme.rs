//! Theme attribute and CSS variable overrides.

use std::collections::BTreeMap;

use crate::types::ThemeName;

/// Attribute carrying the theme name on the container.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// CSS custom property name for an override key: `--` is prepended unless
/// already present.
pub fn css_variable_name(key: &str) -> String {
    if key.starts_with("--") {
        key.to_string()
    } else {
        format!("--{key}")
    }
}

/// `(property, value)` pairs to set on the container's inline style.
pub fn css_declarations(overrides: &BTreeMap<String, String>) -> Vec<(String, String)> {
    overrides
        .iter()
        .map(|(key, value)| (css_variable_name(key), value.clone()))
        .collect()
}

pub fn theme_attribute_value(theme: ThemeName) -> &'static str {
    theme.as_str()
}

/// Class list of the container: the base class plus the host's extra class.
pub fn container_class(extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|c| !c.is_empty()) {
        Some(extra) => format!("{} {extra}", crate::render::class::CONTAINER),
        None => crate::render::class::CONTAINER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_prefix() {
        assert_eq!(css_variable_name("vt-bg"), "--vt-bg");
        assert_eq!(css_variable_name("--vt-bg"), "--vt-bg");
    }

    #[test]
    fn test_declarations_are_ordered() {
        let mut overrides = BTreeMap::new();
        overrides.insert("vt-text".to_string(), "#212121".to_string());
        overrides.insert("--vt-bg".to_string(), "#f5f5f5".to_string());
        assert_eq!(
            css_declarations(&overrides),
            vec![
                ("--vt-bg".to_string(), "#f5f5f5".to_string()),
                ("--vt-text".to_string(), "#212121".to_string()),
            ]
        );
    }

    #[test]
    fn test_container_class() {
        assert_eq!(container_class(None), "vt-container");
        assert_eq!(container_class(Some("my-table")), "vt-container my-table");
        assert_eq!(container_class(Some("  ")), "vt-container");
    }
}

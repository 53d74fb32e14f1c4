//! Rendered element records captured from the live page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::core::Geometry;

/// One DOM element measured at a specific viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedElement {
    /// Opaque locator for the element
    pub selector: String,
    /// Tag, `#id` and `.class` tokens joined (e.g. `button#buy.btn.primary`)
    pub display_name: String,
    /// Geometry in device pixels at capture time
    pub geometry: Geometry,
    /// Computed CSS properties (margin, padding, font-size, color, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub computed_style: BTreeMap<String, String>,
}

impl RenderedElement {
    pub fn new(
        selector: impl Into<String>,
        display_name: impl Into<String>,
        geometry: Geometry,
    ) -> Self {
        Self {
            selector: selector.into(),
            display_name: display_name.into(),
            geometry,
            computed_style: BTreeMap::new(),
        }
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.computed_style.insert(key.into(), value.into());
        self
    }
}

/// Builds the matching label for an element from its tag, id and classes.
pub fn display_name(tag: &str, id: Option<&str>, classes: &[&str]) -> String {
    let mut name = tag.to_ascii_lowercase();
    if let Some(id) = id.filter(|id| !id.is_empty()) {
        name.push('#');
        name.push_str(id);
    }
    for class in classes.iter().filter(|c| !c.is_empty()) {
        name.push('.');
        name.push_str(class);
    }
    name
}

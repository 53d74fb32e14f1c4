//! Comparison output types.
//!
//! - [`Difference`] - One property mismatch between a design node and an element
//! - [`ComparisonResult`] - A matched pair with its differences, tagged by viewport
//! - [`Summary`] - Run-level statistics over all results

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::design::DesignNode;
use super::dom::RenderedElement;
use crate::viewport::Viewport;

/// A compared value or delta: numeric for geometry, text for style tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffValue {
    Number(f64),
    Text(String),
}

impl DiffValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DiffValue::Number(n) => Some(*n),
            DiffValue::Text(_) => None,
        }
    }
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffValue::Number(n) => write!(f, "{}", n),
            DiffValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    pub property: String,
    pub design_value: DiffValue,
    pub actual_value: DiffValue,
    pub delta: DiffValue,
}

impl Difference {
    /// Geometric difference; `delta` is the absolute numeric distance.
    pub fn numeric(property: impl Into<String>, design: f64, actual: f64) -> Self {
        Self {
            property: property.into(),
            design_value: DiffValue::Number(design),
            actual_value: DiffValue::Number(actual),
            delta: DiffValue::Number((design - actual).abs()),
        }
    }

    /// Non-numeric difference described by a tag such as `"mismatch"`.
    pub fn tagged(
        property: impl Into<String>,
        design: impl Into<String>,
        actual: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            design_value: DiffValue::Text(design.into()),
            actual_value: DiffValue::Text(actual.into()),
            delta: DiffValue::Text(tag.into()),
        }
    }

    /// True only for numeric deltas strictly greater than `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.delta.as_number().is_some_and(|d| d > threshold)
    }
}

/// One matched (design node, rendered element) pair at a viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub design_node: DesignNode,
    pub element: RenderedElement,
    pub viewport: Viewport,
    #[serde(default)]
    pub differences: Vec<Difference>,
    /// Opaque screenshot path or URL, echoed into the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl ComparisonResult {
    pub fn has_critical(&self, threshold: f64) -> bool {
        self.differences.iter().any(|d| d.exceeds(threshold))
    }
}

/// Run-level statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_comparisons: usize,
    pub total_differences: usize,
    /// Distinct viewport names, kept sorted for reproducible output
    pub viewports_covered: BTreeSet<String>,
    pub critical_issues: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_difference_uses_absolute_delta() {
        let diff = Difference::numeric("width", 120.0, 123.0);
        assert_eq!(diff.delta, DiffValue::Number(3.0));
        assert!(diff.exceeds(2.0));
        assert!(!diff.exceeds(3.0));
    }

    #[test]
    fn tagged_difference_never_exceeds() {
        let diff = Difference::tagged("color", "#000000", "rgb(1, 2, 3)", "mismatch");
        assert!(!diff.exceeds(0.0));
        assert_eq!(diff.delta.to_string(), "mismatch");
    }

    #[test]
    fn diff_value_serializes_untagged() {
        let diff = Difference::numeric("height", 40.0, 52.5);
        let json = serde_json::to_string(&diff).expect("serialize");
        assert!(json.contains("\"designValue\":40.0"));
        assert!(json.contains("\"delta\":12.5"));

        let tagged = Difference::tagged("color", "red", "blue", "mismatch");
        let json = serde_json::to_string(&tagged).expect("serialize");
        assert!(json.contains("\"delta\":\"mismatch\""));
    }
}

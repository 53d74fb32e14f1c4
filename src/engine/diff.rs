//! Per-property differences between a matched design node and element.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DccError;
use crate::types::{DesignNode, Difference, Geometry, RenderedElement};

/// Minimum geometric delta reported by default (strictly greater than).
pub const DEFAULT_MATERIALITY: f64 = 2.0;

/// Tag used for non-numeric style mismatches.
pub const MISMATCH_TAG: &str = "mismatch";

/// A property the [`Differ`] compares.
///
/// Parses from `x`, `y`, `width`, `height`, `style:<key>` or
/// `style:<design-key>=<css-key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DiffProperty {
    X,
    Y,
    Width,
    Height,
    Style { design_key: String, css_key: String },
}

impl DiffProperty {
    pub fn style(design_key: impl Into<String>, css_key: impl Into<String>) -> Self {
        DiffProperty::Style {
            design_key: design_key.into(),
            css_key: css_key.into(),
        }
    }

    fn geometric_value(&self, geometry: &Geometry) -> Option<f64> {
        match self {
            DiffProperty::X => Some(geometry.x),
            DiffProperty::Y => Some(geometry.y),
            DiffProperty::Width => Some(geometry.width),
            DiffProperty::Height => Some(geometry.height),
            DiffProperty::Style { .. } => None,
        }
    }
}

impl fmt::Display for DiffProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffProperty::X => f.write_str("x"),
            DiffProperty::Y => f.write_str("y"),
            DiffProperty::Width => f.write_str("width"),
            DiffProperty::Height => f.write_str("height"),
            DiffProperty::Style {
                design_key,
                css_key,
            } if design_key == css_key => write!(f, "style:{}", design_key),
            DiffProperty::Style {
                design_key,
                css_key,
            } => write!(f, "style:{}={}", design_key, css_key),
        }
    }
}

impl FromStr for DiffProperty {
    type Err = DccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(spec) = trimmed.strip_prefix("style:") {
            let (design_key, css_key) = spec.split_once('=').unwrap_or((spec, spec));
            let (design_key, css_key) = (design_key.trim(), css_key.trim());
            if design_key.is_empty() || css_key.is_empty() {
                return Err(DccError::Config(format!(
                    "Invalid style property '{}': expected style:<key> or style:<design-key>=<css-key>",
                    s
                )));
            }
            return Ok(DiffProperty::style(design_key, css_key));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "x" => Ok(DiffProperty::X),
            "y" => Ok(DiffProperty::Y),
            "width" => Ok(DiffProperty::Width),
            "height" => Ok(DiffProperty::Height),
            _ => Err(DccError::Config(format!("Unknown diff property: {}", s))),
        }
    }
}

impl TryFrom<String> for DiffProperty {
    type Error = DccError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiffProperty> for String {
    fn from(value: DiffProperty) -> Self {
        value.to_string()
    }
}

/// Computes the differences worth reporting for a matched pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Differ {
    pub materiality: f64,
    pub properties: Vec<DiffProperty>,
}

impl Default for Differ {
    fn default() -> Self {
        Self {
            materiality: DEFAULT_MATERIALITY,
            properties: vec![DiffProperty::Width, DiffProperty::Height],
        }
    }
}

impl Differ {
    pub fn new(materiality: f64, properties: Vec<DiffProperty>) -> Self {
        Self {
            materiality,
            properties,
        }
    }

    /// Differences in configured property order.
    ///
    /// Geometric deltas are reported when strictly above the materiality
    /// threshold. A design node without geometry yields no geometric
    /// differences. Style properties are compared as trimmed,
    /// case-insensitive strings and only when both sides define them.
    pub fn diff(&self, element: &RenderedElement, design: &DesignNode) -> Vec<Difference> {
        let mut out = Vec::new();
        for property in &self.properties {
            match property {
                DiffProperty::Style {
                    design_key,
                    css_key,
                } => {
                    let (Some(expected), Some(actual)) = (
                        design.style.get(design_key),
                        element.computed_style.get(css_key),
                    ) else {
                        continue;
                    };
                    if normalize_style_value(expected) != normalize_style_value(actual) {
                        out.push(Difference::tagged(
                            css_key.as_str(),
                            expected.as_str(),
                            actual.as_str(),
                            MISMATCH_TAG,
                        ));
                    }
                }
                geometric => {
                    let Some(design_geometry) = design.geometry.as_ref() else {
                        continue;
                    };
                    let (Some(expected), Some(actual)) = (
                        geometric.geometric_value(design_geometry),
                        geometric.geometric_value(&element.geometry),
                    ) else {
                        continue;
                    };
                    if (expected - actual).abs() > self.materiality {
                        out.push(Difference::numeric(geometric.to_string(), expected, actual));
                    }
                }
            }
        }
        out
    }
}

fn normalize_style_value(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiffValue;

    fn design(w: f64, h: f64) -> DesignNode {
        DesignNode::new("1:1", "Submit Button", "FRAME").with_geometry(Geometry::sized(w, h))
    }

    fn element(w: f64, h: f64) -> RenderedElement {
        RenderedElement::new("form > button", "button.submit-btn", Geometry::sized(w, h))
    }

    #[test]
    fn reports_width_only_when_height_matches() {
        let diffs = Differ::default().diff(&element(123.0, 40.0), &design(120.0, 40.0));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].property, "width");
        assert_eq!(diffs[0].design_value, DiffValue::Number(120.0));
        assert_eq!(diffs[0].actual_value, DiffValue::Number(123.0));
        assert_eq!(diffs[0].delta, DiffValue::Number(3.0));
    }

    #[test]
    fn delta_of_exactly_two_is_immaterial() {
        let diffs = Differ::default().diff(&element(122.0, 42.0), &design(120.0, 40.0));
        assert!(diffs.is_empty(), "got {diffs:?}");
    }

    #[test]
    fn delta_just_above_two_is_reported_per_axis() {
        let width_only = Differ::default().diff(&element(122.01, 40.0), &design(120.0, 40.0));
        assert_eq!(width_only.len(), 1);
        assert_eq!(width_only[0].property, "width");

        let height_only = Differ::default().diff(&element(120.0, 42.01), &design(120.0, 40.0));
        assert_eq!(height_only.len(), 1);
        assert_eq!(height_only[0].property, "height");

        let both = Differ::default().diff(&element(117.99, 37.99), &design(120.0, 40.0));
        let props: Vec<&str> = both.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(props, vec!["width", "height"]);
    }

    #[test]
    fn missing_design_geometry_yields_no_differences() {
        let structural = DesignNode::new("0:1", "Group", "GROUP");
        assert!(Differ::default()
            .diff(&element(300.0, 300.0), &structural)
            .is_empty());
    }

    #[test]
    fn position_properties_are_opt_in() {
        let differ = Differ::new(
            DEFAULT_MATERIALITY,
            vec![DiffProperty::X, DiffProperty::Y, DiffProperty::Width],
        );
        let node = DesignNode::new("1", "Card", "FRAME")
            .with_geometry(Geometry::new(10.0, 20.0, 100.0, 50.0));
        let el = RenderedElement::new("div", "div.card", Geometry::new(16.0, 20.0, 100.0, 80.0));
        let diffs = differ.diff(&el, &node);
        let props: Vec<&str> = diffs.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(props, vec!["x"]);
    }

    #[test]
    fn style_mismatch_emits_tag_delta() {
        let differ = Differ::new(
            DEFAULT_MATERIALITY,
            vec![
                DiffProperty::style("fill", "background-color"),
                DiffProperty::style("fontSize", "font-size"),
                DiffProperty::style("fontFamily", "font-family"),
            ],
        );
        let node = design(120.0, 40.0)
            .with_style("fill", "#FF0000")
            .with_style("fontSize", "16px")
            .with_style("fontFamily", "Inter");
        let el = element(120.0, 40.0)
            .with_style("background-color", "#ff0000 ")
            .with_style("font-size", "14px");

        let diffs = differ.diff(&el, &node);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].property, "font-size");
        assert_eq!(diffs[0].delta, DiffValue::Text(MISMATCH_TAG.to_string()));
    }

    #[test]
    fn property_parsing_round_trips_through_strings() {
        for raw in ["width", "height", "x", "y", "style:color", "style:fill=background-color"] {
            let parsed: DiffProperty = raw.parse().expect(raw);
            assert_eq!(parsed.to_string(), raw);
        }
        assert!("depth".parse::<DiffProperty>().is_err());
        assert!("style:=color".parse::<DiffProperty>().is_err());
    }
}

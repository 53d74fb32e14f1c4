//! Structured report and its renderings.
//!
//! - [`StructuredReport`] - Serializable snapshot of one run
//! - [`render_markup`] - Deterministic HTML narrative of a report
//! - [`write_report`] - Atomic JSON/HTML writers for an output directory

mod markup;
mod writer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DccError;
use crate::types::{ComparisonResult, Summary};
use crate::Result;

pub use markup::render_markup;
pub use writer::{write_report, ReportFiles, HTML_REPORT_FILE, JSON_REPORT_FILE};

/// Serializable snapshot of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredReport {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<ComparisonResult>,
    pub summary: Summary,
    /// Rendered elements the matcher declined, per viewport name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unmatched_elements: BTreeMap<String, usize>,
}

/// Snapshot of `results` and `summary` stamped with `generated_at`.
pub fn build_report(
    results: &[ComparisonResult],
    summary: &Summary,
    generated_at: DateTime<Utc>,
) -> StructuredReport {
    StructuredReport {
        generated_at,
        results: results.to_vec(),
        summary: summary.clone(),
        unmatched_elements: BTreeMap::new(),
    }
}

impl StructuredReport {
    pub fn with_unmatched(mut self, unmatched: BTreeMap<String, usize>) -> Self {
        self.unmatched_elements = unmatched;
        self
    }

    pub fn has_critical_issues(&self) -> bool {
        self.summary.critical_issues > 0
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DccError::report_build(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DccError::report_build(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate;
    use crate::types::{DesignNode, Difference, Geometry, RenderedElement};
    use crate::Viewport;
    use chrono::TimeZone;

    fn sample_results() -> Vec<ComparisonResult> {
        vec![ComparisonResult {
            design_node: DesignNode::new("1:2", "Submit Button", "FRAME")
                .with_geometry(Geometry::new(10.0, 20.0, 120.0, 40.0))
                .with_style("fill", "#1a73e8"),
            element: RenderedElement::new(
                "form > button",
                "button.submit-btn",
                Geometry::new(10.5, 20.0, 123.0, 40.0),
            )
            .with_style("background-color", "rgb(26, 115, 232)"),
            viewport: Viewport::new("Desktop", 1440, 900),
            differences: vec![
                Difference::numeric("width", 120.0, 123.0),
                Difference::tagged("color", "#000000", "#111111", "mismatch"),
            ],
            screenshot: Some("shots/desktop.png".to_string()),
        }]
    }

    #[test]
    fn report_round_trips_through_json() {
        let results = sample_results();
        let summary = aggregate(&results);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let report = build_report(&results, &summary, at)
            .with_unmatched(BTreeMap::from([("Desktop".to_string(), 3)]));

        let json = report.to_json().expect("serialize report");
        let back = StructuredReport::from_json(&json).expect("deserialize report");
        assert_eq!(back, report);
    }

    #[test]
    fn fractional_values_round_trip_exactly() {
        let mut results = sample_results();
        results[0].element.geometry.width = 0.1 + 0.2;
        results[0].differences = vec![Difference::numeric("width", 120.0, 0.1 + 0.2)];
        let summary = aggregate(&results);
        let report = build_report(&results, &summary, Utc::now());

        let back = StructuredReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn report_uses_camel_case_fields() {
        let report = build_report(&[], &Summary::default(), Utc::now());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"totalComparisons\":0"));
        assert!(json.contains("\"viewportsCovered\":[]"));
        assert!(!json.contains("unmatchedElements"));
    }

    #[test]
    fn build_report_does_not_alias_inputs() {
        let mut results = sample_results();
        let summary = aggregate(&results);
        let report = build_report(&results, &summary, Utc::now());
        results.clear();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.summary.total_differences, 2);
    }
}

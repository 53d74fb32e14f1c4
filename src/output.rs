use crate::engine::MatchPolicy;
use crate::error::ErrorPayload;
use crate::report::{ReportFiles, StructuredReport};
use crate::types::{DesignNode, Summary};
use crate::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version for output payloads.
pub const DCC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DccOutput {
    Compare(CompareOutput),
    Flatten(FlattenOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub version: String,
    pub design: String,
    /// Page URL or snapshot directory the elements were captured from.
    pub target: String,
    pub policy: MatchPolicy,
    pub viewports: Vec<Viewport>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unmatched_elements: BTreeMap<String, usize>,
    /// Viewports with at least one result above the critical threshold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_viewports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportFiles>,
    pub passed: bool,
}

impl CompareOutput {
    pub fn from_report(
        design: impl Into<String>,
        target: impl Into<String>,
        policy: MatchPolicy,
        viewports: Vec<Viewport>,
        report: &StructuredReport,
        critical_threshold: f64,
    ) -> Self {
        let mut critical_viewports: Vec<String> = report
            .results
            .iter()
            .filter(|r| r.has_critical(critical_threshold))
            .map(|r| r.viewport.name.clone())
            .collect();
        critical_viewports.sort();
        critical_viewports.dedup();

        Self {
            version: DCC_OUTPUT_VERSION.to_string(),
            design: design.into(),
            target: target.into(),
            policy,
            viewports,
            summary: report.summary.clone(),
            unmatched_elements: report.unmatched_elements.clone(),
            critical_viewports,
            report: None,
            passed: !report.has_critical_issues(),
        }
    }

    pub fn with_report_files(mut self, files: ReportFiles) -> Self {
        self.report = Some(files);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenOutput {
    pub version: String,
    pub design: String,
    pub total_nodes: usize,
    /// Comparable nodes in depth-first order, without children.
    pub nodes: Vec<DesignNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

//! Analysis runner: drives the design source and capture session through the
//! comparison engine and produces a [`StructuredReport`].

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::browser::{CaptureSession, PageCapture};
use crate::config::Config;
use crate::error::DccError;
use crate::engine::{
    aggregate_with, flatten, prepare_elements, validate_design_tree, Differ, MatchStrategy,
    ThresholdMatcher, UnitScale, DEFAULT_CRITICAL_THRESHOLD,
};
use crate::report::{build_report, StructuredReport};
use crate::source::DesignSource;
use crate::types::{ComparisonResult, DesignNode, RenderedElement};
use crate::viewport::check_distinct;
use crate::{Result, Viewport};

/// Everything that decides how one viewport batch is compared.
pub struct ComparePolicy {
    pub strategy: Box<dyn MatchStrategy>,
    pub differ: Differ,
    pub units: UnitScale,
    pub critical_threshold: f64,
}

impl Default for ComparePolicy {
    fn default() -> Self {
        Self {
            strategy: Box::new(ThresholdMatcher::default()),
            differ: Differ::default(),
            units: UnitScale::default(),
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl ComparePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            strategy: config.matching.policy.strategy(config.matching.thresholds()),
            differ: Differ::new(config.diff.materiality, config.diff.properties.clone()),
            units: config.units,
            critical_threshold: config.report.critical_threshold,
        }
    }
}

/// Results for one viewport plus the number of elements left unmatched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportComparison {
    pub results: Vec<ComparisonResult>,
    pub unmatched: usize,
}

/// Compares one viewport's elements against the flattened design.
///
/// Elements are normalized to design units, matched in input order and
/// diffed against their match. Results keep the element as captured, so
/// its geometry stays in device pixels while differences are in design
/// units. Unmatched elements produce no result.
pub fn compare_viewport(
    candidates: &[&DesignNode],
    elements: &[RenderedElement],
    viewport: &Viewport,
    screenshot: Option<&str>,
    policy: &ComparePolicy,
) -> ViewportComparison {
    let mut comparison = ViewportComparison::default();
    for captured in elements {
        let element = policy.units.normalize(captured);
        match policy.strategy.select(candidates, &element) {
            Some(node) => {
                let differences = policy.differ.diff(&element, node);
                comparison.results.push(ComparisonResult {
                    design_node: node.detached(),
                    element: captured.clone(),
                    viewport: viewport.clone(),
                    differences,
                    screenshot: screenshot.map(str::to_owned),
                });
            }
            None => comparison.unmatched += 1,
        }
    }
    comparison
}

/// Runs a full analysis: one design fetch, one capture session, viewports in order.
pub struct Analyzer {
    policy: ComparePolicy,
}

impl Analyzer {
    pub fn new(policy: ComparePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ComparePolicy {
        &self.policy
    }

    /// The session is closed whether or not every viewport succeeds.
    pub async fn run(
        &self,
        source: &dyn DesignSource,
        capture: &dyn PageCapture,
        viewports: &[Viewport],
    ) -> Result<StructuredReport> {
        check_distinct(viewports).map_err(DccError::Config)?;
        info!(design = %source.describe(), "fetching design");
        let design = source.fetch().await?;
        validate_design_tree(&design)?;
        let candidates = flatten(&design);
        info!(
            nodes = design.node_count(),
            candidates = candidates.len(),
            viewports = viewports.len(),
            "design ready"
        );

        let mut session = capture.open().await?;
        let outcome = self
            .capture_all(session.as_mut(), &candidates, viewports)
            .await;
        let closed = session.close().await;

        let (results, unmatched) = outcome?;
        if let Err(err) = closed {
            warn!(error = %err, "capture session did not close cleanly");
        }

        let summary = aggregate_with(&results, self.policy.critical_threshold);
        info!(
            comparisons = summary.total_comparisons,
            differences = summary.total_differences,
            critical = summary.critical_issues,
            "analysis finished"
        );
        Ok(build_report(&results, &summary, Utc::now()).with_unmatched(unmatched))
    }

    async fn capture_all(
        &self,
        session: &mut dyn CaptureSession,
        candidates: &[&DesignNode],
        viewports: &[Viewport],
    ) -> Result<(Vec<ComparisonResult>, BTreeMap<String, usize>)> {
        let mut results = Vec::new();
        let mut unmatched = BTreeMap::new();
        for viewport in viewports {
            let page = session.capture(viewport).await?;
            let elements = prepare_elements(page.elements)?;
            let comparison = compare_viewport(
                candidates,
                &elements,
                viewport,
                page.screenshot.as_deref(),
                &self.policy,
            );
            debug!(
                viewport = %viewport.name,
                elements = elements.len(),
                matched = comparison.results.len(),
                unmatched = comparison.unmatched,
                "viewport compared"
            );
            if comparison.unmatched > 0 {
                *unmatched.entry(viewport.name.clone()).or_insert(0) += comparison.unmatched;
            }
            results.extend(comparison.results);
        }
        Ok((results, unmatched))
    }
}

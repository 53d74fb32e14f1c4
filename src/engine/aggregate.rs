use crate::types::{ComparisonResult, Summary};

/// Numeric delta above which a result counts as a critical issue.
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 10.0;

/// Run-level statistics with the default critical threshold.
pub fn aggregate(results: &[ComparisonResult]) -> Summary {
    aggregate_with(results, DEFAULT_CRITICAL_THRESHOLD)
}

/// Run-level statistics; a result is critical when any numeric delta is
/// strictly above `critical_threshold`. Tag deltas never count.
pub fn aggregate_with(results: &[ComparisonResult], critical_threshold: f64) -> Summary {
    let mut summary = Summary::default();
    for result in results {
        summary.total_comparisons += 1;
        summary.total_differences += result.differences.len();
        summary.viewports_covered.insert(result.viewport.name.clone());
        if result.has_critical(critical_threshold) {
            summary.critical_issues += 1;
        }
    }
    summary
}

//! Node-matching and comparison engine.
//!
//! Everything here is synchronous and pure over borrowed inputs:
//! - Tree flattening (nodes that carry geometry, pre-order)
//! - Similarity scoring (name tokens, width/height closeness)
//! - Matching strategies (first-match threshold policy, best-score policy)
//! - Differences above a materiality threshold
//! - Aggregation into a run summary
//! - Unit reconciliation and ingestion validation

mod aggregate;
mod diff;
mod flatten;
mod matcher;
mod similarity;
mod units;
mod validate;

pub use aggregate::{aggregate, aggregate_with, DEFAULT_CRITICAL_THRESHOLD};
pub use diff::{DiffProperty, Differ, DEFAULT_MATERIALITY, MISMATCH_TAG};
pub use flatten::flatten;
pub use matcher::{
    find_match, BestScoreMatcher, CandidateScore, MatchPolicy, MatchStrategy, MatchThresholds,
    ThresholdMatcher,
};
pub use similarity::{design_tokens, element_tokens, name_similarity, size_similarity};
pub use units::UnitScale;
pub use validate::{prepare_elements, validate_design_tree};

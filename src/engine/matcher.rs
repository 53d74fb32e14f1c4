//! Pairing rendered elements with design nodes.
//!
//! Matching is expressed through [`MatchStrategy`] so policies can be swapped
//! without touching flattening, diffing or aggregation. Two policies ship:
//! [`ThresholdMatcher`] (first candidate clearing a threshold, the default)
//! and [`BestScoreMatcher`] (highest-scoring candidate among those clearing
//! a threshold).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DccError;
use crate::types::{DesignNode, RenderedElement};

use super::similarity::{name_similarity, size_similarity};

/// Selects the design node a rendered element should be compared against.
pub trait MatchStrategy: Send + Sync {
    /// Returns `None` when no candidate is acceptable; callers skip the element.
    fn select<'a>(
        &self,
        candidates: &[&'a DesignNode],
        element: &RenderedElement,
    ) -> Option<&'a DesignNode>;
}

/// A candidate passes when `name > name` OR `size > size` (strict).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    pub name: f64,
    pub size: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            name: 0.5,
            size: 0.8,
        }
    }
}

/// Both similarity signals for one (candidate, element) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub name: f64,
    pub size: f64,
}

impl CandidateScore {
    pub fn compute(candidate: &DesignNode, element: &RenderedElement) -> Self {
        let size = candidate
            .geometry
            .as_ref()
            .map(|g| size_similarity(g, &element.geometry))
            .unwrap_or(0.0);
        Self {
            name: name_similarity(&candidate.name, &element.display_name),
            size,
        }
    }

    pub fn clears(&self, thresholds: &MatchThresholds) -> bool {
        self.name > thresholds.name || self.size > thresholds.size
    }

    fn strength(&self) -> f64 {
        self.name.max(self.size)
    }
}

/// First candidate, in traversal order, that clears either threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdMatcher {
    pub thresholds: MatchThresholds,
}

impl ThresholdMatcher {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }
}

impl MatchStrategy for ThresholdMatcher {
    fn select<'a>(
        &self,
        candidates: &[&'a DesignNode],
        element: &RenderedElement,
    ) -> Option<&'a DesignNode> {
        candidates
            .iter()
            .copied()
            .find(|c| CandidateScore::compute(c, element).clears(&self.thresholds))
    }
}

/// Highest `max(name, size)` among candidates clearing either threshold;
/// ties resolve to the earliest candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestScoreMatcher {
    pub thresholds: MatchThresholds,
}

impl BestScoreMatcher {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }
}

impl MatchStrategy for BestScoreMatcher {
    fn select<'a>(
        &self,
        candidates: &[&'a DesignNode],
        element: &RenderedElement,
    ) -> Option<&'a DesignNode> {
        let mut best: Option<(&'a DesignNode, f64)> = None;
        for candidate in candidates.iter().copied() {
            let score = CandidateScore::compute(candidate, element);
            if !score.clears(&self.thresholds) {
                continue;
            }
            let strength = score.strength();
            if best.is_none_or(|(_, s)| strength > s) {
                best = Some((candidate, strength));
            }
        }
        best.map(|(node, _)| node)
    }
}

/// Configurable choice of matching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    #[default]
    First,
    Best,
}

impl MatchPolicy {
    pub fn strategy(self, thresholds: MatchThresholds) -> Box<dyn MatchStrategy> {
        match self {
            MatchPolicy::First => Box::new(ThresholdMatcher::new(thresholds)),
            MatchPolicy::Best => Box::new(BestScoreMatcher::new(thresholds)),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchPolicy::First => "first",
            MatchPolicy::Best => "best",
        })
    }
}

impl FromStr for MatchPolicy {
    type Err = DccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(MatchPolicy::First),
            "best" => Ok(MatchPolicy::Best),
            _ => Err(DccError::Config(format!("Unknown match policy: {}", s))),
        }
    }
}

/// Runs the default first-match policy.
pub fn find_match<'a>(
    candidates: &[&'a DesignNode],
    element: &RenderedElement,
) -> Option<&'a DesignNode> {
    ThresholdMatcher::default().select(candidates, element)
}

//! Pair scoring: weighted cosine similarity plus a flat shared-keyword bonus,
//! bucketed into edge tiers.

use serde::Serialize;
use std::collections::BTreeSet;

use super::GraphParams;
use crate::node::MeaningNode;

/// Edge strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Strong,
    Weak,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
        }
    }

    /// Bucket a pair score. `None` means no edge.
    pub fn from_score(score: f64, params: &GraphParams) -> Option<Self> {
        if score > params.strong_threshold {
            Some(Self::Strong)
        } else if score > params.weak_threshold {
            Some(Self::Weak)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cosine similarity of two vectors, computed in f64.
///
/// Returns `None` for a zero-norm vector or a length mismatch.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b).sqrt())
}

/// `true` when both sets are nonempty and share at least one tag.
pub fn shares_keyword(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    !a.is_empty() && !b.is_empty() && !a.is_disjoint(b)
}

/// Score one pair of nodes. Missing or degenerate fields contribute zero.
pub fn score_pair(a: &MeaningNode, b: &MeaningNode, params: &GraphParams) -> f64 {
    let mut score = 0.0;

    if let (Some(va), Some(vb)) = (a.vector.as_deref(), b.vector.as_deref()) {
        match cosine_similarity(va, vb) {
            Some(sim) => score += sim * params.vector_weight,
            None => tracing::trace!(a = %a.id, b = %b.id, "skipping cosine term"),
        }
    }

    if shares_keyword(&a.keywords, &b.keywords) {
        score += params.keyword_bonus;
    }

    score
}

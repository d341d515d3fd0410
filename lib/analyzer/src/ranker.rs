//! Ranking of scored candidates into recommendations.

use fitx_core::{GarmentRecord, Match, OutfitShape, Recommendation, STANDALONE_SCORE};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use tracing::debug;

/// A scored candidate for an anchor. Three-piece matches carry the footwear as `companion`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch<'a> {
    pub candidate: &'a GarmentRecord,
    pub companion: Option<&'a GarmentRecord>,
    pub score: f32,
}

impl<'a> ScoredMatch<'a> {
    /// Non-finite scores are treated as failed pairings.
    pub fn new(candidate: &'a GarmentRecord, score: f32) -> Self {
        Self {
            candidate,
            companion: None,
            score: if score.is_finite() { score } else { 0.0 },
        }
    }

    pub fn with_companion(mut self, companion: &'a GarmentRecord) -> Self {
        self.companion = Some(companion);
        self
    }

    fn to_match(self) -> Match {
        Match {
            candidate: self.candidate.to_ref(),
            companion: self.companion.map(GarmentRecord::to_ref),
            score: self.score,
        }
    }
}

/// An anchor with its best matches, before the final ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate<'a> {
    pub anchor: &'a GarmentRecord,
    pub shape: OutfitShape,
    /// `None` only for standalone dresses.
    pub matches: Option<Vec<ScoredMatch<'a>>>,
}

impl<'a> RankedCandidate<'a> {
    pub fn standalone(anchor: &'a GarmentRecord) -> Self {
        Self {
            anchor,
            shape: OutfitShape::StandaloneDress,
            matches: None,
        }
    }

    pub fn scored(anchor: &'a GarmentRecord, shape: OutfitShape, matches: Vec<ScoredMatch<'a>>) -> Self {
        Self {
            anchor,
            shape,
            matches: Some(matches),
        }
    }
}

/// Sort descending by score and keep the first `k`. Equal scores keep their input order.
pub fn top_k(mut matches: Vec<ScoredMatch<'_>>, k: usize) -> Vec<ScoredMatch<'_>> {
    matches.sort_by_key(|m| Reverse(OrderedFloat(m.score)));
    matches.truncate(k);
    matches
}

/// Aggregate score of a candidate, or `None` when it has nothing to rank.
///
/// Standalone dresses always get [`STANDALONE_SCORE`]; everything else is the mean of its match
/// scores.
pub fn aggregate(candidate: &RankedCandidate<'_>) -> Option<f32> {
    if candidate.shape == OutfitShape::StandaloneDress {
        return Some(STANDALONE_SCORE);
    }
    let matches = candidate.matches.as_deref().filter(|m| !m.is_empty())?;
    Some(matches.iter().map(|m| m.score).sum::<f32>() / matches.len() as f32)
}

/// Pools candidates of every shape into one bounded, ordered list.
#[derive(Debug, Clone)]
pub struct Ranker {
    limit: usize,
}

impl Ranker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Rank candidates by aggregate score, descending.
    ///
    /// Ties keep insertion order. Candidates without matches are dropped rather than ranked as 0.
    pub fn rank(&self, candidates: Vec<RankedCandidate<'_>>) -> Vec<Recommendation> {
        let mut scored: Vec<(f32, RankedCandidate<'_>)> = candidates
            .into_iter()
            .filter_map(|candidate| match aggregate(&candidate) {
                Some(score) => Some((score, candidate)),
                None => {
                    debug!(
                        anchor = %candidate.anchor.image_reference,
                        shape = %candidate.shape,
                        "dropping recommendation without matches"
                    );
                    None
                }
            })
            .collect();

        scored.sort_by_key(|(score, _)| Reverse(OrderedFloat(*score)));
        scored.truncate(self.limit);

        scored
            .into_iter()
            .map(|(score, candidate)| Recommendation {
                anchor: candidate.anchor.to_ref(),
                matches: candidate
                    .matches
                    .map(|matches| matches.into_iter().map(ScoredMatch::to_match).collect()),
                shape: candidate.shape,
                score,
            })
            .collect()
    }
}

//! Candidate selection.
//!
//! Decides which anchors are paired with which candidates for every applicable shape. Top-anchored
//! shapes work on a random sample of tops instead of the whole inventory, and three-piece outfits
//! are found by a staged greedy search rather than a full cross product.

use crate::config::AnalyzerConfig;
use crate::ranker::{top_k, ScoredMatch};
use crate::scorer::OutfitScorer;
use fitx_core::{Error, GarmentRecord, OutfitShape, Partition, Result};
use rand::seq::index;
use rand::Rng;
use tracing::{debug, info};

/// An anchor and the items it will be scored against.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub anchor: &'a GarmentRecord,
    pub shape: OutfitShape,
    pub candidates: Vec<&'a GarmentRecord>,
    /// Third-piece options, only populated for [`OutfitShape::TopBottomFootwear`].
    pub companions: Vec<&'a GarmentRecord>,
}

#[derive(Debug, Clone)]
pub struct CandidateSelector {
    min_anchor_tops: usize,
    anchor_sample_size: usize,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl CandidateSelector {
    pub fn new(min_anchor_tops: usize, anchor_sample_size: usize) -> Self {
        Self {
            min_anchor_tops,
            anchor_sample_size,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.min_anchor_tops, config.anchor_sample_size)
    }

    /// All selections for a partition, in rule order: dresses, three-piece, top/bottom.
    ///
    /// Shapes that cannot run are logged and skipped; an empty partition yields no selections.
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        partition: &Partition<'a>,
        rng: &mut R,
    ) -> Vec<Selection<'a>> {
        let mut selections = self.select_dresses(partition);

        if partition.tops.is_empty() || partition.bottoms.is_empty() {
            return selections;
        }

        match self.sample_anchor_tops(partition, rng) {
            Ok(anchors) => {
                selections.extend(self.select_three_piece(&anchors, partition));
                selections.extend(self.select_top_bottom(&anchors, partition));
            }
            Err(e) => info!(occasion = ?partition.occasion, "skipping top-anchored shapes: {e}"),
        }

        selections
    }

    /// One selection per dress: against all footwear when there is any, standalone otherwise.
    pub fn select_dresses<'a>(&self, partition: &Partition<'a>) -> Vec<Selection<'a>> {
        let shape = if partition.footwear.is_empty() {
            OutfitShape::StandaloneDress
        } else {
            OutfitShape::DressFootwear
        };

        partition
            .dresses
            .iter()
            .map(|dress| Selection {
                anchor: dress,
                shape,
                candidates: if shape == OutfitShape::DressFootwear {
                    partition.footwear.clone()
                } else {
                    Vec::new()
                },
                companions: Vec::new(),
            })
            .collect()
    }

    /// Draw up to `anchor_sample_size` tops uniformly without replacement.
    ///
    /// Fails with [`Error::InsufficientInventory`] below the minimum population; the sample is
    /// clamped to the population otherwise.
    pub fn sample_anchor_tops<'a, R: Rng + ?Sized>(
        &self,
        partition: &Partition<'a>,
        rng: &mut R,
    ) -> Result<Vec<&'a GarmentRecord>> {
        let population = partition.tops.len();
        if population < self.min_anchor_tops {
            return Err(Error::InsufficientInventory {
                shape: "top-anchored outfits".into(),
                required: self.min_anchor_tops,
                found: population,
            });
        }

        let amount = self.anchor_sample_size.min(population);
        let anchors: Vec<_> = index::sample(rng, population, amount)
            .into_iter()
            .map(|idx| partition.tops[idx])
            .collect();
        debug!(population, sampled = anchors.len(), "sampled anchor tops");
        Ok(anchors)
    }

    pub fn select_top_bottom<'a>(
        &self,
        anchors: &[&'a GarmentRecord],
        partition: &Partition<'a>,
    ) -> Vec<Selection<'a>> {
        if partition.bottoms.is_empty() {
            return Vec::new();
        }
        anchors
            .iter()
            .map(|top| Selection {
                anchor: top,
                shape: OutfitShape::TopBottom,
                candidates: partition.bottoms.clone(),
                companions: Vec::new(),
            })
            .collect()
    }

    pub fn select_three_piece<'a>(
        &self,
        anchors: &[&'a GarmentRecord],
        partition: &Partition<'a>,
    ) -> Vec<Selection<'a>> {
        if partition.bottoms.is_empty() || partition.footwear.is_empty() {
            return Vec::new();
        }
        anchors
            .iter()
            .map(|top| Selection {
                anchor: top,
                shape: OutfitShape::TopBottomFootwear,
                candidates: partition.bottoms.clone(),
                companions: partition.footwear.clone(),
            })
            .collect()
    }
}

/// Score every candidate of a two-piece selection against its anchor, in candidate order.
pub fn score_candidates<'a>(
    scorer: &dyn OutfitScorer,
    shape: OutfitShape,
    anchor: &'a GarmentRecord,
    candidates: &[&'a GarmentRecord],
) -> Vec<ScoredMatch<'a>> {
    candidates
        .iter()
        .map(|candidate| ScoredMatch::new(candidate, scorer.score(shape, &[anchor, candidate])))
        .collect()
}

/// Staged three-piece search.
///
/// Keeps the `bottoms_kept` best bottoms for the anchor by top/bottom score, then for each of
/// them the `footwear_kept` best footwear by three-piece score. Returns the triples sorted by
/// descending score, at most `bottoms_kept * footwear_kept` of them.
pub fn expand_three_piece<'a>(
    scorer: &dyn OutfitScorer,
    selection: &Selection<'a>,
    bottoms_kept: usize,
    footwear_kept: usize,
) -> Vec<ScoredMatch<'a>> {
    let anchor = selection.anchor;
    let bottoms = top_k(
        score_candidates(scorer, OutfitShape::TopBottom, anchor, &selection.candidates),
        bottoms_kept,
    );

    let mut triples = Vec::with_capacity(bottoms.len() * footwear_kept);
    for bottom in bottoms {
        let options: Vec<_> = selection
            .companions
            .iter()
            .map(|footwear| {
                let score = scorer.score(
                    OutfitShape::TopBottomFootwear,
                    &[anchor, bottom.candidate, footwear],
                );
                ScoredMatch::new(bottom.candidate, score).with_companion(footwear)
            })
            .collect();
        triples.extend(top_k(options, footwear_kept));
    }

    let count = triples.len();
    top_k(triples, count)
}

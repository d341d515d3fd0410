//! Recommendation wire types.

use crate::garment::GarmentRef;
use crate::shape::OutfitShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate score given to standalone dresses regardless of inventory.
pub const STANDALONE_SCORE: f32 = 1.0;

/// A scored candidate for an anchor.
///
/// Three-piece matches carry the footwear as `companion`; two-piece matches leave it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub candidate: GarmentRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion: Option<GarmentRef>,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub anchor: GarmentRef,
    /// `None` for standalone dresses, otherwise sorted by descending score.
    pub matches: Option<Vec<Match>>,
    pub shape: OutfitShape,
    /// Aggregate used for the final ranking.
    pub score: f32,
}

impl Recommendation {
    pub fn standalone(anchor: GarmentRef) -> Self {
        Self {
            anchor,
            matches: None,
            shape: OutfitShape::StandaloneDress,
            score: STANDALONE_SCORE,
        }
    }

    /// Locators of every matched item, in match order.
    pub fn matched_locators(&self) -> Vec<String> {
        self.matches
            .iter()
            .flatten()
            .flat_map(|m| std::iter::once(&m.candidate).chain(m.companion.as_ref()))
            .map(|g| g.image_reference.clone())
            .collect()
    }
}

/// Anchor locator → matched locators, as returned by the request layer.
///
/// When an anchor appears more than once the later recommendation wins.
pub fn outfit_combinations(recommendations: &[Recommendation]) -> BTreeMap<String, Vec<String>> {
    recommendations
        .iter()
        .filter(|r| !r.anchor.image_reference.is_empty())
        .map(|r| (r.anchor.image_reference.clone(), r.matched_locators()))
        .collect()
}

//! Outfit shapes: which categories combine, and how their scores are weighted.

use crate::garment::Category;
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutfitShape {
    TopBottom,
    TopBottomFootwear,
    DressFootwear,
    BottomFootwear,
    TopFootwear,
    StandaloneDress,
}

/// Visual/text blend applied to a two-piece score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub visual: f32,
    pub text: f32,
}

/// Weights of the five signals that make up a three-piece score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripleWeights {
    pub top_bottom: f32,
    pub bottom_footwear: f32,
    pub top_footwear: f32,
    pub visual: f32,
    pub text: f32,
}

pub const TRIPLE_WEIGHTS: TripleWeights = TripleWeights {
    top_bottom: 0.2,
    bottom_footwear: 0.1,
    top_footwear: 0.1,
    visual: 0.3,
    text: 0.3,
};

impl OutfitShape {
    pub fn tag(&self) -> &'static str {
        match self {
            OutfitShape::TopBottom => "top_bottom",
            OutfitShape::TopBottomFootwear => "top_bottom_footwear",
            OutfitShape::DressFootwear => "dress_footwear",
            OutfitShape::BottomFootwear => "bottom_footwear",
            OutfitShape::TopFootwear => "top_footwear",
            OutfitShape::StandaloneDress => "standalone_dress",
        }
    }

    /// Categories in anchor-first order. Items handed to the scorer follow this order.
    pub fn slots(&self) -> &'static [Category] {
        match self {
            OutfitShape::TopBottom => &[Category::Top, Category::Bottom],
            OutfitShape::TopBottomFootwear => {
                &[Category::Top, Category::Bottom, Category::Footwear]
            }
            OutfitShape::DressFootwear => &[Category::Dress, Category::Footwear],
            OutfitShape::BottomFootwear => &[Category::Bottom, Category::Footwear],
            OutfitShape::TopFootwear => &[Category::Top, Category::Footwear],
            OutfitShape::StandaloneDress => &[Category::Dress],
        }
    }

    /// Placeholder prefix used by the prompt templates for each slot.
    pub fn roles(&self) -> &'static [&'static str] {
        match self {
            OutfitShape::TopBottom => &["top", "bottom"],
            OutfitShape::TopBottomFootwear => &["top", "bottom", "footwear"],
            OutfitShape::DressFootwear => &["dress", "footwear"],
            OutfitShape::BottomFootwear => &["bottom", "footwear"],
            OutfitShape::TopFootwear => &["top", "footwear"],
            OutfitShape::StandaloneDress => &["dress"],
        }
    }

    pub fn piece_count(&self) -> usize {
        self.slots().len()
    }

    pub fn is_three_piece(&self) -> bool {
        self.piece_count() == 3
    }

    /// Standalone dresses are never scored.
    pub fn is_scored(&self) -> bool {
        !matches!(self, OutfitShape::StandaloneDress)
    }

    pub fn blend_weights(&self) -> BlendWeights {
        match self {
            OutfitShape::DressFootwear => BlendWeights {
                visual: 0.7,
                text: 0.3,
            },
            _ => BlendWeights {
                visual: 0.6,
                text: 0.4,
            },
        }
    }

    /// Prompt ensemble for the text score. Empty for [`OutfitShape::StandaloneDress`].
    pub fn prompt_templates(&self) -> Vec<&'static str> {
        let (specific, general): (&[&str], &[&str]) = match self {
            OutfitShape::TopBottom => (prompts::TOP_BOTTOM, prompts::UNIVERSAL),
            OutfitShape::DressFootwear => (prompts::DRESS_FOOTWEAR, prompts::UNIVERSAL),
            OutfitShape::TopBottomFootwear => (
                prompts::TOP_BOTTOM_FOOTWEAR,
                prompts::TOP_BOTTOM_FOOTWEAR_GENERAL,
            ),
            OutfitShape::BottomFootwear => {
                (prompts::BOTTOM_FOOTWEAR, prompts::BOTTOM_FOOTWEAR_GENERAL)
            }
            OutfitShape::TopFootwear => (prompts::TOP_FOOTWEAR, prompts::TOP_FOOTWEAR_GENERAL),
            OutfitShape::StandaloneDress => (&[], &[]),
        };
        specific.iter().chain(general).copied().collect()
    }
}

impl fmt::Display for OutfitShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

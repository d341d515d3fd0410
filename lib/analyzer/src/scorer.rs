//! Compatibility scoring.
//!
//! A two-piece score blends a visual signal (the composite image against a fixed pair of
//! contrastive anchors) with a text signal (the composite against every prompt of the shape's
//! ensemble). Three-piece scores mix the three pairwise scores with the visual and text signals
//! of the full triple, weighted by [`TRIPLE_WEIGHTS`].

use crate::imaging::{compose_side_by_side, tile};
use crate::model::VisionLanguageModel;
use crate::source::ImageSource;
use fitx_core::prompts::instantiate;
use fitx_core::{Error, GarmentRecord, OutfitShape, Result, STANDALONE_SCORE, TRIPLE_WEIGHTS};
use image::RgbImage;
use tracing::warn;

pub const POSITIVE_ANCHOR: &str = "a fashionable outfit";
pub const NEGATIVE_ANCHOR: &str = "an unfashionable outfit";
/// Negative class every ensemble prompt is contrasted with.
pub const NEGATIVE_PROMPT: &str = "unfashionable combination";

/// Scores a combination of garments for a shape.
///
/// `items` follow the shape's slot order (anchor first). Implementations never fail: a pairing
/// that cannot be scored gets 0.0.
pub trait OutfitScorer {
    fn score(&self, shape: OutfitShape, items: &[&GarmentRecord]) -> f32;
}

/// The model-backed scorer.
pub struct CompatibilityScorer<'a> {
    model: &'a dyn VisionLanguageModel,
    images: &'a dyn ImageSource,
    tile_size: u32,
}

impl<'a> CompatibilityScorer<'a> {
    pub fn new(
        model: &'a dyn VisionLanguageModel,
        images: &'a dyn ImageSource,
        tile_size: u32,
    ) -> Self {
        Self {
            model,
            images,
            tile_size,
        }
    }

    /// Score with errors surfaced instead of collapsed to 0.0.
    pub fn try_score(&self, shape: OutfitShape, items: &[&GarmentRecord]) -> Result<f32> {
        if items.len() != shape.piece_count() {
            return Err(Error::ShapeMismatch {
                shape: shape.to_string(),
                expected: shape.piece_count(),
                found: items.len(),
            });
        }
        if !shape.is_scored() {
            return Ok(STANDALONE_SCORE);
        }

        let tiles = items
            .iter()
            .map(|item| {
                self.images
                    .fetch(&item.image_reference)
                    .map(|image| tile(&image, self.tile_size))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let tiles: Vec<&RgbImage> = tiles.iter().collect();

        if shape.is_three_piece() {
            self.triple(items, &tiles)
        } else {
            self.blend(shape, items, &tiles)
        }
    }

    fn blend(&self, shape: OutfitShape, items: &[&GarmentRecord], tiles: &[&RgbImage]) -> Result<f32> {
        let composite = compose_side_by_side(tiles, self.tile_size);
        let weights = shape.blend_weights();
        let visual = self.visual_score(&composite)?;
        let text = self.text_score(shape, items, &composite)?;
        Ok(weights.visual * visual + weights.text * text)
    }

    fn triple(&self, items: &[&GarmentRecord], tiles: &[&RgbImage]) -> Result<f32> {
        let (top, bottom, footwear) = (items[0], items[1], items[2]);
        let (top_img, bottom_img, footwear_img) = (tiles[0], tiles[1], tiles[2]);

        let top_bottom = self.blend(OutfitShape::TopBottom, &[top, bottom], &[top_img, bottom_img])?;
        let bottom_footwear = self.blend(
            OutfitShape::BottomFootwear,
            &[bottom, footwear],
            &[bottom_img, footwear_img],
        )?;
        let top_footwear = self.blend(
            OutfitShape::TopFootwear,
            &[top, footwear],
            &[top_img, footwear_img],
        )?;

        let composite = compose_side_by_side(tiles, self.tile_size);
        let visual = self.visual_score(&composite)?;
        let text = self.text_score(OutfitShape::TopBottomFootwear, items, &composite)?;

        let w = TRIPLE_WEIGHTS;
        Ok(w.top_bottom * top_bottom
            + w.bottom_footwear * bottom_footwear
            + w.top_footwear * top_footwear
            + w.visual * visual
            + w.text * text)
    }

    /// Cosine similarity of the composite to [`POSITIVE_ANCHOR`].
    ///
    /// Embeddings of mismatched dimension score 0.0.
    pub fn visual_score(&self, composite: &RgbImage) -> Result<f32> {
        let image = self.model.embed_image(composite)?;
        let anchors = self.model.embed_text(&[POSITIVE_ANCHOR, NEGATIVE_ANCHOR])?;
        let positive = anchors
            .first()
            .ok_or_else(|| Error::ModelInference("no embedding for the positive anchor".into()))?;
        Ok(image.cosine_similarity(positive))
    }

    /// Mean probability of each ensemble prompt against [`NEGATIVE_PROMPT`].
    pub fn text_score(
        &self,
        shape: OutfitShape,
        items: &[&GarmentRecord],
        composite: &RgbImage,
    ) -> Result<f32> {
        let templates = shape.prompt_templates();
        if templates.is_empty() {
            return Ok(0.0);
        }

        let mut total = 0.0f32;
        for template in &templates {
            let prompt = instantiate(template, shape.roles(), items);
            let probabilities = self.model.similarity(composite, &[prompt.as_str(), NEGATIVE_PROMPT])?;
            total += probabilities.first().copied().ok_or_else(|| {
                Error::ModelInference(format!("empty similarity output for prompt: {prompt}"))
            })?;
        }
        Ok(total / templates.len() as f32)
    }
}

impl OutfitScorer for CompatibilityScorer<'_> {
    fn score(&self, shape: OutfitShape, items: &[&GarmentRecord]) -> f32 {
        match self.try_score(shape, items) {
            Ok(score) => score,
            Err(e) => {
                let locators: Vec<&str> = items.iter().map(|i| i.image_reference.as_str()).collect();
                warn!(%shape, ?locators, error = %e, "pairing scored 0.0");
                0.0
            }
        }
    }
}

//! Vision-language model boundary.
//!
//! The analyzer never loads weights itself: a model is injected as a
//! [`VisionLanguageModel`] trait object and shared read-only across scoring calls.

use fitx_core::{Result, Vector};
use image::RgbImage;

/// Logit scale applied to cosine similarities before the softmax, as in CLIP.
pub const LOGIT_SCALE: f32 = 100.0;

/// A joint image/text embedding model.
///
/// Implementations must be safe to call from several threads at once; an engine whose forward
/// pass is not thread-safe has to serialize internally.
pub trait VisionLanguageModel: Send + Sync {
    fn embed_image(&self, image: &RgbImage) -> Result<Vector>;

    fn embed_text(&self, texts: &[&str]) -> Result<Vec<Vector>>;

    /// Probability distribution over `texts` for `image`.
    ///
    /// The default implementation is the CLIP zero-shot head: softmax over scaled cosine
    /// similarities of the normalized embeddings.
    fn similarity(&self, image: &RgbImage, texts: &[&str]) -> Result<Vec<f32>> {
        let image_embedding = self.embed_image(image)?.normalized();
        let logits: Vec<f32> = self
            .embed_text(texts)?
            .iter()
            .map(|t| LOGIT_SCALE * image_embedding.dot(&t.normalized()))
            .collect();
        Ok(softmax(&logits))
    }
}

/// Numerically stable softmax. An empty input gives an empty output.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        vec![0.0; logits.len()]
    }
}

/// Index of the most probable label.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    probabilities
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
}

//! Deterministic offline model.
//!
//! [`HashingModel`] implements [`VisionLanguageModel`] without weights: text is embedded by
//! hashing character trigrams and words, images by hashing a coarse grid of quantized colors.
//! Scores carry no fashion sense, but they are stable across runs, which is what the binary needs
//! when no external model is wired in and what tests need to assert exact rankings.

use crate::model::VisionLanguageModel;
use fitx_core::{Result, Vector};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Default embedding dimension
pub const DEFAULT_EMBEDDING_DIM: usize = 64;

/// Side of the color grid sampled from each image
const GRID: u32 = 8;

#[derive(Debug, Clone)]
pub struct HashingModel {
    dim: usize,
}

impl Default for HashingModel {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl HashingModel {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn slot<T: Hash>(&self, value: T) -> usize {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        (hasher.finish() as usize) % self.dim
    }

    fn hash_text(&self, text: &str) -> Vector {
        let mut vector = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in trigrams(&normalized) {
            vector[self.slot(&trigram)] += 1.0;
        }

        // Words contribute more than trigrams
        for word in normalized.split_whitespace() {
            vector[self.slot(word)] += 2.0;
        }

        Vector::new(vector).normalized()
    }
}

impl VisionLanguageModel for HashingModel {
    fn embed_image(&self, image: &RgbImage) -> Result<Vector> {
        let mut vector = vec![0.0f32; self.dim];
        if image.width() == 0 || image.height() == 0 {
            return Ok(Vector::new(vector));
        }

        let grid = imageops::resize(image, GRID, GRID, FilterType::Triangle);
        for (x, y, pixel) in grid.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let bucket = (r >> 6, g >> 6, b >> 6);
            vector[self.slot(bucket)] += 1.0;
            vector[self.slot((x / 2, y / 2, bucket))] += 0.5;
        }

        Ok(Vector::new(vector).normalized())
    }

    fn embed_text(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.hash_text(t)).collect())
    }
}

/// Character trigrams of a string padded with two spaces on each side
fn trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(32, 32, Rgb(color))
    }

    #[test]
    fn test_text_embedding_deterministic_and_normalized() {
        let model = HashingModel::default();
        let a = model.embed_text(&["a fashionable outfit"]).unwrap();
        let b = model.embed_text(&["a fashionable outfit"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].dim(), DEFAULT_EMBEDDING_DIM);
        assert!((a[0].norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_similar_texts_are_closer() {
        let model = HashingModel::default();
        let v = model
            .embed_text(&["a red silk top", "a red silk blouse", "hiking boots"])
            .unwrap();
        assert!(v[0].cosine_similarity(&v[1]) > v[0].cosine_similarity(&v[2]));
    }

    #[test]
    fn test_image_embedding_depends_on_color() {
        let model = HashingModel::default();
        let red = model.embed_image(&solid([250, 10, 10])).unwrap();
        let red_again = model.embed_image(&solid([250, 10, 10])).unwrap();
        let blue = model.embed_image(&solid([10, 10, 250])).unwrap();

        assert_eq!(red, red_again);
        assert!((red.norm() - 1.0).abs() < 1e-5);
        assert!(red.cosine_similarity(&blue) < 0.999);
    }

    #[test]
    fn test_similarity_is_a_distribution() {
        let model = HashingModel::default();
        let probs = model
            .similarity(&solid([120, 80, 40]), &["a prompt", "unfashionable combination"])
            .unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }
}

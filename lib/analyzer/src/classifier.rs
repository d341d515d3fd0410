//! Zero-shot garment classification.

use crate::imaging::dominant_color;
use crate::model::{argmax, VisionLanguageModel};
use crate::source::ImageSource;
use fitx_core::vocabulary::{CLOTHING_TYPES, MATERIALS};
use fitx_core::{DominantColor, Error, GarmentRecord, Occasion, Result, Season};
use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

/// Labels a garment image by picking the most likely entry of each vocabulary.
pub struct GarmentClassifier {
    model: Arc<dyn VisionLanguageModel>,
    images: Arc<dyn ImageSource>,
}

impl GarmentClassifier {
    pub fn new(model: Arc<dyn VisionLanguageModel>, images: Arc<dyn ImageSource>) -> Self {
        Self { model, images }
    }

    pub fn classify(&self, locator: &str) -> Result<GarmentRecord> {
        let image = self.images.fetch(locator)?;
        self.classify_image(locator, &image)
    }

    /// Classify an image that is already in memory, recording it under `locator`.
    pub fn classify_image(&self, locator: &str, image: &RgbImage) -> Result<GarmentRecord> {
        let clothing_type = self.pick(image, CLOTHING_TYPES)?;
        let occasion: Occasion = self.pick(image, &Occasion::ALL.map(|o| o.as_str()))?.parse()?;
        let season: Season = self.pick(image, &Season::ALL.map(|s| s.as_str()))?.parse()?;
        let material = self.pick(image, MATERIALS)?;
        let color = dominant_color(image)
            .map(DominantColor::Rgb)
            .unwrap_or_default();

        debug!(locator, clothing_type, %occasion, %season, material, "classified garment");

        Ok(GarmentRecord::new(locator, clothing_type, occasion)
            .with_season(season)
            .with_material(material)
            .with_color(color))
    }

    fn pick<'v>(&self, image: &RgbImage, labels: &[&'v str]) -> Result<&'v str> {
        let probabilities = self.model.similarity(image, labels)?;
        argmax(&probabilities)
            .and_then(|idx| labels.get(idx).copied())
            .ok_or_else(|| Error::ModelInference(format!("no prediction among {} labels", labels.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefetch::PrefetchedImages;
    use fitx_core::{Category, FetchError, Vector};
    use image::Rgb;

    /// Puts all probability mass on the first label found in its list of preferences.
    struct PreferenceModel(Vec<&'static str>);

    impl VisionLanguageModel for PreferenceModel {
        fn embed_image(&self, _image: &RgbImage) -> Result<Vector> {
            Ok(Vector::zeros(1))
        }

        fn embed_text(&self, texts: &[&str]) -> Result<Vec<Vector>> {
            Ok(texts.iter().map(|_| Vector::zeros(1)).collect())
        }

        fn similarity(&self, _image: &RgbImage, texts: &[&str]) -> Result<Vec<f32>> {
            Ok(texts
                .iter()
                .map(|t| if self.0.contains(t) { 1.0 } else { 0.0 })
                .collect())
        }
    }

    fn images() -> Arc<PrefetchedImages> {
        let mut images = PrefetchedImages::default();
        let mut image = RgbImage::from_pixel(80, 80, Rgb([10, 20, 30]));
        for x in 0..20 {
            image.put_pixel(x, 0, Rgb([255, 255, 255]));
        }
        images.insert("jacket.png".into(), Ok(image));
        images.insert(
            "gone.png".into(),
            Err(FetchError::InvalidLocator("gone.png".into())),
        );
        Arc::new(images)
    }

    #[test]
    fn test_classify_picks_argmax_labels() {
        let model = PreferenceModel(vec!["Jacket", "Formal", "Winter", "wool"]);
        let classifier = GarmentClassifier::new(Arc::new(model), images());

        let record = classifier.classify("jacket.png").unwrap();
        assert_eq!(record.image_reference, "jacket.png");
        assert_eq!(record.clothing_type, "Jacket");
        assert_eq!(record.category, Category::Top);
        assert_eq!(record.occasion, Occasion::Formal);
        assert_eq!(record.season, Some(Season::Winter));
        assert_eq!(record.material, "wool");
        assert_eq!(record.dominant_color, DominantColor::Rgb([10, 20, 30]));
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let classifier = GarmentClassifier::new(Arc::new(PreferenceModel(vec![])), images());
        assert!(matches!(
            classifier.classify("gone.png"),
            Err(Error::Fetch(FetchError::InvalidLocator(_)))
        ));
    }
}

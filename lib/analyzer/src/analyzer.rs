//! The outfit analyzer: filter, select, score, rank.

use crate::config::AnalyzerConfig;
use crate::model::VisionLanguageModel;
use crate::prefetch::{prefetch, PrefetchedImages};
use crate::ranker::{top_k, RankedCandidate, Ranker};
use crate::scorer::{CompatibilityScorer, OutfitScorer};
use crate::selector::{expand_three_piece, score_candidates, CandidateSelector, Selection};
use crate::source::ImageSource;
use fitx_core::{GarmentPool, Occasion, OutfitShape, Recommendation, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Produces outfit recommendations over a fixed inventory.
///
/// The analyzer owns its pool, its model and its image source for its whole lifetime. Anchor
/// sampling draws from a single RNG, so a seeded analyzer replays the same sequence of runs.
pub struct OutfitAnalyzer {
    pool: GarmentPool,
    model: Arc<dyn VisionLanguageModel>,
    images: Arc<dyn ImageSource>,
    config: AnalyzerConfig,
    selector: CandidateSelector,
    ranker: Ranker,
    rng: Mutex<StdRng>,
}

impl OutfitAnalyzer {
    pub fn new(
        pool: GarmentPool,
        model: Arc<dyn VisionLanguageModel>,
        images: Arc<dyn ImageSource>,
        config: AnalyzerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            items = pool.len(),
            seed = ?config.seed,
            fetch_mode = ?config.fetch.mode,
            "outfit analyzer ready"
        );

        Ok(Self {
            selector: CandidateSelector::from_config(&config),
            ranker: Ranker::new(config.max_recommendations),
            pool,
            model,
            images,
            config,
            rng: Mutex::new(rng),
        })
    }

    pub fn pool(&self) -> &GarmentPool {
        &self.pool
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Best outfits for an occasion, or across the whole pool when `occasion` is `None`.
    ///
    /// Images are fetched on demand through the analyzer's image source. An occasion with no
    /// garments yields an empty list.
    pub fn find_best_matches(&self, occasion: Option<Occasion>) -> Vec<Recommendation> {
        self.find_best_matches_from(occasion, self.images.as_ref())
    }

    /// Same as [`find_best_matches`](Self::find_best_matches), reading images from `images`.
    pub fn find_best_matches_from(
        &self,
        occasion: Option<Occasion>,
        images: &dyn ImageSource,
    ) -> Vec<Recommendation> {
        let scorer =
            CompatibilityScorer::new(self.model.as_ref(), images, self.config.fetch.tile_size);
        self.find_best_matches_with(occasion, &scorer)
    }

    /// Run the pipeline with an arbitrary scorer.
    pub fn find_best_matches_with(
        &self,
        occasion: Option<Occasion>,
        scorer: &dyn OutfitScorer,
    ) -> Vec<Recommendation> {
        let started = Instant::now();
        let partition = self.pool.partition(occasion);
        if partition.is_empty() {
            info!(?occasion, "no garments for occasion");
            return Vec::new();
        }

        let selections = {
            let mut rng = self.rng.lock();
            self.selector.select(&partition, &mut *rng)
        };
        debug!(?occasion, selections = selections.len(), "candidates selected");

        let candidates = selections
            .iter()
            .map(|selection| self.evaluate(selection, scorer))
            .collect();
        let recommendations = self.ranker.rank(candidates);

        info!(
            ?occasion,
            garments = partition.len(),
            recommendations = recommendations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "matching finished"
        );
        recommendations
    }

    fn evaluate<'a>(
        &self,
        selection: &Selection<'a>,
        scorer: &dyn OutfitScorer,
    ) -> RankedCandidate<'a> {
        let anchor = selection.anchor;
        match selection.shape {
            OutfitShape::StandaloneDress => RankedCandidate::standalone(anchor),
            OutfitShape::TopBottomFootwear => {
                let triples = expand_three_piece(
                    scorer,
                    selection,
                    self.config.three_piece_bottoms,
                    self.config.three_piece_footwear,
                );
                RankedCandidate::scored(anchor, selection.shape, triples)
            }
            shape => {
                let keep = if shape == OutfitShape::DressFootwear {
                    self.config.dress_footwear_matches
                } else {
                    self.config.top_bottom_matches
                };
                let scored = score_candidates(scorer, shape, anchor, &selection.candidates);
                RankedCandidate::scored(anchor, shape, top_k(scored, keep))
            }
        }
    }

    /// Distinct image locators of the garments considered for `occasion`.
    pub fn image_locators(&self, occasion: Option<Occasion>) -> Vec<String> {
        let mut seen = ahash::AHashSet::new();
        self.pool
            .partition(occasion)
            .iter()
            .filter(|g| seen.insert(g.image_reference.clone()))
            .map(|g| g.image_reference.clone())
            .collect()
    }

    /// Fetch every image `occasion` may need, concurrently.
    pub async fn prefetch_images(&self, occasion: Option<Occasion>) -> PrefetchedImages {
        let locators = self.image_locators(occasion);
        let started = Instant::now();
        let images = prefetch(self.images.clone(), locators, self.config.fetch.timeout()).await;
        info!(
            images = images.len(),
            failures = images.failures(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prefetch finished"
        );
        images
    }

    /// Prefetch concurrently, then score.
    ///
    /// Scoring itself is CPU-bound and runs on the calling task; servers should prefer
    /// [`prefetch_images`](Self::prefetch_images) and hand scoring to a blocking thread.
    pub async fn find_best_matches_concurrent(
        &self,
        occasion: Option<Occasion>,
    ) -> Vec<Recommendation> {
        let images = self.prefetch_images(occasion).await;
        self.find_best_matches_from(occasion, &images)
    }

    /// Recommendations for every occasion present in the pool, in order of first appearance.
    ///
    /// Falls back to matching over the whole pool when no occasion produced anything.
    pub fn recommend_across_occasions(&self) -> Vec<Recommendation> {
        self.recommend_across_occasions_from(self.images.as_ref())
    }

    pub fn recommend_across_occasions_from(&self, images: &dyn ImageSource) -> Vec<Recommendation> {
        let scorer =
            CompatibilityScorer::new(self.model.as_ref(), images, self.config.fetch.tile_size);
        self.recommend_across_occasions_with(&scorer)
    }

    pub fn recommend_across_occasions_with(&self, scorer: &dyn OutfitScorer) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        for occasion in self.pool.occasions() {
            recommendations.extend(self.find_best_matches_with(Some(occasion), scorer));
        }

        if recommendations.is_empty() && !self.pool.is_empty() {
            info!("no per-occasion outfits, falling back to generic matching");
            recommendations = self.find_best_matches_with(None, scorer);
        }
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashingModel;
    use fitx_core::{GarmentRecord, STANDALONE_SCORE};
    use image::{Rgb, RgbImage};

    /// Deterministic stand-in: a hash of the locators, mapped into [0, 1).
    struct LocatorHashScorer;

    impl OutfitScorer for LocatorHashScorer {
        fn score(&self, _shape: OutfitShape, items: &[&GarmentRecord]) -> f32 {
            let mut h: u32 = 2166136261;
            for item in items {
                for byte in item.image_reference.bytes() {
                    h = (h ^ byte as u32).wrapping_mul(16777619);
                }
            }
            (h % 1000) as f32 / 1000.0
        }
    }

    struct SolidColors;

    impl ImageSource for SolidColors {
        fn fetch(&self, locator: &str) -> std::result::Result<RgbImage, fitx_core::FetchError> {
            let shade = locator.bytes().fold(0u8, |acc, b| acc.wrapping_mul(31).wrapping_add(b));
            Ok(RgbImage::from_pixel(64, 64, Rgb([shade, shade / 2, 255 - shade])))
        }
    }

    fn record(locator: &str, ty: &str, occasion: Occasion) -> GarmentRecord {
        GarmentRecord::new(locator, ty, occasion)
    }

    fn analyzer(records: Vec<GarmentRecord>, seed: u64) -> OutfitAnalyzer {
        let config = AnalyzerConfig {
            seed: Some(seed),
            ..AnalyzerConfig::default()
        };
        OutfitAnalyzer::new(
            records.into_iter().collect(),
            Arc::new(HashingModel::default()),
            Arc::new(SolidColors),
            config,
        )
        .unwrap()
    }

    fn wardrobe() -> Vec<GarmentRecord> {
        let mut records = Vec::new();
        for (i, ty) in ["Shirt", "Blouse", "Hoodie", "T-shirt", "Sweater"].iter().enumerate() {
            records.push(record(&format!("top{i}"), ty, Occasion::Casual));
        }
        for (i, ty) in ["Jean", "Skirt", "Shorts"].iter().enumerate() {
            records.push(record(&format!("bottom{i}"), ty, Occasion::Casual));
        }
        records.push(record("shoe0", "Sneakers", Occasion::Casual));
        records.push(record("shoe1", "Loafers", Occasion::Casual));
        records.push(record("dress0", "Dress", Occasion::Casual));
        records
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let first = analyzer(wardrobe(), 7).find_best_matches_with(None, &LocatorHashScorer);
        let second = analyzer(wardrobe(), 7).find_best_matches_with(None, &LocatorHashScorer);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_results_are_bounded_and_sorted() {
        let recs = analyzer(wardrobe(), 11).find_best_matches_with(Some(Occasion::Casual), &LocatorHashScorer);
        assert!(recs.len() <= 5);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
        for rec in &recs {
            let matches = rec.matches.as_ref().unwrap();
            match rec.shape {
                OutfitShape::TopBottom => assert!(matches.len() <= 3),
                OutfitShape::DressFootwear => assert!(matches.len() <= 2),
                OutfitShape::TopBottomFootwear => {
                    assert!(matches.len() <= 4);
                    assert!(matches.iter().all(|m| m.companion.is_some()));
                }
                other => panic!("unexpected shape {other}"),
            }
            let mean = matches.iter().map(|m| m.score).sum::<f32>() / matches.len() as f32;
            assert!((rec.score - mean).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_occasion_is_empty() {
        let recs = analyzer(wardrobe(), 1).find_best_matches(Some(Occasion::Formal));
        assert!(recs.is_empty());
    }

    #[test]
    fn test_standalone_dress_without_footwear() {
        let records = vec![
            record("dress0", "Dress", Occasion::Partywear),
            record("top0", "Shirt", Occasion::Partywear),
        ];
        let recs = analyzer(records, 3).find_best_matches(Some(Occasion::Partywear));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].shape, OutfitShape::StandaloneDress);
        assert_eq!(recs[0].score, STANDALONE_SCORE);
        assert!(recs[0].matches.is_none());
    }

    #[test]
    fn test_too_few_tops_skips_top_shapes() {
        let records = vec![
            record("top0", "Shirt", Occasion::Casual),
            record("top1", "Blouse", Occasion::Casual),
            record("bottom0", "Jean", Occasion::Casual),
            record("shoe0", "Sneakers", Occasion::Casual),
            record("dress0", "Dress", Occasion::Casual),
        ];
        let recs = analyzer(records, 5).find_best_matches_with(None, &LocatorHashScorer);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].shape, OutfitShape::DressFootwear);
    }

    #[test]
    fn test_model_backed_scores_are_in_range() {
        let recs = analyzer(wardrobe(), 2).find_best_matches(None);
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.score.is_finite() && r.score <= 1.0 + 1e-5));
    }

    #[test]
    fn test_across_occasions_concatenates_in_pool_order() {
        let records = vec![
            record("dress0", "Dress", Occasion::Partywear),
            record("dress1", "Jumpsuit", Occasion::Formal),
        ];
        let recs = analyzer(records, 0).recommend_across_occasions_with(&LocatorHashScorer);
        let anchors: Vec<_> = recs.iter().map(|r| r.anchor.image_reference.as_str()).collect();
        assert_eq!(anchors, vec!["dress0", "dress1"]);
    }

    #[test]
    fn test_image_locators_are_distinct() {
        let mut records = wardrobe();
        records.push(record("top0", "Shirt", Occasion::Casual));
        let locators = analyzer(records, 0).image_locators(None);
        assert_eq!(locators.len(), wardrobe().len());
    }

    #[tokio::test]
    async fn test_concurrent_matches_sync() {
        let sync = analyzer(wardrobe(), 21).find_best_matches(None);
        let concurrent = analyzer(wardrobe(), 21).find_best_matches_concurrent(None).await;
        assert_eq!(sync, concurrent);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalyzerConfig {
            max_recommendations: 0,
            ..AnalyzerConfig::default()
        };
        assert!(OutfitAnalyzer::new(
            GarmentPool::default(),
            Arc::new(HashingModel::default()),
            Arc::new(SolidColors),
            config,
        )
        .is_err());
    }
}

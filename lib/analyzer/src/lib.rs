//! # fitx Analyzer
//!
//! Outfit compatibility analysis over a [`GarmentPool`](fitx_core::GarmentPool).
//!
//! - [`OutfitAnalyzer`] - Filters the pool by occasion, selects candidates, scores and ranks them
//! - [`CandidateSelector`] - Anchor sampling and the staged three-piece search
//! - [`CompatibilityScorer`] - Blended visual/text compatibility through a [`VisionLanguageModel`]
//! - [`Ranker`] - Bounded, stable ranking of candidates of every shape
//! - [`GarmentClassifier`] - Zero-shot labelling of garment images
//! - [`ImageSource`] - Where garment images come from (disk, HTTP, or a concurrent prefetch)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fitx_analyzer::{AnalyzerConfig, HashingModel, LocatorImageSource, OutfitAnalyzer};
//! use fitx_core::{GarmentPool, GarmentRecord, Occasion};
//!
//! let pool = GarmentPool::from_iter([
//!     GarmentRecord::new("dress.png", "Dress", Occasion::Partywear),
//! ]);
//! let config = AnalyzerConfig { seed: Some(7), ..AnalyzerConfig::default() };
//! let images = Arc::new(LocatorImageSource::new(&config.fetch));
//! let analyzer = OutfitAnalyzer::new(pool, Arc::new(HashingModel::default()), images, config).unwrap();
//!
//! // no footwear: the dress is recommended on its own
//! let recs = analyzer.find_best_matches(Some(Occasion::Partywear));
//! assert_eq!(recs.len(), 1);
//! assert_eq!(recs[0].score, 1.0);
//! ```

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod hashing;
pub mod imaging;
pub mod model;
pub mod prefetch;
pub mod ranker;
pub mod scorer;
pub mod selector;
pub mod source;

pub use analyzer::OutfitAnalyzer;
pub use classifier::GarmentClassifier;
pub use config::{AnalyzerConfig, FetchConfig, FetchMode};
pub use hashing::HashingModel;
pub use model::VisionLanguageModel;
pub use prefetch::{prefetch, PrefetchedImages};
pub use ranker::{Ranker, RankedCandidate, ScoredMatch};
pub use scorer::{CompatibilityScorer, OutfitScorer};
pub use selector::{CandidateSelector, Selection};
pub use source::{FileImageSource, HttpImageSource, ImageSource, LocatorImageSource};

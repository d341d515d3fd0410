//! # fitx
//!
//! Outfit compatibility analysis: given an inventory of classified garments, recommend the
//! combinations that go together best for an occasion.
//!
//! Every candidate combination is scored by a vision-language model. The garment images are
//! composed side by side and compared against fashionable/unfashionable anchors (visual signal)
//! and against an ensemble of descriptive prompts (text signal).
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! fitx --port 5000
//! curl -X POST localhost:5000/process_images -d '{"images": ["https://.../shirt.png"]}'
//! ```
//!
//! ### One-shot
//!
//! ```bash
//! fitx --inventory wardrobe.json --occasion formal --seed 7
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use fitx::prelude::*;
//! use std::sync::Arc;
//!
//! let pool = GarmentPool::from_iter([
//!     GarmentRecord::new("shirt.png", "Shirt", Occasion::Formal).with_material("cotton"),
//!     GarmentRecord::new("trousers.png", "Trousers", Occasion::Formal),
//! ]);
//! let config = AnalyzerConfig::default();
//! let images = Arc::new(LocatorImageSource::new(&config.fetch));
//! let analyzer = OutfitAnalyzer::new(pool, Arc::new(HashingModel::default()), images, config)?;
//!
//! for rec in analyzer.find_best_matches(Some(Occasion::Formal)) {
//!     println!("{} ({}) scored {:.2}", rec.anchor.image_reference, rec.shape, rec.score);
//! }
//! # Ok::<(), fitx::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`fitx-core`](https://docs.rs/fitx-core) - Garments, shapes, prompt templates, recommendations
//! - [`fitx-analyzer`](https://docs.rs/fitx-analyzer) - Selection, scoring, ranking, classification
//! - [`fitx-api`](https://docs.rs/fitx-api) - REST API

// Re-export core types
pub use fitx_core::{
    outfit_combinations, Category, DominantColor, Error, FetchError, GarmentPool, GarmentRecord,
    GarmentRef, Match, Occasion, OutfitShape, Recommendation, Result, Season,
};

// Re-export the analyzer
pub use fitx_analyzer::{
    AnalyzerConfig, CandidateSelector, CompatibilityScorer, FetchMode, GarmentClassifier,
    HashingModel, ImageSource, LocatorImageSource, OutfitAnalyzer, OutfitScorer, Ranker,
    VisionLanguageModel,
};

// Re-export API
pub use fitx_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnalyzerConfig, Category, Error, GarmentPool, GarmentRecord, HashingModel, ImageSource,
        LocatorImageSource, Occasion, OutfitAnalyzer, OutfitShape, Recommendation, Result,
        VisionLanguageModel,
    };
}

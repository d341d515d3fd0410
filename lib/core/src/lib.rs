//! # fitx Core
//!
//! Core types for the fitx outfit recommender.
//!
//! - [`GarmentRecord`] - A classified clothing item with its derived [`Category`]
//! - [`GarmentPool`] - The items of one analysis run, partitioned per occasion
//! - [`OutfitShape`] - Which categories combine, with their score weights and prompt ensembles
//! - [`Recommendation`] - An anchor item with its ranked matches
//! - [`Vector`] - Dense embedding vector
//!
//! ## Example
//!
//! ```rust
//! use fitx_core::{GarmentPool, GarmentRecord, Occasion, Category};
//!
//! let pool = GarmentPool::from_iter([
//!     GarmentRecord::new("shirt.png", "Shirt", Occasion::Formal).with_material("cotton"),
//!     GarmentRecord::new("trousers.png", "Trousers", Occasion::Formal),
//!     GarmentRecord::new("hoodie.png", "Hoodie", Occasion::Casual),
//! ]);
//!
//! let formal = pool.partition(Some(Occasion::Formal));
//! assert_eq!(formal.tops.len(), 1);
//! assert_eq!(formal.bottoms[0].category, Category::Bottom);
//! ```

pub mod error;
pub mod garment;
pub mod pool;
pub mod prompts;
pub mod recommendation;
pub mod shape;
pub mod vector;
pub mod vocabulary;

pub use error::{Error, FetchError, Result};
pub use garment::{Category, DominantColor, GarmentRecord, GarmentRef, Occasion, Season, UNKNOWN};
pub use pool::{GarmentPool, Partition};
pub use recommendation::{outfit_combinations, Match, Recommendation, STANDALONE_SCORE};
pub use shape::{BlendWeights, OutfitShape, TripleWeights, TRIPLE_WEIGHTS};
pub use vector::Vector;

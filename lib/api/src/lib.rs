//! # fitx API
//!
//! HTTP surface of fitx: classify garment images and recommend outfits.

mod rest;

pub use rest::{AppState, RestApi};

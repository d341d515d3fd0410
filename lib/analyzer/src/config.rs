//! Analyzer configuration.

use fitx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How images are acquired during an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Each image is fetched when a pairing needs it, blocking the caller.
    #[default]
    Sync,
    /// All images of the filtered pool are fetched concurrently before scoring.
    Concurrent,
}

impl std::str::FromStr for FetchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sync" => Ok(FetchMode::Sync),
            "concurrent" => Ok(FetchMode::Concurrent),
            other => Err(Error::UnknownVariant {
                kind: "fetch mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Largest accepted tile side; three tiles side by side must still fit a `u32` width.
pub const MAX_TILE_SIZE: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub mode: FetchMode,
    /// Per-image timeout, in milliseconds.
    pub timeout_ms: u64,
    /// Images smaller than this on either side are rejected.
    pub min_dimension: u32,
    /// Side of the square each image is resized to before composition.
    pub tile_size: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: FetchMode::Sync,
            timeout_ms: 15_000,
            min_dimension: 50,
            tile_size: 256,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Tops needed before any top-anchored shape is attempted.
    pub min_anchor_tops: usize,
    /// Number of anchor tops drawn per run.
    pub anchor_sample_size: usize,
    pub top_bottom_matches: usize,
    pub dress_footwear_matches: usize,
    /// Bottoms kept per anchor in the first stage of three-piece search.
    pub three_piece_bottoms: usize,
    /// Footwear kept per bottom in the second stage of three-piece search.
    pub three_piece_footwear: usize,
    pub max_recommendations: usize,
    /// Seed for anchor sampling. Unseeded runs draw from the OS.
    pub seed: Option<u64>,
    pub fetch: FetchConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_anchor_tops: 3,
            anchor_sample_size: 3,
            top_bottom_matches: 3,
            dress_footwear_matches: 2,
            three_piece_bottoms: 2,
            three_piece_footwear: 2,
            max_recommendations: 5,
            seed: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load a JSON config file. Absent fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("anchor_sample_size", self.anchor_sample_size),
            ("top_bottom_matches", self.top_bottom_matches),
            ("dress_footwear_matches", self.dress_footwear_matches),
            ("three_piece_bottoms", self.three_piece_bottoms),
            ("three_piece_footwear", self.three_piece_footwear),
            ("max_recommendations", self.max_recommendations),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        if self.fetch.tile_size == 0 || self.fetch.tile_size > MAX_TILE_SIZE {
            return Err(Error::InvalidConfig(format!(
                "fetch.tile_size must be between 1 and {MAX_TILE_SIZE}"
            )));
        }
        if self.fetch.timeout_ms == 0 {
            return Err(Error::InvalidConfig("fetch.timeout_ms must be at least 1".into()));
        }
        Ok(())
    }
}

//! Classified garment records.
//!
//! A [`GarmentRecord`] is produced once by classification and read-only afterwards. The category is
//! derived from the clothing type when the record is built, and missing attributes are resolved to
//! [`UNKNOWN`] at the same point, so nothing downstream has to guess.

use crate::vocabulary::category_for;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for attributes the classifier could not determine.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Top,
    Bottom,
    Dress,
    Footwear,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "Top",
            Category::Bottom => "Bottom",
            Category::Dress => "Dress",
            Category::Footwear => "Footwear",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Occasion {
    #[default]
    Casual,
    Formal,
    Sportswear,
    Partywear,
    Travel,
}

impl Occasion {
    pub const ALL: [Occasion; 5] = [
        Occasion::Casual,
        Occasion::Formal,
        Occasion::Sportswear,
        Occasion::Partywear,
        Occasion::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Casual => "Casual",
            Occasion::Formal => "Formal",
            Occasion::Sportswear => "Sportswear",
            Occasion::Partywear => "Partywear",
            Occasion::Travel => "Travel",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Occasion::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownVariant {
                kind: "occasion",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
    Spring,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Winter, Season::Spring, Season::Fall];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Season::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownVariant {
                kind: "season",
                value: s.to_string(),
            })
    }
}

/// Dominant color as extracted from the image, or a free-form description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DominantColor {
    Rgb([u8; 3]),
    Named(String),
}

impl Default for DominantColor {
    fn default() -> Self {
        DominantColor::Named(UNKNOWN.to_string())
    }
}

impl fmt::Display for DominantColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DominantColor::Rgb([r, g, b]) => write!(f, "({r}, {g}, {b})"),
            DominantColor::Named(name) => f.write_str(name),
        }
    }
}

/// One classified clothing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGarment")]
pub struct GarmentRecord {
    pub image_reference: String,
    pub clothing_type: String,
    pub category: Category,
    pub occasion: Occasion,
    pub season: Option<Season>,
    pub material: String,
    pub dominant_color: DominantColor,
}

impl GarmentRecord {
    pub fn new(
        image_reference: impl Into<String>,
        clothing_type: impl Into<String>,
        occasion: Occasion,
    ) -> Self {
        let clothing_type = clothing_type.into();
        Self {
            image_reference: image_reference.into(),
            category: category_for(&clothing_type),
            clothing_type,
            occasion,
            season: None,
            material: UNKNOWN.to_string(),
            dominant_color: DominantColor::default(),
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = non_blank(material.into());
        self
    }

    pub fn with_color(mut self, color: DominantColor) -> Self {
        self.dominant_color = match color {
            DominantColor::Named(name) => DominantColor::Named(non_blank(name)),
            rgb => rgb,
        };
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// True when the record can take part in at least one pairing rule.
    pub fn is_pairable(&self) -> bool {
        self.category != Category::Other
    }

    pub fn to_ref(&self) -> GarmentRef {
        GarmentRef::from(self)
    }
}

fn non_blank(value: String) -> String {
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

/// Wire shape accepted when deserializing records; the category is always re-derived.
#[derive(Deserialize)]
struct RawGarment {
    #[serde(alias = "image_path", alias = "image_url")]
    image_reference: String,
    #[serde(alias = "Clothing_Type")]
    clothing_type: String,
    #[serde(default, alias = "Occasion")]
    occasion: Option<Occasion>,
    #[serde(default, alias = "Season")]
    season: Option<Season>,
    #[serde(default, alias = "Material")]
    material: Option<String>,
    #[serde(default, alias = "Dominant_Color")]
    dominant_color: Option<DominantColor>,
}

impl From<RawGarment> for GarmentRecord {
    fn from(raw: RawGarment) -> Self {
        let mut record = GarmentRecord::new(
            raw.image_reference,
            raw.clothing_type,
            raw.occasion.unwrap_or_default(),
        )
        .with_material(raw.material.unwrap_or_default())
        .with_color(raw.dominant_color.unwrap_or_default());
        record.season = raw.season;
        record
    }
}

/// Lightweight reference to a garment, as carried in recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentRef {
    pub image_reference: String,
    pub clothing_type: String,
    pub category: Category,
}

impl From<&GarmentRecord> for GarmentRef {
    fn from(record: &GarmentRecord) -> Self {
        Self {
            image_reference: record.image_reference.clone(),
            clothing_type: record.clothing_type.clone(),
            category: record.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_derived_from_type() {
        let shirt = GarmentRecord::new("a.png", "Shirt", Occasion::Formal);
        assert_eq!(shirt.category, Category::Top);
        assert!(shirt.is_pairable());

        let belt = GarmentRecord::new("b.png", "Belt", Occasion::Formal);
        assert_eq!(belt.category, Category::Other);
        assert!(!belt.is_pairable());
    }

    #[test]
    fn test_missing_attributes_default_to_unknown() {
        let record: GarmentRecord = serde_json::from_value(json!({
            "image_path": "https://example.com/skirt.png",
            "Clothing_Type": "Skirt",
            "Material": "  "
        }))
        .unwrap();

        assert_eq!(record.image_reference, "https://example.com/skirt.png");
        assert_eq!(record.category, Category::Bottom);
        assert_eq!(record.occasion, Occasion::Casual);
        assert_eq!(record.material, UNKNOWN);
        assert_eq!(record.dominant_color.to_string(), UNKNOWN);
        assert_eq!(record.season, None);
    }

    #[test]
    fn test_supplied_category_is_ignored() {
        let record: GarmentRecord = serde_json::from_value(json!({
            "image_reference": "x.png",
            "clothing_type": "Sneakers",
            "category": "Top",
            "occasion": "Sportswear"
        }))
        .unwrap();
        assert_eq!(record.category, Category::Footwear);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(DominantColor::Rgb([12, 0, 255]).to_string(), "(12, 0, 255)");
        assert_eq!(DominantColor::Named("navy".into()).to_string(), "navy");

        let record: GarmentRecord = serde_json::from_value(json!({
            "image_reference": "x.png",
            "clothing_type": "Top",
            "dominant_color": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(record.dominant_color, DominantColor::Rgb([1, 2, 3]));
    }

    #[test]
    fn test_occasion_parsing() {
        assert_eq!("partywear".parse::<Occasion>().unwrap(), Occasion::Partywear);
        assert_eq!(" Formal ".parse::<Occasion>().unwrap(), Occasion::Formal);
        assert!("Gala".parse::<Occasion>().is_err());
        assert_eq!("fall".parse::<Season>().unwrap(), Season::Fall);
    }
}

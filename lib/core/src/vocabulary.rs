//! Fixed label vocabularies used by zero-shot classification, and the static
//! clothing-type to category mapping.

use crate::garment::Category;

pub const CLOTHING_TYPES: &[&str] = &[
    "Top", "Jean", "Dress", "Bag", "Shoes", "Sneakers", "Jacket", "Sweater", "Cardigan", "Skirt",
    "T-shirt", "Hoodie", "Trousers", "Shirt", "Coat", "Boots", "Blouse", "Jumpsuit", "Sandals",
    "Ballerinas", "Necklace", "Earrings", "Scarf", "Other accessories", "Leggings", "Joggers",
    "Running Shorts", "Shorts", "Tights", "Track Pants", "Loafers", "Mules", "Oxfords", "Derby",
    "Espadrilles", "Flip-Flops", "Clogs", "Platform Shoes", "Wedges", "Ankle Boots",
    "Chelsea Boots", "Knee-High Boots", "Combat Boots", "Hiking Boots", "Slip-Ons", "Clutch",
    "Belt", "Gloves", "Sunglass", "Headwear", "Hat", "Cap", "Beanie", "Jewelry", "Bracelet",
    "Anklet", "Pendant", "Choker", "Wallet", "Handbag", "Tote Bag", "Backpack", "Crossbody Bag",
    "Shoulder Bag", "Satchel", "Duffel Bag", "Messenger Bag",
];

pub const MATERIALS: &[&str] = &[
    "cotton", "denim", "silk", "wool", "leather", "linen", "polyester", "nylon", "velvet", "suede",
    "rayon", "chiffon", "spandex", "canvas", "corduroy", "satin", "tweed", "fleece", "acrylic",
    "cashmere", "viscose", "microfiber", "modal", "terrycloth", "bamboo", "hemp", "merino",
    "alpaca", "tulle", "neoprene", "lycra", "jacquard", "gabardine", "tencel", "organza", "mesh",
    "georgette", "seersucker", "poplin", "taffeta", "lace",
];

const TOPS: &[&str] = &[
    "Top", "T-shirt", "Blouse", "Hoodie", "Sweater", "Jacket", "Cardigan", "Shirt", "Coat",
];

const BOTTOMS: &[&str] = &[
    "Jean", "Trousers", "Skirt", "Joggers", "Leggings", "Shorts", "Running Shorts", "Tights",
    "Track Pants",
];

const DRESSES: &[&str] = &["Dress", "Jumpsuit"];

const FOOTWEAR: &[&str] = &[
    "Sneakers", "Shoes", "Boots", "Sandals", "Ballerinas", "Loafers", "Mules", "Oxfords", "Derby",
    "Espadrilles", "Flip-Flops", "Clogs", "Platform Shoes", "Wedges", "Ankle Boots",
    "Chelsea Boots", "Knee-High Boots", "Combat Boots", "Hiking Boots", "Slip-Ons",
];

/// Resolve the category of a clothing type. Matching is exact; anything
/// unmapped (accessories included) is `Other`.
pub fn category_for(clothing_type: &str) -> Category {
    if TOPS.contains(&clothing_type) {
        Category::Top
    } else if BOTTOMS.contains(&clothing_type) {
        Category::Bottom
    } else if DRESSES.contains(&clothing_type) {
        Category::Dress
    } else if FOOTWEAR.contains(&clothing_type) {
        Category::Footwear
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(category_for("T-shirt"), Category::Top);
        assert_eq!(category_for("Track Pants"), Category::Bottom);
        assert_eq!(category_for("Jumpsuit"), Category::Dress);
        assert_eq!(category_for("Chelsea Boots"), Category::Footwear);
        assert_eq!(category_for("Handbag"), Category::Other);
        assert_eq!(category_for("Spacesuit"), Category::Other);
    }

    #[test]
    fn test_every_mapped_type_is_in_vocabulary() {
        for ty in TOPS.iter().chain(BOTTOMS).chain(DRESSES).chain(FOOTWEAR) {
            assert!(CLOTHING_TYPES.contains(ty), "{ty} missing from vocabulary");
        }
    }
}

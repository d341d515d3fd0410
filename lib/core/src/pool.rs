//! The garments of one analysis run and their per-occasion partitions.

use crate::garment::{Category, GarmentRecord, Occasion};

/// All garments available to one analysis run.
#[derive(Debug, Clone, Default)]
pub struct GarmentPool {
    records: Vec<GarmentRecord>,
}

/// Category subsets of a pool for a single occasion filter.
///
/// Borrowed from the pool and rebuilt for every occasion, so a partition can never outlive the
/// filter it was computed for.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    pub occasion: Option<Occasion>,
    pub tops: Vec<&'a GarmentRecord>,
    pub bottoms: Vec<&'a GarmentRecord>,
    pub dresses: Vec<&'a GarmentRecord>,
    pub footwear: Vec<&'a GarmentRecord>,
}

impl<'a> Partition<'a> {
    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
            && self.bottoms.is_empty()
            && self.dresses.is_empty()
            && self.footwear.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tops.len() + self.bottoms.len() + self.dresses.len() + self.footwear.len()
    }

    /// Every record in the partition, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &'a GarmentRecord> + '_ {
        self.tops
            .iter()
            .chain(&self.bottoms)
            .chain(&self.dresses)
            .chain(&self.footwear)
            .copied()
    }
}

impl GarmentPool {
    pub fn new(records: Vec<GarmentRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split the pool by category, keeping only items for `occasion`.
    /// `None` keeps every occasion.
    pub fn partition(&self, occasion: Option<Occasion>) -> Partition<'_> {
        let mut partition = Partition {
            occasion,
            ..Partition::default()
        };

        for record in &self.records {
            if occasion.is_some_and(|o| o != record.occasion) {
                continue;
            }
            match record.category {
                Category::Top => partition.tops.push(record),
                Category::Bottom => partition.bottoms.push(record),
                Category::Dress => partition.dresses.push(record),
                Category::Footwear => partition.footwear.push(record),
                Category::Other => {}
            }
        }

        partition
    }

    /// Distinct occasions in order of first appearance.
    pub fn occasions(&self) -> Vec<Occasion> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.occasion) {
                seen.push(record.occasion);
            }
        }
        seen
    }
}

impl FromIterator<GarmentRecord> for GarmentPool {
    fn from_iter<I: IntoIterator<Item = GarmentRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> GarmentPool {
        GarmentPool::from_iter([
            GarmentRecord::new("t1", "Shirt", Occasion::Formal),
            GarmentRecord::new("t2", "Hoodie", Occasion::Casual),
            GarmentRecord::new("b1", "Trousers", Occasion::Formal),
            GarmentRecord::new("d1", "Dress", Occasion::Partywear),
            GarmentRecord::new("f1", "Loafers", Occasion::Formal),
            GarmentRecord::new("x1", "Scarf", Occasion::Formal),
        ])
    }

    #[test]
    fn test_partition_filters_by_occasion() {
        let pool = pool();
        let formal = pool.partition(Some(Occasion::Formal));
        assert_eq!(formal.tops.len(), 1);
        assert_eq!(formal.tops[0].image_reference, "t1");
        assert_eq!(formal.bottoms.len(), 1);
        assert!(formal.dresses.is_empty());
        assert_eq!(formal.footwear.len(), 1);
        // the scarf is Other and never partitioned
        assert_eq!(formal.len(), 3);
    }

    #[test]
    fn test_partition_unconstrained() {
        let pool = pool();
        let all = pool.partition(None);
        assert_eq!(all.len(), 5);
        assert_eq!(all.tops.len(), 2);
        assert_eq!(all.iter().count(), 5);
    }

    #[test]
    fn test_empty_partition() {
        let pool = pool();
        assert!(pool.partition(Some(Occasion::Travel)).is_empty());
        assert!(GarmentPool::default().partition(None).is_empty());
    }

    #[test]
    fn test_occasions_in_first_appearance_order() {
        assert_eq!(
            pool().occasions(),
            vec![Occasion::Formal, Occasion::Casual, Occasion::Partywear]
        );
    }
}

use crate::domain::sample::LabeledPoint;
use burn::data::dataset::Dataset;

/// In-memory dataset over labelled points, as consumed by
/// Burn's DataLoader.
pub struct PointDataset {
    samples: Vec<LabeledPoint>,
}

impl PointDataset {
    pub fn new(samples: Vec<LabeledPoint>) -> Self {
        Self { samples }
    }

    /// Feature dimensionality, taken from the first sample.
    /// Empty datasets report 0.
    pub fn feature_dim(&self) -> usize {
        self.samples.first().map(LabeledPoint::dim).unwrap_or(0)
    }
}

impl Dataset<LabeledPoint> for PointDataset {
    fn get(&self, index: usize) -> Option<LabeledPoint> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<LabeledPoint> {
        vec![
            LabeledPoint::new(vec![0.0, 1.0], 0),
            LabeledPoint::new(vec![2.0, 3.0], 1),
        ]
    }

    #[test]
    fn test_len_and_get() {
        let dataset = PointDataset::new(points());
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(1).unwrap().label, 1);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let dataset = PointDataset::new(points());
        assert!(dataset.get(2).is_none());
    }

    #[test]
    fn test_feature_dim() {
        let dataset = PointDataset::new(points());
        assert_eq!(dataset.feature_dim(), 2);
        assert_eq!(PointDataset::new(Vec::new()).feature_dim(), 0);
    }
}

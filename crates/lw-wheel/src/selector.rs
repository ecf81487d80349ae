//! Weighted segment selection
//!
//! Selection is a pure function of a uniform draw in `[0, 1)`. The random
//! source lives elsewhere, so the distribution can be verified without one.

use crate::error::{WheelError, WheelResult};
use crate::segment::{Segment, SegmentCatalog};

/// Precomputed cumulative distribution over a catalog
#[derive(Debug, Clone)]
pub struct WeightedSelector {
    /// Normalized cumulative weights, catalog order
    cumulative: Vec<f64>,
    /// Fallback when round-off leaves the last bucket below the draw
    last_positive: usize,
}

impl WeightedSelector {
    /// Build from raw segments
    pub fn new(segments: &[Segment]) -> WheelResult<Self> {
        if segments.len() < SegmentCatalog::MIN_SEGMENTS {
            return Err(WheelError::InvalidCatalog(format!(
                "need at least {} segments, got {}",
                SegmentCatalog::MIN_SEGMENTS,
                segments.len()
            )));
        }
        if segments.iter().any(|s| !s.weight.is_finite() || s.weight < 0.0) {
            return Err(WheelError::InvalidCatalog("weights must be finite and >= 0".into()));
        }

        let total: f64 = segments.iter().map(|s| s.weight).sum();
        if total <= 0.0 {
            return Err(WheelError::InvalidCatalog("all segment weights are zero".into()));
        }

        let mut acc = 0.0;
        let cumulative = segments
            .iter()
            .map(|s| {
                acc += s.weight / total;
                acc
            })
            .collect();

        let last_positive = segments
            .iter()
            .rposition(|s| s.weight > 0.0)
            .unwrap_or(segments.len() - 1);

        Ok(Self {
            cumulative,
            last_positive,
        })
    }

    /// Build from a validated catalog
    pub fn for_catalog(catalog: &SegmentCatalog) -> WheelResult<Self> {
        Self::new(catalog.segments())
    }

    /// Number of segments covered
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Map a uniform draw to a segment index.
    ///
    /// Returns the first index whose cumulative probability exceeds `draw`.
    pub fn select(&self, draw: f64) -> WheelResult<usize> {
        if !(0.0..1.0).contains(&draw) {
            return Err(WheelError::InvalidInput(format!(
                "random draw {draw} outside [0, 1)"
            )));
        }

        Ok(self
            .cumulative
            .iter()
            .position(|&c| c > draw)
            .unwrap_or(self.last_positive))
    }

    /// Bypass the draw and pick `index` directly
    pub fn select_forced(&self, index: usize) -> WheelResult<usize> {
        if index >= self.cumulative.len() {
            return Err(WheelError::InvalidInput(format!(
                "forced index {index} out of range (0..{})",
                self.cumulative.len()
            )));
        }
        Ok(index)
    }

    /// Normalized probability of segment `index`
    pub fn probability(&self, index: usize) -> Option<f64> {
        let upper = *self.cumulative.get(index)?;
        let lower = if index == 0 { 0.0 } else { self.cumulative[index - 1] };
        Some(upper - lower)
    }

    /// All normalized probabilities, catalog order
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.len()).filter_map(|i| self.probability(i)).collect()
    }
}

/// One-shot weighted selection over `segments`
pub fn select(segments: &[Segment], draw: f64) -> WheelResult<usize> {
    WeightedSelector::new(segments)?.select(draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn three_way() -> Vec<Segment> {
        vec![
            Segment::prize(1, "a", 1.0),
            Segment::prize(2, "b", 2.0),
            Segment::prize(3, "c", 1.0),
        ]
    }

    #[test]
    fn test_cumulative_boundaries() {
        let selector = WeightedSelector::new(&three_way()).unwrap();
        assert_eq!(selector.select(0.0).unwrap(), 0);
        assert_eq!(selector.select(0.2499).unwrap(), 0);
        assert_eq!(selector.select(0.25).unwrap(), 1);
        assert_eq!(selector.select(0.7499).unwrap(), 1);
        assert_eq!(selector.select(0.75).unwrap(), 2);
        assert_eq!(selector.select(0.999_999_999).unwrap(), 2);
    }

    #[test]
    fn test_lucky_spin_zonk_draw() {
        let catalog = SegmentCatalog::lucky_spin();
        let selector = WeightedSelector::for_catalog(&catalog).unwrap();
        // 6 prizes below ZONK cover 0.1125; ZONK spans up to 0.9625
        assert_eq!(selector.select(0.90).unwrap(), 6);
        assert_eq!(selector.select(0.05).unwrap(), 2);
        assert_eq!(selector.select(0.97).unwrap(), 7);
    }

    #[test]
    fn test_rejects_out_of_range_draw() {
        let selector = WeightedSelector::new(&three_way()).unwrap();
        for draw in [-0.01, 1.0, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                selector.select(draw),
                Err(WheelError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_all_zero_weights() {
        let segments = vec![Segment::prize(1, "a", 0.0), Segment::prize(2, "b", 0.0)];
        assert!(matches!(
            WeightedSelector::new(&segments),
            Err(WheelError::InvalidCatalog(_))
        ));
        assert!(matches!(select(&segments, 0.5), Err(WheelError::InvalidCatalog(_))));
    }

    #[test]
    fn test_zero_weight_segment_never_selected() {
        let segments = vec![
            Segment::prize(1, "a", 1.0),
            Segment::prize(2, "never", 0.0),
            Segment::prize(3, "c", 1.0),
            Segment::prize(4, "never-either", 0.0),
        ];
        let selector = WeightedSelector::new(&segments).unwrap();
        for i in 0..1000 {
            let idx = selector.select(i as f64 / 1000.0).unwrap();
            assert!(idx == 0 || idx == 2, "picked zero-weight segment {idx}");
        }
    }

    #[test]
    fn test_forced_selection_all_indices() {
        let catalog = SegmentCatalog::lucky_spin();
        let selector = WeightedSelector::for_catalog(&catalog).unwrap();
        for k in 0..catalog.len() {
            assert_eq!(selector.select_forced(k).unwrap(), k);
        }
        assert!(matches!(
            selector.select_forced(catalog.len()),
            Err(WheelError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_probabilities_normalized() {
        let selector = WeightedSelector::new(&three_way()).unwrap();
        let probs = selector.probabilities();
        assert_relative_eq!(probs[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(probs[1], 0.50, epsilon = 1e-12);
        assert_relative_eq!(probs[2], 0.25, epsilon = 1e-12);
        assert_eq!(selector.probability(3), None);
    }

    #[test]
    fn test_index_always_in_range() {
        let selector = WeightedSelector::for_catalog(&SegmentCatalog::lucky_spin()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50_000 {
            let idx = selector.select(rng.random::<f64>()).unwrap();
            assert!(idx < 9);
        }
    }

    #[test]
    fn test_distribution_converges() {
        let catalog = SegmentCatalog::lucky_spin();
        let selector = WeightedSelector::for_catalog(&catalog).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let draws = 200_000;

        let mut counts = vec![0u64; catalog.len()];
        for _ in 0..draws {
            counts[selector.select(rng.random::<f64>()).unwrap()] += 1;
        }

        for (i, &count) in counts.iter().enumerate() {
            let observed = count as f64 / draws as f64;
            let expected = selector.probability(i).unwrap();
            assert!(
                (observed - expected).abs() < 0.005,
                "segment {i}: observed {observed}, expected {expected}"
            );
        }
    }
}

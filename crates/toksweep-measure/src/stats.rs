//! Robust sample reduction: median and median absolute deviation.
//!
//! Encode timings are right-skewed by allocator and cache effects, so the
//! reduction uses median/MAD instead of mean/stddev.

/// Median of a sample set; `0.0` for an empty set.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation around the sample median.
pub fn median_absolute_deviation(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let center = median(samples);
    let deviations: Vec<f64> = samples.iter().map(|s| (s - center).abs()).collect();
    median(&deviations)
}

/// Whether the per-run samples carry enough spread to be worth retaining in
/// the provenance payload: `(max - min) >= 0.25 * median`, or any nonzero
/// spread when the median is exactly zero.
pub fn spread_is_significant(samples: &[f64]) -> bool {
    if samples.len() < 2 {
        return false;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for sample in samples {
        min = min.min(*sample);
        max = max.max(*sample);
    }
    let spread = max - min;
    let center = median(samples);
    if center == 0.0 {
        spread > 0.0
    } else {
        spread >= 0.25 * center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_and_mad_match_hand_computed_reference() {
        let samples = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(median(&samples), 3.0);
        // deviations: [2, 1, 0, 1, 97] -> median 1
        assert_eq!(median_absolute_deviation(&samples), 1.0);
    }

    #[test]
    fn even_sample_count_averages_middle_pair() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn empty_samples_reduce_to_zero() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median_absolute_deviation(&[]), 0.0);
    }

    #[test]
    fn spread_rule_follows_quarter_median() {
        assert!(spread_is_significant(&[1.0, 1.0, 2.0]));
        assert!(!spread_is_significant(&[1.0, 1.0, 1.01]));
        // zero median keeps any nonzero spread
        assert!(spread_is_significant(&[0.0, 0.0, 0.1]));
        assert!(!spread_is_significant(&[0.0, 0.0, 0.0]));
        assert!(!spread_is_significant(&[5.0]));
    }
}

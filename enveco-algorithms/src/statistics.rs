//! Descriptive statistics over height and intensity samples
//!
//! Conventions: the standard deviation is the sample (n - 1) deviation and
//! is defined as 0 for fewer than two samples; quantiles interpolate
//! linearly between order statistics at position `q * (n - 1)`.

/// Arithmetic mean, 0 for an empty sample
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, 0 for fewer than two values
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Ratio that yields 0 instead of NaN/inf for a zero denominator
#[inline]
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Interpolated quantile of an ascending sample
///
/// `q` is clamped to `[0, 1]`. Returns `None` for an empty sample.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Median of an ascending sample
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

/// Number of values strictly below `threshold` in an ascending sample
#[inline]
pub fn count_below_sorted(sorted: &[f64], threshold: f64) -> usize {
    sorted.partition_point(|&v| v < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        // sample deviation, n - 1 = 7
        assert_relative_eq!(sample_std(&values), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_std_degenerate_samples() {
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[3.5]), 0.0);
        assert_eq!(sample_std(&[3.5, 3.5, 3.5]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&sorted, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile_sorted(&sorted, 1.0).unwrap(), 4.0);
        assert_relative_eq!(quantile_sorted(&sorted, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile_sorted(&sorted, 0.1).unwrap(), 1.3, epsilon = 1e-12);
        assert_relative_eq!(quantile_sorted(&sorted, 0.99).unwrap(), 3.97, epsilon = 1e-12);
        assert!(quantile_sorted(&[], 0.5).is_none());
    }

    #[test]
    fn test_median() {
        assert_relative_eq!(median_sorted(&[1.0, 3.0, 10.0]).unwrap(), 3.0);
        assert_relative_eq!(median_sorted(&[1.0, 3.0, 10.0, 20.0]).unwrap(), 6.5);
        assert_relative_eq!(median_sorted(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_relative_eq!(safe_ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn test_count_below_is_strict() {
        let sorted = [1.0, 2.0, 2.0, 3.0];
        assert_eq!(count_below_sorted(&sorted, 2.0), 1);
        assert_eq!(count_below_sorted(&sorted, 2.5), 3);
        assert_eq!(count_below_sorted(&sorted, 0.0), 0);
        assert_eq!(count_below_sorted(&sorted, 10.0), 4);
    }
}

//! LiDAR metric extraction
//!
//! Computes the height, intensity, percentile and height-band statistics
//! of the vegetation returns of a plot.

use crate::statistics::{count_below_sorted, mean, median_sorted, quantile_sorted, safe_ratio, sample_std};
use enveco_core::{
    Error, LidarPointCloud, MetricVector, Result, HEIGHT_BAND_MULTIPLIERS, HEIGHT_PERCENTILES,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Default minimum height of a vegetation return
pub const DEFAULT_MIN_HEIGHT: f64 = 1.5;

/// Default field plot radius
pub const DEFAULT_PLOT_RADIUS: f64 = 9.0;

/// Configuration for plot metric extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Returns at or above this height count as vegetation
    pub min_height: f64,
    /// Radius of the circular field plot
    pub plot_radius: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            min_height: DEFAULT_MIN_HEIGHT,
            plot_radius: DEFAULT_PLOT_RADIUS,
        }
    }
}

impl MetricsConfig {
    /// Set the vegetation height threshold
    pub fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    /// Set the plot radius
    pub fn with_plot_radius(mut self, plot_radius: f64) -> Self {
        self.plot_radius = plot_radius;
        self
    }
}

/// Calculate LiDAR metrics for a plot point cloud
///
/// Vegetation returns are those with `z >= min_height`. All statistics
/// except the penetration ratio are computed over vegetation returns only.
///
/// # Arguments
/// * `cloud` - Points of a single plot, usually already filtered to its footprint
/// * `min_height` - Vegetation height threshold
///
/// # Returns
/// * `Result<MetricVector>` - `Error::NoData` when the cloud is empty or
///   no return reaches `min_height`
///
/// # Example
/// ```rust
/// use enveco_core::{LidarPoint, PointCloud};
/// use enveco_algorithms::calculate_metrics;
///
/// fn main() -> enveco_core::Result<()> {
///     let cloud = PointCloud::from_points(vec![
///         LidarPoint::new(0.0, 0.0, 0.0, 10.0, 1),
///         LidarPoint::new(0.0, 0.0, 5.0, 20.0, 1),
///     ]);
///
///     let metrics = calculate_metrics(&cloud, 1.5)?;
///     assert_eq!(metrics.hmax, 5.0);
///     assert_eq!(metrics.penetration, 0.5);
///     Ok(())
/// }
/// ```
pub fn calculate_metrics(cloud: &LidarPointCloud, min_height: f64) -> Result<MetricVector> {
    if !min_height.is_finite() {
        return Err(Error::InvalidData(format!(
            "minimum height must be finite, got {min_height}"
        )));
    }

    if cloud.is_empty() {
        return Err(Error::NoData("point cloud is empty".to_string()));
    }

    let (heights, intensities): (Vec<f64>, Vec<f64>) = cloud
        .iter()
        .filter(|p| p.z() >= min_height)
        .map(|p| (p.z(), f64::from(p.intensity)))
        .unzip();

    if heights.is_empty() {
        return Err(Error::NoData(format!(
            "no returns at or above {min_height} among {} points",
            cloud.len()
        )));
    }

    let n_vege = heights.len();
    let sorted_heights: Vec<f64> = heights.iter().copied().sorted_by(f64::total_cmp).collect();
    let sorted_intensities: Vec<f64> = intensities.iter().copied().sorted_by(f64::total_cmp).collect();

    // Both samples are non-empty past the NoData check
    let hmax = sorted_heights[n_vege - 1];
    let hmean = mean(&heights);
    let hstd = sample_std(&heights);
    let penetration = n_vege as f64 / cloud.len() as f64;
    let cv = safe_ratio(hstd, hmean);

    let imax = sorted_intensities[n_vege - 1];
    let imean = mean(&intensities);
    let imedian = median_sorted(&sorted_intensities).unwrap_or(0.0);

    let height_percentiles =
        HEIGHT_PERCENTILES.map(|q| quantile_sorted(&sorted_heights, q).unwrap_or(hmax));

    let level = (hmax - min_height) / 10.0;
    let height_proportions = HEIGHT_BAND_MULTIPLIERS.map(|k| {
        let threshold = min_height + k * level;
        count_below_sorted(&sorted_heights, threshold) as f64 / n_vege as f64
    });

    tracing::debug!(
        points = cloud.len(),
        vegetation = n_vege,
        hmax,
        penetration,
        "calculated plot metrics"
    );

    Ok(MetricVector {
        hmax,
        hmean,
        hstd,
        penetration,
        cv,
        imax,
        imean,
        imedian,
        height_percentiles,
        height_proportions,
        n_points: n_vege,
    })
}

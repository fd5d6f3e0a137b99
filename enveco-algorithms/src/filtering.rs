//! Spatial filtering of plot point clouds

use enveco_core::{Error, Point2d, PointCloud, Positioned, Result};

/// Circular field plot filter
/// 
/// Keeps the points whose horizontal euclidean distance to `center` is at
/// most `radius`. Point order is preserved and the input is not modified.
/// 
/// # Arguments
/// * `cloud` - Input point cloud
/// * `center` - Horizontal plot centre
/// * `radius` - Plot radius, in the same units as the coordinates
/// 
/// # Returns
/// * `Result<PointCloud<T>>` - Points inside the plot footprint
/// 
/// # Example
/// ```rust
/// use enveco_core::{LidarPoint, Point2d, PointCloud};
/// use enveco_algorithms::circular_plot_filter;
/// 
/// fn main() -> enveco_core::Result<()> {
///     let cloud = PointCloud::from_points(vec![
///         LidarPoint::new(0.0, 0.0, 12.0, 40.0, 1),
///         LidarPoint::new(6.0, 6.0, 8.0, 35.0, 2),
///         LidarPoint::new(9.0, 9.0, 3.0, 20.0, 1), // outside the 9 m plot
///     ]);
/// 
///     let plot = circular_plot_filter(&cloud, &Point2d::new(0.0, 0.0), 9.0)?;
///     assert_eq!(plot.len(), 2);
///     Ok(())
/// }
/// ```
pub fn circular_plot_filter<T>(
    cloud: &PointCloud<T>,
    center: &Point2d,
    radius: f64,
) -> Result<PointCloud<T>>
where
    T: Positioned + Clone,
{
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::InvalidData(format!(
            "plot radius must be a non-negative number, got {radius}"
        )));
    }

    if cloud.is_empty() {
        return Ok(PointCloud::new());
    }

    Ok(cloud
        .iter()
        .filter(|point| horizontal_distance(&point.position().xy(), center) <= radius)
        .cloned()
        .collect())
}

#[inline]
fn horizontal_distance(a: &Point2d, b: &Point2d) -> f64 {
    nalgebra::distance(a, b)
}

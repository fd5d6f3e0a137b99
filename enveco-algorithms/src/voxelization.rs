//! Voxelization of plot point clouds
//!
//! Bins a point cloud into a fixed 3D histogram around the plot centre,
//! optionally collapsing it to occupancy, filling ground-to-canopy columns
//! and masking to the inscribed circle.

use enveco_core::{Error, Point2d, Point3d, PointCloud, Positioned, Result, VoxelGrid};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Default number of horizontal bins per axis
pub const DEFAULT_HORIZONTAL_BINS: usize = 61;

/// Default number of vertical bins
pub const DEFAULT_VERTICAL_BINS: usize = 126;

/// Default half-width of the horizontal grid
pub const DEFAULT_EXTENT: f64 = 9.0;

/// Default top of the vertical grid
pub const DEFAULT_MAX_HEIGHT: f64 = 42.0;

/// Widening of the lower horizontal bounds so points on the plot edge stay in
pub const BOUNDARY_EPSILON: f64 = 0.001;

/// Configuration for voxel grid construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelGridConfig {
    /// Half-width of the horizontal grid around the plot centre
    pub extent: f64,
    /// Top of the vertical grid, the bottom is always 0
    pub max_height: f64,
    /// Bins along each horizontal axis
    pub horizontal_bins: usize,
    /// Bins along the vertical axis
    pub vertical_bins: usize,
    /// Collapse counts to 0/1 occupancy
    pub binarize: bool,
    /// Mark every column solid from the ground to its highest occupied cell
    pub fill_below_max_occupied: bool,
    /// Zero the columns outside the circle inscribed in the horizontal grid
    pub circular_mask: bool,
}

impl Default for VoxelGridConfig {
    fn default() -> Self {
        Self {
            extent: DEFAULT_EXTENT,
            max_height: DEFAULT_MAX_HEIGHT,
            horizontal_bins: DEFAULT_HORIZONTAL_BINS,
            vertical_bins: DEFAULT_VERTICAL_BINS,
            binarize: false,
            fill_below_max_occupied: false,
            circular_mask: false,
        }
    }
}

impl VoxelGridConfig {
    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_max_height(mut self, max_height: f64) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_bins(mut self, horizontal: usize, vertical: usize) -> Self {
        self.horizontal_bins = horizontal;
        self.vertical_bins = vertical;
        self
    }

    pub fn with_binarize(mut self, binarize: bool) -> Self {
        self.binarize = binarize;
        self
    }

    pub fn with_fill_below_max_occupied(mut self, fill: bool) -> Self {
        self.fill_below_max_occupied = fill;
        self
    }

    pub fn with_circular_mask(mut self, mask: bool) -> Self {
        self.circular_mask = mask;
        self
    }

    /// Grid dimensions `(x, y, z)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.horizontal_bins, self.horizontal_bins, self.vertical_bins)
    }

    /// Whether every grid built with this configuration holds only 0/1 cells
    ///
    /// Filling sets each column to 1 up to its top cell and leaves the rest
    /// empty, so it yields occupancy even without binarizing.
    pub fn produces_occupancy(&self) -> bool {
        self.binarize || self.fill_below_max_occupied
    }

    fn validate(&self) -> Result<()> {
        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(Error::InvalidData(format!(
                "voxel grid extent must be positive, got {}",
                self.extent
            )));
        }
        if !self.max_height.is_finite() || self.max_height <= 0.0 {
            return Err(Error::InvalidData(format!(
                "voxel grid max height must be positive, got {}",
                self.max_height
            )));
        }
        if self.horizontal_bins == 0 || self.vertical_bins == 0 {
            return Err(Error::InvalidData(
                "voxel grid bin counts must be greater than 0".to_string()
            ));
        }
        Ok(())
    }
}

/// Bin edges of a voxel grid along each axis
#[derive(Debug, Clone, PartialEq)]
pub struct GridEdges {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl GridEdges {
    /// Edges for a plot centred at `center`
    ///
    /// Horizontal edges partition `[c - extent - BOUNDARY_EPSILON, c + extent]`,
    /// vertical edges partition `[0, max_height]`.
    pub fn for_plot(center: &Point2d, config: &VoxelGridConfig) -> Self {
        let axis = |c: f64| {
            linspace(
                c - config.extent - BOUNDARY_EPSILON,
                c + config.extent,
                config.horizontal_bins,
            )
        };
        Self {
            x: axis(center.x),
            y: axis(center.y),
            z: linspace(0.0, config.max_height, config.vertical_bins),
        }
    }

    /// Voxel index of a position, `None` when it falls outside the grid
    pub fn locate(&self, p: &Point3d) -> Option<(usize, usize, usize)> {
        Some((bin_index(&self.x, p.x)?, bin_index(&self.y, p.y)?, bin_index(&self.z, p.z)?))
    }

    fn origin(&self) -> Point3d {
        Point3d::new(self.x[0], self.y[0], self.z[0])
    }

    fn bin_size(&self) -> Vector3<f64> {
        let width = |edges: &[f64]| (edges[edges.len() - 1] - edges[0]) / (edges.len() - 1) as f64;
        Vector3::new(width(&self.x), width(&self.y), width(&self.z))
    }
}

/// `bins + 1` evenly spaced edges from `start` to `end`, both included
pub fn linspace(start: f64, end: f64, bins: usize) -> Vec<f64> {
    let step = (end - start) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| start + i as f64 * step).collect();
    edges.push(end);
    edges
}

/// Histogram bin of `value` over ascending `edges`
///
/// Bin `i` covers `[edges[i], edges[i + 1])`, except the last bin which
/// also includes its right edge.
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let (&first, &last) = (edges.first()?, edges.last()?);
    if edges.len() < 2 || value.is_nan() || value < first || value > last {
        return None;
    }
    if value == last {
        return Some(edges.len() - 2);
    }
    Some(edges.partition_point(|&e| e <= value) - 1)
}

/// Build a voxel grid from a plot point cloud
///
/// Counts returns per cell over a grid of `config.shape()` cells around
/// `center`. Points outside the grid are dropped. The optional steps run in
/// order: binarize, fill below the highest occupied cell, circular mask.
///
/// # Arguments
/// * `cloud` - Input point cloud
/// * `center` - Horizontal plot centre
/// * `config` - Grid geometry and post-processing flags
///
/// # Returns
/// * `Result<VoxelGrid>` - Grid with exactly `config.shape()` cells
///
/// # Example
/// ```rust
/// use enveco_core::{LidarPoint, Point2d, PointCloud};
/// use enveco_algorithms::{voxelize, VoxelGridConfig};
///
/// fn main() -> enveco_core::Result<()> {
///     let cloud = PointCloud::from_points(vec![
///         LidarPoint::new(0.0, 0.0, 10.0, 40.0, 1),
///         LidarPoint::new(1.0, -2.0, 20.0, 35.0, 2),
///     ]);
///
///     let grid = voxelize(&cloud, &Point2d::new(0.0, 0.0), &VoxelGridConfig::default())?;
///     assert_eq!(grid.shape(), (61, 61, 126));
///     assert_eq!(grid.total_count(), 2);
///     Ok(())
/// }
/// ```
pub fn voxelize<T: Positioned>(
    cloud: &PointCloud<T>,
    center: &Point2d,
    config: &VoxelGridConfig,
) -> Result<VoxelGrid> {
    config.validate()?;

    let edges = GridEdges::for_plot(center, config);
    let mut grid = VoxelGrid::zeros(config.shape(), edges.origin(), edges.bin_size());

    let mut dropped = 0usize;
    {
        let data = grid.data_mut();
        for point in cloud.iter() {
            match edges.locate(&point.position()) {
                Some(idx) => data[idx] = data[idx].saturating_add(1),
                None => dropped += 1,
            }
        }
    }

    if config.binarize {
        grid.binarize();
    }
    if config.fill_below_max_occupied {
        grid.fill_below_max_occupied();
    }
    if config.circular_mask {
        grid.apply_circular_mask();
    }

    tracing::debug!(
        points = cloud.len(),
        dropped,
        occupied = grid.occupied_count(),
        "voxelized plot"
    );

    Ok(grid)
}

//! # enveco
//!
//! LiDAR feature extraction for forest inventory regression.
//!
//! This is the umbrella crate that provides convenient access to all enveco
//! functionality. You can use this crate to get everything in one place, or
//! use individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: LiDAR points, point clouds, voxel grids and metric vectors
//! - **Algorithms**: circular plot filter, metric extraction, voxelization, batch drivers
//! - **I/O**: decoded point lists, plot tables, metric tables, `.npy` voxel grids
//!
//! ## Quick Start
//!
//! ```rust
//! use enveco::prelude::*;
//!
//! let cloud = PointCloud::from_points(vec![
//!     LidarPoint::new(0.0, 0.0, 0.0, 10.0, 1),
//!     LidarPoint::new(1.0, 1.0, 14.0, 35.0, 1),
//!     LidarPoint::new(-2.0, 0.5, 18.0, 42.0, 2),
//! ]);
//! let center = Point2d::new(0.0, 0.0);
//!
//! let plot = circular_plot_filter(&cloud, &center, 9.0).unwrap();
//! let metrics = calculate_metrics(&plot, 1.5).unwrap();
//! assert_eq!(metrics.n_points, 2);
//!
//! let grid = voxelize(&plot, &center, &VoxelGridConfig::default()).unwrap();
//! assert_eq!(grid.shape(), (61, 61, 126));
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core, algorithms and io
//! - `algorithms`: Feature extraction algorithms
//! - `io`: File format support
//! - `all`: Enables all features

// Re-export core functionality
pub use enveco_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use enveco_algorithms as algorithms;

#[cfg(feature = "io")]
pub use enveco_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use enveco_core::*;
    
    #[cfg(feature = "algorithms")]
    pub use enveco_algorithms::*;
    
    #[cfg(feature = "io")]
    pub use enveco_io::*;
}

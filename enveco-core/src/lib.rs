//! Core data structures and traits for enveco
//! 
//! This crate provides the fundamental types for LiDAR plot feature extraction:
//! attributed LiDAR points, point clouds, voxel grids, metric vectors and the
//! traits that connect them to point sources.

pub mod point;
pub mod point_cloud;
pub mod voxel;
pub mod metrics;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use voxel::*;
pub use metrics::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector3};

// Type aliases for easier imports
pub type Point = LidarPoint;
pub type Cloud = LidarPointCloud;

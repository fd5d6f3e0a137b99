//! # Enveco Algorithms
//!
//! Feature extraction from LiDAR plot point clouds.
//!
//! This crate turns decoded point clouds into model inputs: a circular plot
//! filter, scalar height/intensity metrics for tabular models, fixed-size
//! voxel grids for volumetric models, and parallel batch drivers that run
//! them over many field plots.

pub mod config;
pub mod filtering;
pub mod statistics;
pub mod metrics;
pub mod voxelization;
pub mod batch;

// Re-export commonly used items
pub use config::*;
pub use filtering::*;
pub use metrics::*;
pub use voxelization::*;
pub use batch::*;

//! Core traits for enveco

use crate::{error::Result, point::*, point_cloud::*};

/// Anything with a 3D position that can be filtered or binned
pub trait Positioned {
    fn position(&self) -> Point3d;
}

impl Positioned for LidarPoint {
    #[inline]
    fn position(&self) -> Point3d {
        self.position
    }
}

impl Positioned for Point3d {
    #[inline]
    fn position(&self) -> Point3d {
        *self
    }
}

/// Axis aligned extent of a point set
pub trait Bounded {
    /// Get the (min, max) corners, or `None` for an empty set
    fn bounding_box(&self) -> Option<(Point3d, Point3d)>;
}

impl<T: Positioned> Bounded for PointCloud<T> {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        let mut iter = self.points.iter().map(Positioned::position);
        let first = iter.next()?;

        let mut min = first;
        let mut max = first;

        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }
}

/// A field plot: identifier plus horizontal centre
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlotLocation {
    pub id: String,
    pub center: Point2d,
}

impl PlotLocation {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            center: Point2d::new(x, y),
        }
    }
}

/// Supplies the decoded point cloud covering a plot
///
/// Implementations must be shareable across threads since batch
/// extraction loads plots in parallel.
pub trait PointCloudSource: Sync {
    fn load(&self, plot: &PlotLocation) -> Result<LidarPointCloud>;
}

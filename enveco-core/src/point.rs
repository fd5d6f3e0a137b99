//! Point types and related functionality

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A horizontal (x, y) location with double precision coordinates
pub type Point2d = Point2<f64>;

/// A single decoded LiDAR return
///
/// Coordinates are in plot-local (or projected) units with `z` as height
/// above ground. Points are immutable once read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LidarPoint {
    pub position: Point3d,
    pub intensity: f32,
    pub num_returns: u8,
}

impl LidarPoint {
    pub fn new(x: f64, y: f64, z: f64, intensity: f32, num_returns: u8) -> Self {
        Self {
            position: Point3d::new(x, y, z),
            intensity,
            num_returns,
        }
    }

    /// Height of the return
    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Horizontal euclidean distance to `center`
    #[inline]
    pub fn horizontal_distance(&self, center: &Point2d) -> f64 {
        let dx = self.position.x - center.x;
        let dy = self.position.y - center.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for LidarPoint {
    fn default() -> Self {
        Self {
            position: Point3d::origin(),
            intensity: 0.0,
            num_returns: 1,
        }
    }
}

impl From<LidarPoint> for Point3d {
    fn from(point: LidarPoint) -> Self {
        point.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let point = LidarPoint::new(3.0, 4.0, 25.0, 10.0, 1);
        assert_relative_eq!(point.horizontal_distance(&Point2d::origin()), 5.0);
        assert_relative_eq!(point.horizontal_distance(&Point2d::new(3.0, 4.0)), 0.0);
    }

    #[test]
    fn test_default_point() {
        let point = LidarPoint::default();
        assert_eq!(point.z(), 0.0);
        assert_eq!(point.num_returns, 1);
    }
}

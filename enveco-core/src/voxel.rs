//! Fixed-size voxel grids of return counts or occupancy indicators

use crate::point::Point3d;
use nalgebra::Vector3;
use ndarray::{Array3, ArrayView1, Axis, Zip};
use serde::{Deserialize, Serialize};

/// A regular 3D lattice indexed `[x, y, z]`
///
/// Cell `(i, j, k)` covers the box starting at
/// `origin + (i, j, k) * bin_size`. The dimensions never change after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelGrid {
    data: Array3<u32>,
    origin: Point3d,
    bin_size: Vector3<f64>,
}

impl VoxelGrid {
    /// Create an all-zero grid
    pub fn zeros(shape: (usize, usize, usize), origin: Point3d, bin_size: Vector3<f64>) -> Self {
        Self {
            data: Array3::zeros(shape),
            origin,
            bin_size,
        }
    }

    /// Wrap existing counts
    pub fn from_array(data: Array3<u32>, origin: Point3d, bin_size: Vector3<f64>) -> Self {
        Self { data, origin, bin_size }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn bin_size(&self) -> Vector3<f64> {
        self.bin_size
    }

    pub fn data(&self) -> &Array3<u32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array3<u32> {
        &mut self.data
    }

    pub fn into_array(self) -> Array3<u32> {
        self.data
    }

    /// Value of a single cell, `None` when out of bounds
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<u32> {
        self.data.get((i, j, k)).copied()
    }

    /// Sum of all cell values
    pub fn total_count(&self) -> u64 {
        self.data.iter().map(|&v| u64::from(v)).sum()
    }

    /// Number of non-zero cells
    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// True when every cell is 0 or 1
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v <= 1)
    }

    /// Vertical column at horizontal index `(i, j)`
    pub fn column(&self, i: usize, j: usize) -> ArrayView1<'_, u32> {
        self.data.slice(ndarray::s![i, j, ..])
    }

    /// Number of non-zero cells in column `(i, j)`
    pub fn column_occupancy(&self, i: usize, j: usize) -> usize {
        self.column(i, j).iter().filter(|&&v| v != 0).count()
    }

    /// Highest vertical index holding a non-zero value in column `(i, j)`
    pub fn column_top(&self, i: usize, j: usize) -> Option<usize> {
        self.column(i, j).iter().rposition(|&v| v != 0)
    }

    /// Collapse counts to 0/1 occupancy
    pub fn binarize(&mut self) {
        self.data.mapv_inplace(|v| u32::from(v != 0));
    }

    /// Mark every cell from the ground up to the highest occupied cell
    ///
    /// Columns with no returns get their ground cell (index 0) marked.
    /// All cells at or below the top index are set to 1.
    pub fn fill_below_max_occupied(&mut self) {
        for mut column in self.data.lanes_mut(Axis(2)) {
            let top = column.iter().rposition(|&v| v != 0).unwrap_or(0);
            column
                .iter_mut()
                .take(top + 1)
                .for_each(|v| *v = 1);
        }
    }

    /// Zero every column outside the circle inscribed in the horizontal grid
    ///
    /// The circle is centred on the integer grid midpoint with a radius of
    /// half the horizontal grid width.
    pub fn apply_circular_mask(&mut self) {
        let (nx, ny, _) = self.data.dim();
        let center = ((nx / 2) as f64, (ny / 2) as f64);
        let radius = nx as f64 / 2.0;

        Zip::indexed(self.data.lanes_mut(Axis(2))).for_each(|(i, j), mut column| {
            let dx = i as f64 - center.0;
            let dy = j as f64 - center.1;
            if (dx * dx + dy * dy).sqrt() > radius {
                column.fill(0);
            }
        });
    }
}

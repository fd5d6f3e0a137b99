//! Voxel grids as NumPy `.npy` arrays
//!
//! Format version 1.0, C order, shape `(x, y, z)`. Occupancy grids are
//! stored as `|u1`, count grids as `<u4`. The caller picks the element type
//! so every grid of one run shares it.

use enveco_core::{Error, Result, VoxelGrid};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const MAGIC: &[u8] = b"\x93NUMPY";
const HEADER_ALIGN: usize = 64;

/// Element type of a written grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpyDtype {
    /// One byte per cell, for 0/1 occupancy grids
    U8,
    /// Little-endian `u32` per cell, for return counts
    U32,
}

impl NpyDtype {
    /// `U8` for occupancy grids, `U32` for count grids
    pub fn for_grid_kind(occupancy: bool) -> Self {
        if occupancy {
            NpyDtype::U8
        } else {
            NpyDtype::U32
        }
    }

    fn descr(self) -> &'static str {
        match self {
            NpyDtype::U8 => "|u1",
            NpyDtype::U32 => "<u4",
        }
    }
}

/// Writer for `.npy` voxel grids
pub struct NpyWriter;

impl NpyWriter {
    /// Write a voxel grid to a `.npy` file
    pub fn write_grid<P: AsRef<Path>>(grid: &VoxelGrid, dtype: NpyDtype, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        Self::write_to(grid, dtype, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a voxel grid to any writer
    ///
    /// Fails with [`Error::InvalidData`] when a cell does not fit `dtype`.
    pub fn write_to<W: Write>(grid: &VoxelGrid, dtype: NpyDtype, writer: &mut W) -> Result<()> {
        let body = match dtype {
            NpyDtype::U8 => grid
                .data()
                .iter()
                .map(|&v| {
                    u8::try_from(v).map_err(|_| {
                        Error::InvalidData(format!("cell value {v} does not fit a u8 grid"))
                    })
                })
                .collect::<Result<Vec<u8>>>()?,
            NpyDtype::U32 => grid.data().iter().flat_map(|v| v.to_le_bytes()).collect(),
        };

        writer.write_all(&Self::header(dtype.descr(), grid.shape()))?;
        writer.write_all(&body)?;
        Ok(())
    }

    /// Magic, version, header length and the padded header dictionary
    fn header(descr: &str, shape: (usize, usize, usize)) -> Vec<u8> {
        let mut dict = format!(
            "{{'descr': '{descr}', 'fortran_order': False, 'shape': ({}, {}, {}), }}",
            shape.0, shape.1, shape.2
        );
        // magic (6) + version (2) + length (2) + dict + newline
        let unpadded = MAGIC.len() + 4 + dict.len() + 1;
        let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
        dict.extend(std::iter::repeat(' ').take(padding));
        dict.push('\n');

        let mut out = Vec::with_capacity(MAGIC.len() + 4 + dict.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(dict.len() as u16).to_le_bytes());
        out.extend_from_slice(dict.as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enveco_core::Point3d;
    use nalgebra::Vector3;

    fn grid(shape: (usize, usize, usize)) -> VoxelGrid {
        VoxelGrid::zeros(shape, Point3d::origin(), Vector3::new(0.3, 0.3, 0.3))
    }

    fn header_len(bytes: &[u8]) -> usize {
        u16::from_le_bytes([bytes[8], bytes[9]]) as usize
    }

    #[test]
    fn test_count_grid_layout() {
        let mut g = grid((2, 3, 4));
        g.data_mut()[[1, 2, 3]] = 300;
        g.data_mut()[[0, 0, 1]] = 2;

        let mut bytes = Vec::new();
        NpyWriter::write_to(&g, NpyDtype::U32, &mut bytes).unwrap();

        assert_eq!(&bytes[..6], MAGIC);
        assert_eq!(&bytes[6..8], &[1, 0]);
        let data_start = 10 + header_len(&bytes);
        assert_eq!(data_start % HEADER_ALIGN, 0);

        let header = std::str::from_utf8(&bytes[10..data_start]).unwrap();
        assert!(header.contains("'descr': '<u4'"));
        assert!(header.contains("'shape': (2, 3, 4)"));
        assert!(header.ends_with('\n'));

        let data = &bytes[data_start..];
        assert_eq!(data.len(), 2 * 3 * 4 * 4);
        // C order: [0, 0, 1] is element 1, [1, 2, 3] is the last element
        assert_eq!(&data[4..8], &2u32.to_le_bytes());
        assert_eq!(&data[data.len() - 4..], &300u32.to_le_bytes());
    }

    #[test]
    fn test_sparse_count_grid_keeps_u32() {
        // all cells 0 or 1, still written as counts
        let mut g = grid((2, 2, 2));
        g.data_mut()[[1, 1, 1]] = 1;

        let mut bytes = Vec::new();
        NpyWriter::write_to(&g, NpyDtype::U32, &mut bytes).unwrap();

        let data_start = 10 + header_len(&bytes);
        let header = std::str::from_utf8(&bytes[10..data_start]).unwrap();
        assert!(header.contains("'descr': '<u4'"));
        assert_eq!(bytes.len() - data_start, 8 * 4);

        let mut empty = Vec::new();
        NpyWriter::write_to(&grid((2, 2, 2)), NpyDtype::U32, &mut empty).unwrap();
        assert_eq!(empty.len(), bytes.len());
    }

    #[test]
    fn test_u8_rejects_large_counts() {
        let mut g = grid((1, 1, 2));
        g.data_mut()[[0, 0, 1]] = 256;

        let mut bytes = Vec::new();
        let err = NpyWriter::write_to(&g, NpyDtype::U8, &mut bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_dtype_for_grid_kind() {
        assert_eq!(NpyDtype::for_grid_kind(true), NpyDtype::U8);
        assert_eq!(NpyDtype::for_grid_kind(false), NpyDtype::U32);
    }

    #[test]
    fn test_binary_grid_uses_bytes() {
        let mut g = grid((61, 61, 126));
        g.data_mut()[[30, 30, 0]] = 1;

        let mut bytes = Vec::new();
        NpyWriter::write_to(&g, NpyDtype::U8, &mut bytes).unwrap();

        let data_start = 10 + header_len(&bytes);
        let header = std::str::from_utf8(&bytes[10..data_start]).unwrap();
        assert!(header.contains("'descr': '|u1'"));
        assert!(header.contains("'shape': (61, 61, 126)"));
        assert_eq!(bytes.len() - data_start, 61 * 61 * 126);
        assert_eq!(bytes[data_start + (30 * 61 + 30) * 126], 1);
    }
}

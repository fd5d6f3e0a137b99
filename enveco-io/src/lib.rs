//! I/O operations for enveco
//! 
//! This crate reads the inputs of feature extraction and writes its
//! outputs: decoded point lists, field plot tables, metric tables and
//! voxel grids. Scanner formats such as LAS/LAZ are decoded upstream.

pub mod delimited;
pub mod point_table;
pub mod plot_table;
pub mod metric_table;
pub mod npy;
pub mod source;

pub use delimited::Delimiter;
pub use point_table::{ColumnType, PointTableReader, PointTableSchema, PointTableWriter};
pub use plot_table::{PlotRecord, PlotTable};
pub use metric_table::{MetricTableWriter, MetricsRow};
pub use npy::{NpyDtype, NpyWriter};
pub use source::DirectorySource;

use enveco_core::{Error, LidarPointCloud, Result};
use std::path::Path;

/// Auto-detect format and read a decoded point list
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<LidarPointCloud> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("csv") | Some("txt") | Some("xyz") | Some("pts") => PointTableReader::read_point_cloud(path),
        Some("las") | Some("laz") => Err(Error::UnsupportedFormat(format!(
            "{} must be decoded to a point table first",
            path.display()
        ))),
        _ => Err(Error::UnsupportedFormat(
            format!("Unsupported point cloud format: {:?}", path.extension())
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_point_cloud_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("plot.csv");
        fs::write(&csv, "x,y,z,intensity,num_returns\n1,2,3,4,1\n").unwrap();
        assert_eq!(read_point_cloud(&csv).unwrap().len(), 1);

        let las = dir.path().join("plot.las");
        assert!(matches!(read_point_cloud(&las), Err(Error::UnsupportedFormat(_))));
        assert!(matches!(read_point_cloud(dir.path().join("plot")), Err(Error::UnsupportedFormat(_))));
    }
}

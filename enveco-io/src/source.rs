//! Directory-backed point sources

use crate::read_point_cloud;
use enveco_core::{LidarPointCloud, PlotLocation, PointCloudSource, Result};
use std::path::{Path, PathBuf};

/// Loads `<root>/<plot id>.<extension>` for each plot
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: "csv".to_string(),
        }
    }

    /// Use a different file extension, with or without the leading dot
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// File holding the points of `plot`
    pub fn path_for(&self, plot: &PlotLocation) -> PathBuf {
        self.root.join(format!("{}.{}", plot.id, self.extension))
    }
}

impl PointCloudSource for DirectorySource {
    fn load(&self, plot: &PlotLocation) -> Result<LidarPointCloud> {
        let path = self.path_for(plot);
        let cloud = read_point_cloud(&path)?;
        tracing::debug!(plot = %plot.id, path = %path.display(), points = cloud.len(), "loaded plot points");
        Ok(cloud)
    }
}

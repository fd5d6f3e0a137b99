//! Parallel extraction over many field plots
//!
//! Each plot is independent: load its points, cut the plot footprint,
//! compute features. Plots run on a rayon thread pool and results keep the
//! input order.

use crate::{calculate_metrics, circular_plot_filter, voxelize, ExtractionConfig};
use enveco_core::{Error, MetricVector, PlotLocation, PointCloudSource, Result, VoxelGrid};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Metrics of one plot, `None` when the plot had no vegetation returns
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMetrics {
    pub plot: PlotLocation,
    pub metrics: Option<MetricVector>,
}

/// Voxel grid of one plot
#[derive(Debug, Clone, PartialEq)]
pub struct PlotVoxels {
    pub plot: PlotLocation,
    pub grid: VoxelGrid,
}

fn build_pool(threads: Option<usize>) -> Result<ThreadPool> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("enveco-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| Error::InvalidData(format!("failed to build thread pool: {e}")))
}

/// Metrics of a single plot
///
/// NoData is reported as `Ok(None)`; load errors and invalid parameters
/// are errors tagged with the plot id.
pub fn plot_metrics<S: PointCloudSource>(
    source: &S,
    plot: &PlotLocation,
    config: &ExtractionConfig,
) -> Result<Option<MetricVector>> {
    let run = || -> Result<MetricVector> {
        let cloud = source.load(plot)?;
        let footprint = circular_plot_filter(&cloud, &plot.center, config.metrics.plot_radius)?;
        tracing::debug!(plot = %plot.id, loaded = cloud.len(), kept = footprint.len(), "filtered plot");
        calculate_metrics(&footprint, config.metrics.min_height)
    };

    match run() {
        Ok(metrics) => Ok(Some(metrics)),
        Err(e) if e.is_no_data() => {
            tracing::warn!(plot = %plot.id, "skipping plot: {e}");
            Ok(None)
        }
        Err(e) => Err(e.for_plot(plot.id.clone())),
    }
}

/// Voxel grid of a single plot
///
/// The grid covers the square around the plot centre; points are not cut
/// to the circular footprint first.
pub fn plot_voxels<S: PointCloudSource>(
    source: &S,
    plot: &PlotLocation,
    config: &ExtractionConfig,
) -> Result<VoxelGrid> {
    source
        .load(plot)
        .and_then(|cloud| voxelize(&cloud, &plot.center, &config.voxels))
        .map_err(|e| e.for_plot(plot.id.clone()))
}

/// Extract metrics for every plot in parallel
///
/// Output rows follow the order of `plots`. The first hard error aborts
/// the batch.
pub fn extract_plot_metrics<S: PointCloudSource>(
    source: &S,
    plots: &[PlotLocation],
    config: &ExtractionConfig,
) -> Result<Vec<PlotMetrics>> {
    let pool = build_pool(config.threads)?;
    let rows: Vec<PlotMetrics> = pool.install(|| {
        plots
            .par_iter()
            .map(|plot| {
                plot_metrics(source, plot, config).map(|metrics| PlotMetrics {
                    plot: plot.clone(),
                    metrics,
                })
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let skipped = rows.iter().filter(|row| row.metrics.is_none()).count();
    tracing::info!(plots = rows.len(), skipped, "extracted plot metrics");
    Ok(rows)
}

/// Voxelize every plot in parallel, in the order of `plots`
pub fn voxelize_plots<S: PointCloudSource>(
    source: &S,
    plots: &[PlotLocation],
    config: &ExtractionConfig,
) -> Result<Vec<PlotVoxels>> {
    let pool = build_pool(config.threads)?;
    let grids: Vec<PlotVoxels> = pool.install(|| {
        plots
            .par_iter()
            .map(|plot| {
                plot_voxels(source, plot, config).map(|grid| PlotVoxels {
                    plot: plot.clone(),
                    grid,
                })
            })
            .collect::<Result<Vec<_>>>()
    })?;

    tracing::info!(plots = grids.len(), "voxelized plots");
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enveco_core::{LidarPoint, LidarPointCloud};
    use std::collections::HashMap;

    /// In-memory source keyed by plot id
    struct MemorySource(HashMap<String, LidarPointCloud>);

    impl PointCloudSource for MemorySource {
        fn load(&self, plot: &PlotLocation) -> Result<LidarPointCloud> {
            self.0
                .get(&plot.id)
                .cloned()
                .ok_or_else(|| Error::InvalidData(format!("no points for plot {}", plot.id)))
        }
    }

    fn source() -> MemorySource {
        let forest: LidarPointCloud = (0..50)
            .map(|i| LidarPoint::new(100.0 + (i % 5) as f64, 50.0, 2.0 + i as f64 * 0.4, 30.0, 1))
            .chain(std::iter::once(LidarPoint::new(140.0, 50.0, 30.0, 1.0, 1)))
            .collect();
        let clearing: LidarPointCloud = (0..20)
            .map(|i| LidarPoint::new(0.0, i as f64 * 0.1, 0.3, 10.0, 1))
            .collect();

        let mut clouds = HashMap::new();
        clouds.insert("forest".to_string(), forest);
        clouds.insert("clearing".to_string(), clearing);
        MemorySource(clouds)
    }

    #[test]
    fn test_extract_keeps_order_and_skips_no_data() {
        let plots = vec![
            PlotLocation::new("clearing", 0.0, 0.0),
            PlotLocation::new("forest", 102.0, 50.0),
        ];
        let rows = extract_plot_metrics(&source(), &plots, &ExtractionConfig::default().with_threads(2)).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].plot.id, "clearing");
        assert!(rows[0].metrics.is_none());

        let forest = rows[1].metrics.as_ref().unwrap();
        // the return 38 m from the centre is outside the plot
        assert_eq!(forest.n_points, 50);
        assert_eq!(forest.penetration, 1.0);
    }

    #[test]
    fn test_load_error_names_plot() {
        let plots = vec![PlotLocation::new("missing", 0.0, 0.0)];
        let err = extract_plot_metrics(&source(), &plots, &ExtractionConfig::default()).unwrap_err();
        match err {
            Error::Plot { id, .. } => assert_eq!(id, "missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_voxelize_plots() {
        let plots = vec![
            PlotLocation::new("forest", 102.0, 50.0),
            PlotLocation::new("clearing", 0.0, 0.0),
        ];
        let grids = voxelize_plots(&source(), &plots, &ExtractionConfig::default()).unwrap();

        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].plot.id, "forest");
        assert_eq!(grids[0].grid.total_count(), 50);
        assert_eq!(grids[1].grid.total_count(), 20);
        for plot in &grids {
            assert_eq!(plot.grid.shape(), (61, 61, 126));
        }
    }
}

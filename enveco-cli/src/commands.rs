use crate::cli::{load_config, ConfigArgs, InputArgs, MetricsArgs, VoxelizeArgs};
use anyhow::Context;
use enveco_algorithms::{extract_plot_metrics, voxelize_plots};
use enveco_io::{DirectorySource, MetricTableWriter, MetricsRow, NpyDtype, NpyWriter, PlotTable};
use std::fs;

fn open_inputs(input: &InputArgs) -> anyhow::Result<(PlotTable, DirectorySource)> {
    let table = PlotTable::read(&input.plots)
        .with_context(|| format!("failed to read plot table {}", input.plots.display()))?;
    let source = DirectorySource::new(&input.points_dir).with_extension(&input.extension);
    tracing::info!(plots = table.len(), dir = %input.points_dir.display(), "loaded plot table");
    Ok((table, source))
}

pub fn run_metrics(args: &MetricsArgs) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let (table, source) = open_inputs(&args.input)?;

    let results = extract_plot_metrics(&source, &table.locations(), &config)?;

    // results follow table order
    let rows = table.records.iter().zip(&results).map(|(record, result)| MetricsRow {
        id: &record.location.id,
        attributes: &record.attributes,
        metrics: result.metrics.as_ref(),
    });
    MetricTableWriter::write_table(&args.output, &table.attribute_names, rows)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let skipped = results.iter().filter(|r| r.metrics.is_none()).count();
    tracing::info!(
        written = results.len(),
        skipped,
        output = %args.output.display(),
        "wrote metric table"
    );
    Ok(())
}

pub fn run_voxelize(args: &VoxelizeArgs) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let (table, source) = open_inputs(&args.input)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let grids = voxelize_plots(&source, &table.locations(), &config)?;
    let dtype = NpyDtype::for_grid_kind(config.voxels.produces_occupancy());
    for plot in &grids {
        let path = args.output_dir.join(format!("{}.npy", plot.plot.id));
        NpyWriter::write_grid(&plot.grid, dtype, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(plot = %plot.plot.id, occupied = plot.grid.occupied_count(), "wrote grid");
    }

    tracing::info!(grids = grids.len(), output = %args.output_dir.display(), "wrote voxel grids");
    Ok(())
}

pub fn print_config(args: &ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    println!("{}", config.to_json_string()?);
    Ok(())
}

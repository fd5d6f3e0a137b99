use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use enveco_algorithms::ExtractionConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "enveco", author, version, about = "LiDAR feature extraction for forest plots", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute height and intensity metrics for every plot
    Metrics(MetricsArgs),
    /// Build a voxel grid (.npy) for every plot
    Voxelize(VoxelizeArgs),
    /// Print the effective configuration as JSON
    Config(ConfigArgs),
}

/// Inputs shared by the extraction commands
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Plot table with id, x, y and optional target columns
    #[arg(long)]
    pub plots: PathBuf,

    /// Directory with one decoded point list per plot, named <plot id>.<ext>
    #[arg(long)]
    pub points_dir: PathBuf,

    /// Extension of the point list files
    #[arg(long, default_value = "csv")]
    pub extension: String,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output metric table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Minimum height of a vegetation return
    #[arg(long)]
    pub min_height: Option<f64>,

    /// Radius of the circular field plot
    #[arg(long)]
    pub radius: Option<f64>,
}

#[derive(Args, Debug)]
pub struct VoxelizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory receiving <plot id>.npy grids
    #[arg(short, long)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub grid: GridArgs,
}

#[derive(Args, Debug, Default)]
pub struct GridArgs {
    /// Half-width of the horizontal grid
    #[arg(long)]
    pub extent: Option<f64>,

    /// Top of the vertical grid
    #[arg(long)]
    pub max_height: Option<f64>,

    /// Bins along each horizontal axis
    #[arg(long)]
    pub horizontal_bins: Option<usize>,

    /// Bins along the vertical axis
    #[arg(long)]
    pub vertical_bins: Option<usize>,

    /// Collapse counts to 0/1 occupancy (`--binarize false` turns it off)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub binarize: Option<bool>,

    /// Fill every column from the ground to its highest occupied cell
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub fill: Option<bool>,

    /// Zero the columns outside the inscribed circle
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub mask: Option<bool>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file to resolve; defaults are printed without one
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Load the configuration file, if any
pub fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ExtractionConfig> {
    match path {
        Some(path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ExtractionConfig::default()),
    }
}

impl InputArgs {
    pub fn apply(&self, config: &mut ExtractionConfig) {
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }
    }
}

impl MetricsArgs {
    /// Effective configuration: file values overridden by flags
    pub fn resolve_config(&self) -> anyhow::Result<ExtractionConfig> {
        let mut config = load_config(self.input.config.as_ref())?;
        self.input.apply(&mut config);
        if let Some(min_height) = self.min_height {
            config.metrics.min_height = min_height;
        }
        if let Some(radius) = self.radius {
            config.metrics.plot_radius = radius;
        }
        Ok(config)
    }
}

impl VoxelizeArgs {
    /// Effective configuration: file values overridden by flags
    pub fn resolve_config(&self) -> anyhow::Result<ExtractionConfig> {
        let mut config = load_config(self.input.config.as_ref())?;
        self.input.apply(&mut config);
        self.grid.apply(&mut config);
        Ok(config)
    }
}

impl GridArgs {
    /// Override every grid setting given on the command line
    pub fn apply(&self, config: &mut ExtractionConfig) {
        let voxels = &mut config.voxels;
        if let Some(extent) = self.extent {
            voxels.extent = extent;
        }
        if let Some(max_height) = self.max_height {
            voxels.max_height = max_height;
        }
        if let Some(bins) = self.horizontal_bins {
            voxels.horizontal_bins = bins;
        }
        if let Some(bins) = self.vertical_bins {
            voxels.vertical_bins = bins;
        }
        if let Some(binarize) = self.binarize {
            voxels.binarize = binarize;
        }
        if let Some(fill) = self.fill {
            voxels.fill_below_max_occupied = fill;
        }
        if let Some(mask) = self.mask {
            voxels.circular_mask = mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_metrics_flags_override() {
        let cli = Cli::parse_from([
            "enveco", "metrics", "--plots", "plots.csv", "--points-dir", "points",
            "-o", "out.csv", "--min-height", "2", "--threads", "3",
        ]);
        let Command::Metrics(args) = cli.command else {
            panic!("expected metrics command");
        };
        let config = args.resolve_config().unwrap();
        assert_eq!(config.metrics.min_height, 2.0);
        assert_eq!(config.metrics.plot_radius, 9.0);
        assert_eq!(config.threads, Some(3));
    }

    #[test]
    fn test_grid_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "voxels": { "circular_mask": true, "max_height": 35.0 } }"#).unwrap();

        let cli = Cli::parse_from([
            "enveco", "-v", "voxelize", "--plots", "plots.csv", "--points-dir", "points",
            "--output-dir", "grids", "--binarize", "--config", path.to_str().unwrap(),
        ]);
        assert_eq!(cli.verbose, 1);
        let Command::Voxelize(args) = cli.command else {
            panic!("expected voxelize command");
        };
        let config = args.resolve_config().unwrap();
        assert!(config.voxels.binarize);
        assert!(config.voxels.circular_mask);
        assert!(!config.voxels.fill_below_max_occupied);
        assert_eq!(config.voxels.max_height, 35.0);
        assert_eq!(config.voxels.extent, 9.0);
    }

    #[test]
    fn test_grid_flags_switch_off_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "voxels": { "binarize": true, "fill_below_max_occupied": true, "circular_mask": true } }"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "enveco", "voxelize", "--plots", "plots.csv", "--points-dir", "points",
            "--output-dir", "grids", "--config", path.to_str().unwrap(),
            "--binarize", "false", "--fill=false", "--mask",
            "--horizontal-bins", "31", "--vertical-bins", "84",
        ]);
        let Command::Voxelize(args) = cli.command else {
            panic!("expected voxelize command");
        };
        let config = args.resolve_config().unwrap();
        assert!(!config.voxels.binarize);
        assert!(!config.voxels.fill_below_max_occupied);
        assert!(config.voxels.circular_mask);
        assert_eq!(config.voxels.horizontal_bins, 31);
        assert_eq!(config.voxels.vertical_bins, 84);
        assert_eq!(config.voxels.shape(), (31, 31, 84));
    }

    #[test]
    fn test_grid_flags_absent_keep_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "voxels": { "binarize": true, "vertical_bins": 42 } }"#).unwrap();

        let cli = Cli::parse_from([
            "enveco", "voxelize", "--plots", "plots.csv", "--points-dir", "points",
            "--output-dir", "grids", "--config", path.to_str().unwrap(),
        ]);
        let Command::Voxelize(args) = cli.command else {
            panic!("expected voxelize command");
        };
        let config = args.resolve_config().unwrap();
        assert!(config.voxels.binarize);
        assert_eq!(config.voxels.vertical_bins, 42);
        assert_eq!(config.voxels.horizontal_bins, 61);
    }

    #[test]
    fn test_missing_config_file() {
        let missing = PathBuf::from("/nonexistent/enveco.json");
        assert!(load_config(Some(&missing)).is_err());
    }
}

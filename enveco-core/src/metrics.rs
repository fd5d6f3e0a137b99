//! Plot-level LiDAR metric vectors and their fixed schema

use serde::{Deserialize, Serialize};

/// Height percentile fractions, in schema order
pub const HEIGHT_PERCENTILES: [f64; 12] = [
    0.10, 0.20, 0.30, 0.40, 0.50, 0.60, 0.70, 0.80, 0.90, 0.95, 0.98, 0.99,
];

/// Height band multipliers of `(hmax - min_height) / 10`, in schema order
///
/// Bands are cumulative. The top three give finer resolution near the
/// canopy top.
pub const HEIGHT_BAND_MULTIPLIERS: [f64; 12] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 9.5, 9.8, 9.9,
];

/// Number of fields in a [`MetricVector`]
pub const METRIC_COUNT: usize = 33;

/// Field names of a [`MetricVector`], in emission order
pub const METRIC_NAMES: [&str; METRIC_COUNT] = [
    "hmax", "hmean", "hstd", "penetration", "cv", "imax", "imean", "imedian",
    "h10", "h20", "h30", "h40", "h50", "h60", "h70", "h80", "h90", "h95", "h98", "h99",
    "p10", "p20", "p30", "p40", "p50", "p60", "p70", "p80", "p90", "p95", "p98", "p99",
    "n_points",
];

/// Summary statistics of the vegetation returns of one plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricVector {
    /// Maximum vegetation height
    pub hmax: f64,
    /// Mean vegetation height
    pub hmean: f64,
    /// Sample standard deviation of vegetation height
    pub hstd: f64,
    /// Vegetation returns over all returns
    pub penetration: f64,
    /// Coefficient of variation of height
    pub cv: f64,
    pub imax: f64,
    pub imean: f64,
    pub imedian: f64,
    /// Heights at [`HEIGHT_PERCENTILES`]
    pub height_percentiles: [f64; 12],
    /// Share of vegetation returns below each band of [`HEIGHT_BAND_MULTIPLIERS`]
    pub height_proportions: [f64; 12],
    /// Number of vegetation returns
    pub n_points: usize,
}

impl MetricVector {
    /// All values in schema order
    pub fn values(&self) -> [f64; METRIC_COUNT] {
        let mut out = [0.0; METRIC_COUNT];
        out[..8].copy_from_slice(&[
            self.hmax,
            self.hmean,
            self.hstd,
            self.penetration,
            self.cv,
            self.imax,
            self.imean,
            self.imedian,
        ]);
        out[8..20].copy_from_slice(&self.height_percentiles);
        out[20..32].copy_from_slice(&self.height_proportions);
        out[32] = self.n_points as f64;
        out
    }

    /// `(name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        METRIC_NAMES.into_iter().zip(self.values())
    }

    /// Look up a single field by its schema name
    pub fn get(&self, name: &str) -> Option<f64> {
        METRIC_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.values()[idx])
    }
}

//! Field plot tables
//!
//! A delimited table with a header: one row per field plot with its
//! identifier, centre coordinates and any measured stand attributes
//! (volume, basal area, height, diameter). Attribute columns are carried
//! through so extracted features can be joined with their targets.

use crate::delimited::{normalize_header, Delimiter};
use enveco_core::{Error, PlotLocation, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const ID_ALIASES: [&str; 5] = ["id", "plot_id", "plotid", "sampleplotid", "plot"];
const X_ALIASES: [&str; 4] = ["x", "plot_x", "easting", "x_coord"];
const Y_ALIASES: [&str; 4] = ["y", "plot_y", "northing", "y_coord"];

/// One field plot and its attribute values
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRecord {
    pub location: PlotLocation,
    /// Values aligned with [`PlotTable::attribute_names`]; `None` when missing
    pub attributes: Vec<Option<f64>>,
}

/// All plots of a plot table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotTable {
    pub attribute_names: Vec<String>,
    pub records: Vec<PlotRecord>,
}

impl PlotTable {
    /// Read a plot table file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(file))
    }

    /// Read a plot table from any buffered reader
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

        let header = match lines.next() {
            Some((_, line)) => line?,
            None => return Ok(Self::default()),
        };
        let delimiter = Delimiter::detect_from_line(&header)
            .ok_or_else(|| Error::InvalidData("Could not detect delimiter".to_string()))?;
        let names: Vec<String> = delimiter.split(&header).into_iter().map(normalize_header).collect();

        let find = |aliases: &[&str], what: &str| {
            names
                .iter()
                .position(|n| aliases.contains(&n.as_str()))
                .ok_or_else(|| Error::InvalidData(format!("plot table has no {what} column")))
        };
        let id_idx = find(&ID_ALIASES[..], "plot id")?;
        let x_idx = find(&X_ALIASES[..], "x")?;
        let y_idx = find(&Y_ALIASES[..], "y")?;

        let attribute_columns: Vec<usize> = (0..names.len())
            .filter(|i| ![id_idx, x_idx, y_idx].contains(i))
            .collect();
        let attribute_names = attribute_columns.iter().map(|&i| names[i].clone()).collect();

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        for (idx, line) in lines {
            let line = line?;
            let line_no = idx + 1;
            let fields = delimiter.split(&line);
            let parse_err = |message: String| Error::Parse { line: line_no, message };

            let id = fields
                .get(id_idx)
                .filter(|f| !f.is_empty())
                .map(|f| f.trim_matches('"').to_string())
                .ok_or_else(|| parse_err("missing plot id".to_string()))?;
            let coordinate = |i: usize, name: &str| -> Result<f64> {
                let raw = fields.get(i).copied().unwrap_or("");
                raw.parse::<f64>()
                    .map_err(|_| parse_err(format!("invalid {name} '{raw}' for plot {id}")))
            };
            let x = coordinate(x_idx, "x")?;
            let y = coordinate(y_idx, "y")?;

            if !seen.insert(id.clone()) {
                return Err(parse_err(format!("duplicate plot id {id}")));
            }

            let attributes = attribute_columns
                .iter()
                .map(|&i| fields.get(i).and_then(|f| f.parse::<f64>().ok()))
                .collect();

            records.push(PlotRecord {
                location: PlotLocation::new(id, x, y),
                attributes,
            });
        }

        tracing::debug!(plots = records.len(), "read plot table");
        Ok(Self {
            attribute_names,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plot locations in table order
    pub fn locations(&self) -> Vec<PlotLocation> {
        self.records.iter().map(|r| r.location.clone()).collect()
    }

    /// Attribute values of a plot by id
    pub fn attributes_of(&self, id: &str) -> Option<&[Option<f64>]> {
        self.records
            .iter()
            .find(|r| r.location.id == id)
            .map(|r| r.attributes.as_slice())
    }
}

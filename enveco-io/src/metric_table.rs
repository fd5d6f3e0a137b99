//! Tabular output of plot metrics
//!
//! One comma separated row per plot: the plot id, its carried-through
//! attributes, then the metric fields in schema order. Plots without
//! vegetation returns keep their row with empty metric cells.

use enveco_core::{MetricVector, Result, METRIC_NAMES};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One output row
#[derive(Debug, Clone, Copy)]
pub struct MetricsRow<'a> {
    pub id: &'a str,
    pub attributes: &'a [Option<f64>],
    pub metrics: Option<&'a MetricVector>,
}

/// Writer for metric tables
pub struct MetricTableWriter;

impl MetricTableWriter {
    /// Write a metric table file
    pub fn write_table<'a, P, I>(path: P, attribute_names: &[String], rows: I) -> Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = MetricsRow<'a>>,
    {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, attribute_names, rows)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a metric table to any writer
    pub fn write_to<'a, W, I>(writer: &mut W, attribute_names: &[String], rows: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = MetricsRow<'a>>,
    {
        writeln!(writer, "{}", Self::header(attribute_names))?;
        for row in rows {
            writeln!(writer, "{}", Self::format_row(&row, attribute_names.len()))?;
        }
        Ok(())
    }

    fn header(attribute_names: &[String]) -> String {
        std::iter::once("plot_id")
            .chain(attribute_names.iter().map(String::as_str))
            .chain(METRIC_NAMES)
            .map(escape_field)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn format_row(row: &MetricsRow<'_>, attribute_count: usize) -> String {
        let mut cells = Vec::with_capacity(1 + attribute_count + METRIC_NAMES.len());
        cells.push(escape_field(row.id).into_owned());

        // pad or cut so every row has the header's width
        cells.extend((0..attribute_count).map(|i| match row.attributes.get(i) {
            Some(Some(v)) => v.to_string(),
            _ => String::new(),
        }));

        match row.metrics {
            Some(metrics) => {
                let values = metrics.values();
                let (fields, count) = values.split_at(METRIC_NAMES.len() - 1);
                cells.extend(fields.iter().map(|v| format!("{v:.4}")));
                cells.push(format!("{}", count[0] as u64));
            }
            None => cells.extend(std::iter::repeat(String::new()).take(METRIC_NAMES.len())),
        }

        cells.join(",")
    }
}

/// Quote a field holding a delimiter, quote or line break; inner quotes are doubled
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

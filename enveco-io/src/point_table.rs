//! Decoded LiDAR point lists as delimited text
//! 
//! Points arrive already decoded from the scanner format, one return per
//! line with columns x, y, z and optionally intensity and return count:
//! - Auto-detection of delimiters (comma, space, tab, semicolon)
//! - Optional header with column aliases in any order
//! - Headerless files are read as `x y z [intensity [num_returns]]`

use crate::delimited::{is_header_line, normalize_header, Delimiter};
use enveco_core::{Error, LidarPoint, LidarPointCloud, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Column types that can be parsed from a point table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    X,
    Y,
    Z,
    Intensity,
    NumReturns,
    Unknown,
}

impl ColumnType {
    /// Parse column type from header name
    pub fn from_header(header: &str) -> Self {
        match normalize_header(header).as_str() {
            "x" | "px" | "pos_x" | "easting" => ColumnType::X,
            "y" | "py" | "pos_y" | "northing" => ColumnType::Y,
            "z" | "pz" | "pos_z" | "height" | "elevation" => ColumnType::Z,
            "i" | "intensity" | "int" => ColumnType::Intensity,
            "num_returns" | "returns" | "n_returns" | "number_of_returns" => ColumnType::NumReturns,
            _ => ColumnType::Unknown,
        }
    }
}

/// Column layout of a point table
#[derive(Debug, Clone, PartialEq)]
pub struct PointTableSchema {
    pub columns: Vec<ColumnType>,
    pub has_header: bool,
    pub delimiter: Delimiter,
}

impl PointTableSchema {
    /// Layout of a headerless table
    pub fn headerless(delimiter: Delimiter) -> Self {
        Self {
            columns: vec![
                ColumnType::X,
                ColumnType::Y,
                ColumnType::Z,
                ColumnType::Intensity,
                ColumnType::NumReturns,
            ],
            has_header: false,
            delimiter,
        }
    }

    /// Detect the layout from the first line of a table
    pub fn detect(first_line: &str) -> Result<Self> {
        let delimiter = Delimiter::detect_from_line(first_line)
            .ok_or_else(|| Error::InvalidData("Could not detect delimiter".to_string()))?;
        let fields = delimiter.split(first_line);

        if !is_header_line(&fields) {
            return Ok(Self::headerless(delimiter));
        }

        let columns: Vec<ColumnType> = fields.iter().map(|h| ColumnType::from_header(h)).collect();
        for required in [ColumnType::X, ColumnType::Y, ColumnType::Z] {
            if !columns.contains(&required) {
                return Err(Error::InvalidData(
                    "point table must contain x, y, z columns".to_string()
                ));
            }
        }

        Ok(Self {
            columns,
            has_header: true,
            delimiter,
        })
    }

    fn index_of(&self, column: ColumnType) -> Option<usize> {
        self.columns.iter().position(|&c| c == column)
    }
}

/// Field positions resolved once per table
struct ColumnIndices {
    x: usize,
    y: usize,
    z: usize,
    intensity: Option<usize>,
    num_returns: Option<usize>,
}

impl ColumnIndices {
    fn new(schema: &PointTableSchema) -> Result<Self> {
        let required = |column: ColumnType| {
            schema
                .index_of(column)
                .ok_or_else(|| Error::InvalidData(format!("missing {column:?} column")))
        };
        Ok(Self {
            x: required(ColumnType::X)?,
            y: required(ColumnType::Y)?,
            z: required(ColumnType::Z)?,
            intensity: schema.index_of(ColumnType::Intensity),
            num_returns: schema.index_of(ColumnType::NumReturns),
        })
    }
}

/// Point table reader implementation
pub struct PointTableReader;

impl PointTableReader {
    /// Read a point cloud from a point table file with auto-detection
    pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<LidarPointCloud> {
        let file = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(file))
    }

    /// Read a point cloud from any buffered reader with auto-detection
    pub fn read_from<R: BufRead>(reader: R) -> Result<LidarPointCloud> {
        let mut cloud = LidarPointCloud::new();
        let mut schema: Option<(PointTableSchema, ColumnIndices)> = None;

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            if schema.is_none() {
                let detected = PointTableSchema::detect(&line)?;
                let indices = ColumnIndices::new(&detected)?;
                let has_header = detected.has_header;
                schema = Some((detected, indices));
                if has_header {
                    continue;
                }
            }

            if let Some((schema, indices)) = &schema {
                cloud.push(Self::parse_line(&line, line_no, schema, indices)?);
            }
        }

        Ok(cloud)
    }

    /// Parse a single line into a point
    fn parse_line(
        line: &str,
        line_no: usize,
        schema: &PointTableSchema,
        indices: &ColumnIndices,
    ) -> Result<LidarPoint> {
        let fields = schema.delimiter.split(line);
        let parse_err = |message: String| Error::Parse { line: line_no, message };

        let number = |idx: usize, name: &str| -> Result<f64> {
            let raw = fields
                .get(idx)
                .ok_or_else(|| parse_err(format!("missing {name} field")))?;
            raw.parse::<f64>()
                .map_err(|_| parse_err(format!("invalid {name} value '{raw}'")))
        };
        let optional = |idx: Option<usize>, name: &str| -> Result<Option<f64>> {
            match idx {
                Some(i) if fields.get(i).is_some_and(|f| !f.is_empty()) => number(i, name).map(Some),
                _ => Ok(None),
            }
        };

        let x = number(indices.x, "x")?;
        let y = number(indices.y, "y")?;
        let z = number(indices.z, "z")?;
        let intensity = optional(indices.intensity, "intensity")?.unwrap_or(0.0);
        let num_returns = match optional(indices.num_returns, "num_returns")? {
            Some(n) if (0.0..=255.0).contains(&n) => n.round() as u8,
            Some(n) => return Err(parse_err(format!("return count {n} out of range"))),
            None => 1,
        };

        Ok(LidarPoint::new(x, y, z, intensity as f32, num_returns))
    }
}

/// Point table writer implementation
pub struct PointTableWriter;

impl PointTableWriter {
    /// Write a point cloud as comma separated text with a header
    pub fn write_point_cloud<P: AsRef<Path>>(cloud: &LidarPointCloud, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        Self::write_to(cloud, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a point cloud to any writer
    pub fn write_to<W: Write>(cloud: &LidarPointCloud, writer: &mut W) -> Result<()> {
        writeln!(writer, "x,y,z,intensity,num_returns")?;
        for p in cloud {
            writeln!(
                writer,
                "{},{},{},{},{}",
                p.position.x, p.position.y, p.position.z, p.intensity, p.num_returns
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<LidarPointCloud> {
        PointTableReader::read_from(Cursor::new(text))
    }

    #[test]
    fn test_column_type_detection() {
        assert_eq!(ColumnType::from_header("x"), ColumnType::X);
        assert_eq!(ColumnType::from_header("X"), ColumnType::X);
        assert_eq!(ColumnType::from_header("Intensity"), ColumnType::Intensity);
        assert_eq!(ColumnType::from_header("num_returns"), ColumnType::NumReturns);
        assert_eq!(ColumnType::from_header("returns"), ColumnType::NumReturns);
        assert_eq!(ColumnType::from_header("classification"), ColumnType::Unknown);
    }

    #[test]
    fn test_headerless_reader() {
        let cloud = read("1.0 2.0 3.0 40 2\n4.0 5.0 6.0 50 1\n\n7.0 8.0 9.0\n").unwrap();
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.points[0], LidarPoint::new(1.0, 2.0, 3.0, 40.0, 2));
        assert_eq!(cloud.points[1], LidarPoint::new(4.0, 5.0, 6.0, 50.0, 1));
        // missing attributes fall back to defaults
        assert_eq!(cloud.points[2], LidarPoint::new(7.0, 8.0, 9.0, 0.0, 1));
    }

    #[test]
    fn test_header_in_any_order() {
        let text = "intensity,num_returns,z,y,x,classification\n12,3,18.5,6712480.25,385210.5,5\n";
        let cloud = read(text).unwrap();
        assert_eq!(cloud.len(), 1);
        assert_eq!(cloud.points[0], LidarPoint::new(385210.5, 6712480.25, 18.5, 12.0, 3));
    }

    #[test]
    fn test_header_requires_coordinates() {
        assert!(read("x,y,intensity\n1,2,3\n").is_err());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = read("x,y,z\n1,2,3\n1,abc,3\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_return_count_out_of_range() {
        assert!(read("x,y,z,num_returns\n1,2,3,300\n").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(read("").unwrap().is_empty());
        assert!(read("x,y,z\n").unwrap().is_empty());
    }

    #[test]
    fn test_writer_output_reads_back() {
        let cloud = LidarPointCloud::from_points(vec![
            LidarPoint::new(1.5, -2.0, 12.25, 33.0, 2),
            LidarPoint::new(0.0, 0.0, 0.0, 0.0, 1),
        ]);
        let mut buffer = Vec::new();
        PointTableWriter::write_to(&cloud, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("x,y,z,intensity,num_returns\n"));
        assert_eq!(read(&text).unwrap(), cloud);
    }
}

//! Delimited text helpers shared by the point and plot table readers

/// Supported delimiters for delimited text tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Space,
    Tab,
    Semicolon,
}

impl Delimiter {
    /// Get the character representation of the delimiter
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Space => ' ',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
        }
    }
    
    /// Detect delimiter from a line of text
    ///
    /// The most frequent candidate wins; ties prefer comma, then space, tab
    /// and semicolon.
    pub fn detect_from_line(line: &str) -> Option<Self> {
        let candidates = [
            Delimiter::Comma,
            Delimiter::Space,
            Delimiter::Tab,
            Delimiter::Semicolon,
        ];

        let mut best: Option<(usize, Delimiter)> = None;
        for delimiter in candidates {
            let count = line.trim().matches(delimiter.as_char()).count();
            if count > 0 && best.map_or(true, |(c, _)| count > c) {
                best = Some((count, delimiter));
            }
        }
        best.map(|(_, delimiter)| delimiter)
    }

    /// Split a line into trimmed fields
    ///
    /// Runs of spaces count as a single separator for space-delimited text.
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Space => line.split_whitespace().collect(),
            _ => line.split(self.as_char()).map(str::trim).collect(),
        }
    }
}

/// A line is a header when any of its fields is not a number
pub(crate) fn is_header_line(fields: &[&str]) -> bool {
    fields.iter().any(|field| field.parse::<f64>().is_err())
}

/// Normalize a column name for alias matching
pub(crate) fn normalize_header(header: &str) -> String {
    header.trim().trim_matches('"').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_detection() {
        assert_eq!(Delimiter::detect_from_line("1,2,3"), Some(Delimiter::Comma));
        assert_eq!(Delimiter::detect_from_line("1 2 3"), Some(Delimiter::Space));
        assert_eq!(Delimiter::detect_from_line("1\t2\t3"), Some(Delimiter::Tab));
        assert_eq!(Delimiter::detect_from_line("1;2;3"), Some(Delimiter::Semicolon));
        assert_eq!(Delimiter::detect_from_line("x, y, z"), Some(Delimiter::Comma));
        assert_eq!(Delimiter::detect_from_line("12345"), None);
    }

    #[test]
    fn test_split() {
        assert_eq!(Delimiter::Comma.split(" 1, 2 ,3"), vec!["1", "2", "3"]);
        assert_eq!(Delimiter::Space.split("1   2 3\n"), vec!["1", "2", "3"]);
        assert_eq!(Delimiter::Semicolon.split("a;;b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_header_detection() {
        assert!(is_header_line(&["x", "y", "z"]));
        assert!(!is_header_line(&["1.0", "-2", "3e2"]));
        assert_eq!(normalize_header(" \"Plot_X\" "), "plot_x");
    }
}

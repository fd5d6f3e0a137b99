//! Error types for enveco

use thiserror::Error;

/// Main error type for enveco operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No metrics are computable, e.g. no returns above the minimum height
    #[error("No data: {0}")]
    NoData(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Failure while processing a single plot of a batch
    #[error("Plot {id}: {source}")]
    Plot {
        id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this error only means "no result" for the given input
    pub fn is_no_data(&self) -> bool {
        match self {
            Error::NoData(_) => true,
            Error::Plot { source, .. } => source.is_no_data(),
            _ => false,
        }
    }

    /// Attach the plot identifier to an error
    pub fn for_plot(self, id: impl Into<String>) -> Self {
        Error::Plot {
            id: id.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for enveco operations
pub type Result<T> = std::result::Result<T, Error>;

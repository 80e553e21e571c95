//! Error surface for document-level import failures

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    MissingRows,
    NoQuestions,
    DocumentTooLarge { size: u64, limit: u64 },
    UnsupportedFormat(String),
    Io(String),
    Excel(String),
    Csv(String),
    Database(String),
    Serialization(String),
    Rejected(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::MissingRows => write!(
                f,
                "the file must contain a header row and at least one data row"
            ),
            ImportError::NoQuestions => write!(
                f,
                "no questions could be parsed from the file; check the format"
            ),
            ImportError::DocumentTooLarge { size, limit } => write!(
                f,
                "file is too large ({} bytes, limit is {} bytes)",
                size, limit
            ),
            ImportError::UnsupportedFormat(ext) => write!(f, "unsupported file format: .{}", ext),
            ImportError::Io(msg) => write!(f, "io error: {}", msg),
            ImportError::Excel(msg) => write!(f, "spreadsheet error: {}", msg),
            ImportError::Csv(msg) => write!(f, "csv error: {}", msg),
            ImportError::Database(msg) => write!(f, "database error: {}", msg),
            ImportError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            ImportError::Rejected(msg) => write!(f, "import rejected: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Database(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Csv(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Excel(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(feature = "python")]
impl From<ImportError> for pyo3::PyErr {
    fn from(err: ImportError) -> Self {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}

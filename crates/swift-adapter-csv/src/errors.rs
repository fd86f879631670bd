//! Errors raised while reading a CSV source as a whole.
//!
//! Row-level problems in a batch are not errors; they end up in
//! [`crate::ParseReport::rejected`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// The `csv` crate could not parse a record
    #[error("malformed CSV at line {line}: {details}")]
    Malformed { line: u64, details: String },

    #[error("missing required fields: {}", columns.join(" or "))]
    MissingColumns { columns: Vec<String> },

    #[error("CSV source is empty")]
    Empty,

    #[error("cannot read CSV source: {0}")]
    Io(String),

    /// The reader settings cannot serve this kind of source
    #[error("unsupported CSV settings: {0}")]
    Unsupported(String),
}

impl CsvError {
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumns {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unsupported(details: impl Into<String>) -> Self {
        Self::Unsupported(details.into())
    }
}

impl From<std::io::Error> for CsvError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            return Self::Io(err.to_string());
        }
        Self::Malformed {
            line: err.position().map_or(0, csv::Position::line),
            details: err.to_string(),
        }
    }
}

pub type CsvResult<T> = std::result::Result<T, CsvError>;

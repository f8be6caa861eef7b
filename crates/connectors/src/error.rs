use crate::sql::base::error::DbError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Raised by column kinds when a value does not fit the column.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid UTF-8 in text value: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Errors raised while turning values into a COPY payload.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A value outside null / text / scalar reached the cell encoder.
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(&'static str),

    #[error("Column {column}: {source}")]
    Column {
        column: String,
        source: Box<EncodeError>,
    },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Row {row} has {actual} values but {expected} columns were given")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl EncodeError {
    /// Attaches the storage column the failing value belongs to.
    pub fn in_column(self, column: &str) -> Self {
        EncodeError::Column {
            column: column.to_string(),
            source: Box::new(self),
        }
    }
}

#[derive(Debug, Error)]
pub enum BulkError {
    /// A requested column does not resolve to a field of the model.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("No columns to insert into table {0}")]
    NoColumns(String),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The loader rejected the payload or the connection failed.
    #[error("Load error: {0}")]
    Load(#[from] DbError),
}

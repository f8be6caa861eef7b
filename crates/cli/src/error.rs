use connectors::{BulkError, EncodeError, sql::base::error::ConnectorError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No connection URL: pass --url or set DATABASE_URL")]
    MissingUrl,

    #[error("Invalid column spec `{spec}`: {reason}")]
    InvalidColumn { spec: String, reason: String },

    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("Connection failed: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Bulk insert failed: {0}")]
    Bulk(#[from] BulkError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

use thiserror::Error;

/// All errors coming from the database/load layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Low‐level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any PostgreSQL driver error, including a rejected COPY payload.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// The COPY stream was rejected at the application level.
    #[error("COPY error: {0}")]
    Copy(String),
}

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Connection with sslmode={sslmode} failed: {source}")]
    Connect {
        sslmode: &'static str,
        source: Box<ConnectorError>,
    },

    #[error("PostgreSQL connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),
}

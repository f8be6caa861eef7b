use crate::sql::base::{context::ConnectionContext, error::DbError};
use async_trait::async_trait;

/// Bulk-loads a finished CSV payload into a table.
///
/// Implementations stream the payload as-is; they never re-encode it.
#[async_trait]
pub trait CopyLoader: Send + Sync {
    /// Backend facts the encoder needs when finalizing values.
    fn context(&self) -> ConnectionContext;

    /// Loads `payload` into `columns` of `table`. Called even when the
    /// payload is empty.
    async fn load(&self, payload: String, table: &str, columns: &[String])
    -> Result<(), DbError>;
}

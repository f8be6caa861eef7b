use crate::sql::base::{
    context::ConnectionContext, error::DbError, loader::CopyLoader,
    query::generator::QueryGenerator,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, pin_mut};
use planner::query::dialect;
use tokio_postgres::Transaction;
use tracing::{debug, info};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Bytes sent to the server per COPY data message.
    pub chunk_size: usize,
    /// Whether timestamp-with-time-zone columns keep their zone.
    pub use_tz: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            use_tz: true,
        }
    }
}

/// Streams payloads through `COPY ... FROM STDIN` on a caller-owned
/// transaction. Commit and rollback stay with the caller; a failed load
/// aborts the COPY and leaves the transaction in the failed state.
pub struct PgCopyLoader<'a> {
    tx: &'a Transaction<'a>,
    config: LoaderConfig,
    dialect: dialect::Postgres,
}

impl<'a> PgCopyLoader<'a> {
    pub fn new(tx: &'a Transaction<'a>) -> Self {
        Self::with_config(tx, LoaderConfig::default())
    }

    pub fn with_config(tx: &'a Transaction<'a>, config: LoaderConfig) -> Self {
        Self {
            tx,
            config,
            dialect: dialect::Postgres,
        }
    }
}

#[async_trait]
impl CopyLoader for PgCopyLoader<'_> {
    fn context(&self) -> ConnectionContext {
        ConnectionContext {
            use_tz: self.config.use_tz,
        }
    }

    async fn load(
        &self,
        payload: String,
        table: &str,
        columns: &[String],
    ) -> Result<(), DbError> {
        let generator = QueryGenerator::new(&self.dialect);
        let statement = generator.copy_from_stdin(table, columns);

        debug!("COPY statement: {}", statement);

        let sink = self.tx.copy_in::<_, Bytes>(&statement).await?;
        pin_mut!(sink);

        let chunk_size = self.config.chunk_size.max(1);
        let mut buf = Bytes::from(payload);
        while !buf.is_empty() {
            let chunk = buf.split_to(chunk_size.min(buf.len()));
            sink.as_mut().send(chunk).await?;
        }

        let rows = sink.as_mut().finish().await?;
        info!(table, rows, "COPY finished");
        Ok(())
    }
}

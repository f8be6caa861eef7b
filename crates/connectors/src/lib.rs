pub mod error;
pub mod insert;
pub mod schema;
pub mod sql;

pub use error::{BulkError, EncodeError, FieldError};
pub use insert::{InsertOptions, bulk_insert, bulk_insert_raw};
pub use schema::{
    field::{AutoPopulate, Field, FieldDescriptor},
    kind::ColumnKind,
    model::ModelMeta,
};
pub use sql::{
    base::{context::ConnectionContext, loader::CopyLoader},
    postgres::loader::{LoaderConfig, PgCopyLoader},
};

use crate::{
    error::FieldError,
    schema::kind::ColumnKind,
    sql::{base::context::ConnectionContext, postgres::coercion},
};
use chrono::Utc;
use model::{core::value::Value, records::row::RowData};
use std::fmt;

/// Hooks a model field exposes to the payload encoder.
pub trait Field<R: ?Sized> {
    /// Attribute name on the model, used to resolve requested columns.
    fn name(&self) -> &str;

    /// Storage column targeted by the bulk load.
    fn column(&self) -> &str;

    fn is_auto_primary_key(&self) -> bool;

    /// The value as currently held by the record.
    fn raw_value(&self, record: &R) -> Value;

    /// Value to save, after any auto-population the field performs.
    fn prepare(&self, record: &R, for_insert: bool) -> Value;

    /// Backend coercion; runs whether or not `prepare` did.
    fn finalize(&self, value: Value, ctx: &ConnectionContext) -> Result<Value, FieldError>;
}

/// Timestamp fields that fill themselves in on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPopulate {
    /// Set to the current time on every save.
    Now,
    /// Set to the current time when the row is first inserted.
    NowOnInsert,
}

type Accessor<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;

pub struct FieldDescriptor<R: ?Sized> {
    name: String,
    column: String,
    kind: ColumnKind,
    max_length: Option<usize>,
    auto_primary_key: bool,
    auto_populate: Option<AutoPopulate>,
    accessor: Accessor<R>,
}

impl<R: ?Sized> FieldDescriptor<R> {
    pub fn new<F>(name: &str, kind: ColumnKind, accessor: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            column: name.to_string(),
            kind,
            max_length: None,
            auto_primary_key: false,
            auto_populate: None,
            accessor: Box::new(accessor),
        }
    }

    /// Stores the field under a column name other than its attribute name
    /// (e.g. `poll` stored as `poll_id`).
    pub fn db_column(mut self, column: &str) -> Self {
        self.column = column.to_string();
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Marks the field as the database-generated primary key. Such fields
    /// are left out when no explicit column list is given.
    pub fn auto_primary_key(mut self) -> Self {
        self.auto_primary_key = true;
        self
    }

    pub fn auto_now(mut self) -> Self {
        self.auto_populate = Some(AutoPopulate::Now);
        self
    }

    pub fn auto_now_add(mut self) -> Self {
        self.auto_populate = Some(AutoPopulate::NowOnInsert);
        self
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn db_type(&self) -> String {
        self.kind.db_type(self.max_length)
    }
}

impl FieldDescriptor<RowData> {
    /// A field reading the same-named value out of a `RowData`; absent
    /// values read as `Null`.
    pub fn row_field(name: &str, kind: ColumnKind) -> Self {
        let key = name.to_string();
        FieldDescriptor::new(name, kind, move |row: &RowData| row.get_value(&key))
    }
}

impl<R: ?Sized> Field<R> for FieldDescriptor<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn is_auto_primary_key(&self) -> bool {
        self.auto_primary_key
    }

    fn raw_value(&self, record: &R) -> Value {
        (self.accessor)(record)
    }

    fn prepare(&self, record: &R, for_insert: bool) -> Value {
        match self.auto_populate {
            Some(AutoPopulate::Now) => Value::Timestamp(Utc::now()),
            Some(AutoPopulate::NowOnInsert) if for_insert => Value::Timestamp(Utc::now()),
            _ => self.raw_value(record),
        }
    }

    fn finalize(&self, value: Value, ctx: &ConnectionContext) -> Result<Value, FieldError> {
        coercion::finalize_value(&self.kind, value, ctx)
    }
}

impl<R: ?Sized> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("max_length", &self.max_length)
            .field("auto_primary_key", &self.auto_primary_key)
            .field("auto_populate", &self.auto_populate)
            .finish_non_exhaustive()
    }
}

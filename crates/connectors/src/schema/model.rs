use crate::{
    error::BulkError,
    schema::field::{Field, FieldDescriptor},
};

/// Table name plus the ordered fields of a model.
#[derive(Debug)]
pub struct ModelMeta<R: ?Sized> {
    pub table: String,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R: ?Sized> ModelMeta<R> {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor<R>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    /// Looks a field up by attribute name, then by storage column.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .or_else(|| self.fields.iter().find(|f| f.column() == name))
    }

    /// Fields to populate. Without a column list every field except the
    /// auto-generated primary key is used, in declaration order; with one,
    /// the caller's order is kept.
    pub fn resolve_fields<S: AsRef<str>>(
        &self,
        columns: Option<&[S]>,
    ) -> Result<Vec<&FieldDescriptor<R>>, BulkError> {
        let fields = match columns {
            None => self
                .fields
                .iter()
                .filter(|f| !f.is_auto_primary_key())
                .collect::<Vec<_>>(),
            Some(names) => names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    self.get_field(name)
                        .ok_or_else(|| BulkError::UnknownColumn(name.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        if fields.is_empty() {
            return Err(BulkError::NoColumns(self.table.clone()));
        }

        Ok(fields)
    }
}

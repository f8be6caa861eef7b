#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: &str) -> Self {
        TableRef {
            schema: None,
            name: name.to_string(),
        }
    }

    /// Splits a `schema.table` name on its first dot. Names without a dot
    /// are left unqualified.
    pub fn parse(qualified: &str) -> Self {
        match qualified.split_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => TableRef {
                schema: Some(schema.to_string()),
                name: name.to_string(),
            },
            _ => TableRef::new(qualified),
        }
    }
}

use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    /// Builds a row from positional values paired with column names.
    /// Surplus values or names are ignored.
    pub fn from_values(entity: &str, names: &[String], values: Vec<Value>) -> Self {
        let field_values = names
            .iter()
            .zip(values)
            .map(|(name, value)| FieldValue::new(name, value))
            .collect();
        RowData::new(entity, field_values)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    /// Value of `field`, with absent fields reading as `Null`.
    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_and_missing_is_null() {
        let row = RowData::new(
            "poll",
            vec![FieldValue::new("Question", Value::String("Q".into()))],
        );

        assert_eq!(row.get_value("question"), Value::String("Q".into()));
        assert_eq!(row.get_value("pub_date"), Value::Null);
    }

    #[test]
    fn test_from_values_pairs_positionally() {
        let names = vec!["a".to_string(), "b".to_string()];
        let row = RowData::from_values("t", &names, vec![Value::Int(1), Value::Null]);

        assert_eq!(row.field_values.len(), 2);
        assert_eq!(row.get_value("a"), Value::Int(1));
        assert_eq!(row.get("b").and_then(|f| f.value.clone()), Some(Value::Null));
    }
}

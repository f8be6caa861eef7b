use crate::error::FieldError;
use model::core::{data_type::DataType, value::Value};
use planner::query::dialect::{Dialect, Postgres};

/// Storage kind of a column. Array and case-insensitive columns are their
/// own variants; everything else is a plain scalar of some `DataType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Scalar(DataType),
    TextArray,
    IntArray,
    CaseInsensitiveChar,
    CaseInsensitiveSlug,
}

impl ColumnKind {
    /// DDL type of the column, e.g. `text[]`, `citext`, `VARCHAR(200)`.
    pub fn db_type(&self, max_length: Option<usize>) -> String {
        match self {
            ColumnKind::Scalar(data_type) => Postgres.render_data_type(data_type, max_length),
            ColumnKind::TextArray => "text[]".to_string(),
            ColumnKind::IntArray => "int[]".to_string(),
            ColumnKind::CaseInsensitiveChar | ColumnKind::CaseInsensitiveSlug => {
                "citext".to_string()
            }
        }
    }

    /// Maps a PostgreSQL type name to a column kind. `citext` is the
    /// case-insensitive text kind; integer arrays get their own kind and any
    /// other array is a text array.
    pub fn from_postgres_type(type_name: &str) -> Result<Self, String> {
        if type_name.trim().eq_ignore_ascii_case("citext") {
            return Ok(ColumnKind::CaseInsensitiveChar);
        }

        match DataType::from_postgres_type(type_name)? {
            DataType::Array(Some(name)) => {
                let base = name.strip_suffix("[]").unwrap_or(&name);
                match DataType::from_postgres_type(base) {
                    Ok(DataType::Short | DataType::Int | DataType::Long) => {
                        Ok(ColumnKind::IntArray)
                    }
                    _ => Ok(ColumnKind::TextArray),
                }
            }
            DataType::Array(None) => Ok(ColumnKind::TextArray),
            data_type => Ok(ColumnKind::Scalar(data_type)),
        }
    }

    /// Converts an assigned value into the column's in-memory form.
    ///
    /// Array columns take lists (or JSON arrays) and read `Null` and the
    /// empty string as `Null`. Case-insensitive columns take text and decode
    /// raw bytes as UTF-8. Scalar columns accept anything.
    pub fn to_value(&self, value: Value) -> Result<Value, FieldError> {
        match self {
            ColumnKind::TextArray => to_text_array(value),
            ColumnKind::IntArray => to_int_array(value),
            ColumnKind::CaseInsensitiveChar | ColumnKind::CaseInsensitiveSlug => to_text(value),
            ColumnKind::Scalar(_) => Ok(value),
        }
    }
}

fn to_text_array(value: Value) -> Result<Value, FieldError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        Value::StringArray(items) => Ok(Value::StringArray(items)),
        Value::IntArray(items) => Ok(Value::StringArray(
            items.iter().map(|v| v.to_string()).collect(),
        )),
        Value::Json(serde_json::Value::Array(items)) => Ok(Value::StringArray(
            items.iter().map(json_value_to_string).collect(),
        )),
        other => Err(FieldError::TypeMismatch {
            expected: "list",
            actual: other.kind(),
        }),
    }
}

fn to_int_array(value: Value) -> Result<Value, FieldError> {
    let mismatch = |actual| FieldError::TypeMismatch {
        expected: "list of integers",
        actual,
    };

    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        Value::IntArray(items) => Ok(Value::IntArray(items)),
        Value::StringArray(items) => items
            .iter()
            .map(|item| item.trim().parse::<i64>().ok())
            .collect::<Option<Vec<_>>>()
            .map(Value::IntArray)
            .ok_or_else(|| mismatch("string array")),
        Value::Json(serde_json::Value::Array(items)) => items
            .iter()
            .map(serde_json::Value::as_i64)
            .collect::<Option<Vec<_>>>()
            .map(Value::IntArray)
            .ok_or_else(|| mismatch("json")),
        other => Err(FieldError::TypeMismatch {
            expected: "list",
            actual: other.kind(),
        }),
    }
}

fn to_text(value: Value) -> Result<Value, FieldError> {
    match value {
        Value::Null | Value::String(_) => Ok(value),
        Value::Bytes(bytes) => Ok(Value::String(String::from_utf8(bytes)?)),
        Value::Json(json) => Ok(Value::String(json_value_to_string(&json))),
        other => other
            .as_string()
            .map(Value::String)
            .ok_or(FieldError::TypeMismatch {
                expected: "text",
                actual: other.kind(),
            }),
    }
}

/// Converts a `serde_json::Value` to a string, unwrapping JSON strings.
pub(crate) fn json_value_to_string(value: &serde_json::Value) -> String {
    value
        .as_str()
        .map(|s| s.to_string())
        .unwrap_or_else(|| value.to_string())
}

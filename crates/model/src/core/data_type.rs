use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashMap, fmt};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DataType {
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    Timestamp,
    TimestampTz,
    VarChar,
    Char,
    String,
    Json,
    Bytea,
    Uuid,
    Array(Option<String>),
    Custom(String),
}

lazy_static! {
    static ref POSTGRES_TYPE_MAP: HashMap<&'static str, DataType> = build_postgres_type_map();
}

impl DataType {
    pub fn from_postgres_type(type_name: &str) -> Result<Self, String> {
        if let Some(array_name) = Self::normalize_postgres_array_type(type_name) {
            return Ok(DataType::Array(Some(array_name)));
        }

        let normalized = Self::normalize_type_name(type_name);
        POSTGRES_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .ok_or_else(|| format!("Unknown Postgres column type: {type_name}"))
    }

    pub fn postgres_name(&self) -> Cow<'_, str> {
        match self {
            DataType::Short => Cow::Borrowed("SMALLINT"),
            DataType::Int => Cow::Borrowed("INTEGER"),
            DataType::Long => Cow::Borrowed("BIGINT"),
            DataType::Float => Cow::Borrowed("REAL"),
            DataType::Double => Cow::Borrowed("DOUBLE PRECISION"),
            DataType::Decimal => Cow::Borrowed("DECIMAL"),
            DataType::Boolean => Cow::Borrowed("BOOLEAN"),
            DataType::Date => Cow::Borrowed("DATE"),
            DataType::Timestamp => Cow::Borrowed("TIMESTAMP"),
            DataType::TimestampTz => Cow::Borrowed("TIMESTAMPTZ"),
            DataType::VarChar => Cow::Borrowed("VARCHAR"),
            DataType::Char => Cow::Borrowed("CHAR"),
            DataType::String => Cow::Borrowed("TEXT"),
            DataType::Json => Cow::Borrowed("JSONB"),
            DataType::Bytea => Cow::Borrowed("BYTEA"),
            DataType::Uuid => Cow::Borrowed("UUID"),
            DataType::Array(Some(name)) => Cow::Owned(name.clone()),
            DataType::Array(None) => Cow::Borrowed("TEXT[]"),
            DataType::Custom(name) => Cow::Borrowed(name),
        }
    }

    pub fn supports_length(&self) -> bool {
        matches!(self, DataType::VarChar | DataType::Char)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DataType::String | DataType::VarChar | DataType::Char)
            || matches!(self, DataType::Custom(name) if name.eq_ignore_ascii_case("text"))
    }

    fn normalize_type_name(type_name: &str) -> String {
        type_name.trim().to_uppercase()
    }

    fn normalize_postgres_array_type(type_name: &str) -> Option<String> {
        let trimmed = type_name.trim();
        let base = if let Some(base) = trimmed.strip_prefix('_') {
            base
        } else if let Some(base) = trimmed.strip_suffix("[]") {
            base
        } else {
            return None;
        };

        let base = base.trim();
        if base.is_empty() {
            None
        } else {
            Some(format!("{}[]", Self::normalize_type_name(base)))
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.postgres_name())
    }
}

fn build_postgres_type_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("BOOLEAN", Boolean),
        ("BOOL", Boolean),
        ("SMALLINT", Short),
        ("INT2", Short),
        ("INTEGER", Int),
        ("INT", Int),
        ("INT4", Int),
        ("BIGINT", Long),
        ("INT8", Long),
        ("REAL", Float),
        ("FLOAT4", Float),
        ("DOUBLE PRECISION", Double),
        ("FLOAT8", Double),
        ("NUMERIC", Decimal),
        ("DECIMAL", Decimal),
        ("DATE", Date),
        ("TIMESTAMP", Timestamp),
        ("TIMESTAMP WITHOUT TIME ZONE", Timestamp),
        ("TIMESTAMPTZ", TimestampTz),
        ("TIMESTAMP WITH TIME ZONE", TimestampTz),
        ("VARCHAR", VarChar),
        ("CHARACTER VARYING", VarChar),
        ("CHAR", Char),
        ("CHARACTER", Char),
        ("BPCHAR", Char),
        ("TEXT", String),
        ("JSON", Json),
        ("JSONB", Json),
        ("BYTEA", Bytea),
        ("UUID", Uuid),
    ];

    entries.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_postgres_type_aliases() {
        assert_eq!(DataType::from_postgres_type("int4").unwrap(), DataType::Int);
        assert_eq!(
            DataType::from_postgres_type(" timestamp with time zone ").unwrap(),
            DataType::TimestampTz
        );
        assert_eq!(
            DataType::from_postgres_type("character varying").unwrap(),
            DataType::VarChar
        );
        assert!(DataType::from_postgres_type("hstore").is_err());
    }

    #[test]
    fn test_array_types_are_normalized() {
        assert_eq!(
            DataType::from_postgres_type("_text").unwrap(),
            DataType::Array(Some("TEXT[]".to_string()))
        );
        assert_eq!(
            DataType::from_postgres_type("int[]").unwrap(),
            DataType::Array(Some("INT[]".to_string()))
        );
        assert!(DataType::from_postgres_type("[]").is_err());
    }

    #[test]
    fn test_text_like_types() {
        assert!(DataType::VarChar.is_text());
        assert!(DataType::Custom("text".into()).is_text());
        assert!(!DataType::Json.is_text());
        assert!(DataType::Char.supports_length());
        assert!(!DataType::String.supports_length());
    }
}

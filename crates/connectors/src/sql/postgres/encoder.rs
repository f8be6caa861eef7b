use crate::{error::EncodeError, sql::base::encoder::CopyValueEncoder};
use chrono::SecondsFormat;
use model::core::value::Value;
use std::borrow::Cow;

/// Cell token standing for the empty string. PostgreSQL reads an unquoted
/// empty CSV field as NULL, so empty strings are written as a quoted empty
/// field instead. The CSV writer escapes the marker to six quotes, which
/// [`fix_empty_string_marks`](super::quote::fix_empty_string_marks) turns
/// back into `""`.
pub const EMPTY_STRING_MARKER: &str = "\"\"";

/// Cell encoder for PostgreSQL `COPY ... WITH (FORMAT csv)`.
///
/// NULL becomes the empty token, the empty string becomes
/// [`EMPTY_STRING_MARKER`] and every other scalar its canonical text.
/// Quoting is left to the CSV writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgCsvValueEncoder;

impl PgCsvValueEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl CopyValueEncoder for PgCsvValueEncoder {
    fn encode_value<'v>(&self, value: &'v Value) -> Result<Cow<'v, str>, EncodeError> {
        let token = match value {
            Value::Null => Cow::Owned(self.encode_null()),
            Value::String(s) if s.is_empty() => Cow::Borrowed(EMPTY_STRING_MARKER),
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Boolean(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
            Value::SmallInt(v) => Cow::Owned(v.to_string()),
            Value::Int32(v) => Cow::Owned(v.to_string()),
            Value::Int(v) => Cow::Owned(v.to_string()),
            Value::Float(v) => Cow::Owned(format_float(*v)),
            Value::Decimal(v) => Cow::Owned(v.to_string()),
            Value::Uuid(v) => Cow::Owned(v.to_string()),
            Value::Date(d) => Cow::Owned(d.to_string()),
            Value::Timestamp(ts) => Cow::Owned(ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
            Value::TimestampNaive(ts) => Cow::Owned(ts.to_string()),
            Value::Json(_) | Value::Bytes(_) | Value::StringArray(_) | Value::IntArray(_) => {
                return Err(EncodeError::UnsupportedValueType(value.kind()));
            }
        };
        Ok(token)
    }

    fn encode_null(&self) -> String {
        String::new()
    }
}

fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        ryu::Buffer::new().format_finite(v).to_string()
    }
}

use crate::{
    error::FieldError,
    schema::kind::{ColumnKind, json_value_to_string},
    sql::base::context::ConnectionContext,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::core::{
    data_type::DataType,
    utils::{encode_bytea, encode_int_array_literal, encode_text_array_literal},
    value::Value,
};

/// Brings a value into the form PostgreSQL expects for the column before it
/// is written to a COPY payload.
pub(crate) fn finalize_value(
    kind: &ColumnKind,
    value: Value,
    ctx: &ConnectionContext,
) -> Result<Value, FieldError> {
    let value = kind.to_value(value)?;
    if value.is_null() {
        return Ok(value);
    }

    let value = match kind {
        ColumnKind::TextArray | ColumnKind::IntArray => coerce_array_value(value),
        ColumnKind::CaseInsensitiveChar | ColumnKind::CaseInsensitiveSlug => value,
        ColumnKind::Scalar(data_type) => coerce_scalar_value(value, data_type, ctx)?,
    };
    Ok(value)
}

/// Renders arrays as PostgreSQL array literals.
fn coerce_array_value(value: Value) -> Value {
    match value {
        Value::StringArray(items) => Value::String(encode_text_array_literal(&items)),
        Value::IntArray(items) => Value::String(encode_int_array_literal(&items)),
        other => other,
    }
}

fn coerce_scalar_value(
    value: Value,
    data_type: &DataType,
    ctx: &ConnectionContext,
) -> Result<Value, FieldError> {
    let value = match data_type {
        DataType::Json => coerce_json_value(value),
        DataType::Bytea => match value {
            Value::Bytes(bytes) => Value::String(encode_bytea(&bytes)),
            other => other,
        },
        DataType::Uuid => match value {
            Value::String(ref s) => match s.trim().parse::<uuid::Uuid>() {
                Ok(uuid) => Value::Uuid(uuid),
                Err(_) => value,
            },
            other => other,
        },
        _ if data_type.is_text() => coerce_text_value(value)?,
        _ => {
            let value = coerce_numeric(value, data_type);
            coerce_temporal(value, data_type, ctx)
        }
    };
    Ok(value)
}

/// Coerces a `Value` to a text-compatible format (e.g., `Bytes` -> `String`).
/// Bytes that are not valid UTF-8 are rejected.
fn coerce_text_value(value: Value) -> Result<Value, FieldError> {
    let value = match value {
        Value::Bytes(bytes) => Value::String(String::from_utf8(bytes)?),
        Value::Json(json) => Value::String(json_value_to_string(&json)),
        other => other,
    };
    Ok(value)
}

/// JSON columns receive serialized JSON text. Strings are assumed to hold
/// JSON already.
fn coerce_json_value(value: Value) -> Value {
    match value {
        Value::Json(json) => Value::String(json.to_string()),
        Value::StringArray(items) => Value::String(serde_json::json!(items).to_string()),
        Value::IntArray(items) => Value::String(serde_json::json!(items).to_string()),
        Value::Boolean(v) => Value::String(v.to_string()),
        other => other,
    }
}

fn coerce_numeric(value: Value, data_type: &DataType) -> Value {
    match data_type {
        DataType::Short => match value.as_i16() {
            Some(v) => Value::SmallInt(v),
            None => value,
        },
        DataType::Int => match value.as_i32() {
            Some(v) => Value::Int32(v),
            None => value,
        },
        DataType::Long => match value.as_i64() {
            Some(v) => Value::Int(v),
            None => value,
        },
        DataType::Float | DataType::Double => match value.as_f64() {
            Some(v) => Value::Float(v),
            None => value,
        },
        DataType::Decimal => match value.as_big_decimal() {
            Some(v) => Value::Decimal(v),
            None => value,
        },
        DataType::Boolean => match value.as_bool() {
            Some(v) => Value::Boolean(v),
            None => value,
        },
        _ => value,
    }
}

fn coerce_temporal(value: Value, data_type: &DataType, ctx: &ConnectionContext) -> Value {
    match data_type {
        DataType::Timestamp => to_naive_timestamp(value),
        DataType::TimestampTz if ctx.use_tz => to_aware_timestamp(value),
        DataType::TimestampTz => to_naive_timestamp(value),
        DataType::Date => match value {
            Value::Timestamp(ts) => Value::Date(ts.date_naive()),
            Value::TimestampNaive(ts) => Value::Date(ts.date()),
            Value::String(ref s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(date) => Value::Date(date),
                Err(_) => value,
            },
            _ => value,
        },
        _ => value,
    }
}

fn to_naive_timestamp(value: Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::TimestampNaive(ts.naive_utc()),
        Value::String(ref s) => match parse_naive_datetime(s) {
            Some(dt) => Value::TimestampNaive(dt),
            None => value,
        },
        _ => value,
    }
}

fn to_aware_timestamp(value: Value) -> Value {
    match value {
        Value::TimestampNaive(ts) => {
            Value::Timestamp(DateTime::<Utc>::from_naive_utc_and_offset(ts, Utc))
        }
        Value::String(ref s) => match parse_datetime(s) {
            Some(dt) => Value::Timestamp(dt),
            None => value,
        },
        _ => value,
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_naive_datetime(raw).map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.naive_utc())
                .ok()
        })
}

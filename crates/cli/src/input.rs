use crate::error::CliError;
use connectors::{ColumnKind, FieldDescriptor, ModelMeta};
use model::{
    core::{data_type::DataType, value::Value},
    records::row::RowData,
};

/// One `--columns` entry: `name` or `name:type`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: Option<ColumnKind>,
}

pub fn parse_columns(raw: &str) -> Result<Vec<ColumnSpec>, CliError> {
    let specs = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_column)
        .collect::<Result<Vec<_>, _>>()?;

    if specs.is_empty() {
        return Err(CliError::InvalidColumn {
            spec: raw.to_string(),
            reason: "no columns given".into(),
        });
    }
    Ok(specs)
}

fn parse_column(spec: &str) -> Result<ColumnSpec, CliError> {
    let invalid = |reason: String| CliError::InvalidColumn {
        spec: spec.to_string(),
        reason,
    };

    let (name, kind) = match spec.split_once(':') {
        Some((name, type_name)) => {
            let kind = ColumnKind::from_postgres_type(type_name).map_err(invalid)?;
            (name.trim(), Some(kind))
        }
        None => (spec, None),
    };

    if name.is_empty() {
        return Err(invalid("empty column name".into()));
    }

    Ok(ColumnSpec {
        name: name.to_string(),
        kind,
    })
}

pub fn column_names(specs: &[ColumnSpec]) -> Vec<String> {
    specs.iter().map(|s| s.name.clone()).collect()
}

/// Whether any column carries a type, in which case rows go through the
/// typed field path instead of the raw one.
pub fn is_typed(specs: &[ColumnSpec]) -> bool {
    specs.iter().any(|s| s.kind.is_some())
}

/// Model over `RowData` records for the given columns. Untyped columns are
/// treated as text.
pub fn row_model(table: &str, specs: &[ColumnSpec]) -> ModelMeta<RowData> {
    specs.iter().fold(ModelMeta::new(table), |meta, spec| {
        let kind = spec
            .kind
            .clone()
            .unwrap_or(ColumnKind::Scalar(DataType::String));
        meta.field(FieldDescriptor::row_field(&spec.name, kind))
    })
}

/// Parses JSON-lines rows. A line is either an array with one cell per
/// column in column order or an object keyed by column name; missing keys
/// read as null and unknown keys are rejected. Blank lines are skipped.
pub fn parse_rows(content: &str, columns: &[String]) -> Result<Vec<Vec<Value>>, CliError> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let json: serde_json::Value =
            serde_json::from_str(line).map_err(|e| CliError::InvalidRow {
                line: line_no,
                reason: e.to_string(),
            })?;

        let invalid = |reason: String| CliError::InvalidRow {
            line: line_no,
            reason,
        };

        let row = match json {
            serde_json::Value::Array(cells) if cells.len() != columns.len() => {
                return Err(invalid(format!(
                    "expected {} values, got {}",
                    columns.len(),
                    cells.len()
                )));
            }
            serde_json::Value::Array(cells) => cells.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(mut obj) => {
                let row: Vec<Value> = columns
                    .iter()
                    .map(|c| obj.remove(c).map(Value::from).unwrap_or(Value::Null))
                    .collect();
                if let Some(key) = obj.keys().next() {
                    return Err(invalid(format!("unknown column `{key}`")));
                }
                row
            }
            other => {
                return Err(invalid(format!(
                    "expected an array or an object, got {other}"
                )));
            }
        };
        rows.push(row);
    }

    Ok(rows)
}

/// Rows must already match `columns` in width, as `parse_rows` ensures.
pub fn to_records(table: &str, columns: &[String], rows: Vec<Vec<Value>>) -> Vec<RowData> {
    rows.into_iter()
        .map(|row| RowData::from_values(table, columns, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns() {
        let specs = parse_columns("question, tags:text[] ,pub_date:timestamp with time zone").unwrap();

        assert_eq!(column_names(&specs), vec!["question", "tags", "pub_date"]);
        assert_eq!(specs[0].kind, None);
        assert_eq!(specs[1].kind, Some(ColumnKind::TextArray));
        assert_eq!(
            specs[2].kind,
            Some(ColumnKind::Scalar(DataType::TimestampTz))
        );
        assert!(is_typed(&specs));
        assert!(!is_typed(&parse_columns("a,b").unwrap()));
    }

    #[test]
    fn test_parse_columns_errors() {
        assert!(matches!(
            parse_columns(" , "),
            Err(CliError::InvalidColumn { .. })
        ));
        assert!(parse_columns("a:nope").is_err());
        assert!(parse_columns(":int").is_err());
    }

    #[test]
    fn test_parse_rows_arrays_and_objects() {
        let columns = vec!["choice_text".to_string(), "poll_id".into(), "votes".into()];
        let content = "[\"\", 1, null]\n\n{\"poll_id\": 2, \"choice_text\": \"Yes\"}\n";

        let rows = parse_rows(content, &columns).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Value::String(String::new()), Value::Int(1), Value::Null],
                vec![Value::String("Yes".into()), Value::Int(2), Value::Null],
            ]
        );
    }

    #[test]
    fn test_parse_rows_reports_line() {
        let err = parse_rows("[1]\n42\n", &["a".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::InvalidRow { line: 2, .. }));

        let err = parse_rows("{oops", &["a".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::InvalidRow { line: 1, .. }));
    }

    #[test]
    fn test_parse_rows_rejects_wrong_width() {
        let columns = vec!["a".to_string(), "b".into()];

        let err = parse_rows("[\"x\", [1], \"surplus\"]\n", &columns).unwrap_err();
        assert!(matches!(err, CliError::InvalidRow { line: 1, .. }));
        assert!(err.to_string().contains("expected 2 values, got 3"));

        let err = parse_rows("[\"x\", [1]]\n[\"only\"]\n", &columns).unwrap_err();
        assert!(matches!(err, CliError::InvalidRow { line: 2, .. }));

        let err = parse_rows("{\"a\": 1, \"c\": 2}", &columns).unwrap_err();
        assert!(err.to_string().contains("unknown column `c`"));
    }

    #[test]
    fn test_row_model_defaults_to_text() {
        let specs = parse_columns("title,tags:int[]").unwrap();
        let meta = row_model("t", &specs);

        assert_eq!(meta.fields().len(), 2);
        assert_eq!(meta.fields()[0].db_type(), "TEXT");
        assert_eq!(meta.fields()[1].db_type(), "int[]");
    }
}

use crate::{
    error::EncodeError,
    schema::field::Field,
    sql::{
        base::{context::ConnectionContext, encoder::CopyValueEncoder},
        postgres::{
            encoder::PgCsvValueEncoder,
            quote::{fix_empty_string_marks, quote_end_of_data_marks},
        },
    },
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use model::core::value::Value;
use std::borrow::Cow;
use tracing::debug;

/// Accumulates CSV lines for a `COPY ... FROM STDIN WITH (FORMAT csv)`.
pub struct PayloadWriter {
    writer: csv::Writer<Vec<u8>>,
    records: usize,
}

impl PayloadWriter {
    pub fn new() -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b',')
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .double_quote(true)
            .from_writer(Vec::new());

        Self { writer, records: 0 }
    }

    pub fn write_record(&mut self, cells: &[Cow<'_, str>]) -> Result<(), EncodeError> {
        self.writer.write_record(cells.iter().map(|c| c.as_bytes()))?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> usize {
        self.records
    }

    /// Returns the corrected payload. The writer quotes a lone empty field,
    /// which the correction turns back into a bare line so NULL stays NULL.
    pub fn finish(self) -> Result<String, EncodeError> {
        let bytes = self
            .writer
            .into_inner()
            .map_err(|e| EncodeError::Io(e.into_error()))?;
        let payload = String::from_utf8(bytes)?;
        let payload = fix_empty_string_marks(&payload);
        Ok(quote_end_of_data_marks(&payload))
    }
}

impl Default for PayloadWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes model records into a payload, one line per record with one cell
/// per field. Each value is `finalize(prepare(..))` when `run_prepare` is
/// set and `finalize(raw_value(..))` otherwise.
pub fn encode_records<R, F>(
    records: &[R],
    fields: &[&F],
    run_prepare: bool,
    ctx: &ConnectionContext,
) -> Result<String, EncodeError>
where
    F: Field<R> + ?Sized,
{
    let encoder = PgCsvValueEncoder::new();
    let mut writer = PayloadWriter::new();

    for record in records {
        let values = fields
            .iter()
            .map(|field| {
                let value = if run_prepare {
                    field.prepare(record, true)
                } else {
                    field.raw_value(record)
                };
                field
                    .finalize(value, ctx)
                    .map_err(|e| EncodeError::from(e).in_column(field.column()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cells = encode_cells(&encoder, &values, fields.iter().map(|f| f.column()))?;
        writer.write_record(&cells)?;
    }

    finish(writer)
}

/// Encodes pre-extracted rows. Values go straight to the cell encoder with
/// no field hooks involved.
pub fn encode_rows(rows: &[Vec<Value>], columns: &[String]) -> Result<String, EncodeError> {
    let encoder = PgCsvValueEncoder::new();
    let mut writer = PayloadWriter::new();

    for (idx, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(EncodeError::RowWidth {
                row: idx,
                expected: columns.len(),
                actual: row.len(),
            });
        }

        let cells = encode_cells(&encoder, row, columns.iter().map(String::as_str))?;
        writer.write_record(&cells)?;
    }

    finish(writer)
}

fn encode_cells<'v, 'c>(
    encoder: &PgCsvValueEncoder,
    values: &'v [Value],
    columns: impl Iterator<Item = &'c str>,
) -> Result<Vec<Cow<'v, str>>, EncodeError> {
    values
        .iter()
        .zip(columns)
        .map(|(value, column)| encoder.encode_value(value).map_err(|e| e.in_column(column)))
        .collect()
}

fn finish(writer: PayloadWriter) -> Result<String, EncodeError> {
    let records = writer.records();
    let payload = writer.finish()?;
    debug!(records, bytes = payload.len(), "Encoded COPY payload");
    Ok(payload)
}

use crate::error::EncodeError;
use model::core::value::Value;
use std::borrow::Cow;

/// Provides database-specific cell encoding for COPY style ingestion.
pub trait CopyValueEncoder {
    /// Encodes a concrete value into the cell token written to the payload.
    fn encode_value<'v>(&self, value: &'v Value) -> Result<Cow<'v, str>, EncodeError>;

    /// Token standing for SQL NULL.
    fn encode_null(&self) -> String;

    /// Helper that encodes an optional value, delegating NULL handling.
    fn encode_optional<'v>(&self, value: Option<&'v Value>) -> Result<Cow<'v, str>, EncodeError> {
        match value {
            Some(v) => self.encode_value(v),
            None => Ok(Cow::Owned(self.encode_null())),
        }
    }
}

//! Errors raised while translating a snapshot record.

use wavefront_common::SendError;
use wavefront_histogram::ParsePayloadError;

/// An error raised while translating and dispatching one snapshot record.
///
/// All variants fail the current record fast and propagate unmodified to the
/// flush-cycle caller; the writer never catches, retries or skips. The first
/// three variants are contract violations by the snapshot producer.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The field name and field value slices differ in length.
    #[error("field name/value count mismatch: {names} names for {values} values")]
    FieldCountMismatch {
        /// Number of field names passed by the producer.
        names: usize,
        /// Number of field values passed by the producer.
        values: usize,
    },

    /// The record carries no metric kind tag.
    #[error("record carries no `mtype` tag")]
    MissingKindTag,

    /// The record's metric kind tag holds an unrecognized value.
    #[error("unrecognized metric kind `{0}`")]
    UnknownKind(String),

    /// A field required by the record's kind is absent.
    #[error("{kind} record is missing its `{field}` field")]
    MissingField {
        /// The missing field's name.
        field: String,
        /// The kind of the record.
        kind: &'static str,
    },

    /// A field selected for reporting does not hold a numeric value.
    #[error("field `{field}` does not hold a numeric value")]
    NonNumericField {
        /// The offending field's name.
        field: String,
    },

    /// A distribution carrier field does not hold a serialized payload.
    #[error("distribution carrier field `{field}` does not hold a string payload")]
    NonTextCarrier {
        /// The offending field's name.
        field: String,
    },

    /// The distribution carrier fields hold a malformed payload.
    #[error("malformed distribution payload")]
    Payload(#[from] ParsePayloadError),

    /// The sender rejected a translated metric.
    #[error("failed to dispatch metric")]
    Send(#[from] SendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        insta::assert_snapshot!(
            WriteError::FieldCountMismatch { names: 2, values: 1 }.to_string(),
            @"field name/value count mismatch: 2 names for 1 values"
        );
        insta::assert_snapshot!(
            WriteError::UnknownKind("ratio".to_owned()).to_string(),
            @"unrecognized metric kind `ratio`"
        );
        insta::assert_snapshot!(
            WriteError::MissingField {
                field: "value".to_owned(),
                kind: "gauge",
            }
            .to_string(),
            @"gauge record is missing its `value` field"
        );
    }

    #[test]
    fn test_payload_error_source_preserved() {
        let error = WriteError::from(ParsePayloadError::MissingWeight);
        let source = std::error::Error::source(&error).expect("source");
        assert_eq!(source.to_string(), "centroid list holds a value without a weight");
    }
}

//! The snapshot record model.
//!
//! The metrics framework encodes the metric kind and the Wavefront-specific
//! variant markers as reserved tags on each record. Records decode those
//! tags exactly once, at the [`MetricRecord::from_parts`] boundary, into an
//! explicit [`MetricKind`]; from there on, dispatch is a plain match and the
//! reserved tags only matter for exclusion from the outbound tag map.

use std::collections::BTreeMap;

use wavefront_common::UnixTimestamp;

use crate::WriteError;

/// The reserved tag key carrying the metric kind.
pub const KIND_TAG_KEY: &str = "mtype";

/// The reserved tag key carrying the Wavefront-specific metric variant.
pub const VARIANT_TAG_KEY: &str = "wavefrontMetricType";

/// The [`VARIANT_TAG_KEY`] value marking a counter as a delta counter.
pub const DELTA_COUNTER_TAG_VALUE: &str = "deltaCounter";

/// The [`VARIANT_TAG_KEY`] value marking a histogram as a pre-aggregated
/// distribution.
pub const DISTRIBUTION_TAG_VALUE: &str = "wavefrontHistogram";

/// The context under which the metrics framework reports its own bookkeeping
/// metrics. Records in this context are never forwarded to the backend.
pub const INTERNAL_METRICS_CONTEXT: &str = "appmetrics.internal";

/// The kind of a snapshot record, including its Wavefront-specific variant.
///
/// Counters and histograms come in two flavors: a counter may be a *delta
/// counter* (its value is an increment aggregated server-side), and a
/// histogram may be a *pre-aggregated distribution* shipped through the
/// distribution API. Timers report both meter-shaped and histogram-shaped
/// output, so they carry the distribution flag for their histogram half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricKind {
    /// An apdex score.
    Apdex,
    /// A counter, either cumulative or delta.
    Counter {
        /// Whether the counter reports increments instead of running totals.
        delta: bool,
    },
    /// A gauge holding a single value.
    Gauge,
    /// A histogram, either sampled into scalar sub-fields or pre-aggregated.
    Histogram {
        /// Whether the histogram carries a pre-aggregated distribution.
        distribution: bool,
    },
    /// A meter reporting event rates.
    Meter,
    /// A timer, reporting both meter and histogram output.
    Timer {
        /// Whether the timer's histogram half carries a pre-aggregated
        /// distribution.
        distribution: bool,
    },
}

impl MetricKind {
    /// Decodes the kind and variant markers from a record's tag sequence.
    ///
    /// The first [`KIND_TAG_KEY`] tag determines the kind; an absent or
    /// unrecognized kind is a contract violation by the snapshot producer.
    pub fn from_tags(tags: &[(&str, &str)]) -> Result<Self, WriteError> {
        let kind = tags
            .iter()
            .find(|(key, _)| *key == KIND_TAG_KEY)
            .map(|(_, value)| *value)
            .ok_or(WriteError::MissingKindTag)?;

        let has_variant = |marker: &str| {
            tags.iter()
                .any(|(key, value)| *key == VARIANT_TAG_KEY && *value == marker)
        };

        Ok(match kind {
            "apdex" => Self::Apdex,
            "counter" => Self::Counter {
                delta: has_variant(DELTA_COUNTER_TAG_VALUE),
            },
            "gauge" => Self::Gauge,
            "histogram" => Self::Histogram {
                distribution: has_variant(DISTRIBUTION_TAG_VALUE),
            },
            "meter" => Self::Meter,
            "timer" => Self::Timer {
                distribution: has_variant(DISTRIBUTION_TAG_VALUE),
            },
            other => return Err(WriteError::UnknownKind(other.to_owned())),
        })
    }

    /// Returns the kind's name as used in the kind tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apdex => "apdex",
            Self::Counter { .. } => "counter",
            Self::Gauge => "gauge",
            Self::Histogram { .. } => "histogram",
            Self::Meter => "meter",
            Self::Timer { .. } => "timer",
        }
    }
}

/// A single sub-field value of a snapshot record.
///
/// Numeric variants coerce to `f64` for reporting. [`Text`](Self::Text)
/// exists for the repurposed histogram user-value slots, which carry
/// serialized distribution payloads rather than numbers and must never be
/// coerced.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A floating point value.
    Float(f64),
    /// A signed integer value.
    Signed(i64),
    /// An unsigned integer value.
    Unsigned(u64),
    /// A textual value.
    Text(String),
}

impl FieldValue {
    /// Returns the value as a point value, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Signed(value) => Some(*value as f64),
            Self::Unsigned(value) => Some(*value as f64),
            Self::Text(_) => None,
        }
    }

    /// Returns the value as text, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One metric instance of one flush cycle, decoded for dispatch.
///
/// Records borrow the snapshot producer's buffers and live only for the
/// duration of a single write call.
#[derive(Clone, Debug)]
pub struct MetricRecord<'a> {
    /// The context (metric namespace) of the record.
    pub context: &'a str,
    /// The name of the metric within its context.
    pub name: &'a str,
    /// The decoded kind, including variant markers.
    pub kind: MetricKind,
    /// The snapshot timestamp of the record.
    pub timestamp: UnixTimestamp,
    fields: BTreeMap<&'a str, &'a FieldValue>,
    tags: &'a [(&'a str, &'a str)],
}

impl<'a> MetricRecord<'a> {
    /// Builds a record from the flat column/value shape emitted by the
    /// snapshot producer.
    ///
    /// Field names and values are zipped into a lookup; a length mismatch
    /// between the two slices is a contract violation and fails fast. The
    /// kind is decoded from the reserved tags.
    pub fn from_parts(
        context: &'a str,
        name: &'a str,
        field_names: &'a [&'a str],
        field_values: &'a [FieldValue],
        tags: &'a [(&'a str, &'a str)],
        timestamp: UnixTimestamp,
    ) -> Result<Self, WriteError> {
        if field_names.len() != field_values.len() {
            return Err(WriteError::FieldCountMismatch {
                names: field_names.len(),
                values: field_values.len(),
            });
        }

        Ok(Self {
            context,
            name,
            kind: MetricKind::from_tags(tags)?,
            timestamp,
            fields: field_names.iter().copied().zip(field_values).collect(),
            tags,
        })
    }

    /// Returns the value of the given sub-field, if present.
    pub fn field(&self, name: &str) -> Option<&'a FieldValue> {
        self.fields.get(name).copied()
    }

    /// Returns the record's raw tag sequence, reserved tags included.
    pub fn tags(&self) -> &'a [(&'a str, &'a str)] {
        self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_decoding() {
        assert_eq!(
            MetricKind::from_tags(&[("host", "web-1"), ("mtype", "gauge")]).unwrap(),
            MetricKind::Gauge
        );
        assert_eq!(
            MetricKind::from_tags(&[("mtype", "counter")]).unwrap(),
            MetricKind::Counter { delta: false }
        );
        assert_eq!(
            MetricKind::from_tags(&[
                ("mtype", "counter"),
                ("wavefrontMetricType", "deltaCounter"),
            ])
            .unwrap(),
            MetricKind::Counter { delta: true }
        );
        assert_eq!(
            MetricKind::from_tags(&[
                ("wavefrontMetricType", "wavefrontHistogram"),
                ("mtype", "histogram"),
            ])
            .unwrap(),
            MetricKind::Histogram { distribution: true }
        );
        assert_eq!(
            MetricKind::from_tags(&[("mtype", "timer")]).unwrap(),
            MetricKind::Timer {
                distribution: false
            }
        );
    }

    #[test]
    fn test_kind_tag_required() {
        assert!(matches!(
            MetricKind::from_tags(&[("host", "web-1")]),
            Err(WriteError::MissingKindTag)
        ));
        assert!(matches!(
            MetricKind::from_tags(&[("mtype", "ratio")]),
            Err(WriteError::UnknownKind(kind)) if kind == "ratio"
        ));
    }

    #[test]
    fn test_first_kind_tag_wins() {
        let tags = [("mtype", "meter"), ("mtype", "gauge")];
        assert_eq!(MetricKind::from_tags(&tags).unwrap(), MetricKind::Meter);
    }

    #[test]
    fn test_marker_ignores_foreign_values() {
        // A histogram marker on a counter does not make it a delta counter.
        let tags = [
            ("mtype", "counter"),
            ("wavefrontMetricType", "wavefrontHistogram"),
        ];
        assert_eq!(
            MetricKind::from_tags(&tags).unwrap(),
            MetricKind::Counter { delta: false }
        );
    }

    #[test]
    fn test_field_count_mismatch() {
        let names = ["value", "count"];
        let values = [FieldValue::Signed(1)];
        let tags = [("mtype", "counter")];

        let result = MetricRecord::from_parts(
            "application",
            "requests",
            &names,
            &values,
            &tags,
            UnixTimestamp::from_secs(0),
        );

        assert!(matches!(
            result,
            Err(WriteError::FieldCountMismatch {
                names: 2,
                values: 1
            })
        ));
    }

    #[test]
    fn test_field_lookup() {
        let names = ["value"];
        let values = [FieldValue::Float(1.5)];
        let tags = [("mtype", "gauge")];

        let record = MetricRecord::from_parts(
            "application",
            "queue_depth",
            &names,
            &values,
            &tags,
            UnixTimestamp::from_secs(0),
        )
        .unwrap();

        assert_eq!(record.field("value"), Some(&FieldValue::Float(1.5)));
        assert_eq!(record.field("missing"), None);
    }
}

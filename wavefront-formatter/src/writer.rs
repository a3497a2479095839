//! The snapshot writer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use wavefront_common::{
    Granularity, SdkCounter, SdkMetricsRegistry, UnixTimestamp, WavefrontSender, sanitize_name,
};

use crate::{
    ConfigError, FieldValue, GaugeField, HistogramField, INTERNAL_METRICS_CONTEXT, KIND_TAG_KEY,
    MetricKind, MetricNameMapping, MetricRecord, ReportingConfig, VARIANT_TAG_KEY, WriteError,
};

/// Separates the components of a dispatched metric name.
const NAME_SEPARATOR: &str = ".";

/// Self-observability counters of the writer, one per dispatched kind plus
/// an error counter.
#[derive(Debug)]
struct ReportedCounters {
    apdexes: SdkCounter,
    counters: SdkCounter,
    delta_counters: SdkCounter,
    gauges: SdkCounter,
    histograms: SdkCounter,
    wavefront_histograms: SdkCounter,
    meters: SdkCounter,
    timers: SdkCounter,
    errors: SdkCounter,
}

impl ReportedCounters {
    fn new(registry: &SdkMetricsRegistry) -> Self {
        Self {
            apdexes: registry.counter("apdexes.reported"),
            counters: registry.counter("counters.reported"),
            delta_counters: registry.counter("delta_counters.reported"),
            gauges: registry.counter("gauges.reported"),
            histograms: registry.counter("histograms.reported"),
            wavefront_histograms: registry.counter("wavefront_histograms.reported"),
            meters: registry.counter("meters.reported"),
            timers: registry.counter("timers.reported"),
            errors: registry.counter("writer.errors"),
        }
    }
}

/// Translates snapshot records into Wavefront metrics and dispatches them.
///
/// The writer is constructed once per reporter from an immutable
/// [`ReportingConfig`] and holds no state across records beyond that
/// configuration and the optional self-observability counters. One
/// [`write`](Self::write) call translates exactly one record; the snapshot
/// serializer calls it once per metric instance per flush cycle.
pub struct SnapshotWriter {
    sender: Arc<dyn WavefrontSender>,
    source: String,
    global_tags: BTreeMap<String, String>,
    granularities: BTreeSet<Granularity>,
    mapping: MetricNameMapping,
    counters: Option<ReportedCounters>,
}

impl SnapshotWriter {
    /// Creates a writer from a validated configuration.
    ///
    /// When a registry is passed, the writer registers its
    /// self-observability counters there; without one, self-observability is
    /// disabled.
    pub fn new(
        sender: Arc<dyn WavefrontSender>,
        config: ReportingConfig,
        registry: Option<&SdkMetricsRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            sender,
            source: config.source,
            global_tags: config.global_tags,
            granularities: config.granularities,
            mapping: config.mapping,
            counters: registry.map(ReportedCounters::new),
        })
    }

    /// Translates one snapshot record and dispatches the resulting metrics.
    ///
    /// Records in the framework's internal context are dropped without
    /// dispatching or counting. Any failure (contract violation, malformed
    /// distribution payload, sender rejection) increments the error counter
    /// exactly once and propagates unmodified; the flush-cycle caller
    /// decides whether to abort or skip.
    pub fn write(
        &self,
        context: &str,
        name: &str,
        field_names: &[&str],
        field_values: &[FieldValue],
        tags: &[(&str, &str)],
        timestamp: UnixTimestamp,
    ) -> Result<(), WriteError> {
        if context == INTERNAL_METRICS_CONTEXT {
            tracing::trace!(name, "dropping internal framework metric");
            return Ok(());
        }

        let record =
            match MetricRecord::from_parts(context, name, field_names, field_values, tags, timestamp)
            {
                Ok(record) => record,
                Err(error) => {
                    self.count_error();
                    return Err(error);
                }
            };

        self.write_record(&record)
    }

    /// Dispatches an already decoded record.
    pub fn write_record(&self, record: &MetricRecord<'_>) -> Result<(), WriteError> {
        let result = self.dispatch(record);
        if result.is_err() {
            self.count_error();
        }
        result
    }

    fn dispatch(&self, record: &MetricRecord<'_>) -> Result<(), WriteError> {
        let counters = self.counters.as_ref();

        match record.kind {
            MetricKind::Apdex => {
                self.write_apdex(record)?;
                count(counters.map(|c| &c.apdexes));
            }
            MetricKind::Counter { delta } => {
                self.write_counter(record, delta)?;
                count(counters.map(|c| if delta { &c.delta_counters } else { &c.counters }));
            }
            MetricKind::Gauge => {
                self.write_gauge(record)?;
                count(counters.map(|c| &c.gauges));
            }
            MetricKind::Histogram { distribution } => {
                self.write_histogram(record, distribution)?;
                count(counters.map(|c| {
                    if distribution {
                        &c.wavefront_histograms
                    } else {
                        &c.histograms
                    }
                }));
            }
            MetricKind::Meter => {
                self.write_meter(record)?;
                count(counters.map(|c| &c.meters));
            }
            MetricKind::Timer { distribution } => {
                self.write_meter(record)?;
                self.write_histogram(record, distribution)?;
                count(counters.map(|c| &c.timers));
            }
        }

        Ok(())
    }

    fn write_apdex(&self, record: &MetricRecord<'_>) -> Result<(), WriteError> {
        for field in self.mapping.apdex.values() {
            if let Some(value) = record.field(field) {
                self.emit_point(record, field, field, value)?;
            }
        }
        Ok(())
    }

    fn write_counter(&self, record: &MetricRecord<'_>, delta: bool) -> Result<(), WriteError> {
        // The mapped counter fields plus the conventional `value` field.
        let mut fields: Vec<&str> = self.mapping.counter.values().map(String::as_str).collect();
        if !fields.contains(&"value") {
            fields.push("value");
        }

        for field in fields {
            let Some(value) = record.field(field) else {
                continue;
            };

            // `value` is renamed to `count` so that counters line up with
            // the count sub-fields of the other kinds.
            let suffix = if field == "value" { "count" } else { field };

            if delta {
                let value = numeric(field, value)?;
                let name = self.metric_name(&[record.context, record.name, suffix]);
                self.sender.send_delta_counter(
                    &name,
                    value,
                    &self.source,
                    &self.filter_tags(record.tags()),
                )?;
            } else {
                self.emit_point(record, field, suffix, value)?;
            }
        }

        Ok(())
    }

    fn write_gauge(&self, record: &MetricRecord<'_>) -> Result<(), WriteError> {
        let field = self
            .mapping
            .gauge
            .get(&GaugeField::Value)
            .map(String::as_str)
            .unwrap_or("value");

        let value = record.field(field).ok_or_else(|| WriteError::MissingField {
            field: field.to_owned(),
            kind: record.kind.name(),
        })?;

        self.emit_point(record, field, field, value)
    }

    fn write_histogram(
        &self,
        record: &MetricRecord<'_>,
        distribution: bool,
    ) -> Result<(), WriteError> {
        if distribution {
            return self.write_distributions(record);
        }

        for (role, field) in &self.mapping.histogram {
            // The user-value slots hold non-numeric data and are never
            // reported as points.
            if matches!(
                role,
                HistogramField::UserLastValue
                    | HistogramField::UserMinValue
                    | HistogramField::UserMaxValue
            ) {
                continue;
            }

            if let Some(value) = record.field(field) {
                self.emit_point(record, field, field, value)?;
            }
        }

        Ok(())
    }

    /// Dispatches a pre-aggregated histogram through the distribution API.
    ///
    /// The distribution data arrives serialized in the repurposed user
    /// min/max value fields; the metric name carries no field suffix.
    fn write_distributions(&self, record: &MetricRecord<'_>) -> Result<(), WriteError> {
        let timestamps_field = self.histogram_field(HistogramField::UserMaxValue, "user.max");
        let centroids_field = self.histogram_field(HistogramField::UserMinValue, "user.min");

        let (Some(timestamps), Some(centroids)) = (
            record.field(timestamps_field),
            record.field(centroids_field),
        ) else {
            tracing::debug!(
                metric = record.name,
                "pre-aggregated histogram without carrier fields"
            );
            return Ok(());
        };

        let timestamps = text_carrier(timestamps_field, timestamps)?;
        let centroids = text_carrier(centroids_field, centroids)?;
        let distributions = wavefront_histogram::deserialize(timestamps, centroids)?;

        let name = self.metric_name(&[record.context, record.name]);
        let tags = self.filter_tags(record.tags());

        for distribution in distributions {
            self.sender.send_distribution(
                &name,
                &distribution.centroids,
                &self.granularities,
                distribution.timestamp,
                &self.source,
                &tags,
            )?;
        }

        Ok(())
    }

    fn write_meter(&self, record: &MetricRecord<'_>) -> Result<(), WriteError> {
        for field in self.mapping.meter.values() {
            if let Some(value) = record.field(field) {
                self.emit_point(record, field, field, value)?;
            }
        }
        Ok(())
    }

    /// Dispatches one point for the sub-field `field`, reported under the
    /// name component `suffix`.
    fn emit_point(
        &self,
        record: &MetricRecord<'_>,
        field: &str,
        suffix: &str,
        value: &FieldValue,
    ) -> Result<(), WriteError> {
        let value = numeric(field, value)?;
        let name = self.metric_name(&[record.context, record.name, suffix]);

        self.sender.send_point(
            &name,
            value,
            Some(record.timestamp),
            &self.source,
            &self.filter_tags(record.tags()),
        )?;

        Ok(())
    }

    /// Builds the outbound tag map for one dispatch.
    ///
    /// Point tags overlay the configured global tags in their given order,
    /// so on duplicate keys the record's last occurrence wins. The reserved
    /// kind and variant tags are exporter-internal signaling and never reach
    /// the backend.
    fn filter_tags(&self, tags: &[(&str, &str)]) -> BTreeMap<String, String> {
        let mut merged = self.global_tags.clone();

        for (key, value) in tags {
            if *key == KIND_TAG_KEY || *key == VARIANT_TAG_KEY {
                continue;
            }
            merged.insert((*key).to_owned(), (*value).to_owned());
        }

        merged
    }

    fn metric_name(&self, components: &[&str]) -> String {
        sanitize_name(&components.join(NAME_SEPARATOR)).into_owned()
    }

    fn histogram_field(&self, role: HistogramField, default: &'static str) -> &str {
        self.mapping
            .histogram
            .get(&role)
            .map(String::as_str)
            .unwrap_or(default)
    }

    fn count_error(&self) {
        if let Some(counters) = &self.counters {
            counters.errors.inc();
        }
    }
}

fn count(counter: Option<&SdkCounter>) {
    if let Some(counter) = counter {
        counter.inc();
    }
}

fn numeric(field: &str, value: &FieldValue) -> Result<f64, WriteError> {
    value.as_f64().ok_or_else(|| WriteError::NonNumericField {
        field: field.to_owned(),
    })
}

fn text_carrier<'a>(field: &str, value: &'a FieldValue) -> Result<&'a str, WriteError> {
    value.as_text().ok_or_else(|| WriteError::NonTextCarrier {
        field: field.to_owned(),
    })
}

//! Mapping of abstract field roles to snapshot field names.
//!
//! Each metric kind exposes a fixed set of sub-field *roles* (a histogram
//! has a mean, a p99, and so on). The concrete field names under which the
//! snapshot producer emits those roles are configuration: the tables below
//! default to the names generated by the metrics framework, and deployments
//! that customize the framework's field names override them here. The
//! mapping is read-only data; the writer only ever looks names up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The sub-field roles of an apdex score.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApdexField {
    /// The number of samples scored.
    Samples,
    /// The apdex score itself.
    Score,
    /// The number of satisfied samples.
    Satisfied,
    /// The number of tolerating samples.
    Tolerating,
    /// The number of frustrating samples.
    Frustrating,
}

/// The sub-field roles of a counter.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    /// The counter's value.
    Value,
}

/// The sub-field roles of a gauge.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeField {
    /// The gauge's value.
    Value,
}

/// The sub-field roles of a histogram.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramField {
    /// The number of samples in the reservoir.
    Samples,
    /// The last recorded value.
    LastValue,
    /// The total number of recorded values.
    Count,
    /// The sum of recorded values.
    Sum,
    /// The minimum recorded value.
    Min,
    /// The maximum recorded value.
    Max,
    /// The mean of recorded values.
    Mean,
    /// The median of recorded values.
    Median,
    /// The standard deviation of recorded values.
    StdDev,
    /// The 75th percentile.
    Percentile75,
    /// The 95th percentile.
    Percentile95,
    /// The 98th percentile.
    Percentile98,
    /// The 99th percentile.
    Percentile99,
    /// The 99.9th percentile.
    Percentile999,
    /// The user value recorded with the last sample.
    ///
    /// Not numeric; never reported as a point.
    UserLastValue,
    /// The user value recorded with the minimum sample.
    ///
    /// Not numeric; repurposed as the centroid carrier by pre-aggregated
    /// histograms.
    UserMinValue,
    /// The user value recorded with the maximum sample.
    ///
    /// Not numeric; repurposed as the timestamp carrier by pre-aggregated
    /// histograms.
    UserMaxValue,
}

/// The sub-field roles of a meter.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterField {
    /// The total number of events.
    Count,
    /// The one-minute event rate.
    Rate1M,
    /// The five-minute event rate.
    Rate5M,
    /// The fifteen-minute event rate.
    Rate15M,
    /// The mean event rate.
    RateMean,
}

/// The per-kind tables mapping field roles to concrete field names.
///
/// The defaults match the field names generated by the metrics framework.
/// Entries may be removed to stop reporting a role, or renamed to follow a
/// customized snapshot layout.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MetricNameMapping {
    /// Field names of apdex records.
    pub apdex: BTreeMap<ApdexField, String>,
    /// Field names of counter records.
    pub counter: BTreeMap<CounterField, String>,
    /// Field names of gauge records.
    pub gauge: BTreeMap<GaugeField, String>,
    /// Field names of histogram records.
    pub histogram: BTreeMap<HistogramField, String>,
    /// Field names of meter records.
    pub meter: BTreeMap<MeterField, String>,
}

impl MetricNameMapping {
    fn table<K: Copy + Ord>(entries: &[(K, &str)]) -> BTreeMap<K, String> {
        entries
            .iter()
            .map(|(role, name)| (*role, (*name).to_owned()))
            .collect()
    }
}

impl Default for MetricNameMapping {
    fn default() -> Self {
        Self {
            apdex: Self::table(&[
                (ApdexField::Samples, "samples"),
                (ApdexField::Score, "score"),
                (ApdexField::Satisfied, "satisfied"),
                (ApdexField::Tolerating, "tolerating"),
                (ApdexField::Frustrating, "frustrating"),
            ]),
            counter: Self::table(&[(CounterField::Value, "value")]),
            gauge: Self::table(&[(GaugeField::Value, "value")]),
            histogram: Self::table(&[
                (HistogramField::Samples, "samples"),
                (HistogramField::LastValue, "last"),
                (HistogramField::Count, "count.hist"),
                (HistogramField::Sum, "sum"),
                (HistogramField::Min, "min"),
                (HistogramField::Max, "max"),
                (HistogramField::Mean, "mean"),
                (HistogramField::Median, "median"),
                (HistogramField::StdDev, "stddev"),
                (HistogramField::Percentile75, "p75"),
                (HistogramField::Percentile95, "p95"),
                (HistogramField::Percentile98, "p98"),
                (HistogramField::Percentile99, "p99"),
                (HistogramField::Percentile999, "p999"),
                (HistogramField::UserLastValue, "user.last"),
                (HistogramField::UserMinValue, "user.min"),
                (HistogramField::UserMaxValue, "user.max"),
            ]),
            meter: Self::table(&[
                (MeterField::Count, "count.meter"),
                (MeterField::Rate1M, "rate1m"),
                (MeterField::Rate5M, "rate5m"),
                (MeterField::Rate15M, "rate15m"),
                (MeterField::RateMean, "rate.mean"),
            ]),
        }
    }
}

//! Translation of metrics snapshots into Wavefront points.
//!
//! A metrics framework periodically serializes a snapshot of every registered
//! metric into a stream of flat records: a context, a name, the metric's
//! sub-fields as name/value columns, a tag sequence, and a timestamp. This
//! crate turns that stream into calls against a [`WavefrontSender`], the
//! opaque backend client that owns batching, connections and retries.
//!
//! The heart of the crate is the [`SnapshotWriter`]. Per record it:
//!
//! - drops the framework's own bookkeeping metrics
//!   ([`INTERNAL_METRICS_CONTEXT`]),
//! - decodes the metric kind and its Wavefront-specific variant markers from
//!   the reserved tags into an explicit [`MetricKind`],
//! - selects the sub-fields to report through the configured
//!   [`MetricNameMapping`],
//! - routes delta counters and pre-aggregated distributions to their
//!   dedicated sender operations,
//! - merges the configured global tags under the record's tags, excluding
//!   the reserved signaling tags,
//! - and keeps per-kind self-observability counters in an optional
//!   [`SdkMetricsRegistry`].
//!
//! One record produces zero or more sender calls; the writer holds no state
//! across records beyond its immutable configuration and the counters.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wavefront_formatter::{
//!     FieldValue, ReportingConfig, SnapshotWriter, UnixTimestamp,
//! };
//! # use std::collections::{BTreeMap, BTreeSet};
//! # use wavefront_formatter::{Centroid, Granularity, SendError, WavefrontSender};
//! # struct NoopSender;
//! # impl WavefrontSender for NoopSender {
//! #     fn send_point(&self, _: &str, _: f64, _: Option<UnixTimestamp>, _: &str,
//! #         _: &BTreeMap<String, String>) -> Result<(), SendError> { Ok(()) }
//! #     fn send_delta_counter(&self, _: &str, _: f64, _: &str,
//! #         _: &BTreeMap<String, String>) -> Result<(), SendError> { Ok(()) }
//! #     fn send_distribution(&self, _: &str, _: &[Centroid], _: &BTreeSet<Granularity>,
//! #         _: UnixTimestamp, _: &str, _: &BTreeMap<String, String>) -> Result<(), SendError> { Ok(()) }
//! # }
//!
//! let sender = Arc::new(NoopSender);
//! let writer = SnapshotWriter::new(sender, ReportingConfig::new("app-1"), None)?;
//!
//! writer.write(
//!     "application",
//!     "requests",
//!     &["value"],
//!     &[FieldValue::Signed(42)],
//!     &[("mtype", "counter")],
//!     UnixTimestamp::from_secs(1_533_529_977),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod mapping;
mod record;
mod writer;

pub use self::config::*;
pub use self::error::*;
pub use self::mapping::*;
pub use self::record::*;
pub use self::writer::*;

#[doc(inline)]
pub use wavefront_common::{
    Centroid, CentroidList, Distribution, Granularity, SdkCounter, SdkMetricsRegistry, SendError,
    UnixTimestamp, WavefrontSender,
};

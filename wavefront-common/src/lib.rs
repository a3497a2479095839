//! Common types shared by the Wavefront reporting crates.
//!
//! This crate defines the seam between the snapshot translation logic and the
//! Wavefront backend client:
//!
//! - [`WavefrontSender`]: the interface of the backend client. The client
//!   owns its own batching, connection handling and retries; callers hand it
//!   fully translated points and treat every call as queue-or-reject.
//! - [`UnixTimestamp`]: point timestamps in epoch milliseconds, the precision
//!   at which Wavefront ingests them.
//! - [`Granularity`], [`Centroid`] and [`Distribution`]: the entities of
//!   Wavefront histograms.
//! - [`sanitize_name`]: metric name sanitization for the Wavefront charset.
//! - [`SdkMetricsRegistry`]: self-observability counters for the reporting
//!   pipeline itself, owned explicitly by the enclosing reporter rather than
//!   living in process-global state.

#![warn(missing_docs)]

mod histogram;
mod metrics;
mod sanitize;
mod sender;
mod time;

pub use self::histogram::*;
pub use self::metrics::*;
pub use self::sanitize::*;
pub use self::sender::*;
pub use self::time::*;

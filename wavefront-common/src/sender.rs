//! The interface of the backend client.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

use crate::{Centroid, Granularity, UnixTimestamp};

/// An error returned by a [`WavefrontSender`] when a metric cannot be queued.
///
/// The sender owns transport, batching and retries; an error surfacing here
/// means the metric was rejected outright (malformed for the backend, or the
/// sender's queue is shut down). The underlying cause is preserved as the
/// error source.
#[derive(Debug, thiserror::Error)]
#[error("the sender rejected the metric")]
pub struct SendError {
    #[source]
    source: Box<dyn Error + Send + Sync>,
}

impl SendError {
    /// Creates a send error from the sender's underlying failure.
    pub fn new(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Creates a send error from a plain message.
    pub fn from_message(message: impl fmt::Display) -> Self {
        Self::new(message.to_string())
    }
}

/// A client capable of shipping metrics to a Wavefront endpoint.
///
/// Implementations are complete senders in their own right: they own their
/// connection, batching and retry behavior. Every method queues a single,
/// fully translated metric and returns once it has been accepted or rejected;
/// callers never wait for transmission.
pub trait WavefrontSender: Send + Sync {
    /// Queues a single point.
    ///
    /// Without a timestamp, the backend assigns the ingestion time.
    fn send_point(
        &self,
        name: &str,
        value: f64,
        timestamp: Option<UnixTimestamp>,
        source: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), SendError>;

    /// Queues a delta counter increment.
    ///
    /// Deltas are aggregated server-side, so there is no timestamp to assign:
    /// the backend owns the timestamp semantics of the aggregate.
    fn send_delta_counter(
        &self,
        name: &str,
        value: f64,
        source: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), SendError>;

    /// Queues a distribution for the requested aggregation granularities.
    fn send_distribution(
        &self,
        name: &str,
        centroids: &[Centroid],
        granularities: &BTreeSet<Granularity>,
        timestamp: UnixTimestamp,
        source: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), SendError>;
}

impl<T: WavefrontSender + ?Sized> WavefrontSender for std::sync::Arc<T> {
    fn send_point(
        &self,
        name: &str,
        value: f64,
        timestamp: Option<UnixTimestamp>,
        source: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), SendError> {
        (**self).send_point(name, value, timestamp, source, tags)
    }

    fn send_delta_counter(
        &self,
        name: &str,
        value: f64,
        source: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), SendError> {
        (**self).send_delta_counter(name, value, source, tags)
    }

    fn send_distribution(
        &self,
        name: &str,
        centroids: &[Centroid],
        granularities: &BTreeSet<Granularity>,
        timestamp: UnixTimestamp,
        source: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), SendError> {
        (**self).send_distribution(name, centroids, granularities, timestamp, source, tags)
    }
}

//! Entities of Wavefront histograms.
//!
//! Wavefront histograms are reported as *distributions*: per time bucket, a
//! list of [centroids](Centroid) approximating the observed samples. The
//! backend aggregates distributions into one or more time-bucket
//! [granularities](Granularity) requested by the reporter.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::UnixTimestamp;

/// The time bucket size at which a distribution is aggregated by the backend.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Aggregation into one-minute buckets.
    Minute,
    /// Aggregation into one-hour buckets.
    Hour,
    /// Aggregation into one-day buckets.
    Day,
}

impl Granularity {
    /// Returns the identifier of this granularity in the Wavefront data format.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Minute => "!M",
            Self::Hour => "!H",
            Self::Day => "!D",
        }
    }

    /// Returns the length of the time bucket described by this granularity.
    pub fn bucket_width(self) -> Duration {
        match self {
            Self::Minute => Duration::from_secs(60),
            Self::Hour => Duration::from_secs(60 * 60),
            Self::Day => Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// A cluster of samples within a distribution.
///
/// A centroid approximates `weight` samples near `value`. Centroids are the
/// unit in which pre-aggregated histograms are shipped to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Centroid {
    /// The approximate value of the clustered samples.
    pub value: f64,
    /// The number of samples represented by this centroid.
    pub weight: u32,
}

impl Centroid {
    /// Creates a centroid from a value and the number of samples it stands for.
    pub fn new(value: f64, weight: u32) -> Self {
        Self { value, weight }
    }
}

impl From<(f64, u32)> for Centroid {
    fn from((value, weight): (f64, u32)) -> Self {
        Self { value, weight }
    }
}

/// A list of centroids belonging to one distribution.
///
/// Stored inline for the common case of a handful of centroids per time
/// bucket.
pub type CentroidList = SmallVec<[Centroid; 4]>;

/// A pre-aggregated histogram for a single time bucket.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Distribution {
    /// The start of the time bucket covered by this distribution.
    pub timestamp: UnixTimestamp,
    /// The centroids observed within the time bucket.
    pub centroids: CentroidList,
}

impl Distribution {
    /// Creates a distribution from a timestamp and its centroids.
    pub fn new(timestamp: UnixTimestamp, centroids: impl IntoIterator<Item = Centroid>) -> Self {
        Self {
            timestamp,
            centroids: centroids.into_iter().collect(),
        }
    }

    /// Returns the total number of samples across all centroids.
    pub fn sample_count(&self) -> u64 {
        self.centroids.iter().map(|c| u64::from(c.weight)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_identifiers() {
        assert_eq!(Granularity::Minute.identifier(), "!M");
        assert_eq!(Granularity::Hour.identifier(), "!H");
        assert_eq!(Granularity::Day.identifier(), "!D");
    }

    #[test]
    fn test_granularity_order() {
        // BTreeSet iteration over granularities goes from finest to coarsest.
        assert!(Granularity::Minute < Granularity::Hour);
        assert!(Granularity::Hour < Granularity::Day);
    }

    #[test]
    fn test_sample_count() {
        let distribution = Distribution::new(
            UnixTimestamp::from_secs(1_533_529_977),
            [Centroid::new(20.0, 2), Centroid::new(35.0, 3)],
        );
        assert_eq!(distribution.sample_count(), 5);
    }
}

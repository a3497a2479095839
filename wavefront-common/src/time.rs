//! Utilities to deal with point timestamps.

use std::fmt;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unix timestamp in milliseconds (elapsed since 1970-01-01 00:00 UTC).
///
/// Wavefront ingests point timestamps at millisecond precision, so this is
/// the unit used throughout the reporting crates. Timestamps serialize as a
/// plain integer of milliseconds.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Creates a unix timestamp from the given number of milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Creates a unix timestamp from the given number of full seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Creates a unix timestamp from the given system time.
    pub fn from_system(time: SystemTime) -> Self {
        let duration = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();

        Self(duration.as_millis() as u64)
    }

    /// Returns the current timestamp.
    #[inline]
    pub fn now() -> Self {
        Self::from_system(SystemTime::now())
    }

    /// Returns the number of milliseconds since the UNIX epoch start.
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the number of full seconds since the UNIX epoch start.
    ///
    /// Sub-second precision is truncated.
    pub fn as_secs(self) -> u64 {
        self.0 / 1000
    }
}

impl fmt::Debug for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnixTimestamp({})", self.as_millis())
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_millis().fmt(f)
    }
}

impl std::ops::Sub for UnixTimestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration::from_millis(self.0 - rhs.0)
    }
}

impl std::ops::Add<Duration> for UnixTimestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl From<DateTime<Utc>> for UnixTimestamp {
    fn from(date_time: DateTime<Utc>) -> Self {
        Self(date_time.timestamp_millis().max(0) as u64)
    }
}

/// An error returned from parsing [`UnixTimestamp`].
#[derive(Clone, Copy, Debug)]
pub struct ParseUnixTimestampError(pub(crate) ());

impl std::str::FromStr for UnixTimestamp {
    type Err = ParseUnixTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let millis = s.parse().or(Err(ParseUnixTimestampError(())))?;
        Ok(Self(millis))
    }
}

impl Serialize for UnixTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for UnixTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Self::from_millis(millis))
    }
}

//! Reporting configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wavefront_common::Granularity;

use crate::MetricNameMapping;

/// The flush interval used when none is configured.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);

/// An error raised when a [`ReportingConfig`] is invalid.
///
/// Validation happens eagerly, before a writer is built, so that a
/// misconfigured reporter fails at startup rather than on its first flush.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The source identifier is empty.
    #[error("the reporting source must not be empty")]
    EmptySource,

    /// The flush interval is zero.
    #[error("the flush interval must be greater than zero")]
    ZeroFlushInterval,
}

/// Immutable configuration of a snapshot writer.
///
/// Constructed once by the enclosing reporter and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReportingConfig {
    /// The source identifier attached to every dispatched metric, typically
    /// the reporting host.
    pub source: String,

    /// Tags applied to every dispatched metric.
    ///
    /// A record's own tags override global tags on key collision.
    pub global_tags: BTreeMap<String, String>,

    /// The aggregation granularities requested for distributions.
    pub granularities: BTreeSet<Granularity>,

    /// The interval at which the enclosing reporter schedules flush cycles.
    ///
    /// The writer itself does no scheduling; the interval is validated here
    /// so that a broken schedule is rejected before any cycle runs.
    pub flush_interval: Duration,

    /// The field-role to field-name tables, see [`MetricNameMapping`].
    pub mapping: MetricNameMapping,
}

impl ReportingConfig {
    /// Creates a configuration with the given source and default settings:
    /// no global tags, minute distribution granularity, and the framework's
    /// default field names and flush interval.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            global_tags: BTreeMap::new(),
            granularities: BTreeSet::from([Granularity::Minute]),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            mapping: MetricNameMapping::default(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.is_empty() {
            return Err(ConfigError::EmptySource);
        }

        if self.flush_interval.is_zero() {
            return Err(ConfigError::ZeroFlushInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportingConfig::new("app-1");
        assert_eq!(config.source, "app-1");
        assert_eq!(
            config.granularities,
            BTreeSet::from([Granularity::Minute])
        );
        assert_eq!(config.flush_interval, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_source() {
        let config = ReportingConfig::new("");
        assert_eq!(config.validate(), Err(ConfigError::EmptySource));
    }

    #[test]
    fn test_rejects_zero_flush_interval() {
        let mut config = ReportingConfig::new("app-1");
        config.flush_interval = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroFlushInterval));
    }
}

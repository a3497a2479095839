//! Serialization of distributions into the carrier pair and back.

use std::fmt::Write;

use wavefront_common::{Centroid, CentroidList, Distribution, UnixTimestamp};

/// Separates distributions within each carrier string.
const DISTRIBUTION_SEPARATOR: char = ';';

/// Separates the components of a centroid list.
const CENTROID_SEPARATOR: char = ',';

/// An error emitted when a carrier pair cannot be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParsePayloadError {
    /// The two carrier strings hold a different number of entries.
    #[error("carrier strings disagree: {timestamps} timestamps for {centroid_lists} centroid lists")]
    EntryCountMismatch {
        /// Number of entries in the timestamp carrier.
        timestamps: usize,
        /// Number of entries in the centroid carrier.
        centroid_lists: usize,
    },

    /// A timestamp entry is not a valid integer of epoch milliseconds.
    #[error("invalid timestamp `{0}` in distribution payload")]
    InvalidTimestamp(String),

    /// A centroid component is not a valid number.
    #[error("invalid centroid component `{0}` in distribution payload")]
    InvalidCentroid(String),

    /// A centroid list ends with a value that has no weight.
    #[error("centroid list holds a value without a weight")]
    MissingWeight,
}

/// Encodes distributions into the carrier pair.
///
/// Returns the timestamp carrier and the centroid carrier, in that order.
/// The inverse of [`deserialize`].
pub fn serialize(distributions: &[Distribution]) -> (String, String) {
    let mut timestamps = String::new();
    let mut centroids = String::new();

    for (index, distribution) in distributions.iter().enumerate() {
        if index > 0 {
            timestamps.push(DISTRIBUTION_SEPARATOR);
            centroids.push(DISTRIBUTION_SEPARATOR);
        }

        let _ = write!(timestamps, "{}", distribution.timestamp.as_millis());

        for (position, centroid) in distribution.centroids.iter().enumerate() {
            if position > 0 {
                centroids.push(CENTROID_SEPARATOR);
            }
            let _ = write!(centroids, "{},{}", centroid.value, centroid.weight);
        }
    }

    (timestamps, centroids)
}

/// Decodes the carrier pair into distributions.
///
/// Decoding is strict: both carriers must hold the same number of entries,
/// every timestamp must be an integer of epoch milliseconds, and every
/// centroid list must be a non-empty sequence of `value,weight` pairs.
/// A pair of empty strings decodes into no distributions.
pub fn deserialize(
    timestamps: &str,
    centroids: &str,
) -> Result<Vec<Distribution>, ParsePayloadError> {
    if timestamps.is_empty() && centroids.is_empty() {
        return Ok(Vec::new());
    }

    let timestamp_entries: Vec<&str> = timestamps.split(DISTRIBUTION_SEPARATOR).collect();
    let centroid_entries: Vec<&str> = centroids.split(DISTRIBUTION_SEPARATOR).collect();

    if timestamp_entries.len() != centroid_entries.len() {
        return Err(ParsePayloadError::EntryCountMismatch {
            timestamps: timestamp_entries.len(),
            centroid_lists: centroid_entries.len(),
        });
    }

    timestamp_entries
        .into_iter()
        .zip(centroid_entries)
        .map(|(timestamp, list)| {
            Ok(Distribution {
                timestamp: parse_timestamp(timestamp)?,
                centroids: parse_centroid_list(list)?,
            })
        })
        .collect()
}

fn parse_timestamp(component: &str) -> Result<UnixTimestamp, ParsePayloadError> {
    component
        .parse()
        .map_err(|_| ParsePayloadError::InvalidTimestamp(component.to_owned()))
}

fn parse_centroid_list(list: &str) -> Result<CentroidList, ParsePayloadError> {
    let mut centroids = CentroidList::new();
    let mut components = list.split(CENTROID_SEPARATOR);

    while let Some(value) = components.next() {
        let value: f64 = value
            .parse()
            .map_err(|_| ParsePayloadError::InvalidCentroid(value.to_owned()))?;

        let weight = components.next().ok_or(ParsePayloadError::MissingWeight)?;
        let weight: u32 = weight
            .parse()
            .map_err(|_| ParsePayloadError::InvalidCentroid(weight.to_owned()))?;

        centroids.push(Centroid { value, weight });
    }

    Ok(centroids)
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_deserialize_single() {
        let distributions = deserialize("1533529977000", "20,2,35,1").unwrap();

        assert_eq!(
            distributions,
            vec![Distribution::new(
                UnixTimestamp::from_millis(1_533_529_977_000),
                [Centroid::new(20.0, 2), Centroid::new(35.0, 1)],
            )]
        );
    }

    #[test]
    fn test_deserialize_multiple() {
        let distributions = deserialize("60000;120000", "5.5,1;7,2,9,4").unwrap();

        assert_eq!(
            distributions,
            vec![
                Distribution::new(UnixTimestamp::from_millis(60_000), [Centroid::new(5.5, 1)]),
                Distribution::new(
                    UnixTimestamp::from_millis(120_000),
                    [Centroid::new(7.0, 2), Centroid::new(9.0, 4)],
                ),
            ]
        );
    }

    #[test]
    fn test_deserialize_empty() {
        assert_eq!(deserialize("", "").unwrap(), vec![]);
    }

    #[test]
    fn test_entry_count_mismatch() {
        assert_eq!(
            deserialize("60000;120000", "5,1"),
            Err(ParsePayloadError::EntryCountMismatch {
                timestamps: 2,
                centroid_lists: 1,
            })
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        assert_eq!(
            deserialize("noon", "5,1"),
            Err(ParsePayloadError::InvalidTimestamp("noon".to_owned()))
        );
    }

    #[test]
    fn test_invalid_centroid_component() {
        assert_eq!(
            deserialize("60000", "5,heavy"),
            Err(ParsePayloadError::InvalidCentroid("heavy".to_owned()))
        );
        assert_eq!(
            deserialize("60000", ""),
            Err(ParsePayloadError::InvalidCentroid(String::new()))
        );
    }

    #[test]
    fn test_missing_weight() {
        assert_eq!(
            deserialize("60000", "5,1,7"),
            Err(ParsePayloadError::MissingWeight)
        );
    }

    #[test]
    fn test_serialize() {
        let distributions = vec![
            Distribution::new(
                UnixTimestamp::from_millis(60_000),
                [Centroid::new(20.0, 2), Centroid::new(35.5, 1)],
            ),
            Distribution::new(UnixTimestamp::from_millis(120_000), [Centroid::new(7.0, 4)]),
        ];

        let (timestamps, centroids) = serialize(&distributions);
        assert_eq!(timestamps, "60000;120000");
        assert_eq!(centroids, "20,2,35.5,1;7,4");
    }
}

//! Carrier encoding of pre-aggregated Wavefront histogram distributions.
//!
//! Histogram snapshots produced by the metrics framework expose a fixed set
//! of numeric fields. A Wavefront histogram has no user values to report in
//! those fields (the interesting data is the distribution itself), so its
//! reservoir repurposes two of them as a carrier: one holds the serialized
//! time-bucket timestamps, the other the serialized centroid lists. This
//! crate implements that encoding.
//!
//! # Format
//!
//! Both carriers are `;`-separated lists with one entry per distribution,
//! in matching order:
//!
//! - timestamps: epoch milliseconds, e.g. `1533529977000;1533530037000`
//! - centroids: flat `value,weight` pairs, e.g. `20,2,35,1;25,3`
//!
//! The example above decodes into two distributions: one holding two samples
//! near 20 and one near 35, and a later one holding three samples near 25.

#![warn(missing_docs)]

mod payload;

pub use self::payload::*;

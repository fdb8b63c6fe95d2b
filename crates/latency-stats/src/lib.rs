//! Per-region latency and uptime statistics over service telemetry records.
//!
//! A [`Dataset`] holds the immutable records loaded at startup. [`aggregate`]
//! filters them per requested region and computes a [`RegionStats`] for each:
//! mean latency, linear-interpolated p95 latency, mean uptime and the number of
//! records whose latency is strictly above a threshold.
//!
//! ```
//! use latency_stats::{DEFAULT_THRESHOLD_MS, Dataset, aggregate};
//!
//! let dataset = Dataset::embedded().unwrap();
//! let report = aggregate(&dataset, &["apac", "unknown"], DEFAULT_THRESHOLD_MS).unwrap();
//!
//! assert_eq!(report["apac"].breaches, 5);
//! assert_eq!(report["unknown"].avg_latency, 0.0);
//! ```

pub mod aggregator;
pub mod dataset;
mod error;
pub mod percentile;
pub mod record;

pub use aggregator::{
    DEFAULT_THRESHOLD_MS, LATENCY_PERCENTILE, LatencyReport, RegionStats, STATS_DECIMALS, aggregate,
};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use percentile::percentile;
pub use record::Record;

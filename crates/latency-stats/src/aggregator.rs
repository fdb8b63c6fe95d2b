use crate::{
    Dataset, Record, Result,
    percentile::{mean, percentile, round_to},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Latency above this many milliseconds counts as a breach unless a caller overrides it
pub const DEFAULT_THRESHOLD_MS: f64 = 180.0;
/// Percentile reported as `p95_latency`
pub const LATENCY_PERCENTILE: f64 = 95.0;
/// Decimal places kept for every floating statistic
pub const STATS_DECIMALS: i32 = 2;

// Key: region name, in request order
pub type LatencyReport = IndexMap<String, RegionStats>;

/// Statistics for the records of a single region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub avg_latency: f64,
    pub p95_latency: f64,
    pub avg_uptime: f64,
    pub breaches: usize,
}

impl RegionStats {
    /// Compute stats over `records`, zero-filled when there are none.
    pub fn from_records<'a, I>(records: I, threshold_ms: f64) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let (latencies, uptimes): (Vec<f64>, Vec<f64>) = records
            .into_iter()
            .map(|r| (r.latency_ms, r.uptime_pct))
            .unzip();

        if latencies.is_empty() {
            return Ok(Self::default());
        }

        let p95_latency = percentile(&latencies, LATENCY_PERCENTILE)?;
        let breaches = latencies.iter().filter(|&&l| l > threshold_ms).count();

        Ok(Self {
            avg_latency: round_to(mean(&latencies), STATS_DECIMALS),
            p95_latency: round_to(p95_latency, STATS_DECIMALS),
            avg_uptime: round_to(mean(&uptimes), STATS_DECIMALS),
            breaches,
        })
    }
}

/// Build a report with one entry per distinct requested region.
///
/// Regions with no records in the dataset get zero-filled stats.
pub fn aggregate<S: AsRef<str>>(
    dataset: &Dataset,
    regions: &[S],
    threshold_ms: f64,
) -> Result<LatencyReport> {
    let mut report = LatencyReport::with_capacity(regions.len());

    for region in regions.iter().map(AsRef::as_ref) {
        if report.contains_key(region) {
            continue;
        }

        let records: Vec<&Record> = dataset.region_records(region).collect();
        if records.is_empty() {
            debug!(region, "no records for region");
        }

        let stats = RegionStats::from_records(records, threshold_ms)?;
        report.insert(region.to_string(), stats);
    }

    Ok(report)
}

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single telemetry observation for one service in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub region: String,
    #[serde(default)]
    pub service: Option<String>,
    pub latency_ms: f64,
    /// Availability as a percentage, 0 to 100
    pub uptime_pct: f64,
    /// Date code, e.g. 20250301
    pub timestamp: u64,
}

impl Record {
    pub fn new(region: impl Into<String>, latency_ms: f64, uptime_pct: f64, timestamp: u64) -> Self {
        Self {
            region: region.into(),
            service: None,
            latency_ms,
            uptime_pct,
            timestamp,
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Check field invariants, `index` is the record position used in the error
    pub fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: String| Error::InvalidRecord { index, reason };

        if self.region.trim().is_empty() {
            return Err(invalid("region cannot be empty".to_string()));
        }

        if !self.latency_ms.is_finite() || self.latency_ms < 0.0 {
            return Err(invalid(format!(
                "latency_ms must be a non-negative finite number, got {}",
                self.latency_ms
            )));
        }

        if !self.uptime_pct.is_finite() || !(0.0..=100.0).contains(&self.uptime_pct) {
            return Err(invalid(format!(
                "uptime_pct must be between 0 and 100, got {}",
                self.uptime_pct
            )));
        }

        Ok(())
    }
}

pub mod validation;

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use latency_stats::{DEFAULT_THRESHOLD_MS, Dataset};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tracing::info;
use validation::validate_config;

/// Environment variable prefix, e.g. LATENCY__SERVER__LISTEN_ADDR
pub const ENV_PREFIX: &str = "LATENCY";

/// Main settings configuration for the latency API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level for application logging (e.g., "info", "debug", "warn", "error")
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Where telemetry records are loaded from
    #[serde(default)]
    pub dataset: DatasetSettings,
    /// Aggregation defaults
    #[serde(default)]
    pub stats: StatsSettings,
    /// Prometheus exporter configuration (optional)
    #[serde(default)]
    pub metrics: Option<MetricsSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the HTTP API binds to
    pub listen_addr: SocketAddr,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// JSON or CSV file with telemetry records
    /// Falls back to the embedded sample dataset when unset
    pub path: Option<PathBuf>,
}

impl DatasetSettings {
    pub fn load(&self) -> Result<Dataset> {
        let dataset = match &self.path {
            Some(path) => Dataset::from_path(path)
                .with_context(|| format!("Failed to load dataset from {}", path.display()))?,
            None => Dataset::embedded().context("Failed to load embedded dataset")?,
        };

        info!(
            source = %self.source(),
            records = dataset.len(),
            regions = dataset.regions().len(),
            "dataset loaded"
        );

        Ok(dataset)
    }

    fn source(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Breach threshold used when a request does not carry `threshold_ms`
    pub default_threshold_ms: f64,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            default_threshold_ms: DEFAULT_THRESHOLD_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus scrape endpoint address
    pub addr: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerSettings::default(),
            dataset: DatasetSettings::default(),
            stats: StatsSettings::default(),
            metrics: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load configuration from a specific config file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Construct settings, env vars take priority still
        let settings: Settings = ConfigBuilder::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        validate_config(&settings)?;

        Ok(settings)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // NOTE: It's ok if this fails (file might not exist)
        let _ = dotenvy::dotenv();

        let settings: Settings = ConfigBuilder::builder()
            .add_source(environment())
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        validate_config(&settings)?;

        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings {{\n\
             \tLog Level: {}\n\
             \tListen Address: {}\n\
             \tMax Body Bytes: {}\n\
             \tDataset: {}\n\
             \tDefault Threshold (ms): {}\n\
             \tMetrics Address: {}\n\
             }}",
            self.log_level,
            self.server.listen_addr,
            self.server.max_body_bytes,
            self.dataset.source(),
            self.stats.default_threshold_ms,
            self.metrics
                .as_ref()
                .map(|m| m.addr.to_string())
                .unwrap_or_else(|| "disabled".to_string()),
        )
    }
}

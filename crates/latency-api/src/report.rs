use anyhow::Result;
use clap::ValueEnum;
use latency_stats::LatencyReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::{Table, Tabled, settings::Style};

/// Output format for the `report` command
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[value(name = "table")]
    Table,
    #[value(name = "json")]
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
        }
    }
}

#[derive(Debug, Tabled)]
struct RegionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Avg Latency (ms)")]
    avg_latency: f64,
    #[tabled(rename = "P95 Latency (ms)")]
    p95_latency: f64,
    #[tabled(rename = "Avg Uptime (%)")]
    avg_uptime: f64,
    #[tabled(rename = "Breaches")]
    breaches: usize,
}

/// Helper function to print a report in table fmt
pub fn render_table(report: &LatencyReport) -> String {
    let rows: Vec<RegionRow> = report
        .iter()
        .map(|(region, stats)| RegionRow {
            region: region.clone(),
            avg_latency: stats.avg_latency,
            p95_latency: stats.p95_latency,
            avg_uptime: stats.avg_uptime,
            breaches: stats.breaches,
        })
        .collect();

    Table::new(rows)
        .with(Style::psql().remove_horizontals())
        .to_string()
}

pub fn render(report: &LatencyReport, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Table => render_table(report),
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(report)?,
    };

    Ok(output)
}

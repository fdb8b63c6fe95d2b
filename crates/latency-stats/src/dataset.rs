use crate::{Error, Record, Result};
use itertools::Itertools;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::debug;

const EMBEDDED_DATASET: &str = include_str!("../data/sample_telemetry.json");

/// Immutable, validated collection of telemetry records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            record.validate(index)?;
        }

        Ok(Self { records })
    }

    /// Sample dataset compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json_reader(EMBEDDED_DATASET.as_bytes())
    }

    /// Load a dataset file, the format is picked from the extension (`json` or `csv`)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let dataset = match extension.as_str() {
            "json" => Self::from_json_reader(BufReader::new(File::open(path)?))?,
            "csv" => Self::from_csv_reader(BufReader::new(File::open(path)?))?,
            _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
        };

        debug!(
            path = %path.display(),
            records = dataset.len(),
            "loaded dataset"
        );

        Ok(dataset)
    }

    /// JSON array of record objects
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_reader(reader)?;
        Self::new(records)
    }

    /// CSV with a `region,service,latency_ms,uptime_pct,timestamp` header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = rdr.deserialize().collect::<std::result::Result<Vec<Record>, _>>()?;
        Self::new(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose region matches exactly
    pub fn region_records<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.region == region)
    }

    /// Distinct regions in first-seen order
    pub fn regions(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .unique()
            .collect()
    }
}

use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("dataset io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),
    #[error("sample values must be finite numbers")]
    NonFiniteSample,
}

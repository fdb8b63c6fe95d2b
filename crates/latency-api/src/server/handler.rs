use crate::{
    error::{ApiError, Result},
    server::AppState,
};
use axum::{Json, body::Bytes, extract::State};
use latency_stats::{Dataset, LatencyReport, aggregate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Body of `POST /api/latency`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyRequest {
    #[serde(default)]
    pub regions: Vec<String>,
    /// Falls back to the configured default when absent or null
    #[serde(default)]
    pub threshold_ms: Option<f64>,
}

/// Body of `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
    pub records: usize,
}

pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Latency analytics API is running.".to_string(),
        records: state.dataset.len(),
    })
}

/// Per-region stats for the requested regions.
///
/// The body is parsed as JSON whatever its content type.
pub async fn latency_stats(State(state): State<AppState>, body: Bytes) -> Result<Json<LatencyReport>> {
    let request = parse_request(&body)?;

    if request.regions.is_empty() {
        return Err(ApiError::BadRequest("No regions specified".to_string()));
    }

    let threshold_ms = request.threshold_ms.unwrap_or(state.default_threshold_ms);
    let report = aggregate(&state.dataset, &request.regions, threshold_ms)?;

    let unknown = unknown_regions(&state.dataset, &report);
    if unknown > 0 {
        warn!(unknown, "request included regions without records");
    }

    metrics::counter!("latency_api_regions_requested_total").increment(report.len() as u64);
    metrics::counter!("latency_api_unknown_regions_total").increment(unknown as u64);

    Ok(Json(report))
}

/// Decode a request body, only a JSON object is accepted
fn parse_request(body: &[u8]) -> Result<LatencyRequest> {
    // Derived struct impls also take arrays by position
    let object: Map<String, Value> = serde_json::from_slice(body).map_err(invalid_body)?;
    serde_json::from_value(Value::Object(object)).map_err(invalid_body)
}

fn invalid_body(err: serde_json::Error) -> ApiError {
    debug!(%err, "rejecting malformed request body");
    ApiError::BadRequest(format!("Invalid request body: {err}"))
}

/// Distinct report entries with no records behind them
fn unknown_regions(dataset: &Dataset, report: &LatencyReport) -> usize {
    report
        .keys()
        .filter(|region| dataset.region_records(region).next().is_none())
        .count()
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: LatencyRequest = serde_json::from_str("{}").unwrap();
        assert!(request.regions.is_empty());
        assert_eq!(request.threshold_ms, None);

        let request: LatencyRequest =
            serde_json::from_str(r#"{"regions": ["apac"], "threshold_ms": null}"#).unwrap();
        assert_eq!(request.regions, vec!["apac"]);
        assert_eq!(request.threshold_ms, None);
    }

    #[test]
    fn test_request_integer_threshold() {
        let request: LatencyRequest =
            serde_json::from_str(r#"{"regions": ["emea"], "threshold_ms": 150}"#).unwrap();
        assert_eq!(request.threshold_ms, Some(150.0));
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        for body in [r#"[["apac"], 200]"#, "[]", r#""apac""#, "42"] {
            let err = parse_request(body.as_bytes()).unwrap_err();
            assert!(
                matches!(&err, ApiError::BadRequest(msg) if msg.starts_with("Invalid request body")),
                "body: {body}, error: {err}"
            );
        }
    }

    #[test]
    fn test_parse_object() {
        let request = parse_request(br#"{"regions": ["apac", "emea"], "threshold_ms": 200}"#).unwrap();

        assert_eq!(request.regions, vec!["apac", "emea"]);
        assert_eq!(request.threshold_ms, Some(200.0));
    }

    #[test]
    fn test_unknown_regions_counted_once() {
        let dataset = Dataset::embedded().unwrap();
        let report = aggregate(&dataset, &["mars", "mars", "apac", "venus"], 180.0).unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(unknown_regions(&dataset, &report), 2);
    }

    #[test]
    fn test_request_wrong_types() {
        assert!(serde_json::from_str::<LatencyRequest>(r#"{"regions": "apac"}"#).is_err());
        assert!(serde_json::from_str::<LatencyRequest>(r#"{"regions": [1, 2]}"#).is_err());
        assert!(
            serde_json::from_str::<LatencyRequest>(r#"{"regions": ["apac"], "threshold_ms": "x"}"#)
                .is_err()
        );
    }
}

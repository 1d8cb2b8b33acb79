//! Decoding of raw JSON bodies into engine types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use timeseries::{ActivityHeatmap, MetricSeries};
use tracing::debug;

use crate::error::FetchError;
use crate::metric::Metric;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    /// Milliseconds since the Unix epoch.
    pub updated_at: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    #[serde(default)]
    pub labels: Vec<ProjectLabel>,
}

impl ProjectMeta {
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLabel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

fn expect_object(url: &str, body: Value) -> Result<Map<String, Value>, FetchError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(FetchError::Decode {
            url: url.to_owned(),
            reason: format!("expected a JSON object, got {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes a metric body. Duration metrics nest the series under `avg`;
/// everything else is a flat period → number map.
pub fn decode_series(url: &str, body: Value) -> Result<MetricSeries, FetchError> {
    let mut map = expect_object(url, body)?;
    let entries = match map.remove("avg") {
        Some(Value::Object(avg)) => avg,
        _ => map,
    };

    let values = entries.into_iter().filter_map(|(key, value)| match value {
        Value::Number(n) => n.as_f64().map(|v| (key, v)),
        Value::Null => Some((key, 0.0)),
        other => {
            debug!("skipping {key} in {url}: {} is not a number", kind_of(&other));
            None
        }
    });
    Ok(MetricSeries::from_raw(values))
}

/// Decodes the body of `metric`. A duration metric without an `avg` object is
/// logged and read as a flat map.
pub fn decode_metric(metric: Metric, url: &str, body: Value) -> Result<MetricSeries, FetchError> {
    if metric.is_duration() && !body.get("avg").is_some_and(Value::is_object) {
        debug!("{metric} body from {url} has no avg object, reading it as a flat series");
    }
    decode_series(url, body)
}

/// Decodes `active_dates_and_times.json`: period → 168 hourly counts.
pub fn decode_heatmap(url: &str, body: Value) -> Result<ActivityHeatmap, FetchError> {
    let map = expect_object(url, body)?;
    let entries = map.into_iter().filter_map(|(key, value)| match value {
        Value::Array(items) => {
            let counts = items.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect();
            Some((key, counts))
        }
        other => {
            debug!("skipping {key} in {url}: {} is not an array", kind_of(&other));
            None
        }
    });
    Ok(ActivityHeatmap::from_entries(entries))
}

pub fn decode_meta(url: &str, body: Value) -> Result<ProjectMeta, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::Decode {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::UvError,
    model::{ForecastPoint, Location, NowPoint, Payload},
};

use super::UvProvider;

/// Hard bound on one refresh, connection to last body byte.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct CurrentUvIndexProvider {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl CurrentUvIndexProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the UV index API")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v1/uvi", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> UvError {
        if err.is_timeout() {
            UvError::FetchFailed(format!("request timed out after {:?}", self.timeout))
        } else {
            UvError::FetchFailed(err.to_string())
        }
    }
}

#[async_trait]
impl UvProvider for CurrentUvIndexProvider {
    async fn fetch(&self, location: &Location) -> Result<Payload, UvError> {
        let url = self.endpoint();
        tracing::debug!(%url, %location, "Requesting UV index forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        if status != StatusCode::OK {
            return Err(UvError::FetchFailed(format!(
                "unexpected status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_payload(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CuNow {
    #[serde(default)]
    uvi: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CuResponse {
    #[serde(default)]
    now: Option<CuNow>,
    #[serde(default)]
    forecast: Vec<Value>,
}

/// Parse a response body into a payload.
///
/// Forecast entries without a readable `time` string are dropped, as is
/// anything in the list that is not an object. A `uvi` that is not a number
/// is treated as missing. The rest of the payload stays usable.
pub fn parse_payload(body: &str) -> Result<Payload, UvError> {
    let parsed: CuResponse = serde_json::from_str(body)
        .map_err(|e| UvError::FetchFailed(format!("invalid response body: {e}")))?;

    let total = parsed.forecast.len();
    let forecast: Vec<ForecastPoint> = parsed
        .forecast
        .into_iter()
        .filter_map(|entry| {
            let Some(raw) = entry.get("time").and_then(Value::as_str) else {
                tracing::debug!(%entry, "Skipping forecast entry without a time string");
                return None;
            };
            match parse_instant(raw) {
                Some(time) => Some(ForecastPoint {
                    time,
                    uvi: entry.get("uvi").and_then(Value::as_f64),
                }),
                None => {
                    tracing::debug!(time = %raw, "Skipping forecast entry with unreadable time");
                    None
                }
            }
        })
        .collect();

    if forecast.len() < total {
        tracing::debug!(
            kept = forecast.len(),
            skipped = total - forecast.len(),
            "Dropped forecast entries without a usable timestamp"
        );
    }

    Ok(Payload {
        now: NowPoint {
            uvi: parsed.now.and_then(|now| now.uvi),
        },
        forecast,
    })
}

/// ISO-8601 instant, `Z` or numeric offset. A bare local time is read as UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ndt| ndt.and_utc())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid test timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn parses_full_payload() {
        let body = r#"{
            "latitude": 40.6943,
            "longitude": -73.9249,
            "now": {"time": "2025-08-26T13:00:00Z", "uvi": 3.2},
            "forecast": [
                {"time": "2025-08-26T12:00:00Z", "uvi": 5.1},
                {"time": "2025-08-26T18:00:00Z", "uvi": null}
            ]
        }"#;

        let payload = parse_payload(body).expect("payload parses");
        assert_eq!(payload.now.uvi, Some(3.2));
        assert_eq!(payload.forecast.len(), 2);
        assert_eq!(payload.forecast[0].time, at("2025-08-26T12:00:00Z"));
        assert_eq!(payload.forecast[0].uvi, Some(5.1));
        assert_eq!(payload.forecast[1].uvi, None);
    }

    #[test]
    fn unreadable_times_are_skipped() {
        let body = r#"{
            "now": {"uvi": 1.0},
            "forecast": [
                {"time": "yesterday-ish", "uvi": 9.0},
                {"uvi": 8.0},
                {"time": "2025-08-26T12:00:00+02:00", "uvi": 4.0},
                {"time": "2025-08-26T15:00:00", "uvi": 2.0}
            ]
        }"#;

        let payload = parse_payload(body).expect("payload parses");
        assert_eq!(payload.forecast.len(), 2);
        assert_eq!(payload.forecast[0].time, at("2025-08-26T10:00:00Z"));
        assert_eq!(payload.forecast[1].time, at("2025-08-26T15:00:00Z"));
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let body = r#"{
            "now": {"uvi": 1.0},
            "forecast": [
                {"time": 1756209600, "uvi": 9.0},
                null,
                {"time": {"iso": "2025-08-26T09:00:00Z"}, "uvi": 7.0},
                "2025-08-26T10:00:00Z",
                {"time": "2025-08-26T12:00:00Z", "uvi": 4.0},
                {"time": "2025-08-26T13:00:00Z", "uvi": "high"}
            ]
        }"#;

        let payload = parse_payload(body).expect("payload parses");
        assert_eq!(payload.now.uvi, Some(1.0));
        assert_eq!(payload.forecast.len(), 2);
        assert_eq!(payload.forecast[0].time, at("2025-08-26T12:00:00Z"));
        assert_eq!(payload.forecast[0].uvi, Some(4.0));
        assert_eq!(payload.forecast[1].uvi, None);
    }

    #[test]
    fn new_uses_ten_second_timeout() {
        let provider = CurrentUvIndexProvider::new("https://currentuvindex.com").expect("client");
        assert_eq!(provider.timeout, Duration::from_secs(10));
        assert_eq!(REQUEST_TIMEOUT_SECS, 10);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let payload = parse_payload("{}").expect("payload parses");
        assert_eq!(payload, Payload::default());

        let payload = parse_payload(r#"{"now": null, "forecast": []}"#).expect("payload parses");
        assert_eq!(payload.now.uvi, None);
    }

    #[test]
    fn malformed_body_is_fetch_failed() {
        let err = parse_payload("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, UvError::FetchFailed(_)));
        assert!(err.detail().contains("invalid response body"));

        let err = parse_payload(r#"{"forecast": {"time": "x"}}"#).unwrap_err();
        assert!(matches!(err, UvError::FetchFailed(_)));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "é".repeat(300);
        let short = truncate_body(&long);
        assert_eq!(short.chars().count(), 203);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let provider = CurrentUvIndexProvider::new("https://currentuvindex.com/").expect("client");
        assert_eq!(provider.endpoint(), "https://currentuvindex.com/api/v1/uvi");
    }
}

//! AirKorea real-time particulate client.
//!
//! Averages PM10/PM2.5 across a sido's reporting stations. The grading
//! pipeline does not consult this data (it scores against a static
//! per-region PM10 table); the client backs the `--probe-air` diagnostic
//! mode.

use common::config::AppConfig;
use common::{Error, RegionCode, Result};
use serde::Deserialize;
use tracing::debug;

/// AirKorea API client with connection pooling.
#[derive(Debug, Clone)]
pub struct AirKoreaClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    num_rows: u32,
}

/// Per-sido particulate averages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirQualitySummary {
    /// µg/m³, averaged across usable station rows.
    pub pm10: i64,
    /// µg/m³, averaged across usable station rows.
    pub pm25: i64,
    pub pm10_grade: AirGrade,
    pub pm25_grade: AirGrade,
}

/// Discrete particulate grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirGrade {
    Good,
    Normal,
    Poor,
    VeryPoor,
}

impl AirGrade {
    pub fn as_str(self) -> &'static str {
        match self {
            AirGrade::Good => "GOOD",
            AirGrade::Normal => "NORMAL",
            AirGrade::Poor => "POOR",
            AirGrade::VeryPoor => "VERY_POOR",
        }
    }
}

impl std::fmt::Display for AirGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Response types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseNode,
}

#[derive(Debug, Deserialize)]
struct ResponseNode {
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    items: Option<Items>,
}

/// Same dual shape as the forecast endpoint: an object wrapping an `item`
/// array, or the array directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Items {
    Wrapped { item: Vec<StationRow> },
    Flat(Vec<StationRow>),
}

impl Items {
    fn into_vec(self) -> Vec<StationRow> {
        match self {
            Items::Wrapped { item } => item,
            Items::Flat(items) => items,
        }
    }
}

/// One station's latest measurement.
#[derive(Debug, Clone, Deserialize)]
struct StationRow {
    #[serde(rename = "pm10Value", default)]
    pm10_value: String,
    #[serde(rename = "pm25Value", default)]
    pm25_value: String,
}

// ── Implementation ────────────────────────────────────────────────────

impl AirKoreaClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("photocast/0.1 (weather grading service)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(config.api.timeout_secs))
            .build()
            .expect("failed to build AirKorea HTTP client");

        Self {
            client,
            base_url: config.api.air_quality_url.clone(),
            service_key: config.service_key.clone(),
            num_rows: config.api.air_quality_rows,
        }
    }

    /// Fetch and average the latest station measurements for a region.
    pub async fn fetch_summary(&self, region: RegionCode) -> Result<AirQualitySummary> {
        let num_rows = self.num_rows.to_string();

        debug!("Fetching AirKorea measurements for {} ({})", region, region.name());

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("serviceKey", self.service_key.as_str()),
                ("sidoName", region.name()),
                ("returnType", "json"),
                ("dataType", "JSON"),
                ("numOfRows", num_rows.as_str()),
                ("pageNo", "1"),
            ])
            .send()
            .await
            .map_err(|e| Error::AirQuality(format!("request for {region}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::AirQuality(format!(
                "endpoint returned {status} for {region}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::AirQuality(format!("body for {region}: {e}")))?;

        summary_from_body(region, &body)
    }
}

/// Parse a raw response body into a particulate summary.
pub fn summary_from_body(region: RegionCode, body: &str) -> Result<AirQualitySummary> {
    let envelope: Envelope = serde_json::from_str(body)?;

    let rows = envelope
        .response
        .body
        .and_then(|b| b.items)
        .ok_or_else(|| Error::AirQuality(format!("response for {region} has no items")))?
        .into_vec();

    debug!("{}: {} station rows", region, rows.len());

    let mut pm10_sum = 0i64;
    let mut pm25_sum = 0i64;
    let mut count = 0i64;

    for row in &rows {
        // A station counts only when both measurements are usable.
        let (pm10, pm25) = match (parse_measure(&row.pm10_value), parse_measure(&row.pm25_value)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        pm10_sum += pm10;
        pm25_sum += pm25;
        count += 1;
    }

    if count == 0 {
        return Ok(AirQualitySummary {
            pm10: 0,
            pm25: 0,
            pm10_grade: AirGrade::Normal,
            pm25_grade: AirGrade::Normal,
        });
    }

    let pm10 = pm10_sum / count;
    let pm25 = pm25_sum / count;

    Ok(AirQualitySummary {
        pm10,
        pm25,
        pm10_grade: pm10_grade_for(pm10),
        pm25_grade: pm25_grade_for(pm25),
    })
}

/// Stations report `"-"` while a measurement is unavailable.
fn parse_measure(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.parse().ok()
}

pub fn pm10_grade_for(pm10: i64) -> AirGrade {
    if pm10 <= 30 {
        AirGrade::Good
    } else if pm10 <= 80 {
        AirGrade::Normal
    } else if pm10 <= 150 {
        AirGrade::Poor
    } else {
        AirGrade::VeryPoor
    }
}

pub fn pm25_grade_for(pm25: i64) -> AirGrade {
    if pm25 <= 15 {
        AirGrade::Good
    } else if pm25 <= 35 {
        AirGrade::Normal
    } else if pm25 <= 75 {
        AirGrade::Poor
    } else {
        AirGrade::VeryPoor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(items_json: &str) -> String {
        format!(r#"{{"response":{{"header":{{"resultCode":"00","resultMsg":"OK"}},"body":{{"items":{items_json}}}}}}}"#)
    }

    #[test]
    fn averages_usable_station_rows() {
        let raw = body(
            r#"[
                {"pm10Value":"40","pm25Value":"20"},
                {"pm10Value":"60","pm25Value":"30"}
            ]"#,
        );
        let summary = summary_from_body(RegionCode::Seoul, &raw).unwrap();
        assert_eq!(summary.pm10, 50);
        assert_eq!(summary.pm25, 25);
        assert_eq!(summary.pm10_grade, AirGrade::Normal);
        assert_eq!(summary.pm25_grade, AirGrade::Normal);
    }

    #[test]
    fn averages_truncate_like_integer_division() {
        let raw = body(
            r#"[
                {"pm10Value":"10","pm25Value":"10"},
                {"pm10Value":"11","pm25Value":"11"}
            ]"#,
        );
        let summary = summary_from_body(RegionCode::Seoul, &raw).unwrap();
        assert_eq!(summary.pm10, 10);
        assert_eq!(summary.pm25, 10);
    }

    #[test]
    fn skips_rows_with_missing_or_bad_measurements() {
        let raw = body(
            r#"[
                {"pm10Value":"-","pm25Value":"20"},
                {"pm10Value":"40","pm25Value":""},
                {"pm10Value":"oops","pm25Value":"20"},
                {"pm10Value":"30","pm25Value":"10"}
            ]"#,
        );
        let summary = summary_from_body(RegionCode::Busan, &raw).unwrap();
        assert_eq!(summary.pm10, 30);
        assert_eq!(summary.pm25, 10);
        assert_eq!(summary.pm10_grade, AirGrade::Good);
        assert_eq!(summary.pm25_grade, AirGrade::Good);
    }

    #[test]
    fn no_usable_rows_defaults_to_normal() {
        let raw = body(r#"[{"pm10Value":"-","pm25Value":"-"}]"#);
        let summary = summary_from_body(RegionCode::Jeju, &raw).unwrap();
        assert_eq!(summary.pm10, 0);
        assert_eq!(summary.pm25, 0);
        assert_eq!(summary.pm10_grade, AirGrade::Normal);
        assert_eq!(summary.pm25_grade, AirGrade::Normal);
    }

    #[test]
    fn accepts_wrapped_items_shape() {
        let raw = body(r#"{"item":[{"pm10Value":"90","pm25Value":"40"}]}"#);
        let summary = summary_from_body(RegionCode::Daegu, &raw).unwrap();
        assert_eq!(summary.pm10_grade, AirGrade::Poor);
        assert_eq!(summary.pm25_grade, AirGrade::Poor);
    }

    #[test]
    fn missing_items_is_an_error() {
        let raw = r#"{"response":{"body":{}}}"#;
        assert!(summary_from_body(RegionCode::Seoul, raw).is_err());
    }

    #[test]
    fn grade_thresholds_are_closed_on_the_upper_bound() {
        assert_eq!(pm10_grade_for(30), AirGrade::Good);
        assert_eq!(pm10_grade_for(31), AirGrade::Normal);
        assert_eq!(pm10_grade_for(80), AirGrade::Normal);
        assert_eq!(pm10_grade_for(81), AirGrade::Poor);
        assert_eq!(pm10_grade_for(150), AirGrade::Poor);
        assert_eq!(pm10_grade_for(151), AirGrade::VeryPoor);

        assert_eq!(pm25_grade_for(15), AirGrade::Good);
        assert_eq!(pm25_grade_for(16), AirGrade::Normal);
        assert_eq!(pm25_grade_for(35), AirGrade::Normal);
        assert_eq!(pm25_grade_for(36), AirGrade::Poor);
        assert_eq!(pm25_grade_for(75), AirGrade::Poor);
        assert_eq!(pm25_grade_for(76), AirGrade::VeryPoor);
    }
}

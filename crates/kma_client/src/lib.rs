//! KMA village forecast API client.
//!
//! Fetches short-term forecast data from `apis.data.go.kr` for a region's
//! grid cell and averages the returned time series into a single
//! `ForecastSample`. When the upstream reports NO_DATA for the requested
//! issue slot, the region's static fallback sample is substituted instead
//! of failing.

pub mod issue;

use common::config::AppConfig;
use common::{Error, ForecastSample, RegionCode, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::issue::IssueSlot;

const RESULT_OK: &str = "00";
const RESULT_NO_DATA: &str = "03";

/// KMA API client with connection pooling.
#[derive(Debug, Clone)]
pub struct KmaClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    num_rows: u32,
}

// ── Response types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseNode,
}

#[derive(Debug, Deserialize)]
struct ResponseNode {
    #[serde(default)]
    header: Option<Header>,
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(rename = "resultCode")]
    result_code: String,
    #[serde(rename = "resultMsg", default)]
    result_msg: String,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    items: Option<Items>,
}

/// The upstream serves `items` either wrapped in an object with an `item`
/// array or as a direct array; both shapes occur in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Items {
    Wrapped { item: Vec<FcstItem> },
    Flat(Vec<FcstItem>),
}

impl Items {
    fn into_vec(self) -> Vec<FcstItem> {
        match self {
            Items::Wrapped { item } => item,
            Items::Flat(items) => items,
        }
    }
}

/// One time-series entry.
#[derive(Debug, Clone, Deserialize)]
struct FcstItem {
    category: String,
    #[serde(rename = "fcstValue")]
    fcst_value: String,
}

// ── Implementation ────────────────────────────────────────────────────

impl KmaClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("photocast/0.1 (weather grading service)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(config.api.timeout_secs))
            .build()
            .expect("failed to build KMA HTTP client");

        Self {
            client,
            base_url: config.api.forecast_url.clone(),
            service_key: config.service_key.clone(),
            num_rows: config.api.forecast_rows,
        }
    }

    /// Fetch a forecast sample for the current issue slot.
    pub async fn fetch_sample(&self, region: RegionCode) -> Result<ForecastSample> {
        let slot = IssueSlot::for_datetime(chrono::Local::now().naive_local());
        self.fetch_sample_at(region, slot).await
    }

    /// Fetch a forecast sample for a specific issue slot.
    pub async fn fetch_sample_at(
        &self,
        region: RegionCode,
        slot: IssueSlot,
    ) -> Result<ForecastSample> {
        let grid = region.grid();
        let num_rows = self.num_rows.to_string();
        let base_date = slot.base_date();
        let base_time = slot.base_time();
        let nx = grid.nx.to_string();
        let ny = grid.ny.to_string();

        debug!(
            "Fetching KMA forecast for {}: base_date={} base_time={} nx={} ny={}",
            region, base_date, base_time, nx, ny
        );

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("serviceKey", self.service_key.as_str()),
                ("pageNo", "1"),
                ("numOfRows", num_rows.as_str()),
                ("dataType", "JSON"),
                ("base_date", base_date.as_str()),
                ("base_time", base_time.as_str()),
                ("nx", nx.as_str()),
                ("ny", ny.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(format!("forecast request for {region}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                code: status.as_u16().to_string(),
                message: format!("forecast endpoint returned {status} for {region}: {}", excerpt(&body)),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Http(format!("forecast body for {region}: {e}")))?;

        sample_from_body(region, &body)
    }
}

/// Parse a raw response body into a forecast sample.
///
/// resultCode "00" parses the time series; "03" (NO_DATA) substitutes the
/// region's static fallback sample; any other code is an upstream error.
/// A missing header is tolerated and parsing proceeds to the body.
pub fn sample_from_body(region: RegionCode, body: &str) -> Result<ForecastSample> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(header) = &envelope.response.header {
        if header.result_code == RESULT_NO_DATA {
            debug!("{}: upstream reports NO_DATA, using fallback sample", region);
            return Ok(region.fallback_sample());
        }
        if header.result_code != RESULT_OK {
            return Err(Error::Upstream {
                code: header.result_code.clone(),
                message: header.result_msg.clone(),
            });
        }
    }

    let items = envelope
        .response
        .body
        .and_then(|b| b.items)
        .ok_or_else(|| Error::Upstream {
            code: RESULT_OK.into(),
            message: format!("forecast response for {region} has no items"),
        })?
        .into_vec();

    debug!("{}: {} forecast entries", region, items.len());

    Ok(aggregate(&items))
}

/// Mean accumulator over parseable entries only.
#[derive(Default)]
struct MeanAcc {
    sum: f64,
    count: u32,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean_or(&self, default: f64) -> f64 {
        if self.count == 0 {
            default
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

/// Average each tracked category across every returned forecast timestamp.
///
/// Entries for multiple future timestamps are averaged rather than picking
/// the nearest one. Unparseable values are excluded from both sum and
/// count, never treated as zero.
fn aggregate(items: &[FcstItem]) -> ForecastSample {
    let mut sky = MeanAcc::default();
    let mut reh = MeanAcc::default();
    let mut tmp = MeanAcc::default();
    let mut wsd = MeanAcc::default();

    for item in items {
        let acc = match item.category.as_str() {
            "SKY" => &mut sky,
            "REH" => &mut reh,
            "TMP" => &mut tmp,
            "WSD" => &mut wsd,
            _ => continue,
        };

        match item.fcst_value.trim().parse::<f64>() {
            // Wind speeds carry decimals; each entry is rounded before it
            // enters the sum.
            Ok(v) if item.category == "WSD" => acc.push(v.round()),
            Ok(v) => acc.push(v),
            Err(_) => warn!(
                "skipping unparseable {} value {:?}",
                item.category, item.fcst_value
            ),
        }
    }

    ForecastSample {
        cloud_cover: sky.mean_or(3.0).round() as i32,
        humidity: reh.mean_or(50.0).round() as i32,
        temperature: tmp.mean_or(20.0),
        wind_speed: wsd.mean_or(3.0),
        visibility: 0,
    }
}

/// First 500 characters of a body, split on a char boundary.
fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(500) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

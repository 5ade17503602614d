//! Service configuration types.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// data.go.kr service key, shared by the forecast and air quality APIs.
    /// Supply the decoded form; it is URL-encoded when requests are built.
    #[serde(default)]
    pub service_key: String,

    /// Upstream endpoints and request parameters.
    #[serde(default)]
    pub api: ApiConfig,

    /// Timing parameters (seconds).
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// KMA village forecast endpoint.
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// AirKorea sido real-time measurement endpoint.
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `numOfRows` for forecast requests.
    #[serde(default = "default_forecast_rows")]
    pub forecast_rows: u32,

    /// `numOfRows` for air quality requests.
    #[serde(default = "default_air_rows")]
    pub air_quality_rows: u32,
}

/// Timing configuration (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Refresh cycle period.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Heartbeat log period.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_forecast_url() -> String {
    "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getVilageFcst".into()
}

fn default_air_quality_url() -> String {
    "https://apis.data.go.kr/B552584/ArpltnInforInqireSvc/getCtprvnRltmMesureDnsty".into()
}

fn default_timeout() -> u64 {
    30
}

fn default_forecast_rows() -> u32 {
    1000
}

fn default_air_rows() -> u32 {
    50
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_heartbeat_interval() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            timeout_secs: default_timeout(),
            forecast_rows: default_forecast_rows(),
            air_quality_rows: default_air_rows(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_key: String::new(),
            api: ApiConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

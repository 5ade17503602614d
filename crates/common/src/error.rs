//! Unified error type for photocast.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("forecast API error (code={code}): {message}")]
    Upstream { code: String, message: String },

    #[error("air quality API error: {0}")]
    AirQuality(String),

    #[error("unsupported region code: {0}")]
    UnsupportedRegion(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Domain types shared across the service.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::region::RegionCode;

/// KMA forecast model grid cell for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCoordinate {
    pub nx: u32,
    pub ny: u32,
}

/// One region's forecast, averaged across the returned forecast timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// SKY code: 1 = clear, 3 = mostly cloudy, 4 = overcast.
    pub cloud_cover: i32,
    /// REH, percent.
    pub humidity: i32,
    /// TMP, °C.
    pub temperature: f64,
    /// WSD, m/s.
    pub wind_speed: f64,
    /// Only fallback tuples populate this; the forecast path leaves it at 0
    /// and scoring ignores it.
    pub visibility: i32,
}

/// Discrete photo-weather grade served to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    Good,
    Normal,
    Bad,
    /// Sentinel for a region whose fetch failed this cycle.
    Failed,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Good => "GOOD",
            Grade::Normal => "NORMAL",
            Grade::Bad => "BAD",
            Grade::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score plus the grade derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeResult {
    /// Composite score in [0, 100].
    pub score: i32,
    pub grade: Grade,
}

/// Per-region grades for one completed refresh cycle.
pub type WeatherMap = HashMap<RegionCode, Grade>;

/// The unit the cache stores: one complete cycle's output.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    pub grades: WeatherMap,
    pub updated_at: DateTime<Utc>,
}

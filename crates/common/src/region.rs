//! The fixed set of administrative regions and their static data.
//!
//! One table drives everything region-specific: KMA grid coordinates, sido
//! display names (also sent verbatim as the AirKorea `sidoName` parameter),
//! the static PM10 values scoring reads, and the fallback forecast tuples
//! substituted when the upstream reports NO_DATA for a slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{ForecastSample, GridCoordinate};

/// One of the 17 administrative regions tracked by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionCode {
    Seoul,
    Busan,
    Daegu,
    Incheon,
    Gwangju,
    Daejeon,
    Ulsan,
    Sejong,
    Gyeonggi,
    Gangwon,
    Chungbuk,
    Chungnam,
    Jeonbuk,
    Jeonnam,
    Gyeongbuk,
    Gyeongnam,
    Jeju,
}

struct RegionInfo {
    code: RegionCode,
    name: &'static str,
    grid: GridCoordinate,
    pm10: i32,
    fallback: ForecastSample,
}

const fn sample(
    cloud_cover: i32,
    humidity: i32,
    temperature: f64,
    wind_speed: f64,
    visibility: i32,
) -> ForecastSample {
    ForecastSample {
        cloud_cover,
        humidity,
        temperature,
        wind_speed,
        visibility,
    }
}

const fn grid(nx: u32, ny: u32) -> GridCoordinate {
    GridCoordinate { nx, ny }
}

/// Ordered exactly like the `RegionCode` variants; `RegionCode::info`
/// indexes by discriminant.
#[rustfmt::skip]
const REGIONS: [RegionInfo; 17] = [
    RegionInfo { code: RegionCode::Seoul,     name: "서울특별시",     grid: grid(60, 127),  pm10: 45, fallback: sample(3, 65, 22.0, 3.0, 10) },
    RegionInfo { code: RegionCode::Busan,     name: "부산광역시",     grid: grid(98, 76),   pm10: 25, fallback: sample(1, 70, 25.0, 2.0, 15) },
    RegionInfo { code: RegionCode::Daegu,     name: "대구광역시",     grid: grid(89, 90),   pm10: 35, fallback: sample(4, 75, 28.0, 1.5, 8) },
    RegionInfo { code: RegionCode::Incheon,   name: "인천광역시",     grid: grid(55, 124),  pm10: 25, fallback: sample(1, 65, 22.0, 3.0, 15) },
    RegionInfo { code: RegionCode::Gwangju,   name: "광주광역시",     grid: grid(58, 74),   pm10: 30, fallback: sample(1, 72, 24.0, 2.5, 15) },
    RegionInfo { code: RegionCode::Daejeon,   name: "대전광역시",     grid: grid(67, 100),  pm10: 40, fallback: sample(3, 70, 23.0, 3.0, 10) },
    RegionInfo { code: RegionCode::Ulsan,     name: "울산광역시",     grid: grid(102, 84),  pm10: 20, fallback: sample(1, 68, 26.0, 2.0, 15) },
    RegionInfo { code: RegionCode::Sejong,    name: "세종특별자치시", grid: grid(66, 103),  pm10: 35, fallback: sample(3, 65, 21.0, 2.5, 12) },
    RegionInfo { code: RegionCode::Gyeonggi,  name: "경기도",         grid: grid(60, 120),  pm10: 50, fallback: sample(3, 67, 22.5, 3.0, 10) },
    RegionInfo { code: RegionCode::Gangwon,   name: "강원도",         grid: grid(73, 134),  pm10: 35, fallback: sample(3, 65, 15.0, 3.5, 8) },
    RegionInfo { code: RegionCode::Chungbuk,  name: "충청북도",       grid: grid(69, 107),  pm10: 30, fallback: sample(3, 70, 23.5, 2.5, 10) },
    RegionInfo { code: RegionCode::Chungnam,  name: "충청남도",       grid: grid(55, 110),  pm10: 40, fallback: sample(4, 72, 24.5, 3.5, 8) },
    RegionInfo { code: RegionCode::Jeonbuk,   name: "전라북도",       grid: grid(63, 89),   pm10: 35, fallback: sample(3, 68, 25.0, 2.0, 10) },
    RegionInfo { code: RegionCode::Jeonnam,   name: "전라남도",       grid: grid(51, 67),   pm10: 25, fallback: sample(1, 70, 26.0, 2.5, 15) },
    RegionInfo { code: RegionCode::Gyeongbuk, name: "경상북도",       grid: grid(89, 91),   pm10: 45, fallback: sample(4, 73, 23.0, 3.0, 8) },
    RegionInfo { code: RegionCode::Gyeongnam, name: "경상남도",       grid: grid(91, 76),   pm10: 30, fallback: sample(1, 69, 25.5, 2.0, 15) },
    RegionInfo { code: RegionCode::Jeju,      name: "제주특별자치도", grid: grid(53, 38),   pm10: 15, fallback: sample(1, 75, 27.0, 3.5, 15) },
];

impl RegionCode {
    /// Every tracked region, in stable iteration order.
    pub const ALL: [RegionCode; 17] = [
        RegionCode::Seoul,
        RegionCode::Busan,
        RegionCode::Daegu,
        RegionCode::Incheon,
        RegionCode::Gwangju,
        RegionCode::Daejeon,
        RegionCode::Ulsan,
        RegionCode::Sejong,
        RegionCode::Gyeonggi,
        RegionCode::Gangwon,
        RegionCode::Chungbuk,
        RegionCode::Chungnam,
        RegionCode::Jeonbuk,
        RegionCode::Jeonnam,
        RegionCode::Gyeongbuk,
        RegionCode::Gyeongnam,
        RegionCode::Jeju,
    ];

    fn info(self) -> &'static RegionInfo {
        &REGIONS[self as usize]
    }

    /// Stable code string, e.g. `"SEOUL"`.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionCode::Seoul => "SEOUL",
            RegionCode::Busan => "BUSAN",
            RegionCode::Daegu => "DAEGU",
            RegionCode::Incheon => "INCHEON",
            RegionCode::Gwangju => "GWANGJU",
            RegionCode::Daejeon => "DAEJEON",
            RegionCode::Ulsan => "ULSAN",
            RegionCode::Sejong => "SEJONG",
            RegionCode::Gyeonggi => "GYEONGGI",
            RegionCode::Gangwon => "GANGWON",
            RegionCode::Chungbuk => "CHUNGBUK",
            RegionCode::Chungnam => "CHUNGNAM",
            RegionCode::Jeonbuk => "JEONBUK",
            RegionCode::Jeonnam => "JEONNAM",
            RegionCode::Gyeongbuk => "GYEONGBUK",
            RegionCode::Gyeongnam => "GYEONGNAM",
            RegionCode::Jeju => "JEJU",
        }
    }

    /// Sido display name, e.g. `"서울특별시"`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// KMA forecast grid cell for the region.
    pub fn grid(self) -> GridCoordinate {
        self.info().grid
    }

    /// Static PM10 value feeding the air component of the score.
    pub fn pm10(self) -> i32 {
        self.info().pm10
    }

    /// Hand-authored approximate forecast, substituted when the upstream
    /// reports NO_DATA for the region's slot.
    pub fn fallback_sample(self) -> ForecastSample {
        self.info().fallback.clone()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let upper = s.trim().to_ascii_uppercase();
        RegionCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| Error::UnsupportedRegion(s.to_string()))
    }
}

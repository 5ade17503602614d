//! Pure forecast-to-grade scoring.

use common::{ForecastSample, Grade, GradeResult, RegionCode};

/// Weight of the sky state in the composite score.
const SKY_WEIGHT: f64 = 0.6;
/// Weight of the particulate component in the composite score.
const AIR_WEIGHT: f64 = 0.4;

/// Score a region's forecast sample.
///
/// Deterministic and total: every sample maps to a grade. The region
/// selects the static PM10 value feeding the air component.
pub fn score_sample(region: RegionCode, sample: &ForecastSample) -> GradeResult {
    let sky = sky_score(sample.cloud_cover);
    let air = air_score(region.pm10());

    // Truncation toward zero, not rounding; the grade boundaries depend
    // on it.
    let score = (f64::from(sky) * SKY_WEIGHT + f64::from(air) * AIR_WEIGHT) as i32;

    GradeResult {
        score,
        grade: grade_for_score(score),
    }
}

/// SKY code component. Clear skies score best; cloud texture still
/// photographs well.
fn sky_score(cloud_cover: i32) -> i32 {
    match cloud_cover {
        1 => 100, // clear
        3 => 90,  // mostly cloudy
        4 => 70,  // overcast
        _ => 80,
    }
}

/// Particulate component from a PM10 value.
fn air_score(pm10: i32) -> i32 {
    if pm10 <= 30 {
        100
    } else if pm10 <= 80 {
        80
    } else if pm10 <= 150 {
        60
    } else {
        40
    }
}

/// Grade bands are closed on their lower bound.
pub fn grade_for_score(score: i32) -> Grade {
    if score >= 75 {
        Grade::Good
    } else if score >= 60 {
        Grade::Normal
    } else {
        Grade::Bad
    }
}

//! End-to-end refresh tests against a local mock upstream.

use std::sync::Arc;

use common::config::AppConfig;
use common::{Grade, RegionCode};
use grading::score::score_sample;
use grading::WeatherService;
use kma_client::KmaClient;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> WeatherService {
    let mut config = AppConfig::default();
    config.service_key = "test-key".into();
    config.api.forecast_url = server.uri();
    WeatherService::new(KmaClient::new(&config))
}

fn clear_sky_body() -> serde_json::Value {
    json!({
        "response": {
            "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
            "body": {
                "items": {
                    "item": [
                        { "category": "SKY", "fcstValue": "1" },
                        { "category": "REH", "fcstValue": "55" },
                        { "category": "TMP", "fcstValue": "21" },
                        { "category": "WSD", "fcstValue": "2.0" }
                    ]
                }
            }
        }
    })
}

async fn mount_success_for_all(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clear_sky_body()))
        .mount(server)
        .await;
}

/// Mock matching exactly one region's grid cell.
fn region_mock(region: RegionCode) -> wiremock::MockBuilder {
    let grid = region.grid();
    Mock::given(method("GET"))
        .and(query_param("nx", grid.nx.to_string()))
        .and(query_param("ny", grid.ny.to_string()))
}

#[tokio::test]
async fn full_cycle_grades_every_region() {
    let server = MockServer::start().await;
    mount_success_for_all(&server).await;

    let service = service_for(&server);
    let snapshot = service.weather_map().await;

    assert_eq!(snapshot.grades.len(), 17);
    for region in RegionCode::ALL {
        // Clear sky and every region's static PM10 ≤ 80 ⇒ GOOD everywhere.
        assert_eq!(snapshot.grades[&region], Grade::Good, "{region}");
    }
}

#[tokio::test]
async fn one_failing_region_is_isolated() {
    let server = MockServer::start().await;

    region_mock(RegionCode::Seoul)
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success_for_all(&server).await;

    let service = service_for(&server);
    let snapshot = service.refresh().await;

    assert_eq!(snapshot.grades.len(), 17);
    assert_eq!(snapshot.grades[&RegionCode::Seoul], Grade::Failed);

    let failed = snapshot
        .grades
        .values()
        .filter(|g| **g == Grade::Failed)
        .count();
    assert_eq!(failed, 1);
}

#[tokio::test]
async fn no_data_region_is_graded_from_its_fallback() {
    let server = MockServer::start().await;

    region_mock(RegionCode::Gangwon)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "header": { "resultCode": "03", "resultMsg": "NO_DATA" }
            }
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success_for_all(&server).await;

    let service = service_for(&server);
    let snapshot = service.refresh().await;

    let expected = score_sample(
        RegionCode::Gangwon,
        &RegionCode::Gangwon.fallback_sample(),
    )
    .grade;
    assert_ne!(snapshot.grades[&RegionCode::Gangwon], Grade::Failed);
    assert_eq!(snapshot.grades[&RegionCode::Gangwon], expected);
}

#[tokio::test]
async fn total_outage_yields_a_complete_failed_map() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let snapshot = service.weather_map().await;

    assert_eq!(snapshot.grades.len(), 17);
    for region in RegionCode::ALL {
        assert_eq!(snapshot.grades[&region], Grade::Failed, "{region}");
    }
}

#[tokio::test]
async fn concurrent_cold_start_readers_force_one_cycle() {
    let server = MockServer::start().await;
    mount_success_for_all(&server).await;

    let service = Arc::new(service_for(&server));
    let (a, b) = tokio::join!(service.weather_map(), service.weather_map());

    assert!(Arc::ptr_eq(&a, &b));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 17, "exactly one cycle's worth of fetches");
}

#[tokio::test]
async fn reads_are_idempotent_until_the_next_refresh() {
    let server = MockServer::start().await;
    mount_success_for_all(&server).await;

    let service = service_for(&server);

    let first = service.weather_map().await;
    let second = service.weather_map().await;
    assert!(Arc::ptr_eq(&first, &second));

    let refreshed = service.refresh().await;
    assert!(!Arc::ptr_eq(&first, &refreshed));

    let third = service.weather_map().await;
    assert!(Arc::ptr_eq(&refreshed, &third));
}

#[tokio::test]
async fn peek_is_empty_until_a_cycle_completes() {
    let server = MockServer::start().await;
    mount_success_for_all(&server).await;

    let service = service_for(&server);
    assert!(service.peek().is_none());

    let snapshot = service.weather_map().await;
    let peeked = service.peek().unwrap();
    assert!(Arc::ptr_eq(&snapshot, &peeked));
}

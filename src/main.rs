//! Photocast: regional photo-weather grading service.
//!
//! Polls the KMA village forecast API for every tracked region on a fixed
//! interval, grades each region, and keeps the latest grade map in an
//! in-process cache for the serving layer to read.

mod config;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use air_korea_client::AirKoreaClient;
use common::{Grade, RegionCode};
use grading::WeatherService;
use kma_client::KmaClient;

/// Regional photo-weather grading service.
#[derive(Parser)]
#[command(name = "photocast", about = "Regional photo-weather grading service")]
struct Cli {
    /// Run a single refresh cycle, print the grade map, and exit.
    #[arg(long)]
    dry_run: bool,

    /// Fetch and print AirKorea particulate averages per region, then exit.
    #[arg(long)]
    probe_air: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "photocast=info,kma_client=info,air_korea_client=info,grading=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("📸 Photocast starting up...");

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Tracking {} regions, refresh every {}s",
        RegionCode::ALL.len(),
        cfg.timing.refresh_interval_secs
    );

    // ── Probe-air mode ───────────────────────────────────────────────
    if cli.probe_air {
        let air = AirKoreaClient::new(&cfg);
        for region in RegionCode::ALL {
            match air.fetch_summary(region).await {
                Ok(summary) => info!(
                    "{} ({}): PM10={}µg/m³ [{}] PM2.5={}µg/m³ [{}]",
                    region,
                    region.name(),
                    summary.pm10,
                    summary.pm10_grade,
                    summary.pm25,
                    summary.pm25_grade
                ),
                Err(e) => warn!("{}: air quality probe failed: {}", region, e),
            }
        }
        return;
    }

    let service = Arc::new(WeatherService::new(KmaClient::new(&cfg)));

    // ── Dry-run mode ─────────────────────────────────────────────────
    if cli.dry_run {
        info!("Running a single refresh cycle...");
        let snapshot = service.refresh().await;
        for region in RegionCode::ALL {
            let grade = snapshot
                .grades
                .get(&region)
                .copied()
                .unwrap_or(Grade::Failed);
            info!("  {} ({}) → {}", region, region.name(), grade);
        }
        return;
    }

    // ── Refresh scheduler ────────────────────────────────────────────
    let refresh_service = service.clone();
    let refresh_secs = cfg.timing.refresh_interval_secs;
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(refresh_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let snapshot = refresh_service.refresh().await;
            let failed = snapshot
                .grades
                .values()
                .filter(|g| **g == Grade::Failed)
                .count();
            info!(
                "Refresh cycle complete: {} regions, {} failed",
                snapshot.grades.len(),
                failed
            );
        }
    });

    // ── Heartbeat ────────────────────────────────────────────────────
    let hb_service = service.clone();
    let hb_secs = cfg.timing.heartbeat_interval_secs;
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(hb_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            // Cache read only; the heartbeat must never trigger a fetch.
            match hb_service.peek() {
                Some(snapshot) => {
                    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
                    for grade in snapshot.grades.values() {
                        *counts.entry(grade.as_str()).or_insert(0) += 1;
                    }
                    let age = (Utc::now() - snapshot.updated_at).num_seconds();
                    info!("HEARTBEAT: snapshot_age={}s grades={:?}", age, counts);
                }
                None => info!("HEARTBEAT: no snapshot yet"),
            }
        }
    });

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, exiting"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

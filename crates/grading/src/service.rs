//! Refresh orchestration and the served read path.

use std::sync::Arc;

use chrono::Utc;
use common::{Grade, RegionCode, WeatherMap, WeatherSnapshot};
use kma_client::KmaClient;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::GradeCache;
use crate::score::score_sample;

/// Polls the forecast upstream per region and serves the latest grade map.
pub struct WeatherService {
    client: KmaClient,
    cache: GradeCache,
    /// Serializes refresh cycles: the scheduler cannot overlap itself, and
    /// concurrent cold-start readers force at most one cycle.
    refresh_lock: Mutex<()>,
}

impl WeatherService {
    pub fn new(client: KmaClient) -> Self {
        Self {
            client,
            cache: GradeCache::new(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Run one cycle and publish its snapshot.
    pub async fn refresh(&self) -> Arc<WeatherSnapshot> {
        let _guard = self.refresh_lock.lock().await;
        self.run_and_store().await
    }

    /// The served read: the current grade map.
    ///
    /// Never touches the network once a snapshot exists. The first reader
    /// pays for one forced cycle; concurrent first readers wait on that
    /// same cycle instead of starting their own.
    pub async fn weather_map(&self) -> Arc<WeatherSnapshot> {
        if let Some(snapshot) = self.cache.peek() {
            return snapshot;
        }

        let _guard = self.refresh_lock.lock().await;
        // A scheduled refresh or another cold-start reader may have
        // published while we waited for the lock.
        if let Some(snapshot) = self.cache.peek() {
            return snapshot;
        }
        info!("no snapshot yet; forcing initial refresh");
        self.run_and_store().await
    }

    /// Non-blocking view of the cache; `None` until the first cycle
    /// completes.
    pub fn peek(&self) -> Option<Arc<WeatherSnapshot>> {
        self.cache.peek()
    }

    async fn run_and_store(&self) -> Arc<WeatherSnapshot> {
        let grades = self.run_cycle().await;
        let snapshot = Arc::new(WeatherSnapshot {
            grades,
            updated_at: Utc::now(),
        });
        self.cache.store(snapshot.clone());
        snapshot
    }

    /// Fetch and score every region. A region's failure is recorded as
    /// FAILED and never aborts the cycle or leaks into other regions.
    async fn run_cycle(&self) -> WeatherMap {
        let mut grades = WeatherMap::with_capacity(RegionCode::ALL.len());

        for region in RegionCode::ALL {
            let grade = match self.client.fetch_sample(region).await {
                Ok(sample) => {
                    let result = score_sample(region, &sample);
                    debug!("{}: {} (score {})", region, result.grade, result.score);
                    result.grade
                }
                Err(e) => {
                    warn!("{}: fetch failed, recording FAILED: {}", region, e);
                    Grade::Failed
                }
            };
            grades.insert(region, grade);
        }

        grades
    }
}

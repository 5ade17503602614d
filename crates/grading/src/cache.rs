//! Snapshot cache for the grade map.
//!
//! Readers get the most recently completed cycle's output as an immutable
//! snapshot; a refresh replaces the whole snapshot in one swap, so a
//! reader never observes a mix of two cycles.

use std::sync::{Arc, RwLock};

use common::WeatherSnapshot;

#[derive(Debug, Default)]
pub struct GradeCache {
    snapshot: RwLock<Option<Arc<WeatherSnapshot>>>,
}

impl GradeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, if any cycle has completed. Never blocks on the
    /// network and never waits for an in-flight refresh.
    pub fn peek(&self) -> Option<Arc<WeatherSnapshot>> {
        // A poisoned lock still holds a structurally sound Arc.
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Publish a completed cycle's output, replacing any prior snapshot.
    pub fn store(&self, snapshot: Arc<WeatherSnapshot>) {
        *self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{Grade, RegionCode, WeatherMap};

    fn snapshot_with(grade: Grade) -> Arc<WeatherSnapshot> {
        let mut grades = WeatherMap::new();
        grades.insert(RegionCode::Seoul, grade);
        Arc::new(WeatherSnapshot {
            grades,
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn starts_empty() {
        assert!(GradeCache::new().peek().is_none());
    }

    #[test]
    fn peek_returns_the_stored_snapshot() {
        let cache = GradeCache::new();
        let snapshot = snapshot_with(Grade::Good);
        cache.store(snapshot.clone());

        let read = cache.peek().unwrap();
        assert!(Arc::ptr_eq(&read, &snapshot));
    }

    #[test]
    fn store_replaces_the_snapshot_wholesale() {
        let cache = GradeCache::new();
        cache.store(snapshot_with(Grade::Good));
        let replacement = snapshot_with(Grade::Bad);
        cache.store(replacement.clone());

        let read = cache.peek().unwrap();
        assert!(Arc::ptr_eq(&read, &replacement));
        assert_eq!(read.grades[&RegionCode::Seoul], Grade::Bad);
    }

    #[test]
    fn repeated_peeks_share_one_snapshot() {
        let cache = GradeCache::new();
        cache.store(snapshot_with(Grade::Normal));

        let first = cache.peek().unwrap();
        let second = cache.peek().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}

use parking_lot::RwLock;
use std::sync::Arc;

use crate::engine::StrategyEngine;
use crate::error::SnapshotError;
use crate::session::SessionSummary;
use crate::track::TrackCharacteristics;
use crate::types::{RaceSnapshot, StrategyRecommendation};

/// Engine handle shared between concurrent callers.
///
/// Readers take a snapshot of the current engine and compute without holding
/// the lock; an observation builds a new engine and swaps it in.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<Arc<StrategyEngine>>>,
}

impl SharedEngine {
    pub fn new(engine: StrategyEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    pub fn current(&self) -> Arc<StrategyEngine> {
        Arc::clone(&self.inner.read())
    }

    pub fn generate_strategy(
        &self,
        snapshot: &RaceSnapshot,
    ) -> Result<StrategyRecommendation, SnapshotError> {
        self.current().generate_strategy(snapshot)
    }

    /// Refine from a session summary and publish the result.
    pub fn apply_observation(&self, summary: &SessionSummary) -> TrackCharacteristics {
        let mut guard = self.inner.write();
        let next = guard.apply_observation(summary);
        let effective = next.characteristics().clone();
        *guard = Arc::new(next);
        effective
    }
}

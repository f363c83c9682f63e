use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DomainResult;
use crate::reading::{PersistedReading, Reading};
use crate::store::TelemetryStore;

#[derive(Default)]
struct MemoryState {
    next_id: i32,
    rows: Vec<PersistedReading>,
}

/// In-memory implementation of `TelemetryStore`. Backs the gateway tests and
/// works as a stand-in store when no database is around; appends are
/// serialized by the lock, ids start at 1.
pub struct InMemoryTelemetryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryTelemetryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }
}

impl Default for InMemoryTelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetryStore for InMemoryTelemetryStore {
    async fn append(&self, reading: Reading) -> DomainResult<PersistedReading> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let persisted = PersistedReading::from_reading(state.next_id, reading);
        state.rows.push(persisted.clone());
        Ok(persisted)
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<PersistedReading>> {
        let state = self.state.read().await;
        let mut rows = state.rows.clone();
        // Stable sort keeps insertion order for equal timestamps, which is
        // this store's natural order.
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

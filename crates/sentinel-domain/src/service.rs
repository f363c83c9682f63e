use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{DomainError, DomainResult};
use crate::reading::{PersistedReading, Reading};
use crate::store::TelemetryStore;

/// Behavioral switches for the reading service.
#[derive(Debug, Clone)]
pub struct ReadingServiceConfig {
    /// When true, readings whose device id is empty (or whitespace only) are
    /// rejected at translation time. Off by default: ingestion otherwise
    /// accepts any device id as-is.
    pub reject_empty_device_id: bool,
    /// Upper bound for the recent-read path.
    pub recent_limit: usize,
}

impl Default for ReadingServiceConfig {
    fn default() -> Self {
        Self {
            reject_empty_device_id: false,
            recent_limit: 50,
        }
    }
}

/// Domain service both protocol handlers call into: accepts canonical
/// readings for persistence and serves the bounded recent-read path. Holds
/// no mutable state of its own, so it is safe for unlimited concurrent use.
pub struct ReadingService {
    store: Arc<dyn TelemetryStore>,
    config: ReadingServiceConfig,
}

impl ReadingService {
    pub fn new(store: Arc<dyn TelemetryStore>, config: ReadingServiceConfig) -> Self {
        Self { store, config }
    }

    /// Persist one reading, returning it with its store-assigned id.
    #[instrument(skip(self, reading), fields(device_id = %reading.device_id))]
    pub async fn ingest(&self, reading: Reading) -> DomainResult<PersistedReading> {
        if self.config.reject_empty_device_id && reading.device_id.trim().is_empty() {
            return Err(DomainError::Translation(
                "device_id must not be empty".to_string(),
            ));
        }

        debug!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            recorded_at = %reading.recorded_at,
            "persisting reading"
        );

        let persisted = self.store.append(reading).await?;

        debug!(id = persisted.id, "reading persisted");

        Ok(persisted)
    }

    /// The most recent readings, newest first, bounded by the configured
    /// limit.
    #[instrument(skip(self))]
    pub async fn recent_readings(&self) -> DomainResult<Vec<PersistedReading>> {
        let readings = self.store.recent(self.config.recent_limit).await?;
        debug!(count = readings.len(), "recent readings fetched");
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockTelemetryStore;
    use chrono::Utc;

    fn sample_reading(device_id: &str) -> Reading {
        Reading {
            device_id: device_id.to_string(),
            temperature: 24.5,
            humidity: 55.0,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ingest_appends_to_store() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_append()
            .withf(|reading: &Reading| reading.device_id == "THERMO-001")
            .times(1)
            .returning(|reading| Ok(PersistedReading::from_reading(1, reading)));

        let service = ReadingService::new(Arc::new(store), ReadingServiceConfig::default());

        let persisted = service.ingest(sample_reading("THERMO-001")).await.unwrap();
        assert_eq!(persisted.id, 1);
        assert_eq!(persisted.device_id, "THERMO-001");
    }

    #[tokio::test]
    async fn test_ingest_accepts_empty_device_id_by_default() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|reading| Ok(PersistedReading::from_reading(7, reading)));

        let service = ReadingService::new(Arc::new(store), ReadingServiceConfig::default());

        let persisted = service.ingest(sample_reading("")).await.unwrap();
        assert_eq!(persisted.id, 7);
        assert_eq!(persisted.device_id, "");
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_device_id_when_configured() {
        let mut store = MockTelemetryStore::new();
        store.expect_append().times(0);

        let config = ReadingServiceConfig {
            reject_empty_device_id: true,
            ..Default::default()
        };
        let service = ReadingService::new(Arc::new(store), config);

        let result = service.ingest(sample_reading("   ")).await;
        assert!(matches!(result, Err(DomainError::Translation(_))));
    }

    #[tokio::test]
    async fn test_ingest_propagates_store_failure() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|_| Err(DomainError::StoreUnavailable(anyhow::anyhow!("down"))));

        let service = ReadingService::new(Arc::new(store), ReadingServiceConfig::default());

        let result = service.ingest(sample_reading("THERMO-001")).await;
        assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_recent_readings_uses_configured_limit() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_recent()
            .withf(|limit: &usize| *limit == 50)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let service = ReadingService::new(Arc::new(store), ReadingServiceConfig::default());

        let readings = service.recent_readings().await.unwrap();
        assert!(readings.is_empty());
    }
}

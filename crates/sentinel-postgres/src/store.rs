use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use sentinel_domain::{DomainError, DomainResult, PersistedReading, Reading, TelemetryStore};

use crate::client::PostgresClient;

/// PostgreSQL implementation of the `TelemetryStore` contract. One row per
/// reading; `id` is a `SERIAL` assigned by the database on insert.
#[derive(Clone)]
pub struct PostgresTelemetryStore {
    client: PostgresClient,
}

impl PostgresTelemetryStore {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    /// Creates the readings table when it does not exist yet. Called once at
    /// startup.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::StoreUnavailable)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS telemetry_readings (
                 id SERIAL PRIMARY KEY,
                 device_id TEXT NOT NULL,
                 temperature DOUBLE PRECISION NOT NULL,
                 humidity DOUBLE PRECISION NOT NULL,
                 recorded_at TIMESTAMPTZ NOT NULL
             )",
            &[],
        )
        .await
        .map_err(map_db_error)?;

        debug!("telemetry_readings schema ensured");
        Ok(())
    }
}

#[async_trait]
impl TelemetryStore for PostgresTelemetryStore {
    async fn append(&self, reading: Reading) -> DomainResult<PersistedReading> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::StoreUnavailable)?;

        let row = conn
            .query_one(
                "INSERT INTO telemetry_readings (device_id, temperature, humidity, recorded_at)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
                &[
                    &reading.device_id,
                    &reading.temperature,
                    &reading.humidity,
                    &reading.recorded_at,
                ],
            )
            .await
            .map_err(map_db_error)?;

        let id: i32 = row.get("id");
        debug!(id, device_id = %reading.device_id, "appended reading");

        Ok(PersistedReading::from_reading(id, reading))
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<PersistedReading>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::StoreUnavailable)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = conn
            .query(
                "SELECT id, device_id, temperature, humidity, recorded_at
                 FROM telemetry_readings
                 ORDER BY recorded_at DESC
                 LIMIT $1",
                &[&limit],
            )
            .await
            .map_err(map_db_error)?;

        let readings = rows
            .iter()
            .map(|row| {
                let recorded_at: DateTime<Utc> = row.get("recorded_at");
                PersistedReading {
                    id: row.get("id"),
                    device_id: row.get("device_id"),
                    temperature: row.get("temperature"),
                    humidity: row.get("humidity"),
                    recorded_at,
                }
            })
            .collect();

        Ok(readings)
    }
}

/// SQLSTATE class 23 (integrity constraint violation) means the schema
/// rejected the value; everything else is treated as the store being
/// unreachable.
fn map_db_error(error: tokio_postgres::Error) -> DomainError {
    if let Some(db_error) = error.as_db_error() {
        if db_error.code().code().starts_with("23") {
            return DomainError::ConstraintViolation(db_error.message().to_string());
        }
    }
    DomainError::StoreUnavailable(error.into())
}

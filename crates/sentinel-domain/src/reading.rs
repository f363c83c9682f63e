use chrono::{DateTime, Utc};

/// One canonical telemetry sample as produced by a device, before the store
/// has assigned it a key. Immutable once created; corrections are new
/// readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub device_id: String,
    /// Degrees Celsius. Sensor noise may exceed physical bounds; no range is
    /// enforced anywhere in the gateway.
    pub temperature: f64,
    /// Percent, conventionally 0-100 but not validated.
    pub humidity: f64,
    /// Producer clock at creation time, never the gateway clock.
    pub recorded_at: DateTime<Utc>,
}

/// A reading after a successful append, carrying the store-assigned
/// surrogate key.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedReading {
    pub id: i32,
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub recorded_at: DateTime<Utc>,
}

impl PersistedReading {
    pub fn from_reading(id: i32, reading: Reading) -> Self {
        Self {
            id,
            device_id: reading.device_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            recorded_at: reading.recorded_at,
        }
    }
}

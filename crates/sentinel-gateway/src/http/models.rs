//! Wire DTOs for the HTTP surface. Field names are camelCase on the wire and
//! timestamps travel as RFC 3339 strings.

use chrono::{DateTime, NaiveDate, Utc};
use sentinel_domain::{PersistedReading, Reading};
use serde::{Deserialize, Serialize};

/// Inbound `POST /telemetry` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySubmission {
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySubmission {
    pub fn into_reading(self) -> Reading {
        Reading {
            device_id: self.device_id,
            temperature: self.temperature,
            humidity: self.humidity,
            recorded_at: self.timestamp,
        }
    }
}

/// A persisted reading as served back to HTTP consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub id: i32,
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<PersistedReading> for TelemetryRecord {
    fn from(reading: PersistedReading) -> Self {
        Self {
            id: reading.id,
            device_id: reading.device_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            timestamp: reading.recorded_at,
        }
    }
}

/// One synthetic forecast served by the demo endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_decodes_camel_case_json() {
        let body = r#"{
            "deviceId": "THERMO-001",
            "temperature": 24.5,
            "humidity": 55.0,
            "timestamp": "2024-06-01T12:00:00Z"
        }"#;

        let submission: TelemetrySubmission = serde_json::from_str(body).unwrap();
        assert_eq!(submission.device_id, "THERMO-001");
        assert_eq!(submission.temperature, 24.5);
        assert_eq!(submission.humidity, 55.0);
        assert_eq!(submission.timestamp.to_rfc3339(), "2024-06-01T12:00:00+00:00");
    }

    #[test]
    fn test_record_serializes_camel_case_fields() {
        let record = TelemetryRecord {
            id: 3,
            device_id: "THERMO-001".to_string(),
            temperature: 21.0,
            humidity: 48.5,
            timestamp: "2024-06-01T12:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["deviceId"], "THERMO-001");
        assert_eq!(json["temperature"], 21.0);
        assert_eq!(json["humidity"], 48.5);
        assert!(json["timestamp"].as_str().unwrap().starts_with("2024-06-01T12:00:00"));
    }
}

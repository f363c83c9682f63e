use chrono::{DateTime, TimeZone, Utc};
use prost_types::Timestamp;
use sentinel_domain::{DomainError, Reading};
use sentinel_proto::TelemetryRequest;

/// Convert a wire-level telemetry request into the canonical reading.
///
/// A missing or unrepresentable timestamp fails translation here, before
/// anything reaches the store; it is never coerced to a default instant.
pub fn request_to_reading(request: TelemetryRequest) -> Result<Reading, DomainError> {
    let timestamp = request
        .timestamp
        .ok_or_else(|| DomainError::Translation("missing timestamp".to_string()))?;

    Ok(Reading {
        device_id: request.device_id,
        temperature: request.temperature,
        humidity: request.humidity,
        recorded_at: timestamp_to_datetime(timestamp)?,
    })
}

/// Convert a protobuf Timestamp to a chrono DateTime.
fn timestamp_to_datetime(ts: Timestamp) -> Result<DateTime<Utc>, DomainError> {
    Utc.timestamp_opt(ts.seconds, ts.nanos as u32)
        .single()
        .ok_or_else(|| {
            DomainError::Translation(format!(
                "invalid timestamp: {} seconds, {} nanos",
                ts.seconds, ts.nanos
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_to_reading() {
        let request = TelemetryRequest {
            device_id: "THERMO-001".to_string(),
            temperature: 24.5,
            humidity: 55.0,
            timestamp: Some(Timestamp {
                seconds: 1700000000,
                nanos: 500_000_000,
            }),
        };

        let reading = request_to_reading(request).unwrap();
        assert_eq!(reading.device_id, "THERMO-001");
        assert_eq!(reading.temperature, 24.5);
        assert_eq!(reading.humidity, 55.0);
        assert_eq!(reading.recorded_at.timestamp(), 1700000000);
        assert_eq!(reading.recorded_at.timestamp_subsec_nanos(), 500_000_000);
    }

    #[test]
    fn test_missing_timestamp_fails_translation() {
        let request = TelemetryRequest {
            device_id: "THERMO-001".to_string(),
            temperature: 24.5,
            humidity: 55.0,
            timestamp: None,
        };

        let result = request_to_reading(request);
        match result {
            Err(DomainError::Translation(msg)) => assert!(msg.contains("missing timestamp")),
            other => panic!("expected translation error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_timestamp_fails_translation() {
        let request = TelemetryRequest {
            device_id: "THERMO-001".to_string(),
            temperature: 24.5,
            humidity: 55.0,
            timestamp: Some(Timestamp {
                seconds: i64::MAX,
                nanos: 0,
            }),
        };

        assert!(matches!(
            request_to_reading(request),
            Err(DomainError::Translation(_))
        ));
    }
}

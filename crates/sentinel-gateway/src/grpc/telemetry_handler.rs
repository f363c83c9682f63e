use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, error, instrument, warn};

use sentinel_domain::ReadingService;
use sentinel_proto::telemetry_service_server::TelemetryService;
use sentinel_proto::{TelemetryRequest, TelemetryResponse};

use crate::grpc::conversions::request_to_reading;

/// gRPC handler for TelemetryService.
///
/// Contract with callers: this handler always answers with a
/// `TelemetryResponse`. Translation and persistence failures are reported
/// through the `success`/`message` fields, never as a `Status`, so client
/// retry policy is driven by application-level fields alone.
pub struct TelemetryServiceHandler {
    readings: Arc<ReadingService>,
}

impl TelemetryServiceHandler {
    pub fn new(readings: Arc<ReadingService>) -> Self {
        Self { readings }
    }
}

#[tonic::async_trait]
impl TelemetryService for TelemetryServiceHandler {
    #[instrument(
        name = "SendTelemetry",
        skip(self, request),
        fields(device_id = %request.get_ref().device_id)
    )]
    async fn send_telemetry(
        &self,
        request: Request<TelemetryRequest>,
    ) -> Result<Response<TelemetryResponse>, Status> {
        let reading = match request_to_reading(request.into_inner()) {
            Ok(reading) => reading,
            Err(err) => {
                warn!("rejected telemetry request: {}", err);
                return Ok(Response::new(TelemetryResponse {
                    success: false,
                    message: err.to_string(),
                }));
            }
        };

        match self.readings.ingest(reading).await {
            Ok(persisted) => {
                debug!(id = persisted.id, "telemetry persisted");
                Ok(Response::new(TelemetryResponse {
                    success: true,
                    message: "Data received successfully via gRPC!".to_string(),
                }))
            }
            Err(err) => {
                error!("failed to persist telemetry: {}", err);
                Ok(Response::new(TelemetryResponse {
                    success: false,
                    message: err.to_string(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use prost_types::Timestamp;
    use sentinel_domain::{
        DomainError, MockTelemetryStore, PersistedReading, Reading, ReadingServiceConfig,
    };

    fn handler_with_store(store: MockTelemetryStore) -> TelemetryServiceHandler {
        let service = ReadingService::new(Arc::new(store), ReadingServiceConfig::default());
        TelemetryServiceHandler::new(Arc::new(service))
    }

    fn sample_request() -> TelemetryRequest {
        let now = Utc::now();
        TelemetryRequest {
            device_id: "THERMO-001".to_string(),
            temperature: 24.5,
            humidity: 55.0,
            timestamp: Some(Timestamp {
                seconds: now.timestamp(),
                nanos: now.timestamp_subsec_nanos() as i32,
            }),
        }
    }

    #[tokio::test]
    async fn test_send_telemetry_acknowledges_persisted_reading() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_append()
            .withf(|reading: &Reading| reading.device_id == "THERMO-001")
            .times(1)
            .returning(|reading| Ok(PersistedReading::from_reading(1, reading)));

        let handler = handler_with_store(store);
        let response = handler
            .send_telemetry(Request::new(sample_request()))
            .await
            .unwrap()
            .into_inner();

        assert!(response.success);
        assert_eq!(response.message, "Data received successfully via gRPC!");
    }

    #[tokio::test]
    async fn test_store_failure_stays_inside_the_response_envelope() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|_| Err(DomainError::StoreUnavailable(anyhow::anyhow!("pool exhausted"))));

        let handler = handler_with_store(store);
        let result = handler.send_telemetry(Request::new(sample_request())).await;

        // Never a Status, even when persistence is down.
        let response = result.unwrap().into_inner();
        assert!(!response.success);
        assert!(response.message.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_missing_timestamp_never_reaches_the_store() {
        let mut store = MockTelemetryStore::new();
        store.expect_append().times(0);

        let handler = handler_with_store(store);
        let request = TelemetryRequest {
            timestamp: None,
            ..sample_request()
        };

        let response = handler
            .send_telemetry(Request::new(request))
            .await
            .unwrap()
            .into_inner();

        assert!(!response.success);
        assert!(response.message.contains("missing timestamp"));
    }
}

use async_trait::async_trait;
use prost_types::Timestamp;
use tonic::transport::{Channel, Endpoint};

use sentinel_domain::Reading;
use sentinel_proto::telemetry_service_client::TelemetryServiceClient;
use sentinel_proto::TelemetryRequest;

use crate::transmitter::{TelemetryTransmitter, TransmitError};

/// Transmits readings over the gRPC surface.
///
/// The underlying channel connects lazily, so construction never performs
/// I/O and a gateway that comes up after the simulator is picked up on the
/// next attempt.
pub struct GrpcTransmitter {
    client: TelemetryServiceClient<Channel>,
}

impl GrpcTransmitter {
    pub fn new(target: String) -> anyhow::Result<Self> {
        let channel = Endpoint::from_shared(target)?.connect_lazy();
        Ok(Self {
            client: TelemetryServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl TelemetryTransmitter for GrpcTransmitter {
    async fn transmit(&self, reading: &Reading) -> Result<(), TransmitError> {
        let request = TelemetryRequest {
            device_id: reading.device_id.clone(),
            temperature: reading.temperature,
            humidity: reading.humidity,
            timestamp: Some(Timestamp {
                seconds: reading.recorded_at.timestamp(),
                nanos: reading.recorded_at.timestamp_subsec_nanos() as i32,
            }),
        };

        let response = self
            .client
            .clone()
            .send_telemetry(request)
            .await
            .map_err(|status| TransmitError::Transport(status.into()))?
            .into_inner();

        if response.success {
            Ok(())
        } else {
            Err(TransmitError::Rejected(response.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_fails_construction() {
        assert!(GrpcTransmitter::new("not a uri".to_string()).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_a_transport_failure() {
        // Nothing listens on this port; the lazy channel fails per call.
        let transmitter = GrpcTransmitter::new("http://127.0.0.1:1".to_string()).unwrap();
        let reading = Reading {
            device_id: "THERMO-001".to_string(),
            temperature: 24.5,
            humidity: 55.0,
            recorded_at: chrono::Utc::now(),
        };

        let result = transmitter.transmit(&reading).await;
        assert!(matches!(result, Err(TransmitError::Transport(_))));
    }
}

use async_trait::async_trait;

use sentinel_domain::Reading;

use crate::transmitter::{TelemetryTransmitter, TransmitError};

/// Transmits readings over the HTTP JSON surface.
pub struct HttpTransmitter {
    client: reqwest::Client,
    telemetry_url: String,
}

impl HttpTransmitter {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let telemetry_url = format!("{}/telemetry", base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            telemetry_url,
        })
    }
}

#[async_trait]
impl TelemetryTransmitter for HttpTransmitter {
    async fn transmit(&self, reading: &Reading) -> Result<(), TransmitError> {
        let body = serde_json::json!({
            "deviceId": reading.device_id,
            "temperature": reading.temperature,
            "humidity": reading.humidity,
            "timestamp": reading.recorded_at.to_rfc3339(),
        });

        let response = self
            .client
            .post(&self.telemetry_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| TransmitError::Transport(err.into()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(TransmitError::Rejected(format!("{}: {}", status, detail)))
        }
    }
}

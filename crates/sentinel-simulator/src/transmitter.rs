use async_trait::async_trait;
use thiserror::Error;

use sentinel_domain::Reading;

/// Failure modes for one transmission attempt. Both are recoverable as far
/// as the generation loop is concerned.
#[derive(Error, Debug)]
pub enum TransmitError {
    /// The gateway could not be reached at the transport level.
    #[error("Transport failure: {0}")]
    Transport(#[source] anyhow::Error),

    /// The gateway answered, but refused the reading.
    #[error("Gateway rejected the reading: {0}")]
    Rejected(String),
}

/// Protocol seam between the generation loop and the gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryTransmitter: Send + Sync {
    async fn transmit(&self, reading: &Reading) -> Result<(), TransmitError>;
}

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use sentinel_domain::Reading;

use crate::transmitter::{TelemetryTransmitter, TransmitError};

// Synthesis bands for a plausible indoor climate sensor.
const TEMPERATURE_BAND: std::ops::Range<f64> = 20.0..30.0;
const HUMIDITY_BAND: std::ops::Range<f64> = 40.0..60.0;

/// Configuration for the simulator loop
pub struct SimulatorConfig {
    /// Device id stamped on every synthesized reading
    pub device_id: String,
    /// Interval between transmissions
    pub interval: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            device_id: "THERMO-001".to_string(),
            interval: Duration::from_secs(5),
        }
    }
}

/// Run the simulator loop until the token is cancelled.
///
/// Each iteration synthesizes one reading, transmits it, logs the outcome
/// and sleeps the configured interval. Failed transmissions never break the
/// loop and the interval stays constant regardless of consecutive failures.
pub async fn run_simulator<T>(
    ctx: CancellationToken,
    config: SimulatorConfig,
    transmitter: T,
) -> Result<()>
where
    T: TelemetryTransmitter,
{
    info!(device_id = %config.device_id, "Telemetry simulator started");

    let mut rng = StdRng::from_entropy();

    while !ctx.is_cancelled() {
        let reading = synthesize_reading(&config.device_id, &mut rng);

        debug!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            "Generated reading"
        );

        match transmitter.transmit(&reading).await {
            Ok(()) => {
                info!(
                    device_id = %reading.device_id,
                    temperature = reading.temperature,
                    humidity = reading.humidity,
                    "Telemetry sent"
                );
            }
            Err(TransmitError::Rejected(message)) => {
                warn!(
                    device_id = %reading.device_id,
                    "Telemetry rejected by gateway: {}",
                    message
                );
            }
            Err(TransmitError::Transport(err)) => {
                error!(
                    device_id = %reading.device_id,
                    "Failed to send telemetry: {:#}",
                    err
                );
            }
        }

        tokio::select! {
            _ = ctx.cancelled() => {
                info!("Received shutdown signal, stopping simulator");
                break;
            }
            _ = tokio::time::sleep(config.interval) => {}
        }
    }

    info!("Telemetry simulator stopped gracefully");
    Ok(())
}

fn synthesize_reading(device_id: &str, rng: &mut StdRng) -> Reading {
    Reading {
        device_id: device_id.to_string(),
        temperature: round2(rng.gen_range(TEMPERATURE_BAND)),
        humidity: round2(rng.gen_range(HUMIDITY_BAND)),
        recorded_at: Utc::now(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmitter::MockTelemetryTransmitter;
    use mockall::Sequence;

    fn fast_config() -> SimulatorConfig {
        SimulatorConfig {
            device_id: "TEST-01".to_string(),
            interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_loop_survives_consecutive_failures_and_resumes() {
        let ctx = CancellationToken::new();
        let mut transmitter = MockTelemetryTransmitter::new();
        let mut seq = Sequence::new();

        transmitter
            .expect_transmit()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|_| Err(TransmitError::Transport(anyhow::anyhow!("connection refused"))));

        // Once transmission works again, stop the loop from inside.
        let cancel = ctx.clone();
        transmitter
            .expect_transmit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| {
                cancel.cancel();
                Ok(())
            });

        run_simulator(ctx, fast_config(), transmitter).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejections_do_not_stop_the_loop() {
        let ctx = CancellationToken::new();
        let mut transmitter = MockTelemetryTransmitter::new();
        let mut seq = Sequence::new();

        transmitter
            .expect_transmit()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(TransmitError::Rejected("missing timestamp".to_string())));

        let cancel = ctx.clone();
        transmitter
            .expect_transmit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| {
                cancel.cancel();
                Ok(())
            });

        run_simulator(ctx, fast_config(), transmitter).await.unwrap();
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_transmits_nothing() {
        let ctx = CancellationToken::new();
        ctx.cancel();

        let mut transmitter = MockTelemetryTransmitter::new();
        transmitter.expect_transmit().times(0);

        run_simulator(ctx, fast_config(), transmitter).await.unwrap();
    }

    #[test]
    fn test_synthesized_readings_stay_inside_bands() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let reading = synthesize_reading("THERMO-001", &mut rng);
            assert_eq!(reading.device_id, "THERMO-001");
            assert!((20.0..=30.0).contains(&reading.temperature));
            assert!((40.0..=60.0).contains(&reading.humidity));
            // Values carry at most two decimal places.
            assert_eq!(reading.temperature, round2(reading.temperature));
            assert_eq!(reading.humidity, round2(reading.humidity));
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(24.567), 24.57);
        assert_eq!(round2(24.564), 24.56);
        assert_eq!(round2(24.0), 24.0);
    }
}

use std::time::Duration;

use clap::{Parser, ValueEnum};
use sentinel_runner::Runner;
use sentinel_simulator::{run_simulator, GrpcTransmitter, HttpTransmitter, SimulatorConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Protocol {
    Grpc,
    Http,
}

/// Synthetic telemetry producer that exercises the gateway.
#[derive(Debug, Parser)]
#[command(name = "sentinel-simulator")]
struct Args {
    /// Protocol used to reach the gateway
    #[arg(long, value_enum, default_value = "grpc")]
    protocol: Protocol,

    /// Gateway address: a gRPC endpoint URI, or the HTTP base URL when
    /// --protocol http is selected
    #[arg(long, default_value = "http://127.0.0.1:50051")]
    target: String,

    /// Device id stamped on every synthesized reading
    #[arg(long, default_value = "THERMO-001")]
    device_id: String,

    /// Seconds between transmissions
    #[arg(long, default_value_t = 5)]
    interval_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        protocol = ?args.protocol,
        target = %args.target,
        "Starting telemetry simulator"
    );

    let config = SimulatorConfig {
        device_id: args.device_id,
        interval: Duration::from_secs(args.interval_secs),
    };

    match args.protocol {
        Protocol::Grpc => {
            let transmitter = match GrpcTransmitter::new(args.target) {
                Ok(transmitter) => transmitter,
                Err(e) => {
                    eprintln!("Failed to create gRPC transmitter: {}", e);
                    std::process::exit(1);
                }
            };
            Runner::new()
                .with_named_process("telemetry_simulator", move |ctx| {
                    run_simulator(ctx, config, transmitter)
                })
                .run()
                .await;
        }
        Protocol::Http => {
            let transmitter = match HttpTransmitter::new(&args.target) {
                Ok(transmitter) => transmitter,
                Err(e) => {
                    eprintln!("Failed to create HTTP transmitter: {}", e);
                    std::process::exit(1);
                }
            };
            Runner::new()
                .with_named_process("telemetry_simulator", move |ctx| {
                    run_simulator(ctx, config, transmitter)
                })
                .run()
                .await;
        }
    }
}

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use config::ServiceConfig;
use sentinel_domain::{ReadingService, ReadingServiceConfig};
use sentinel_gateway::grpc::GrpcServerConfig;
use sentinel_gateway::http::HttpServerConfig;
use sentinel_gateway::TelemetryGateway;
use sentinel_postgres::{PostgresClient, PostgresConfig, PostgresTelemetryStore};
use sentinel_runner::{ProcessFuture, Runner};
use sentinel_simulator::{run_simulator, GrpcTransmitter, HttpTransmitter, SimulatorConfig};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        grpc_port = config.grpc_port,
        http_port = config.http_port,
        simulator_enabled = config.simulator_enabled,
        "Starting sentinel-all-in-one service"
    );
    debug!("Configuration: {:?}", config);

    // Initialize the backing store
    let (postgres_client, store) = match initialize_postgres(&config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!("Failed to initialize PostgreSQL store: {:#}", e);
            std::process::exit(1);
        }
    };

    let readings = Arc::new(ReadingService::new(
        Arc::new(store),
        ReadingServiceConfig {
            reject_empty_device_id: config.reject_empty_device_id,
            recent_limit: config.recent_limit,
        },
    ));

    // Assemble the gateway and register both protocol surfaces
    let gateway = TelemetryGateway::new(
        readings,
        GrpcServerConfig {
            host: config.grpc_host.clone(),
            port: config.grpc_port,
        },
        HttpServerConfig {
            host: config.http_host.clone(),
            port: config.http_port,
        },
    );
    let (grpc_process, http_process) = gateway.into_runner_processes();

    let mut runner = Runner::new()
        .with_named_process("grpc_gateway", grpc_process)
        .with_named_process("http_gateway", http_process);

    if config.simulator_enabled {
        match build_simulator_process(&config) {
            Ok(process) => {
                runner = runner.with_named_process("telemetry_simulator", process);
            }
            Err(e) => {
                error!("Failed to initialize simulator: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    // Add cleanup handlers
    runner = runner
        .with_closer(move || async move {
            info!("Running cleanup tasks...");
            postgres_client.close();
            info!("Cleanup complete");
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(10));

    // Run the service (this will handle the exit)
    runner.run().await;
}

async fn initialize_postgres(
    config: &ServiceConfig,
) -> Result<(PostgresClient, PostgresTelemetryStore)> {
    let postgres_config = PostgresConfig {
        host: config.postgres_host.clone(),
        port: config.postgres_port,
        database: config.postgres_database.clone(),
        username: config.postgres_username.clone(),
        password: config.postgres_password.clone(),
        max_pool_size: config.postgres_max_pool_size,
    };

    let client = PostgresClient::new(&postgres_config)?;
    client.ping().await?;

    let store = PostgresTelemetryStore::new(client.clone());
    store.ensure_schema().await?;

    Ok((client, store))
}

fn build_simulator_process(
    config: &ServiceConfig,
) -> Result<Box<dyn FnOnce(CancellationToken) -> ProcessFuture + Send>> {
    let simulator_config = SimulatorConfig {
        device_id: config.simulator_device_id.clone(),
        interval: Duration::from_secs(config.simulator_interval_secs),
    };

    match config.simulator_protocol.as_str() {
        "grpc" => {
            let transmitter = GrpcTransmitter::new(config.simulator_target.clone())?;
            Ok(Box::new(move |ctx: CancellationToken| -> ProcessFuture {
                Box::pin(run_simulator(ctx, simulator_config, transmitter))
            }))
        }
        "http" => {
            let transmitter = HttpTransmitter::new(&config.simulator_target)?;
            Ok(Box::new(move |ctx: CancellationToken| -> ProcessFuture {
                Box::pin(run_simulator(ctx, simulator_config, transmitter))
            }))
        }
        other => anyhow::bail!(
            "unsupported simulator protocol {:?}, expected \"grpc\" or \"http\"",
            other
        ),
    }
}

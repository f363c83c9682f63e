use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{error, info};

use sentinel_domain::ReadingService;
use sentinel_proto::telemetry_service_server::TelemetryServiceServer;

use crate::grpc::telemetry_handler::TelemetryServiceHandler;

/// Build reflection service from the compiled descriptors
fn build_reflection_service(
) -> anyhow::Result<
    tonic_reflection::server::ServerReflectionServer<impl tonic_reflection::server::ServerReflection>,
> {
    let service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(sentinel_proto::telemetry::v1::FILE_DESCRIPTOR_SET)
        .build_v1()?;
    Ok(service)
}

/// gRPC server configuration
#[derive(Debug, Clone)]
pub struct GrpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
        }
    }
}

/// Run the gRPC server with graceful shutdown
pub async fn run_grpc_server(
    config: GrpcServerConfig,
    readings: Arc<ReadingService>,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("Starting gRPC server on {}", addr);

    let handler = TelemetryServiceHandler::new(readings);
    let reflection_service = build_reflection_service()?;

    let server = Server::builder()
        .add_service(reflection_service)
        .add_service(TelemetryServiceServer::new(handler))
        .serve_with_shutdown(addr, async move {
            cancellation_token.cancelled().await;
            info!("gRPC server shutdown signal received");
        });

    match server.await {
        Ok(_) => {
            info!("gRPC server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            error!("gRPC server error: {}", e);
            Err(e.into())
        }
    }
}

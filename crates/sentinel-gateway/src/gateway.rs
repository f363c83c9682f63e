use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use sentinel_domain::ReadingService;

use crate::grpc::{run_grpc_server, GrpcServerConfig};
use crate::http::{run_http_server, AppState, HttpServerConfig};

type ProcessFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>>;

/// The assembled gateway: both protocol surfaces over one reading service.
pub struct TelemetryGateway {
    readings: Arc<ReadingService>,
    grpc_config: GrpcServerConfig,
    http_config: HttpServerConfig,
}

impl TelemetryGateway {
    pub fn new(
        readings: Arc<ReadingService>,
        grpc_config: GrpcServerConfig,
        http_config: HttpServerConfig,
    ) -> Self {
        debug!("Initializing telemetry gateway module");
        Self {
            readings,
            grpc_config,
            http_config,
        }
    }

    /// Splits the gateway into its two runner processes, one per protocol
    /// surface.
    pub fn into_runner_processes(
        self,
    ) -> (
        impl FnOnce(CancellationToken) -> ProcessFuture,
        impl FnOnce(CancellationToken) -> ProcessFuture,
    ) {
        let grpc_readings = self.readings.clone();
        let grpc_config = self.grpc_config;
        let grpc = move |ctx: CancellationToken| -> ProcessFuture {
            Box::pin(async move { run_grpc_server(grpc_config, grpc_readings, ctx).await })
        };

        let http_state = Arc::new(AppState::new(self.readings));
        let http_config = self.http_config;
        let http = move |ctx: CancellationToken| -> ProcessFuture {
            Box::pin(async move { run_http_server(http_config, http_state, ctx).await })
        };

        (grpc, http)
    }
}

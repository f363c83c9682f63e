use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::http::handlers::AppState;
use crate::http::router::create_router;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Run the HTTP server with graceful shutdown
pub async fn run_http_server(
    config: HttpServerConfig,
    state: Arc<AppState>,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("Starting HTTP server on {}", addr);

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        cancellation_token.cancelled().await;
        info!("HTTP server shutdown signal received");
    });

    match server.await {
        Ok(_) => {
            info!("HTTP server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            error!("HTTP server error: {}", e);
            Err(e.into())
        }
    }
}

mod client;
mod config;
mod store;

pub use client::PostgresClient;
pub use config::PostgresConfig;
pub use store::PostgresTelemetryStore;

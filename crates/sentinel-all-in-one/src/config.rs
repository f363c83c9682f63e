use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // gRPC server configuration
    /// Bind host for the gRPC surface
    #[serde(default = "default_grpc_host")]
    pub grpc_host: String,

    /// Bind port for the gRPC surface
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,

    // HTTP server configuration
    /// Bind host for the HTTP surface
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// Bind port for the HTTP surface
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    // PostgreSQL configuration
    /// PostgreSQL host
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    /// PostgreSQL port
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    /// PostgreSQL database name
    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    /// PostgreSQL username
    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    /// PostgreSQL password
    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    /// Maximum connections in the PostgreSQL pool
    #[serde(default = "default_postgres_max_pool_size")]
    pub postgres_max_pool_size: usize,

    // Reading service configuration
    /// Row cap for recent-readings queries
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Reject readings whose device id is empty
    #[serde(default = "default_reject_empty_device_id")]
    pub reject_empty_device_id: bool,

    // Embedded simulator configuration
    /// Run the synthetic load generator alongside the gateway
    #[serde(default = "default_simulator_enabled")]
    pub simulator_enabled: bool,

    /// Protocol the simulator transmits over ("grpc" or "http")
    #[serde(default = "default_simulator_protocol")]
    pub simulator_protocol: String,

    /// Gateway endpoint the simulator targets; must match the chosen protocol
    #[serde(default = "default_simulator_target")]
    pub simulator_target: String,

    /// Device id stamped on simulated readings
    #[serde(default = "default_simulator_device_id")]
    pub simulator_device_id: String,

    /// Seconds between simulated transmissions
    #[serde(default = "default_simulator_interval_secs")]
    pub simulator_interval_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

// gRPC defaults
fn default_grpc_host() -> String {
    "0.0.0.0".to_string()
}

fn default_grpc_port() -> u16 {
    50051
}

// HTTP defaults
fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

// PostgreSQL defaults
fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "sentinel".to_string()
}

fn default_postgres_username() -> String {
    "sentinel".to_string()
}

fn default_postgres_password() -> String {
    "sentinel".to_string()
}

fn default_postgres_max_pool_size() -> usize {
    5
}

// Reading service defaults
fn default_recent_limit() -> usize {
    50
}

fn default_reject_empty_device_id() -> bool {
    false
}

// Simulator defaults
fn default_simulator_enabled() -> bool {
    true
}

fn default_simulator_protocol() -> String {
    "grpc".to_string()
}

fn default_simulator_target() -> String {
    "http://127.0.0.1:50051".to_string()
}

fn default_simulator_device_id() -> String {
    "THERMO-001".to_string()
}

fn default_simulator_interval_secs() -> u64 {
    5
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("SENTINEL"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure tests run serially and don't interfere with each other
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        // Clear any existing SENTINEL_ environment variables
        std::env::remove_var("SENTINEL_LOG_LEVEL");
        std::env::remove_var("SENTINEL_HTTP_PORT");
        std::env::remove_var("SENTINEL_POSTGRES_DATABASE");
        std::env::remove_var("SENTINEL_SIMULATOR_ENABLED");
        std::env::remove_var("SENTINEL_SIMULATOR_PROTOCOL");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.grpc_port, 50051);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.postgres_database, "sentinel");
        assert_eq!(config.recent_limit, 50);
        assert!(!config.reject_empty_device_id);
        assert!(config.simulator_enabled);
        assert_eq!(config.simulator_protocol, "grpc");
        assert_eq!(config.simulator_device_id, "THERMO-001");
        assert_eq!(config.simulator_interval_secs, 5);
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::set_var("SENTINEL_LOG_LEVEL", "debug");
        std::env::set_var("SENTINEL_HTTP_PORT", "9090");
        std::env::set_var("SENTINEL_POSTGRES_DATABASE", "telemetry");
        std::env::set_var("SENTINEL_SIMULATOR_ENABLED", "false");
        std::env::set_var("SENTINEL_SIMULATOR_PROTOCOL", "http");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.postgres_database, "telemetry");
        assert!(!config.simulator_enabled);
        assert_eq!(config.simulator_protocol, "http");

        // Clean up
        std::env::remove_var("SENTINEL_LOG_LEVEL");
        std::env::remove_var("SENTINEL_HTTP_PORT");
        std::env::remove_var("SENTINEL_POSTGRES_DATABASE");
        std::env::remove_var("SENTINEL_SIMULATOR_ENABLED");
        std::env::remove_var("SENTINEL_SIMULATOR_PROTOCOL");
    }
}

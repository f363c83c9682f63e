//! The ingestion gateway: one gRPC surface and one HTTP surface, both
//! feeding the same [`sentinel_domain::ReadingService`].
//!
//! The two protocols deliberately report persistence failures differently.
//! The gRPC path always answers with a `TelemetryResponse` envelope and
//! carries failures in its `success`/`message` fields; the HTTP ingestion
//! path maps them to error status codes. Callers of each protocol must
//! inspect the surface they talked to.

pub mod gateway;
pub mod grpc;
pub mod http;

pub use gateway::*;

//! Synthetic load generator for the telemetry gateway.
//!
//! Synthesizes plausible environmental readings on a fixed interval and
//! transmits them through one configured protocol, forever, until cancelled.
//! Transmission failures are logged and never stop the loop; there is no
//! backoff and no retry beyond the next scheduled iteration.

pub mod grpc;
pub mod http;
pub mod simulator;
pub mod transmitter;

pub use grpc::*;
pub use http::*;
pub use simulator::*;
pub use transmitter::*;

//! Generated types for the telemetry wire protocol.
//!
//! The proto sources live under `proto/`; `tonic-build` compiles them at
//! build time. Both the gateway (server) and the simulator (client) consume
//! this crate.

pub mod telemetry {
    pub mod v1 {
        tonic::include_proto!("sentinel.telemetry.v1");

        /// Encoded descriptors for the gRPC reflection service.
        pub const FILE_DESCRIPTOR_SET: &[u8] =
            tonic::include_file_descriptor_set!("telemetry_descriptor");
    }
}

pub use telemetry::v1::*;

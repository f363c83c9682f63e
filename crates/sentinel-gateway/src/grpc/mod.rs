pub mod conversions;
pub mod server;
pub mod telemetry_handler;

pub use conversions::*;
pub use server::*;
pub use telemetry_handler::*;

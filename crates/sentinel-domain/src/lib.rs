pub mod error;
pub mod memory;
pub mod reading;
pub mod service;
pub mod store;

pub use error::{DomainError, DomainResult};
pub use memory::InMemoryTelemetryStore;
pub use reading::{PersistedReading, Reading};
pub use service::{ReadingService, ReadingServiceConfig};
pub use store::TelemetryStore;

#[cfg(any(test, feature = "testing"))]
pub use store::MockTelemetryStore;

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::reading::{PersistedReading, Reading};

/// Persistence contract the gateway depends on. Implementations provide
/// their own concurrency control; the gateway never serializes appends
/// itself.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Persist one reading and return it with its assigned id. The id is
    /// assigned exactly once and never reused.
    ///
    /// Fails with `StoreUnavailable` when the backing medium cannot be
    /// reached and `ConstraintViolation` when the schema rejects the value.
    async fn append(&self, reading: Reading) -> DomainResult<PersistedReading>;

    /// The most recent readings ordered by `recorded_at` descending, at most
    /// `limit` of them. Returns fewer when fewer exist; ties fall back to
    /// the store's natural order. A successful `append` is visible to every
    /// `recent` call issued after it returns.
    async fn recent(&self, limit: usize) -> DomainResult<Vec<PersistedReading>>;
}

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Wire input could not be turned into a canonical reading. Never
    /// reaches the store.
    #[error("Malformed reading: {0}")]
    Translation(String),

    /// The backing store could not be reached.
    #[error("Telemetry store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    /// The store's schema rejected the value.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl DomainError {
    /// True for failures that originate in the store rather than in
    /// translation.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable(_) | DomainError::ConstraintViolation(_)
        )
    }
}

//! Domain error model.

use thiserror::Error;

use crate::id::Sku;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures.
/// Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No batch in the candidate stock could satisfy the requested line.
    #[error("out of stock for sku {sku}")]
    OutOfStock {
        /// The SKU that could not be allocated.
        sku: Sku,
    },
}

impl DomainError {
    pub fn out_of_stock(sku: impl Into<Sku>) -> Self {
        Self::OutOfStock { sku: sku.into() }
    }
}

//! Error handling module for the bundle builder
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Engine operations fail with [`InvalidArgument`]; everything that touches the
//! outside world (files, terminal, configuration) uses [`BuilderError`].

use crate::types::{BundleId, ProductId, StepId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Precondition violations reported by the selection, navigation, pricing and
/// authoring operations.
///
/// These are programmer or configuration errors. They are surfaced to the
/// immediate caller and never recovered from silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    /// Step id does not belong to the bundle (or selection state)
    #[error("step {step} is not part of this bundle")]
    UnknownStep { step: StepId },

    /// Product is not offered by the step it was picked from
    #[error("product {product} is not offered by step {step}")]
    ProductNotInStep { product: ProductId, step: StepId },

    /// Product id is unknown to the catalog
    #[error("product {product} does not exist in the catalog")]
    UnknownProduct { product: ProductId },

    /// Bundle id is unknown to the catalog
    #[error("bundle {bundle} does not exist in the catalog")]
    UnknownBundle { bundle: BundleId },

    /// A shopping session needs at least one step
    #[error("bundle {bundle} has no steps")]
    EmptyBundle { bundle: BundleId },

    /// Step capacity must be at least one
    #[error("step {step} allows {value} selections (must be at least 1)")]
    InvalidMaxSelections { step: StepId, value: u32 },

    /// Two steps share an id
    #[error("step id {step} is used more than once")]
    DuplicateStep { step: StepId },

    /// No step id is left above the current maximum
    #[error("bundle {bundle} has no free step id after {last}")]
    StepIdsExhausted { bundle: BundleId, last: StepId },

    /// Two bundles share an id
    #[error("bundle id {bundle} is used more than once")]
    DuplicateBundle { bundle: BundleId },

    /// A step offers the same product twice
    #[error("step {step} offers product {product} more than once")]
    DuplicateProduct { step: StepId, product: ProductId },

    /// Prices and fixed amounts cannot be negative
    #[error("{what} cannot be negative (got {value})")]
    NegativeAmount { what: &'static str, value: Decimal },

    /// Percentage rates are bounded to 0..=100
    #[error("discount rate {rate} is outside 0..=100")]
    RateOutOfRange { rate: Decimal },

    /// Tier thresholds must be strictly increasing by item count
    #[error("tier threshold {min_items} does not increase on previous threshold {previous}")]
    NonIncreasingTiers { previous: u32, min_items: u32 },
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, InvalidArgument>;

/// Main error type for the bundle builder application
#[derive(Error, Debug)]
pub enum BuilderError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog errors (missing bundle, inconsistent file)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Engine precondition violations
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, BuilderError>;

// Convenient error constructors
impl BuilderError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuilderError::config("scale too large");
        assert_eq!(err.to_string(), "Configuration error: scale too large");

        let err = InvalidArgument::ProductNotInStep {
            product: ProductId(301),
            step: StepId(1),
        };
        assert_eq!(err.to_string(), "product 301 is not offered by step 1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BuilderError = io_err.into();
        assert!(matches!(err, BuilderError::Io(_)));
    }

    #[test]
    fn test_invalid_argument_conversion() {
        let err: BuilderError = InvalidArgument::UnknownStep { step: StepId(9) }.into();
        assert!(matches!(
            err,
            BuilderError::InvalidArgument(InvalidArgument::UnknownStep { .. })
        ));
        assert!(err.to_string().contains("step 9"));
    }
}

//! Error types for the deck model.

use thiserror::Error;

/// Errors raised while validating segments or building a solid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Segment data cannot describe a deck (too few segments, or a
    /// dimension that must be positive is not).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A reinforcement zone names a zone or span the deck lacks, or has a
    /// bar size that is not positive.
    #[error("invalid reinforcement: {0}")]
    InvalidReinforcement(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

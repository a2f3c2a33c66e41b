//! Error types for sectioning.

use thiserror::Error;

/// Errors raised while cutting a solid with a plane.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionError {
    /// The plane normal is zero or not finite.
    #[error("degenerate section plane: normal {0:?} has no direction")]
    DegeneratePlane([f64; 3]),
}

/// Result type for section operations.
pub type Result<T> = std::result::Result<T, SectionError>;

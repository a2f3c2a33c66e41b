//! Error types for view generation.

use slabdeck_model::ModelError;
use slabdeck_section::SectionError;
use thiserror::Error;

/// Errors raised while producing a view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// The segment list could not be turned into a solid.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Slicing failed.
    #[error(transparent)]
    Section(#[from] SectionError),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;

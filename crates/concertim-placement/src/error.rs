//! Placement error types.

use thiserror::Error;

/// Errors raised while choosing a template or a rack slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("template {0:?} has no known size class")]
    UnknownSizeClass(String),

    #[error("no template matched and the default needs at least 2 templates, found {available}")]
    TooFewTemplates { available: usize },
}

pub type PlacementResult<T> = Result<T, PlacementError>;

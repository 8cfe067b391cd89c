//! Error types for Voronoi map generation

use std::fmt;

/// Errors that can occur during diagram construction, graph building or queries
#[derive(Debug, Clone, PartialEq)]
pub enum VoronoiError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Input sites or bounds cannot be used (non-finite coordinates, inverted rectangle)
    InvalidInput(String),
    /// A site list was queried before `sort()` ran
    NotSorted,
    /// Requested region ID does not exist
    RegionNotFound(usize),
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            VoronoiError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            VoronoiError::NotSorted => write!(f, "site list must be sorted before it is iterated"),
            VoronoiError::RegionNotFound(id) => write!(f, "region not found: {}", id),
        }
    }
}

impl std::error::Error for VoronoiError {}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

//! Grid parameters and line classification.

/// Cell/group/cluster classification of line indices.
pub mod classify;
/// Validated grid configuration.
pub mod config;

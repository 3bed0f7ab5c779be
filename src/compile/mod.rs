//! Backend-agnostic compilation of a grid configuration into stroke passes.

/// Stroke plan types and the grid compiler.
pub mod plan;

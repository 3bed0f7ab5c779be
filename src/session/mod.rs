//! Session-oriented grid rendering.

/// Current-generation owner with fingerprint-based recompose skipping.
pub mod grid_session;

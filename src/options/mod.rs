//! Host option boundary.
//!
//! Turns the dialog's option state plus the host palette into a resolved [`crate::GridConfig`],
//! and describes which controls are editable for a given option state.

/// Option state, color choices and resolution.
pub mod grid_options;
/// Declarative enablement rules.
pub mod rules;

//! Cross-module tests.
//!
//! - `integration.rs`: editor sessions driving the history, the tileset and
//!   the collision map together
//! - `helpers.rs`: shared fixtures

mod helpers;

// Re-export for convenience
pub use helpers::*;

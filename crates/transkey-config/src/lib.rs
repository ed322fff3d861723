//! Resolver options and layered option loading.
//!
//! This crate owns the separator/behaviour option schema, its validation, and
//! the layer-merging logic used by the key engine and the command-line tool.

mod error;
mod loader;
mod model;

/// Public error type returned by option loading and validation APIs.
pub use error::ConfigError;
/// Resolver option models.
pub use model::*;

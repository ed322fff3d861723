//! Error types for the key engine.

use thiserror::Error;

/// Recoverable lookup failures.
///
/// Neither variant is fatal: the calling layer decides whether to show a
/// default value, echo the key, or return null.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No candidate key exists after plural, context and namespace expansion.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
    /// A context was supplied but only the context-free key exists.
    #[error("no variant of '{key}' matches context '{context}'")]
    InvalidContextMatch { key: String, context: String },
}

/// Errors returned while building a resource schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing a resource document failed.
    #[error("failed to parse resources: {0}")]
    ParseFailed(#[from] json5::Error),
    /// A node has a shape the schema cannot represent.
    #[error("invalid resources at {path}: {message}")]
    InvalidNode { path: String, message: String },
}

/// A plural category name outside the CLDR set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown plural category: {0}")]
pub struct ParsePluralCategoryError(pub String);

//! Key resolution and placeholder inference over translation resources.
//!
//! This crate walks a nested resource schema to enumerate the valid lookup
//! keys, resolves requested keys (namespace-qualified, prefix-scoped,
//! context-qualified or pluralized) back to their values, and extracts the
//! interpolation parameters those values require.

pub mod context;
pub mod engine;
pub mod error;
pub mod interpolation;
pub mod keys;
pub mod namespace;
pub mod plural;
pub mod schema;
pub mod value;

/// Engine facade and lookup results.
pub use engine::{
    DetailedResult, FallbackValue, KeyEngine, LookupOutput, Parameters, Resolution, UsedParams,
};
pub use error::{ParsePluralCategoryError, ResolveError, SchemaError};
pub use interpolation::{Interpolator, Placeholder};
pub use keys::{KeySet, enumerate_keys};
pub use namespace::{Candidate, LookupOptions, LookupScope, NamespaceResolver};
pub use plural::{PluralCategory, PluralRules, PluralSuffixes};
pub use schema::{Node, ResourceSchema};
pub use value::{ResolvedLeaf, ResolvedValue};

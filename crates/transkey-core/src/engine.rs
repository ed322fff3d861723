//! Lookup surface tying the resolver stages together.
//!
//! # Invariants
//!
//! 1. **Snapshot reads**: every operation reads the schema once at entry, so
//!    a concurrent [`KeyEngine::replace_schema`] never produces a mix of old
//!    and new trees within one lookup.
//!
//! 2. **Deterministic order**: a namespace-qualified key is tried first and
//!    alone; plain keys walk the primary namespaces, then the fallback chain,
//!    each in configured order. The first hit wins.
//!
//! 3. **Open mode**: without any schema every key is accepted and yields
//!    [`ResolvedValue::Unconstrained`] with unconstrained parameters. Once a
//!    schema is loaded, a namespace it lacks holds no keys at all.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | No candidate exists | `ResolveError::KeyNotFound` |
//! | Unloaded namespace | Schema lacks the candidate's namespace | Candidate skipped |
//! | Unknown key prefix | Prefix names no object of the first namespace | Empty key set; check with `is_valid_key_prefix` |
//! | Wrong context | Only the context-free key exists | `ResolveError::InvalidContextMatch` |
//! | Object without return-objects | Key names a branch or array | `ResolveError::KeyNotFound` |
//! | Unterminated placeholder | `{{name` | Token skipped, scan continues |

use crate::context::append_context;
use crate::error::ResolveError;
use crate::interpolation::Interpolator;
use crate::keys::{KeySet, enumerate_keys};
use crate::namespace::{Candidate, LookupOptions, LookupScope, NamespaceResolver};
use crate::plural::{PluralCategory, PluralRules};
use crate::schema::ResourceSchema;
use crate::value::{self, ResolvedValue};
use log::{debug, info};
use parking_lot::RwLock;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::sync::Arc;
use transkey_config::{ConfigError, ResolverOptions};

/// Parameter name that receives the request's count.
const COUNT_PARAMETER: &str = "count";

/// Interpolation parameters required by a resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Parameters {
    /// The value is unknown, so any parameters are accepted.
    Unconstrained,
    Required(BTreeSet<String>),
}

impl Parameters {
    /// Required names, or `None` when unconstrained.
    pub fn names(&self) -> Option<&BTreeSet<String>> {
        match self {
            Parameters::Unconstrained => None,
            Parameters::Required(names) => Some(names),
        }
    }
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Key inside the winning namespace, prefix applied, before context and
    /// plural expansion.
    pub used_key: String,
    /// Key that actually matched, with context and plural suffix.
    pub exact_used_key: String,
    pub used_ns: String,
    pub used_lng: String,
    pub value: ResolvedValue,
    pub parameters: Parameters,
    /// Count supplied with the request.
    pub count: Option<i64>,
}

impl Resolution {
    /// Detailed record in the shape callers serialize.
    pub fn into_details(self) -> DetailedResult {
        DetailedResult {
            used_key: self.used_key,
            res: self.value,
            exact_used_key: self.exact_used_key,
            used_lng: self.used_lng,
            used_ns: self.used_ns,
            used_params: UsedParams {
                parameters: self.parameters,
                count: self.count,
            },
        }
    }
}

/// Parameters used for interpolation, merged with the optional count.
///
/// Serializes as one flat record: every required name maps to `null`
/// (no values are known at this layer) and `count` carries the request's
/// count when one was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedParams {
    pub parameters: Parameters,
    pub count: Option<i64>,
}

impl Serialize for UsedParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_map(None)?;
        for name in self.parameters.names().into_iter().flatten() {
            if name == COUNT_PARAMETER && self.count.is_some() {
                continue;
            }
            record.serialize_entry(name, &())?;
        }
        if let Some(count) = self.count {
            record.serialize_entry(COUNT_PARAMETER, &count)?;
        }
        record.end()
    }
}

/// Detailed lookup result, returned when `return_details` is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResult {
    pub used_key: String,
    pub res: ResolvedValue,
    pub exact_used_key: String,
    pub used_lng: String,
    #[serde(rename = "usedNS")]
    pub used_ns: String,
    pub used_params: UsedParams,
}

/// Plain value or detailed record, depending on `return_details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutput {
    Value(ResolvedValue),
    Detailed(DetailedResult),
}

/// Display fallback for a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackValue {
    /// `return_null` is configured.
    Null,
    /// The caller supplied a default value.
    Default(String),
    /// Echo the requested key.
    Key(String),
}

/// Key engine over one resource schema.
///
/// Options are fixed at construction. The schema may be replaced as a whole
/// at any time; lookups are read-only and may run concurrently.
pub struct KeyEngine {
    options: ResolverOptions,
    interpolator: Interpolator,
    schema: RwLock<Option<Arc<ResourceSchema>>>,
    plural_rules: Option<Arc<dyn PluralRules>>,
}

impl std::fmt::Debug for KeyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEngine")
            .field("options", &self.options)
            .field("schema", &self.schema.read().is_some())
            .field("plural_rules", &self.plural_rules.is_some())
            .finish()
    }
}

impl KeyEngine {
    /// Create an engine; `None` runs in open mode.
    pub fn new(
        options: ResolverOptions,
        schema: Option<ResourceSchema>,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        info!(
            "key engine created (schema={}, default_ns={:?})",
            schema.is_some(),
            options.default_ns.as_slice()
        );
        Ok(Self {
            interpolator: Interpolator::new(
                options.interpolation_prefix.clone(),
                options.interpolation_suffix.clone(),
            ),
            options,
            schema: RwLock::new(schema.map(Arc::new)),
            plural_rules: None,
        })
    }

    /// Install the collaborator that maps counts to plural categories.
    pub fn with_plural_rules(mut self, rules: Arc<dyn PluralRules>) -> Self {
        self.plural_rules = Some(rules);
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Current schema snapshot.
    pub fn schema(&self) -> Option<Arc<ResourceSchema>> {
        self.schema.read().clone()
    }

    /// Swap the whole schema; lookups already running keep their snapshot.
    pub fn replace_schema(&self, schema: Option<ResourceSchema>) {
        info!("replacing resource schema (present={})", schema.is_some());
        *self.schema.write() = schema.map(Arc::new);
    }

    /// Valid keys of one namespace.
    pub fn enumerate_keys(&self, namespace: &str, with_return_objects: bool) -> KeySet {
        let schema = self.schema();
        enumerate_keys(
            schema.as_deref(),
            namespace,
            with_return_objects,
            &self.options,
        )
    }

    /// Keys a caller may pass for `scope` and `options`.
    ///
    /// Prefix-scoped plain keys of every primary and fallback namespace, plus
    /// namespace-qualified keys of the primary namespaces, all presented
    /// without the context token when a context is given.
    pub fn valid_keys(&self, scope: &LookupScope, options: &LookupOptions) -> KeySet {
        let schema = self.schema();
        let resolver = NamespaceResolver::new(&self.options);
        let with_objects = self.return_objects(options);
        let prefix = scope.key_prefix.as_deref();
        let key_separator = self.options.key_separator.as_str();

        let scoped = |namespace: &str| {
            enumerate_keys(schema.as_deref(), namespace, with_objects, &self.options)
                .scope_prefix(prefix, key_separator)
        };

        let mut keys = KeySet::default();
        for namespace in resolver.search_order(scope, options) {
            keys = keys.union(scoped(&namespace));
        }
        if let Some(ns_separator) = self.options.ns_separator.as_str() {
            for namespace in resolver.primary_namespaces(scope, options) {
                keys = keys.union(scoped(&namespace).qualify(&namespace, ns_separator));
            }
        }
        keys.filter_context(options.context_token(), &self.options.context_separator)
    }

    pub fn is_valid_key(&self, scope: &LookupScope, key: &str, options: &LookupOptions) -> bool {
        self.valid_keys(scope, options).contains(key)
    }

    /// Key prefixes usable with `scope`: every return-objects key of the
    /// first primary namespace.
    pub fn valid_key_prefixes(&self, scope: &LookupScope, options: &LookupOptions) -> KeySet {
        let resolver = NamespaceResolver::new(&self.options);
        match resolver.primary_namespaces(scope, options).first() {
            Some(namespace) => self.enumerate_keys(namespace, true),
            None => KeySet::default(),
        }
    }

    pub fn is_valid_key_prefix(
        &self,
        scope: &LookupScope,
        prefix: &str,
        options: &LookupOptions,
    ) -> bool {
        self.valid_key_prefixes(scope, options).contains(prefix)
    }

    /// Ordered namespace candidates for `key`.
    pub fn resolve_candidates(
        &self,
        scope: &LookupScope,
        key: &str,
        options: &LookupOptions,
    ) -> Vec<Candidate> {
        NamespaceResolver::new(&self.options).candidates(scope, key, options)
    }

    /// Resolve the first of `keys` that exists.
    ///
    /// When none resolves, the error of the last key is returned.
    pub fn lookup(
        &self,
        scope: &LookupScope,
        keys: &[&str],
        options: &LookupOptions,
    ) -> Result<Resolution, ResolveError> {
        let schema = self.schema();
        let mut last_error = None;
        for key in keys {
            match self.lookup_key(schema.as_deref(), scope, key, options) {
                Ok(resolution) => return Ok(resolution),
                Err(err) => {
                    debug!("lookup miss: {err}");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ResolveError::KeyNotFound { key: String::new() }))
    }

    /// Lookup returning a plain value, or the detailed record when requested.
    pub fn translate(
        &self,
        scope: &LookupScope,
        keys: &[&str],
        options: &LookupOptions,
    ) -> Result<LookupOutput, ResolveError> {
        let resolution = self.lookup(scope, keys, options)?;
        if options.return_details {
            Ok(LookupOutput::Detailed(resolution.into_details()))
        } else {
            Ok(LookupOutput::Value(resolution.value))
        }
    }

    /// Parameters the caller must supply for `key`.
    pub fn required_parameters(
        &self,
        scope: &LookupScope,
        key: &str,
        options: &LookupOptions,
    ) -> Result<Parameters, ResolveError> {
        self.lookup(scope, &[key], options)
            .map(|resolution| resolution.parameters)
    }

    /// Parameter names in a string value.
    pub fn extract_parameters(&self, value: &str) -> BTreeSet<String> {
        self.interpolator.extract_parameters(value)
    }

    /// What to show for `key` when its lookup failed.
    pub fn fallback_for(&self, key: &str, options: &LookupOptions) -> FallbackValue {
        if self.options.return_null {
            FallbackValue::Null
        } else if let Some(default) = &options.default_value {
            FallbackValue::Default(default.clone())
        } else {
            FallbackValue::Key(key.to_string())
        }
    }

    fn return_objects(&self, options: &LookupOptions) -> bool {
        self.options.return_objects || options.return_objects
    }

    /// Explicit category first, then the installed rules for a count.
    fn plural_category(&self, options: &LookupOptions) -> Option<PluralCategory> {
        options.plural.or_else(|| {
            let count = options.count?;
            let rules = self.plural_rules.as_ref()?;
            Some(rules.category(count, options.ordinal))
        })
    }

    fn lookup_key(
        &self,
        schema: Option<&ResourceSchema>,
        scope: &LookupScope,
        key: &str,
        options: &LookupOptions,
    ) -> Result<Resolution, ResolveError> {
        let resolver = NamespaceResolver::new(&self.options);
        let candidates = resolver.candidates(scope, key, options);
        let category = self.plural_category(options);
        let return_objects = self.return_objects(options);
        let context = options.context_token();
        let language = schema
            .map(ResourceSchema::language)
            .unwrap_or(crate::schema::DEFAULT_LANGUAGE);

        for candidate in &candidates {
            let contextual = append_context(&candidate.key, context, &self.options.context_separator);
            let Some(schema) = schema else {
                debug!(
                    "no schema loaded, accepting key (ns={}, key={contextual})",
                    candidate.namespace
                );
                return Ok(Resolution {
                    used_key: candidate.key.clone(),
                    exact_used_key: contextual,
                    used_ns: candidate.namespace.clone(),
                    used_lng: language.to_string(),
                    value: ResolvedValue::Unconstrained,
                    parameters: Parameters::Unconstrained,
                    count: options.count,
                });
            };
            let Some(root) = schema.namespace(&candidate.namespace) else {
                debug!("namespace not loaded (ns={})", candidate.namespace);
                continue;
            };
            let Ok(leaf) =
                value::resolve(root, &contextual, category, return_objects, &self.options)
            else {
                continue;
            };
            debug!(
                "resolved key (ns={}, key={}, exact={})",
                candidate.namespace, candidate.key, leaf.exact_key
            );
            let parameters = match &leaf.value {
                ResolvedValue::Text(text) => {
                    Parameters::Required(self.interpolator.extract_parameters(text))
                }
                _ => Parameters::Required(BTreeSet::new()),
            };
            return Ok(Resolution {
                used_key: candidate.key.clone(),
                exact_used_key: leaf.exact_key,
                used_ns: candidate.namespace.clone(),
                used_lng: language.to_string(),
                value: leaf.value,
                parameters,
                count: options.count,
            });
        }

        if let (Some(context), Some(schema)) = (context, schema) {
            let bare_exists = candidates.iter().any(|candidate| {
                schema.namespace(&candidate.namespace).is_some_and(|root| {
                    value::resolve(root, &candidate.key, category, return_objects, &self.options)
                        .is_ok()
                })
            });
            if bare_exists {
                return Err(ResolveError::InvalidContextMatch {
                    key: key.to_string(),
                    context: context.to_string(),
                });
            }
        }

        Err(ResolveError::KeyNotFound {
            key: key.to_string(),
        })
    }
}

//! Namespace selection, key prefixes and fallback ordering.

use crate::plural::PluralCategory;
use transkey_config::{NamespaceList, ResolverOptions};

/// Fixed lookup scope, comparable to a translation function bound to
/// namespaces and a key prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupScope {
    /// Namespaces to search; the configured default namespaces when unset.
    pub namespaces: Option<NamespaceList>,
    /// Prefix prepended to every plain key.
    pub key_prefix: Option<String>,
}

impl LookupScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespaces(mut self, namespaces: impl Into<NamespaceList>) -> Self {
        self.namespaces = Some(namespaces.into());
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Per-call lookup options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Overrides the scope namespaces for this call.
    pub ns: Option<NamespaceList>,
    pub context: Option<String>,
    /// Count reported back in the detailed result and, with plural rules
    /// installed, mapped to a category.
    pub count: Option<i64>,
    /// Explicit plural category; wins over `count`.
    pub plural: Option<PluralCategory>,
    /// Ask the plural rules for the ordinal category.
    pub ordinal: bool,
    pub return_objects: bool,
    pub return_details: bool,
    pub default_value: Option<String>,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ns(mut self, namespaces: impl Into<NamespaceList>) -> Self {
        self.ns = Some(namespaces.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn plural(mut self, category: PluralCategory) -> Self {
        self.plural = Some(category);
        self
    }

    pub fn ordinal(mut self, ordinal: bool) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn return_objects(mut self, enabled: bool) -> Self {
        self.return_objects = enabled;
        self
    }

    pub fn return_details(mut self, enabled: bool) -> Self {
        self.return_details = enabled;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Context token, treating an empty string as absent.
    pub(crate) fn context_token(&self) -> Option<&str> {
        self.context.as_deref().filter(|context| !context.is_empty())
    }
}

/// One namespace/key pair to try, before context and plural expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub namespace: String,
    /// Key inside the namespace, key prefix applied.
    pub key: String,
}

/// Turns a requested key into ordered namespace candidates.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceResolver<'a> {
    options: &'a ResolverOptions,
}

impl<'a> NamespaceResolver<'a> {
    pub fn new(options: &'a ResolverOptions) -> Self {
        Self { options }
    }

    /// Namespaces searched for plain keys: call override, then scope, then
    /// the configured default.
    pub fn primary_namespaces(&self, scope: &LookupScope, options: &LookupOptions) -> Vec<String> {
        options
            .ns
            .as_ref()
            .or(scope.namespaces.as_ref())
            .unwrap_or(&self.options.default_ns)
            .as_slice()
            .to_vec()
    }

    /// Primary namespaces followed by fallback namespaces, without repeats.
    pub fn search_order(&self, scope: &LookupScope, options: &LookupOptions) -> Vec<String> {
        let mut order = self.primary_namespaces(scope, options);
        for namespace in self.options.fallback_ns.namespaces() {
            if !order.contains(namespace) {
                order.push(namespace.clone());
            }
        }
        order
    }

    /// Split `ns<nsSeparator>rest` at the first separator.
    pub fn split_namespace<'k>(&self, key: &'k str) -> Option<(&'k str, &'k str)> {
        let separator = self.options.ns_separator.as_str()?;
        key.split_once(separator)
    }

    /// Prepend the scope's key prefix.
    pub fn apply_prefix(&self, scope: &LookupScope, key: &str) -> String {
        match scope.key_prefix.as_deref() {
            Some(prefix) => {
                let separator = self.options.key_separator.as_str().unwrap_or_default();
                format!("{prefix}{separator}{key}")
            }
            None => key.to_string(),
        }
    }

    /// Ordered candidates for `key`.
    ///
    /// A namespace-qualified key is tried in its own namespace only. A plain
    /// key is tried in every primary namespace, then along the fallback chain.
    pub fn candidates(
        &self,
        scope: &LookupScope,
        key: &str,
        options: &LookupOptions,
    ) -> Vec<Candidate> {
        if let Some((namespace, rest)) = self.split_namespace(key) {
            return vec![Candidate {
                namespace: namespace.to_string(),
                key: self.apply_prefix(scope, rest),
            }];
        }

        let key = self.apply_prefix(scope, key);
        self.search_order(scope, options)
            .into_iter()
            .map(|namespace| Candidate {
                namespace,
                key: key.clone(),
            })
            .collect()
    }
}

//! Option schema for the key engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root options for key enumeration and resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverOptions {
    #[serde(default, rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default = "default_key_separator", alias = "keySeparator")]
    pub key_separator: Separator,
    #[serde(default = "default_ns_separator", alias = "nsSeparator")]
    pub ns_separator: Separator,
    #[serde(default = "default_plural_separator", alias = "pluralSeparator")]
    pub plural_separator: String,
    #[serde(default = "default_context_separator", alias = "contextSeparator")]
    pub context_separator: String,
    #[serde(
        default = "default_interpolation_prefix",
        alias = "interpolationPrefix"
    )]
    pub interpolation_prefix: String,
    #[serde(
        default = "default_interpolation_suffix",
        alias = "interpolationSuffix"
    )]
    pub interpolation_suffix: String,
    #[serde(default, alias = "jsonFormat")]
    pub json_format: JsonFormat,
    #[serde(default, alias = "returnNull")]
    pub return_null: bool,
    #[serde(default, alias = "returnObjects")]
    pub return_objects: bool,
    #[serde(default, alias = "fallbackNS", alias = "fallbackNs")]
    pub fallback_ns: FallbackNamespace,
    #[serde(default = "default_default_ns", alias = "defaultNS", alias = "defaultNs")]
    pub default_ns: NamespaceList,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            schema: None,
            key_separator: default_key_separator(),
            ns_separator: default_ns_separator(),
            plural_separator: default_plural_separator(),
            context_separator: default_context_separator(),
            interpolation_prefix: default_interpolation_prefix(),
            interpolation_suffix: default_interpolation_suffix(),
            json_format: JsonFormat::default(),
            return_null: false,
            return_objects: false,
            fallback_ns: FallbackNamespace::default(),
            default_ns: default_default_ns(),
        }
    }
}

impl ResolverOptions {
    /// Start building options programmatically with defaults applied.
    pub fn builder() -> ResolverOptionsBuilder {
        ResolverOptionsBuilder::new()
    }
}

/// Default separator between nested key segments.
fn default_key_separator() -> Separator {
    Separator::from(".")
}

/// Default separator between a namespace and its key.
fn default_ns_separator() -> Separator {
    Separator::from(":")
}

/// Default separator in front of plural suffixes.
fn default_plural_separator() -> String {
    "_".to_string()
}

/// Default separator in front of context tokens.
fn default_context_separator() -> String {
    "_".to_string()
}

/// Default opening delimiter for interpolation placeholders.
fn default_interpolation_prefix() -> String {
    "{{".to_string()
}

/// Default closing delimiter for interpolation placeholders.
fn default_interpolation_suffix() -> String {
    "}}".to_string()
}

/// Default namespace used when a lookup names none.
fn default_default_ns() -> NamespaceList {
    NamespaceList::from("translation")
}

/// Builder for assembling `ResolverOptions` in code.
#[derive(Debug, Default, Clone)]
pub struct ResolverOptionsBuilder {
    options: ResolverOptions,
}

impl ResolverOptionsBuilder {
    /// Create a new builder seeded with default option values.
    pub fn new() -> Self {
        Self {
            options: ResolverOptions::default(),
        }
    }

    /// Replace the key separator (`Separator::Disabled` for flat keys).
    pub fn key_separator(mut self, separator: impl Into<Separator>) -> Self {
        self.options.key_separator = separator.into();
        self
    }

    /// Replace the namespace separator (`Separator::Disabled` to stop parsing `ns:key`).
    pub fn ns_separator(mut self, separator: impl Into<Separator>) -> Self {
        self.options.ns_separator = separator.into();
        self
    }

    pub fn plural_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.plural_separator = separator.into();
        self
    }

    pub fn context_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.context_separator = separator.into();
        self
    }

    /// Replace both interpolation delimiters.
    pub fn interpolation(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.options.interpolation_prefix = prefix.into();
        self.options.interpolation_suffix = suffix.into();
        self
    }

    pub fn json_format(mut self, format: JsonFormat) -> Self {
        self.options.json_format = format;
        self
    }

    pub fn return_null(mut self, enabled: bool) -> Self {
        self.options.return_null = enabled;
        self
    }

    pub fn return_objects(mut self, enabled: bool) -> Self {
        self.options.return_objects = enabled;
        self
    }

    /// Replace the fallback namespace chain.
    pub fn fallback_ns(mut self, fallback: impl Into<FallbackNamespace>) -> Self {
        self.options.fallback_ns = fallback.into();
        self
    }

    /// Replace the namespaces consulted when a lookup names none.
    pub fn default_ns(mut self, namespaces: impl Into<NamespaceList>) -> Self {
        self.options.default_ns = namespaces.into();
        self
    }

    /// Finalize and return the built `ResolverOptions`.
    pub fn build(self) -> ResolverOptions {
        self.options
    }
}

/// Resource JSON layout version.
///
/// `v4` resources carry plural forms as `key_one`/`key_other` leaves, which
/// makes the unsuffixed base key addressable as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JsonFormat {
    V3,
    #[default]
    V4,
}

/// A separator that can be switched off with `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagOrText", into = "FlagOrText")]
pub enum Separator {
    /// The feature the separator drives is turned off.
    Disabled,
    Enabled(String),
}

impl Separator {
    /// The separator text, or `None` when disabled.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Separator::Disabled => None,
            Separator::Enabled(value) => Some(value.as_str()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Separator::Enabled(_))
    }
}

impl From<&str> for Separator {
    fn from(value: &str) -> Self {
        Separator::Enabled(value.to_string())
    }
}

impl From<String> for Separator {
    fn from(value: String) -> Self {
        Separator::Enabled(value)
    }
}

impl TryFrom<FlagOrText> for Separator {
    type Error = ReprError;

    fn try_from(value: FlagOrText) -> Result<Self, Self::Error> {
        match value {
            FlagOrText::Flag(false) => Ok(Separator::Disabled),
            FlagOrText::Flag(true) => Err(ReprError("expected string or false")),
            FlagOrText::Text(text) => Ok(Separator::Enabled(text)),
        }
    }
}

impl From<Separator> for FlagOrText {
    fn from(value: Separator) -> Self {
        match value {
            Separator::Disabled => FlagOrText::Flag(false),
            Separator::Enabled(text) => FlagOrText::Text(text),
        }
    }
}

/// Namespaces searched after the primary namespaces miss a key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "FlagOrNames", into = "FlagOrNames")]
pub enum FallbackNamespace {
    #[default]
    Disabled,
    Namespaces(Vec<String>),
}

impl FallbackNamespace {
    /// Fallback namespaces in configured order (empty when disabled).
    pub fn namespaces(&self) -> &[String] {
        match self {
            FallbackNamespace::Disabled => &[],
            FallbackNamespace::Namespaces(names) => names,
        }
    }
}

impl From<&str> for FallbackNamespace {
    fn from(value: &str) -> Self {
        FallbackNamespace::Namespaces(vec![value.to_string()])
    }
}

impl From<Vec<String>> for FallbackNamespace {
    fn from(value: Vec<String>) -> Self {
        FallbackNamespace::Namespaces(value)
    }
}

impl<const N: usize> From<[&str; N]> for FallbackNamespace {
    fn from(value: [&str; N]) -> Self {
        FallbackNamespace::Namespaces(value.iter().map(|name| name.to_string()).collect())
    }
}

impl TryFrom<FlagOrNames> for FallbackNamespace {
    type Error = ReprError;

    fn try_from(value: FlagOrNames) -> Result<Self, Self::Error> {
        match value {
            FlagOrNames::Flag(false) => Ok(FallbackNamespace::Disabled),
            FlagOrNames::Flag(true) => Err(ReprError("expected string, string array or false")),
            FlagOrNames::One(name) => Ok(FallbackNamespace::Namespaces(vec![name])),
            FlagOrNames::Many(names) => Ok(FallbackNamespace::Namespaces(names)),
        }
    }
}

impl From<FallbackNamespace> for FlagOrNames {
    fn from(value: FallbackNamespace) -> Self {
        match value {
            FallbackNamespace::Disabled => FlagOrNames::Flag(false),
            FallbackNamespace::Namespaces(names) => FlagOrNames::Many(names),
        }
    }
}

/// An ordered, non-empty selection of namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagOrNames", into = "FlagOrNames")]
pub struct NamespaceList(Vec<String>);

impl NamespaceList {
    /// Build a list from any iterator of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// The first namespace, used when only one namespace is relevant.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NamespaceList {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for NamespaceList {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for NamespaceList {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[&str; N]> for NamespaceList {
    fn from(value: [&str; N]) -> Self {
        Self::new(value)
    }
}

impl TryFrom<FlagOrNames> for NamespaceList {
    type Error = ReprError;

    fn try_from(value: FlagOrNames) -> Result<Self, Self::Error> {
        match value {
            FlagOrNames::Flag(_) => Err(ReprError("expected string or string array")),
            FlagOrNames::One(name) => Ok(Self(vec![name])),
            FlagOrNames::Many(names) => Ok(Self(names)),
        }
    }
}

impl From<NamespaceList> for FlagOrNames {
    fn from(value: NamespaceList) -> Self {
        match <[String; 1]>::try_from(value.0) {
            Ok([name]) => FlagOrNames::One(name),
            Err(names) => FlagOrNames::Many(names),
        }
    }
}

/// Wire shape for `string | false` options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

/// Wire shape for `string | string[] | false` options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FlagOrNames {
    Flag(bool),
    One(String),
    Many(Vec<String>),
}

/// Conversion failure for the untagged option shapes.
#[derive(Debug, Clone, Copy)]
pub struct ReprError(&'static str);

impl fmt::Display for ReprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

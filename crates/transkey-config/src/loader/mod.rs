//! Option loading with layered overrides.
//!
//! Reads JSON5 option documents, validates their structure, merges layers in
//! order, and produces a checked `ResolverOptions`.

mod merge;
mod schema;


use crate::{ConfigError, ResolverOptions};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

impl ResolverOptions {
    /// Load options from a single JSON5 file (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading options from path: {}", path.as_ref().display());
        let label = path.as_ref().display().to_string();
        let value = read_layer(path.as_ref(), &label)?;
        options_from_value(value, &label)
    }

    /// Load options from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading options from raw contents (len={})", contents.len());
        let value = parse_layer(contents, "options")?;
        options_from_value(value, "options")
    }

    /// Load and merge option layers in order; later layers win.
    ///
    /// Objects merge recursively, every other value is replaced wholesale.
    /// A path listed twice is only applied once.
    pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen = HashSet::new();
        let mut applied = 0usize;
        for path in paths {
            let path = path.as_ref();
            if !seen.insert(path.to_path_buf()) {
                debug!("skipping duplicate layer (path={})", path.display());
                continue;
            }
            debug!("loading option layer (path={})", path.display());
            let label = path.display().to_string();
            let value = read_layer(path, &label)?;
            schema::validate_options_schema(&value, &label)?;
            merge::merge_json_values(&mut merged, &value);
            applied += 1;
        }
        let options = options_from_value(merged, "effective")?;
        info!("layered options loaded (layers={applied})");
        Ok(options)
    }

    /// Validate option invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut named: Vec<(&str, &str)> = Vec::new();
        if let Some(separator) = self.key_separator.as_str() {
            named.push(("key_separator", separator));
        }
        if let Some(separator) = self.ns_separator.as_str() {
            named.push(("ns_separator", separator));
        }
        named.push(("plural_separator", self.plural_separator.as_str()));
        named.push(("context_separator", self.context_separator.as_str()));
        named.push(("interpolation_prefix", self.interpolation_prefix.as_str()));
        named.push(("interpolation_suffix", self.interpolation_suffix.as_str()));
        for (field, value) in &named {
            if value.is_empty() {
                return Err(ConfigError::InvalidField {
                    path: (*field).to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        // Plural and context separators may coincide; structural ones may not.
        let structural = [
            ("key_separator", self.key_separator.as_str()),
            ("ns_separator", self.ns_separator.as_str()),
        ];
        for (idx, (field, value)) in structural.iter().enumerate() {
            let Some(value) = value else { continue };
            let others = structural[idx + 1..]
                .iter()
                .filter_map(|(other, sep)| sep.map(|sep| (*other, sep)))
                .chain([
                    ("plural_separator", self.plural_separator.as_str()),
                    ("context_separator", self.context_separator.as_str()),
                ]);
            for (other, other_value) in others {
                if *value == other_value {
                    return Err(ConfigError::InvalidField {
                        path: (*field).to_string(),
                        message: format!("must differ from {other}"),
                    });
                }
            }
        }

        if self.default_ns.is_empty() {
            return Err(ConfigError::InvalidField {
                path: "default_ns".to_string(),
                message: "at least one namespace is required".to_string(),
            });
        }
        let empty_name = self
            .default_ns
            .iter()
            .chain(self.fallback_ns.namespaces().iter().map(String::as_str))
            .any(str::is_empty);
        if empty_name {
            return Err(ConfigError::Invalid(
                "namespace names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn read_layer(path: &Path, label: &str) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layer(&contents, label)
}

fn parse_layer(contents: &str, label: &str) -> Result<Value, ConfigError> {
    json5::from_str(contents).map_err(|source| ConfigError::ParseFailed {
        layer: label.to_string(),
        source,
    })
}

fn options_from_value(value: Value, label: &str) -> Result<ResolverOptions, ConfigError> {
    schema::validate_options_schema(&value, label)?;
    let options: ResolverOptions = serde_json::from_value(value)?;
    options.validate()?;
    Ok(options)
}

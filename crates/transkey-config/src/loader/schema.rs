//! Structural validation for JSON5 option documents.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Option names accepted at the document root, with their camelCase aliases.
const FIELDS: &[(&str, &[&str], FieldKind)] = &[
    ("$schema", &[], FieldKind::String),
    ("key_separator", &["keySeparator"], FieldKind::StringOrFalse),
    ("ns_separator", &["nsSeparator"], FieldKind::StringOrFalse),
    ("plural_separator", &["pluralSeparator"], FieldKind::String),
    ("context_separator", &["contextSeparator"], FieldKind::String),
    (
        "interpolation_prefix",
        &["interpolationPrefix"],
        FieldKind::String,
    ),
    (
        "interpolation_suffix",
        &["interpolationSuffix"],
        FieldKind::String,
    ),
    ("json_format", &["jsonFormat"], FieldKind::JsonFormat),
    ("return_null", &["returnNull"], FieldKind::Bool),
    ("return_objects", &["returnObjects"], FieldKind::Bool),
    (
        "fallback_ns",
        &["fallbackNS", "fallbackNs"],
        FieldKind::NamespacesOrFalse,
    ),
    ("default_ns", &["defaultNS", "defaultNs"], FieldKind::Namespaces),
];

/// Expected JSON shape of a single option.
#[derive(Debug, Clone, Copy)]
enum FieldKind {
    String,
    StringOrFalse,
    Bool,
    JsonFormat,
    Namespaces,
    NamespacesOrFalse,
}

/// Validate a single option document against the schema.
pub(super) fn validate_options_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_known_keys(map, layer)?;

    for (name, aliases, kind) in FIELDS {
        let mut present = std::iter::once(*name)
            .chain(aliases.iter().copied())
            .filter(|key| map.contains_key(*key));
        let Some(first) = present.next() else {
            continue;
        };
        if let Some(second) = present.next() {
            return Err(invalid_field(
                layer,
                second,
                &format!("duplicates option {first}"),
            ));
        }
        if let Some(value) = map.get(first) {
            validate_field(value, *kind, layer, first)?;
        }
    }

    Ok(())
}

/// Dispatch validation for one option.
fn validate_field(value: &Value, kind: FieldKind, layer: &str, path: &str) -> Result<(), ConfigError> {
    match kind {
        FieldKind::String => expect_string(value, layer, path),
        FieldKind::Bool => expect_bool(value, layer, path),
        FieldKind::StringOrFalse => match value {
            Value::String(_) | Value::Bool(false) => Ok(()),
            _ => Err(invalid_field(layer, path, "expected string or false")),
        },
        FieldKind::JsonFormat => match value.as_str() {
            Some("v3") | Some("v4") => Ok(()),
            _ => Err(invalid_field(layer, path, "expected \"v3\" or \"v4\"")),
        },
        FieldKind::Namespaces => match value {
            Value::String(_) => Ok(()),
            Value::Array(_) => validate_string_array(value, layer, path),
            _ => Err(invalid_field(layer, path, "expected string or array")),
        },
        FieldKind::NamespacesOrFalse => match value {
            Value::String(_) | Value::Bool(false) => Ok(()),
            Value::Array(_) => validate_string_array(value, layer, path),
            _ => Err(invalid_field(layer, path, "expected string, array or false")),
        },
    }
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = match value {
        Value::Array(arr) => arr,
        _ => return Err(invalid_field(layer, path, "expected array")),
    };
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure the document contains only known option names.
fn ensure_known_keys(map: &Map<String, Value>, layer: &str) -> Result<(), ConfigError> {
    for key in map.keys() {
        let known = FIELDS
            .iter()
            .any(|(name, aliases, _)| name == key || aliases.contains(&key.as_str()));
        if !known {
            return Err(invalid_field(layer, key, "unknown key"));
        }
    }
    Ok(())
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}

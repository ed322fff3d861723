//! Placeholder scanning for resolved string values.

use log::warn;
use std::collections::BTreeSet;

/// A delimiter-bounded token found in a string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{{name}}` or `{{name, format}}`.
    Parameter {
        name: String,
        format: Option<String>,
        offset: usize,
    },
    /// An opening delimiter with no closing delimiter before the next opening one.
    Unterminated { offset: usize },
}

/// Scanner for one pair of interpolation delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolator {
    prefix: String,
    suffix: String,
}

impl Interpolator {
    /// Both delimiters must be non-empty; option validation guarantees it.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Every placeholder in `value`, left to right, without overlaps.
    ///
    /// An unterminated opening delimiter is reported and skipped; scanning
    /// resumes at the next opening delimiter.
    pub fn scan(&self, value: &str) -> Vec<Placeholder> {
        let mut found = Vec::new();
        if self.prefix.is_empty() || self.suffix.is_empty() {
            return found;
        }
        let mut cursor = 0;
        while let Some(relative) = value[cursor..].find(&self.prefix) {
            let start = cursor + relative;
            let inner_start = start + self.prefix.len();
            let rest = &value[inner_start..];
            match (rest.find(&self.suffix), rest.find(&self.prefix)) {
                (Some(end), Some(reopen)) if reopen < end => {
                    warn!("skipping unterminated placeholder at offset {start}");
                    found.push(Placeholder::Unterminated { offset: start });
                    cursor = inner_start + reopen;
                }
                (Some(end), _) => {
                    found.push(parameter(&rest[..end], start));
                    cursor = inner_start + end + self.suffix.len();
                }
                (None, _) => {
                    warn!("skipping unterminated placeholder at offset {start}");
                    found.push(Placeholder::Unterminated { offset: start });
                    break;
                }
            }
        }
        found
    }

    /// Names of the parameters a caller must supply for `value`.
    pub fn extract_parameters(&self, value: &str) -> BTreeSet<String> {
        self.scan(value)
            .into_iter()
            .filter_map(|placeholder| match placeholder {
                Placeholder::Parameter { name, .. } if !name.is_empty() => Some(name),
                _ => None,
            })
            .collect()
    }
}

/// Split a token body at its first comma into name and format directive.
fn parameter(body: &str, offset: usize) -> Placeholder {
    let (name, format) = match body.split_once(',') {
        Some((name, format)) => (name, Some(format.trim()).filter(|f| !f.is_empty())),
        None => (body, None),
    };
    Placeholder::Parameter {
        name: name.trim().to_string(),
        format: format.map(str::to_string),
        offset,
    }
}

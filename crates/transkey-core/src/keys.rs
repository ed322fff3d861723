//! Enumeration of the valid keys of a namespace.

use crate::context::strip_context;
use crate::plural::PluralSuffixes;
use crate::schema::{Node, ResourceSchema};
use std::collections::{BTreeMap, BTreeSet};
use transkey_config::{JsonFormat, ResolverOptions};

/// A set of valid keys, or the open set when no schema constrains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySet {
    /// Any string is accepted.
    Open,
    Closed(BTreeSet<String>),
}

impl Default for KeySet {
    fn default() -> Self {
        KeySet::Closed(BTreeSet::new())
    }
}

impl KeySet {
    pub fn contains(&self, key: &str) -> bool {
        match self {
            KeySet::Open => true,
            KeySet::Closed(keys) => keys.contains(key),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, KeySet::Open)
    }

    /// The concrete keys, or `None` for the open set.
    pub fn keys(&self) -> Option<&BTreeSet<String>> {
        match self {
            KeySet::Open => None,
            KeySet::Closed(keys) => Some(keys),
        }
    }

    /// Union of two sets; anything united with the open set is open.
    pub fn union(self, other: KeySet) -> KeySet {
        match (self, other) {
            (KeySet::Closed(mut left), KeySet::Closed(right)) => {
                left.extend(right);
                KeySet::Closed(left)
            }
            _ => KeySet::Open,
        }
    }

    /// Keep keys under `prefix` and present them without it.
    ///
    /// With a separator only `prefix + separator + rest` keys survive (as
    /// `rest`); without one the prefix is stripped verbatim.
    pub fn scope_prefix(self, prefix: Option<&str>, separator: Option<&str>) -> KeySet {
        let Some(prefix) = prefix else {
            return self;
        };
        let scope = format!("{prefix}{}", separator.unwrap_or_default());
        self.filter_map(|key| {
            key.strip_prefix(scope.as_str())
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
        })
    }

    /// Prefix every key with `namespace + separator`.
    pub fn qualify(self, namespace: &str, separator: &str) -> KeySet {
        self.filter_map(|key| Some(format!("{namespace}{separator}{key}")))
    }

    /// Present keys without the context token, dropping keys that lack it.
    pub fn filter_context(self, context: Option<&str>, separator: &str) -> KeySet {
        if context.is_none_or(str::is_empty) {
            return self;
        }
        self.filter_map(|key| strip_context(key, context, separator))
    }

    fn filter_map<F>(self, mut map: F) -> KeySet
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self {
            KeySet::Open => KeySet::Open,
            KeySet::Closed(keys) => {
                KeySet::Closed(keys.iter().filter_map(|key| map(key.as_str())).collect())
            }
        }
    }
}

impl FromIterator<String> for KeySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        KeySet::Closed(iter.into_iter().collect())
    }
}

/// All valid keys of `namespace`.
///
/// Without return-objects only string leaves are keys. With it every branch
/// and string array is a key too. In the v4 format each plural-suffixed key
/// also contributes its unsuffixed base. Without a schema the set is open; a
/// namespace the schema lacks has no keys.
pub fn enumerate_keys(
    schema: Option<&ResourceSchema>,
    namespace: &str,
    with_return_objects: bool,
    options: &ResolverOptions,
) -> KeySet {
    let Some(schema) = schema else {
        return KeySet::Open;
    };
    let Some(children) = schema.namespace(namespace).and_then(Node::as_branch) else {
        return KeySet::default();
    };

    let walker = KeyWalker {
        separator: options.key_separator.as_str(),
        with_return_objects,
        plural: (options.json_format == JsonFormat::V4)
            .then(|| PluralSuffixes::new(&options.plural_separator)),
    };
    let mut keys = BTreeSet::new();
    walker.collect(children, None, &mut keys);
    KeySet::Closed(keys)
}

struct KeyWalker<'a> {
    separator: Option<&'a str>,
    with_return_objects: bool,
    plural: Option<PluralSuffixes<'a>>,
}

impl KeyWalker<'_> {
    fn collect(
        &self,
        children: &BTreeMap<String, Node>,
        parent: Option<&str>,
        out: &mut BTreeSet<String>,
    ) {
        for (name, node) in children {
            let path = match (parent, self.separator) {
                (Some(parent), Some(separator)) => format!("{parent}{separator}{name}"),
                _ => name.clone(),
            };
            match node {
                Node::Leaf(_) => self.emit(path, out),
                Node::List(_) => {
                    if self.with_return_objects {
                        self.emit(path, out);
                    }
                }
                Node::Branch(grandchildren) => {
                    // Without a key separator nothing below the top level is addressable.
                    if self.separator.is_some() {
                        self.collect(grandchildren, Some(&path), out);
                    }
                    if self.with_return_objects {
                        self.emit(path, out);
                    }
                }
            }
        }
    }

    fn emit(&self, path: String, out: &mut BTreeSet<String>) {
        if let Some(base) = self.plural.and_then(|plural| plural.strip(&path)) {
            out.insert(base.to_string());
        }
        out.insert(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use transkey_config::Separator;

    fn schema() -> ResourceSchema {
        ResourceSchema::from_value(json!({
            "ns": {
                "title": "Title",
                "menu": { "open": "Open", "sub": { "deep": "Deep" } },
                "days": ["Mon"],
                "item_one": "one",
                "item_other": "many",
                "place_ordinal_two": "2nd",
                "friend_male": "he"
            }
        }))
        .expect("schema")
    }

    fn closed(keys: &[&str]) -> KeySet {
        keys.iter().map(|key| key.to_string()).collect()
    }

    #[test]
    fn leaves_only_without_return_objects() {
        let keys = enumerate_keys(Some(&schema()), "ns", false, &ResolverOptions::default());
        assert_eq!(
            keys,
            closed(&[
                "friend_male",
                "item",
                "item_one",
                "item_other",
                "menu.open",
                "menu.sub.deep",
                "place",
                "place_ordinal_two",
                "title",
            ])
        );
    }

    #[test]
    fn branches_and_arrays_with_return_objects() {
        let keys = enumerate_keys(Some(&schema()), "ns", true, &ResolverOptions::default());
        for key in ["menu", "menu.sub", "days", "menu.sub.deep"] {
            assert!(keys.contains(key), "missing {key}");
        }
    }

    #[test]
    fn v3_does_not_add_plural_bases() {
        let options = ResolverOptions::builder().json_format(JsonFormat::V3).build();
        let keys = enumerate_keys(Some(&schema()), "ns", false, &options);
        assert!(keys.contains("item_one"));
        assert!(!keys.contains("item"));
        assert!(!keys.contains("place"));
    }

    #[test]
    fn missing_schema_is_open_but_missing_namespace_is_empty() {
        let options = ResolverOptions::default();
        assert_eq!(enumerate_keys(None, "ns", false, &options), KeySet::Open);
        assert!(KeySet::Open.contains("anything at all"));

        let unloaded = enumerate_keys(Some(&schema()), "other", true, &options);
        assert_eq!(unloaded, KeySet::default());
        assert!(!unloaded.contains("title"));
    }

    #[test]
    fn flat_keys_when_separator_disabled() {
        let options = ResolverOptions::builder()
            .key_separator(Separator::Disabled)
            .build();
        let keys = enumerate_keys(Some(&schema()), "ns", false, &options);
        assert!(keys.contains("title"));
        assert!(!keys.contains("menu.open"));
        assert!(!keys.contains("menu"));

        let with_objects = enumerate_keys(Some(&schema()), "ns", true, &options);
        assert!(with_objects.contains("menu"));
        assert!(!with_objects.contains("menu.sub"));
    }

    #[test]
    fn prefix_scoping_and_qualification() {
        let keys = closed(&["settings.theme", "settings.font.size", "settings", "other.x"]);
        assert_eq!(
            keys.clone().scope_prefix(Some("settings"), Some(".")),
            closed(&["theme", "font.size"])
        );
        assert_eq!(keys.clone().scope_prefix(None, Some(".")), keys);
        assert_eq!(
            closed(&["a", "b"]).qualify("ns", ":"),
            closed(&["ns:a", "ns:b"])
        );
        assert_eq!(KeySet::Open.qualify("ns", ":"), KeySet::Open);
    }

    #[test]
    fn context_filter_strips_and_drops() {
        let keys = closed(&["friend_male", "friend_male_one", "friend", "title"]);
        assert_eq!(
            keys.clone().filter_context(Some("male"), "_"),
            closed(&["friend", "friend_one"])
        );
        assert_eq!(keys.clone().filter_context(None, "_"), keys);
    }

    #[test]
    fn union_with_open_is_open() {
        assert_eq!(closed(&["a"]).union(closed(&["b"])), closed(&["a", "b"]));
        assert_eq!(closed(&["a"]).union(KeySet::Open), KeySet::Open);
        assert_eq!(KeySet::default().keys().map(BTreeSet::len), Some(0));
    }
}

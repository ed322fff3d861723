//! Key path resolution inside one namespace tree.

use crate::error::ResolveError;
use crate::plural::{PluralCategory, PluralSuffixes};
use crate::schema::Node;
use serde::Serialize;
use std::collections::BTreeMap;
use transkey_config::ResolverOptions;

/// Shape of a successfully resolved key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    /// A string leaf.
    Text(String),
    /// A sub-tree, only produced in return-objects mode.
    Object(BTreeMap<String, Node>),
    /// A string array, only produced in return-objects mode.
    List(Vec<String>),
    /// No schema is loaded, so any key and any parameters are accepted.
    Unconstrained,
}

impl ResolvedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, ResolvedValue::Unconstrained)
    }
}

/// A located value and the concrete key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLeaf {
    /// Full key path including any plural suffix that matched.
    pub exact_key: String,
    pub value: ResolvedValue,
}

/// Resolve `key` against a namespace root.
///
/// Intermediate segments must be branches. At the last segment the plural
/// candidates are tried in order; a candidate holding a branch or an array is
/// skipped unless `return_objects` is set.
pub fn resolve(
    root: &Node,
    key: &str,
    category: Option<PluralCategory>,
    return_objects: bool,
    options: &ResolverOptions,
) -> Result<ResolvedLeaf, ResolveError> {
    let not_found = || ResolveError::KeyNotFound {
        key: key.to_string(),
    };

    let (head, last) = match options.key_separator.as_str() {
        Some(separator) => match key.rsplit_once(separator) {
            Some((head, last)) => (Some((head, separator)), last),
            None => (None, key),
        },
        None => (None, key),
    };

    let parent = match head {
        Some((head, separator)) => root.get_path(head.split(separator)),
        None => Some(root),
    };
    let children = parent.and_then(Node::as_branch).ok_or_else(not_found)?;

    let suffixes = PluralSuffixes::new(&options.plural_separator);
    for candidate in suffixes.expand_for_lookup(last, category) {
        let value = match children.get(&candidate) {
            Some(Node::Leaf(text)) => ResolvedValue::Text(text.clone()),
            Some(Node::Branch(tree)) if return_objects => ResolvedValue::Object(tree.clone()),
            Some(Node::List(items)) if return_objects => ResolvedValue::List(items.clone()),
            _ => continue,
        };
        let exact_key = match head {
            Some((head, separator)) => format!("{head}{separator}{candidate}"),
            None => candidate,
        };
        return Ok(ResolvedLeaf { exact_key, value });
    }

    Err(not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ResourceSchema;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use transkey_config::Separator;

    fn root() -> Node {
        let schema = ResourceSchema::from_value(json!({
            "ns": {
                "menu": {
                    "open": "Open",
                    "item_ordinal_one": "{{count}}st item",
                    "item_one": "one item",
                    "item": "item",
                    "days": ["Mon", "Tue"]
                },
                "leaf": "flat",
                "a.b": "dotted"
            }
        }))
        .expect("schema");
        schema.namespace("ns").cloned().expect("ns")
    }

    fn text(leaf: &ResolvedLeaf) -> Option<&str> {
        leaf.value.as_text()
    }

    #[test]
    fn walks_nested_branches() {
        let options = ResolverOptions::default();
        let leaf = resolve(&root(), "menu.open", None, false, &options).expect("leaf");
        assert_eq!(text(&leaf), Some("Open"));
        assert_eq!(leaf.exact_key, "menu.open");
    }

    #[test]
    fn plural_candidates_follow_specificity() {
        let options = ResolverOptions::default();
        let root = root();
        let ordinal = resolve(&root, "menu.item", Some(PluralCategory::One), false, &options)
            .expect("ordinal");
        assert_eq!(ordinal.exact_key, "menu.item_ordinal_one");

        let base = resolve(&root, "menu.item", None, false, &options).expect("base");
        assert_eq!(text(&base), Some("item"));

        let fallback = resolve(&root, "menu.item", Some(PluralCategory::Few), false, &options)
            .expect("fallback");
        assert_eq!(fallback.exact_key, "menu.item");
    }

    #[test]
    fn missing_or_leaf_intermediate_fails() {
        let options = ResolverOptions::default();
        let root = root();
        for key in ["menu.close", "nope.open", "leaf.open", "menu.open.deeper", ""] {
            assert_eq!(
                resolve(&root, key, None, false, &options),
                Err(ResolveError::KeyNotFound {
                    key: key.to_string()
                })
            );
        }
    }

    #[test]
    fn objects_need_return_objects() {
        let options = ResolverOptions::default();
        let root = root();
        assert!(resolve(&root, "menu", None, false, &options).is_err());
        assert!(resolve(&root, "menu.days", None, false, &options).is_err());

        let menu = resolve(&root, "menu", None, true, &options).expect("object");
        assert!(matches!(menu.value, ResolvedValue::Object(ref tree) if tree.contains_key("open")));
        let days = resolve(&root, "menu.days", None, true, &options).expect("list");
        assert_eq!(
            days.value,
            ResolvedValue::List(vec!["Mon".to_string(), "Tue".to_string()])
        );
    }

    #[test]
    fn disabled_key_separator_uses_flat_keys() {
        let options = ResolverOptions::builder()
            .key_separator(Separator::Disabled)
            .build();
        let root = root();
        let leaf = resolve(&root, "a.b", None, false, &options).expect("flat");
        assert_eq!(text(&leaf), Some("dotted"));
        assert!(resolve(&root, "menu.open", None, false, &options).is_err());
    }
}

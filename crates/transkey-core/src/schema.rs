//! In-memory resource schema: namespaces of nested string trees.
//!
//! A namespace root is always a branch. Leaves hold strings; arrays of
//! strings are kept as opaque list leaves and never descended into. The tree
//! is owned, so it is finite and acyclic by construction.

use crate::error::SchemaError;
use log::{debug, info};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Language label reported when a schema does not name one.
pub const DEFAULT_LANGUAGE: &str = "dev";

/// One node of a namespace tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// A final string value.
    Leaf(String),
    /// An array of strings, addressable only as a whole.
    List(Vec<String>),
    /// Named children.
    Branch(BTreeMap<String, Node>),
}

impl Node {
    /// Convert a JSON value, reporting the first unsupported node under `path`.
    pub fn from_value(value: &Value, path: &str) -> Result<Self, SchemaError> {
        match value {
            Value::String(text) => Ok(Node::Leaf(text.clone())),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    match item.as_str() {
                        Some(text) => list.push(text.to_string()),
                        None => {
                            return Err(invalid_node(
                                &format!("{path}[{idx}]"),
                                "expected string",
                            ));
                        }
                    }
                }
                Ok(Node::List(list))
            }
            Value::Object(map) => branch_from_map(map, path).map(Node::Branch),
            _ => Err(invalid_node(path, "expected string, array or object")),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Leaf(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Branch(children) => Some(children),
            _ => None,
        }
    }

    /// Direct child of a branch.
    pub fn child(&self, segment: &str) -> Option<&Node> {
        self.as_branch().and_then(|children| children.get(segment))
    }

    /// Walk a sequence of segments through nested branches.
    pub fn get_path<'s, I>(&self, segments: I) -> Option<&Node>
    where
        I: IntoIterator<Item = &'s str>,
    {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Deep-merge `other` into this node.
    ///
    /// Branches merge per key; any other collision keeps the existing value
    /// unless `overwrite` is set.
    fn merge_from(&mut self, other: Node, overwrite: bool) {
        match (self, other) {
            (Node::Branch(base), Node::Branch(overlay)) => {
                for (key, value) in overlay {
                    match base.get_mut(&key) {
                        Some(existing) => existing.merge_from(value, overwrite),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (slot, value) => {
                if overwrite {
                    *slot = value;
                }
            }
        }
    }
}

/// Resource trees for every loaded namespace of one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    language: String,
    namespaces: BTreeMap<String, Node>,
}

impl Default for ResourceSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            namespaces: BTreeMap::new(),
        }
    }

    /// Label the schema with the language its strings are written in.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Build a schema from an object of `namespace -> tree`.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(map) = value else {
            return Err(invalid_node("root", "expected object of namespaces"));
        };
        let mut schema = Self::new();
        for (namespace, tree) in map {
            schema.add_bundle(&namespace, tree, false, true)?;
        }
        info!("resource schema built (namespaces={})", schema.namespaces.len());
        Ok(schema)
    }

    /// Parse a JSON5 document of `namespace -> tree`.
    pub fn from_json5_str(contents: &str) -> Result<Self, SchemaError> {
        debug!("parsing resources (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        Self::from_value(value)
    }

    /// Add or merge one namespace tree.
    ///
    /// Without `deep`, top-level entries of `value` replace existing ones.
    /// With `deep`, branches merge recursively and existing leaves are kept
    /// unless `overwrite` is set.
    pub fn add_bundle(
        &mut self,
        namespace: &str,
        value: Value,
        deep: bool,
        overwrite: bool,
    ) -> Result<(), SchemaError> {
        let Value::Object(map) = value else {
            return Err(invalid_node(namespace, "namespace root must be an object"));
        };
        let incoming = branch_from_map(&map, namespace)?;
        debug!(
            "adding bundle (namespace={namespace}, entries={}, deep={deep}, overwrite={overwrite})",
            incoming.len()
        );
        match self.namespaces.get_mut(namespace) {
            None => {
                self.namespaces
                    .insert(namespace.to_string(), Node::Branch(incoming));
            }
            Some(existing) if deep => existing.merge_from(Node::Branch(incoming), overwrite),
            Some(Node::Branch(children)) => children.extend(incoming),
            Some(slot) => *slot = Node::Branch(incoming),
        }
        Ok(())
    }

    /// Root branch of a namespace, if loaded.
    pub fn namespace(&self, namespace: &str) -> Option<&Node> {
        self.namespaces.get(namespace)
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Loaded namespace names in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }
}

fn branch_from_map(
    map: &Map<String, Value>,
    path: &str,
) -> Result<BTreeMap<String, Node>, SchemaError> {
    let mut children = BTreeMap::new();
    for (key, value) in map {
        let child_path = join_path(path, key);
        children.insert(key.clone(), Node::from_value(value, &child_path)?);
    }
    Ok(children)
}

/// Namespace-qualified location used in error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.contains(':') {
        format!("{prefix}.{key}")
    } else {
        format!("{prefix}:{key}")
    }
}

fn invalid_node(path: &str, message: &str) -> SchemaError {
    SchemaError::InvalidNode {
        path: path.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn builds_nested_namespaces() {
        let schema = ResourceSchema::from_value(json!({
            "common": { "title": "Hi", "menu": { "open": "Open" }, "days": ["Mon", "Tue"] },
            "admin": {}
        }))
        .expect("schema");
        assert_eq!(schema.namespaces().collect::<Vec<_>>(), vec!["admin", "common"]);
        let common = schema.namespace("common").expect("common");
        assert_eq!(
            common.get_path(["menu", "open"]).and_then(Node::as_text),
            Some("Open")
        );
        assert_eq!(
            common.child("days"),
            Some(&Node::List(vec!["Mon".into(), "Tue".into()]))
        );
        assert_eq!(common.get_path(["title", "nested"]), None);
        assert_eq!(schema.language(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn rejects_non_string_scalars_with_location() {
        let err = ResourceSchema::from_value(json!({ "common": { "menu": { "count": 3 } } }))
            .unwrap_err();
        assert_eq!(
            format!("{err}"),
            "invalid resources at common:menu.count: expected string, array or object"
        );

        let err = ResourceSchema::from_value(json!({ "common": { "days": ["Mon", null] } }))
            .unwrap_err();
        assert!(format!("{err}").contains("common:days[1]"));

        let err = ResourceSchema::from_value(json!({ "common": "flat" })).unwrap_err();
        assert!(format!("{err}").contains("namespace root must be an object"));
    }

    #[test]
    fn shallow_bundle_replaces_top_level_entries() {
        let mut schema = ResourceSchema::new();
        schema
            .add_bundle("ns", json!({ "a": { "x": "1", "y": "2" }, "b": "keep" }), false, false)
            .expect("first");
        schema
            .add_bundle("ns", json!({ "a": { "x": "9" } }), false, false)
            .expect("second");
        let ns = schema.namespace("ns").expect("ns");
        assert_eq!(ns.get_path(["a", "x"]).and_then(Node::as_text), Some("9"));
        assert_eq!(ns.get_path(["a", "y"]), None);
        assert_eq!(ns.child("b").and_then(Node::as_text), Some("keep"));
    }

    #[test]
    fn deep_bundle_merges_and_respects_overwrite() {
        let mut schema = ResourceSchema::new().with_language("en");
        schema
            .add_bundle("ns", json!({ "a": { "x": "1", "y": "2" } }), false, false)
            .expect("first");
        schema
            .add_bundle("ns", json!({ "a": { "x": "9", "z": "3" } }), true, false)
            .expect("keep");
        let ns = schema.namespace("ns").expect("ns");
        assert_eq!(ns.get_path(["a", "x"]).and_then(Node::as_text), Some("1"));
        assert_eq!(ns.get_path(["a", "z"]).and_then(Node::as_text), Some("3"));

        schema
            .add_bundle("ns", json!({ "a": { "x": "9" } }), true, true)
            .expect("overwrite");
        let ns = schema.namespace("ns").expect("ns");
        assert_eq!(ns.get_path(["a", "x"]).and_then(Node::as_text), Some("9"));
        assert_eq!(ns.get_path(["a", "y"]).and_then(Node::as_text), Some("2"));
        assert_eq!(schema.language(), "en");
    }

    #[test]
    fn parses_json5_documents() {
        let schema = ResourceSchema::from_json5_str("{ common: { hello: 'Hello {{name}}', } }")
            .expect("schema");
        assert!(schema.contains_namespace("common"));
        assert!(ResourceSchema::from_json5_str("{ common: ").is_err());
    }
}

//! Property-based invariant tests for key enumeration and resolution.
//!
//! 1. A flat namespace enumerates exactly its top-level keys
//! 2. Every enumerated key resolves to a string in the same namespace
//! 3. Stripping an appended context gives back the original key
//! 4. Extraction finds exactly the placeholder names, ignoring formats
//! 5. A dangling prefix never hides later placeholders
//! 6. Every key a lookup resolves is enumerated, in both key modes
//! 7. Every return-objects key resolves with return objects on
//! 8. Plural bases resolve to an enumerated suffixed key for their category

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use transkey_config::ResolverOptions;
use transkey_core::context::{append_context, strip_context};
use transkey_core::{
    Interpolator, KeyEngine, LookupOptions, LookupScope, PluralCategory, ResolvedValue,
    ResourceSchema,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// Segments over a tiny alphabet so random lookups often hit real keys.
fn short_segment() -> impl Strategy<Value = String> {
    "[a-c]{1,2}"
}

fn short_paths() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(short_segment(), 1..4), 0..12)
}

fn namespace_from(paths: &[Vec<String>]) -> Map<String, Value> {
    let mut namespace = Map::new();
    for path in paths {
        insert_path(&mut namespace, path, "leaf");
    }
    namespace
}

fn engine_over(namespace: Map<String, Value>) -> KeyEngine {
    let mut root = Map::new();
    root.insert("translation".to_string(), Value::Object(namespace));
    let schema = ResourceSchema::from_value(Value::Object(root)).expect("schema");
    KeyEngine::new(ResolverOptions::default(), Some(schema)).expect("engine")
}

/// Insert `value` at `path`, skipping paths that collide with an existing leaf.
fn insert_path(target: &mut Map<String, Value>, path: &[String], value: &str) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        target
            .entry(head.clone())
            .or_insert_with(|| Value::String(value.to_string()));
        return;
    }
    let child = target
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(child) = child {
        insert_path(child, rest, value);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Flat namespaces enumerate their keys
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flat_namespace_enumerates_its_keys(keys in prop::collection::btree_set(segment(), 0..12)) {
        let namespace: Map<String, Value> = keys
            .iter()
            .map(|key| (key.clone(), Value::String(format!("value of {key}"))))
            .collect();
        let engine = engine_over(namespace);
        let enumerated = engine.enumerate_keys("translation", false);
        prop_assert_eq!(enumerated.keys(), Some(&keys));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Enumeration and resolution agree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn enumerated_keys_resolve_to_strings(
        paths in prop::collection::vec(prop::collection::vec(segment(), 1..4), 1..10)
    ) {
        let mut namespace = Map::new();
        for path in &paths {
            insert_path(&mut namespace, path, "leaf");
        }
        let engine = engine_over(namespace);
        let keys = engine.enumerate_keys("translation", false);
        let keys = keys.keys().expect("closed set");
        prop_assert!(!keys.is_empty());

        let scope = LookupScope::new();
        for key in keys {
            let resolution = engine
                .lookup(&scope, &[key.as_str()], &LookupOptions::new())
                .map_err(|err| TestCaseError::fail(format!("{key}: {err}")))?;
            prop_assert_eq!(resolution.value, ResolvedValue::Text("leaf".to_string()));
            prop_assert_eq!(resolution.used_ns.as_str(), "translation");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Context round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn context_strip_undoes_append(key in "[a-z]{1,10}", context in "[a-z]{0,6}") {
        let appended = append_context(&key, Some(&context), "_");
        prop_assert_eq!(strip_context(&appended, Some(&context), "_"), Some(key));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Extraction finds every placeholder name
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn extraction_finds_placeholder_names(
        names in prop::collection::vec(segment(), 0..6),
        format in prop::option::of("[a-z]{1,6}"),
    ) {
        let text = names
            .iter()
            .map(|name| match &format {
                Some(format) => format!("see {{{{ {name}, {format} }}}}"),
                None => format!("see {{{{{name}}}}}"),
            })
            .collect::<Vec<_>>()
            .join(" and ");
        let expected: BTreeSet<String> = names.into_iter().collect();
        let interpolator = Interpolator::new("{{", "}}");
        prop_assert_eq!(interpolator.extract_parameters(&text), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Unterminated tokens are skipped
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dangling_prefix_keeps_later_names(dangling in segment(), name in segment()) {
        let interpolator = Interpolator::new("{{", "}}");
        let text = format!("{{{{{dangling} then {{{{{name}}}}}");
        let found = interpolator.extract_parameters(&text);
        prop_assert!(found.contains(&name), "{} missing from {:?}", name, found);
        prop_assert!(!found.contains(&dangling) || dangling == name);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Resolution implies enumeration
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolved_keys_are_enumerated(
        paths in short_paths(),
        lookups in prop::collection::vec(prop::collection::vec(short_segment(), 1..4), 1..16),
        return_objects in any::<bool>(),
    ) {
        let engine = engine_over(namespace_from(&paths));
        let enumerated = engine.enumerate_keys("translation", return_objects);
        let scope = LookupScope::new();
        let options = LookupOptions::new().return_objects(return_objects);

        for path in &lookups {
            let key = path.join(".");
            let Ok(resolution) = engine.lookup(&scope, &[key.as_str()], &options) else {
                prop_assert!(!enumerated.contains(&key), "{} enumerated but not resolvable", key);
                continue;
            };
            prop_assert!(
                enumerated.contains(&resolution.exact_used_key),
                "{} resolved but not enumerated",
                key
            );
            prop_assert!(enumerated.contains(&resolution.used_key));
            prop_assert!(engine.is_valid_key(&scope, &key, &options));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Return-objects enumeration resolves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn object_keys_resolve_with_return_objects(paths in short_paths()) {
        let engine = engine_over(namespace_from(&paths));
        let keys = engine.enumerate_keys("translation", true);
        let keys = keys.keys().expect("closed set");
        let leaves = engine.enumerate_keys("translation", false);

        let scope = LookupScope::new();
        let options = LookupOptions::new().return_objects(true);
        for key in keys {
            let resolution = engine
                .lookup(&scope, &[key.as_str()], &options)
                .map_err(|err| TestCaseError::fail(format!("{key}: {err}")))?;
            prop_assert_eq!(&resolution.exact_used_key, key);
            let is_text = matches!(resolution.value, ResolvedValue::Text(_));
            prop_assert_eq!(is_text, leaves.contains(key), "{}", key);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Plural bases
// ═════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PluralForm {
    Bare,
    Cardinal(PluralCategory),
    Ordinal(PluralCategory),
}

impl PluralForm {
    fn key(self, base: &str) -> String {
        match self {
            PluralForm::Bare => base.to_string(),
            PluralForm::Cardinal(category) => format!("{base}_{category}"),
            PluralForm::Ordinal(category) => format!("{base}_ordinal_{category}"),
        }
    }

    fn category(self) -> Option<PluralCategory> {
        match self {
            PluralForm::Bare => None,
            PluralForm::Cardinal(category) | PluralForm::Ordinal(category) => Some(category),
        }
    }
}

fn plural_category() -> impl Strategy<Value = PluralCategory> {
    prop::sample::select(PluralCategory::ALL.to_vec())
}

fn plural_form() -> impl Strategy<Value = PluralForm> {
    prop_oneof![
        Just(PluralForm::Bare),
        plural_category().prop_map(PluralForm::Cardinal),
        plural_category().prop_map(PluralForm::Ordinal),
    ]
}

proptest! {
    #[test]
    fn plural_bases_resolve_for_their_category(
        leaves in prop::collection::vec(("[a-c]{1,3}", plural_form()), 1..10)
    ) {
        let namespace: Map<String, Value> = leaves
            .iter()
            .map(|(base, form)| (form.key(base), Value::String(format!("{base} text"))))
            .collect();
        let engine = engine_over(namespace);
        let enumerated = engine.enumerate_keys("translation", false);
        let scope = LookupScope::new();

        for (base, form) in &leaves {
            prop_assert!(enumerated.contains(base), "base {} not enumerated", base);
            let Some(category) = form.category() else {
                continue;
            };
            let options = LookupOptions::new().plural(category);
            let resolution = engine
                .lookup(&scope, &[base.as_str()], &options)
                .map_err(|err| TestCaseError::fail(format!("{base} ({category}): {err}")))?;
            prop_assert_eq!(resolution.used_key.as_str(), base.as_str());
            prop_assert!(enumerated.contains(&resolution.exact_used_key));

            let ordinal = PluralForm::Ordinal(category).key(base);
            let cardinal = PluralForm::Cardinal(category).key(base);
            let expected = if enumerated.contains(&ordinal) { ordinal } else { cardinal };
            prop_assert_eq!(resolution.exact_used_key, expected);
        }
    }
}

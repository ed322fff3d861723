use serde_json::json;
use transkey_config::ResolverOptions;
use transkey_core::{KeyEngine, ResourceSchema};

/// Resources exercising nesting, plurals, ordinals, context and arrays.
///
/// Namespaces: `translation` (default), `common` (fallback material) and
/// `admin` (only reachable by qualification or explicit selection).
pub fn sample_resources() -> ResourceSchema {
    let value = json!({
        "translation": {
            "title": "Welcome",
            "greeting": "Hello {{name}}, you have {{count, number}} items",
            "settings": {
                "theme": "Theme: {{theme}}",
                "font": { "size": "Size {{size}}" }
            },
            "item": "item",
            "item_one": "{{count}} item",
            "item_other": "{{count}} items",
            "place_ordinal_one": "{{count}}st place",
            "place_ordinal_two": "{{count}}nd place",
            "place_ordinal_few": "{{count}}rd place",
            "place_ordinal_other": "{{count}}th place",
            "friend": "A friend",
            "friend_male": "A boyfriend",
            "friend_male_one": "{{count}} boyfriend",
            "friend_female": "A girlfriend",
            "weekdays": ["Mon", "Tue", "Wed"]
        },
        "common": {
            "save": "Save",
            "cancel": "Cancel",
            "shared": { "ok": "OK" }
        },
        "admin": {
            "title": "Admin {{user}}",
            "save": "Store"
        }
    });
    match ResourceSchema::from_value(value) {
        Ok(schema) => schema.with_language("en"),
        Err(err) => panic!("sample resources are valid: {err}"),
    }
}

/// Engine over `sample_resources()` with the given options.
pub fn engine_with(options: ResolverOptions) -> KeyEngine {
    match KeyEngine::new(options, Some(sample_resources())) {
        Ok(engine) => engine,
        Err(err) => panic!("test options are valid: {err}"),
    }
}

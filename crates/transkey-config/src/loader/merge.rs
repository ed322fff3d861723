//! Layer folding for option documents.

use serde_json::Value;

/// Fold `overlay` into `base`.
///
/// Only objects are merged key by key, so a later layer can change
/// `interpolationSuffix` without restating the prefix. Scalars and arrays
/// such as `fallbackNS: ["common"]` replace the earlier value outright.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    let (Value::Object(base_fields), Value::Object(overlay_fields)) = (&mut *base, overlay) else {
        *base = overlay.clone();
        return;
    };
    for (field, value) in overlay_fields {
        match base_fields.get_mut(field) {
            Some(existing) => merge_json_values(existing, value),
            None => {
                base_fields.insert(field.clone(), value.clone());
            }
        }
    }
}

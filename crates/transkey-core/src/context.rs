//! Context infix handling (`friend_male`, `friend_male_one`).
//!
//! An empty context behaves like no context at all.

/// Remove the first `separator + context` occurrence from `key`.
///
/// Returns the key unchanged when no context is given, and `None` when the
/// context is given but `key` does not contain it. Whatever follows the
/// token (for example a plural suffix) stays attached.
pub fn strip_context(key: &str, context: Option<&str>, separator: &str) -> Option<String> {
    let Some(context) = context.filter(|context| !context.is_empty()) else {
        return Some(key.to_string());
    };
    let token = format!("{separator}{context}");
    let start = key.find(&token)?;
    let mut stripped = String::with_capacity(key.len() - token.len());
    stripped.push_str(&key[..start]);
    stripped.push_str(&key[start + token.len()..]);
    Some(stripped)
}

/// Append `separator + context` to `key` when a context is given.
pub fn append_context(key: &str, context: Option<&str>, separator: &str) -> String {
    match context.filter(|context| !context.is_empty()) {
        Some(context) => format!("{key}{separator}{context}"),
        None => key.to_string(),
    }
}

//! De-duplicated warnings about unsupported constructs.
//!
//! Each unique `(component, message)` pair is logged once per process through
//! the `log` facade, at `warn` level with the component as the target. Parsing
//! the same document twice therefore does not repeat itself.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported construct (logs once per unique message).
///
/// # Example
/// ```
/// wren_common::warning::warn_once("html", "svg content is parsed without a namespace");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .map(|mut guard| guard.get_or_insert_with(HashSet::new).insert(key))
        .unwrap_or(true);

    if should_log {
        log::warn!(target: component, "{message}");
    }
}

/// Whether `(component, message)` has already been emitted.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .map(|guard| guard.as_ref().is_some_and(|set| set.contains(&key)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("test", "only once");
        assert!(was_warned("test", "only once"));
        assert!(!was_warned("test", "never sent"));
    }
}

//! De-duplicated engine warnings.
//!
//! Style sheets tend to repeat the same unsupported construct many times, so
//! each distinct `[component] message` pair is reported once. Output goes
//! through the [`log`] facade; the embedding application decides where it
//! ends up.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported construct (emitted once per unique message).
///
/// The record is logged at `warn` level with the target `sift`; the
/// component name leads the message text.
///
/// # Example
/// ```
/// sift_common::warning::warn_once("CSS", "unknown pseudo-class ':visited'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        log::warn!(target: "sift", "[{component}] {message}");
    }
}

/// Returns true if `warn_once` has already emitted this exact warning.
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when loading a new style sheet set)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("Test", "first message");
        assert!(has_warned("Test", "first message"));
        assert!(!has_warned("Test", "second message"));
    }

    #[test]
    fn test_same_message_different_component() {
        warn_once("A", "shared");
        assert!(has_warned("A", "shared"));
        assert!(!has_warned("B", "shared"));
    }
}

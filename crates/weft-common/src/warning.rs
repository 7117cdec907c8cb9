//! Once-only warnings for unsupported features.
//!
//! Deduplicates by component and message so a document that hits the same
//! gap thousands of times logs it once. Output goes through the `log`
//! facade at `warn` level under the `weft` target.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (logged once per unique message).
///
/// # Example
/// ```
/// weft_common::warn_once("CSS", "pseudo-element ::target-text is not supported");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    // A poisoned lock only means another thread panicked mid-insert; the set
    // itself is still usable.
    let mut guard = match WARNED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let should_log = guard.get_or_insert_with(HashSet::new).insert(key);

    if should_log {
        log::warn!(target: "weft", "[{component}] {message}");
    }
}

/// Whether `component`/`message` has already been reported.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let guard = match WARNED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.as_ref().is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call between unrelated parse sessions).
pub fn clear_warnings() {
    let mut guard = match WARNED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_warn_once_records_message() {
        warn_once("test", "unique message for dedup test");
        warn_once("test", "unique message for dedup test");
        assert!(was_warned("test", "unique message for dedup test"));
        assert!(!was_warned("test", "never emitted"));
    }
}

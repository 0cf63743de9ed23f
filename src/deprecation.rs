//! Reporting hook for deprecated call forms.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

use tracing::warn;

static REPORTED: LazyLock<Mutex<HashSet<&'static str>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// Report a deprecated feature once per process.
pub(crate) fn deprecation(feature: &'static str, instead: &str) {
    if let Ok(mut reported) = REPORTED.lock() {
        if !reported.insert(feature) {
            return;
        }
    }
    warn!(feature, "deprecated; {}", instead);
}

//! Target-framework compatibility
//!
//! Monikers are compared on their first four characters only, so versions
//! within one family (`net46`, `net48`) collapse into a single class. The
//! portable "standard" family is compatible with every requirement.

use crate::config::defaults::{FRAMEWORK_PREFIX_LEN, STANDARD_FRAMEWORK_PREFIX};

/// Compatibility class of a moniker
fn family(moniker: &str) -> &str {
    match moniker.char_indices().nth(FRAMEWORK_PREFIX_LEN) {
        Some((idx, _)) => &moniker[..idx],
        None => moniker,
    }
}

/// Whether any of `candidates` can be consumed by a project targeting `required`
pub fn is_compatible<S: AsRef<str>>(candidates: &[S], required: &str) -> bool {
    let required = family(required);
    candidates.iter().any(|moniker| {
        let candidate = family(moniker.as_ref());
        candidate == STANDARD_FRAMEWORK_PREFIX || candidate == required
    })
}

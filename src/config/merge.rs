//! Shallow merge of user config over defaults

use super::ConfigMapping;

/// Overlay `user` on `default`, top-level keys only.
///
/// Keys only in `default` survive unchanged, keys only in `user` are added, and keys in
/// both take the user's value. Nested tables and arrays are replaced wholesale.
pub fn merge(default: ConfigMapping, user: ConfigMapping) -> ConfigMapping {
    let mut merged = default;
    for (key, value) in user {
        if let Some(previous) = merged.get(&key) {
            if *previous != value {
                tracing::debug!(
                    "Merging config key {}: replacing {} with {}",
                    key,
                    previous,
                    value
                );
            }
        }
        merged.insert(key, value);
    }
    merged
}

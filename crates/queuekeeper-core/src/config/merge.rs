//! Configuration merging logic
//!
//! Combines the shared master config (lower priority) with an instance's
//! local config (higher priority) before validation.

use serde_json::Value;

/// Merge `overlay` on top of `base` (overlay takes precedence)
///
/// When merging:
/// - Objects merge key by key, recursively
/// - Arrays, scalars and `null` from the overlay replace the base value wholesale
/// - Keys only present in the base are kept
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

//! Machine-local overrides for OpenCode config files

use std::path::Path;

use serde_json::Value;
use synced_fs::{ConfigStore, NormalizedPath};

use crate::Result;

/// Load the overrides file if it exists.
pub fn load_overrides(path: &Path) -> Result<Option<Value>> {
    if !path.is_file() {
        return Ok(None);
    }
    let value: Value = ConfigStore::new().load(&NormalizedPath::new(path))?;
    Ok(Some(value))
}

/// Recursively merge `other` into `base`.
///
/// Objects merge key by key; any other value in `other` replaces the one
/// in `base`.
pub fn deep_merge(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Object(base_map), Value::Object(other_map)) => {
            for (key, other_val) in other_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge(base_val, other_val);
                } else {
                    base_map.insert(key.clone(), other_val.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

/// Remove override values from a local config before it is pushed.
///
/// A key whose local value still equals the override is restored to its
/// value in `base` (the copy already in the repository) or dropped when
/// `base` does not have it. Keys the user changed locally are kept.
pub fn strip_overrides(local: &Value, overrides: &Value, base: Option<&Value>) -> Value {
    let (Value::Object(local_map), Value::Object(override_map)) = (local, overrides) else {
        return local.clone();
    };
    let base_map = base.and_then(Value::as_object);

    let mut out = local_map.clone();
    for (key, override_val) in override_map {
        let Some(local_val) = local_map.get(key) else {
            continue;
        };
        let base_val = base_map.and_then(|map| map.get(key));

        if local_val.is_object() && override_val.is_object() {
            let stripped = strip_overrides(local_val, override_val, base_val);
            let now_empty = stripped.as_object().is_some_and(|m| m.is_empty());
            if now_empty && base_val.is_none() {
                out.remove(key);
            } else {
                out.insert(key.clone(), stripped);
            }
        } else if local_val == override_val {
            match base_val {
                Some(original) => {
                    out.insert(key.clone(), original.clone());
                }
                None => {
                    out.remove(key);
                }
            }
        }
    }

    Value::Object(out)
}

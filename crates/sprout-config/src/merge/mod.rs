//! Structural merging of JSON documents at a key path

use serde_json::{Map, Value};

/// Merge `patch` into `base`.
///
/// Objects merge key by key, recursively. Any other patch value replaces
/// the base value.
pub fn deep_merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, patch_value),
                    None => {
                        base_map.insert(key, patch_value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Merge `value` into `document` at the nested key `path`.
///
/// Missing intermediate objects are created, and a non-object found on
/// the way is replaced by an empty object. An empty path merges into the
/// document root.
pub fn merge_at_path(document: &mut Value, path: &[&str], value: Value) {
    let patch = path.iter().rev().fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.to_string(), inner);
        Value::Object(map)
    });
    deep_merge(document, patch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_objects() {
        let mut base = json!({ "a": { "x": 1, "y": 2 }, "b": "keep" });
        deep_merge(&mut base, json!({ "a": { "y": 3, "z": 4 } }));
        assert_eq!(base, json!({ "a": { "x": 1, "y": 3, "z": 4 }, "b": "keep" }));
    }

    #[test]
    fn test_deep_merge_replaces_scalars_and_arrays() {
        let mut base = json!({ "list": [1, 2], "n": 1 });
        deep_merge(&mut base, json!({ "list": [3], "n": { "nested": true } }));
        assert_eq!(base, json!({ "list": [3], "n": { "nested": true } }));
    }

    #[test]
    fn test_merge_at_path_creates_intermediates() {
        let mut document = json!({ "name": "app" });
        merge_at_path(&mut document, &["cljs", "dependencies", "org.example/lib"], json!("1.1.0"));
        assert_eq!(
            document,
            json!({ "name": "app", "cljs": { "dependencies": { "org.example/lib": "1.1.0" } } })
        );
    }

    #[test]
    fn test_merge_at_path_keeps_siblings() {
        let mut document = json!({
            "cljs": { "src": "src", "dependencies": { "reagent": "1.0.0", "re-frame": "1.3.0" } }
        });
        merge_at_path(&mut document, &["cljs", "dependencies"], json!({ "reagent": "1.2.0" }));
        assert_eq!(
            document,
            json!({ "cljs": { "src": "src", "dependencies": { "reagent": "1.2.0", "re-frame": "1.3.0" } } })
        );
    }

    #[test]
    fn test_merge_at_path_replaces_non_object() {
        let mut document = json!({ "cljs": "oops" });
        merge_at_path(&mut document, &["cljs", "main"], json!("app.core"));
        assert_eq!(document, json!({ "cljs": { "main": "app.core" } }));
    }

    #[test]
    fn test_merge_at_path_into_scalar_document() {
        let mut document = json!(null);
        merge_at_path(&mut document, &["cljs", "dependencies"], json!({ "reagent": "1.2.0" }));
        assert_eq!(document, json!({ "cljs": { "dependencies": { "reagent": "1.2.0" } } }));

        let mut document = json!({ "cljs": { "dependencies": [1, 2] } });
        merge_at_path(&mut document, &["cljs", "dependencies", "reagent"], json!("1.2.0"));
        assert_eq!(document, json!({ "cljs": { "dependencies": { "reagent": "1.2.0" } } }));
    }

    #[test]
    fn test_merge_at_empty_path() {
        let mut document = json!({ "a": 1 });
        merge_at_path(&mut document, &[], json!({ "b": 2 }));
        assert_eq!(document, json!({ "a": 1, "b": 2 }));
    }
}

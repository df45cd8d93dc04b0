//! Pointer resolution and persistent update operations.
//!
//! Array reference tokens are decimal indices; on insertion, `-` appends.
//! Tokens are unescaped per RFC 6901 (`~1` is `/`, `~0` is `~`).
use crate::value::{Leaf, is_empty};
use serde_json::{Map, Value};

/// The literal marker splitting a pointer into broadcast segments.
pub const WILDCARD: &str = "[i]";

/// Splits a pointer on the `[i]` broadcast marker. A pointer without the
/// marker yields a single segment; a trailing marker yields a trailing empty
/// segment (the whole element is addressed at that level).
pub fn split_on_wildcard(pointer: &str) -> Vec<&str> {
    pointer.split(WILDCARD).collect()
}

/// Resolves `pointer` against `doc`. Returns `None` when any segment is
/// missing; the empty pointer resolves to the whole document.
pub fn get_value(doc: &Value, pointer: &str) -> Option<Value> {
    resolve(doc, pointer).cloned()
}

/// Existence test. Empty documents (`null`, `{}`, `[]`) contain nothing.
pub fn contains_value(doc: &Value, pointer: &str) -> bool {
    !is_empty(doc) && resolve(doc, pointer).is_some()
}

/// Inserts `value` at `pointer`, returning the new document. Intermediate
/// segments must already exist; a structurally invalid insert (missing
/// parent, non-container target, out-of-range index) returns the document
/// unchanged. Inserting at the empty pointer replaces the root.
pub fn add(doc: &Value, pointer: &str, value: Value) -> Value {
    if pointer.is_empty() {
        return value;
    }
    // A scalar root cannot host children; operate on an object base.
    let empty = Value::Object(Map::new());
    let base = match doc {
        Value::Object(_) | Value::Array(_) => doc,
        _ => &empty,
    };
    add_at(base, &tokens(pointer), value).unwrap_or_else(|| doc.clone())
}

/// Replaces the value at `pointer` if present, otherwise behaves as [`add`].
/// The empty pointer replaces the root.
pub fn replace(doc: &Value, pointer: &str, value: Value) -> Value {
    if pointer.is_empty() {
        return value;
    }
    if !contains_value(doc, pointer) {
        return add(doc, pointer, value);
    }
    set_at(doc, &tokens(pointer), value).unwrap_or_else(|| doc.clone())
}

/// Removes the value at `pointer` if present; absent paths and the document
/// root are no-ops.
pub fn remove(doc: &Value, pointer: &str) -> Value {
    if pointer.is_empty() || !contains_value(doc, pointer) {
        return doc.clone();
    }
    remove_at(doc, &tokens(pointer)).unwrap_or_else(|| doc.clone())
}

/// Walks `pointer` segment by segment and materializes every missing
/// segment: empty objects for all but the last, and an empty object or array
/// for the last depending on `leaf`. Existing values are never overwritten,
/// which makes the operation idempotent and guarantees that a subsequent
/// [`add`]/[`replace`] at `pointer` succeeds on an arbitrarily sparse
/// document.
pub fn fix_path(doc: &Value, leaf: Leaf, pointer: &str) -> Value {
    let mut fields: Vec<&str> = pointer.split('/').collect();
    while fields.len() > 1 && fields.last() == Some(&"") {
        fields.pop();
    }
    let mut result = doc.clone();
    let mut path = String::new();
    for (i, field) in fields.iter().enumerate() {
        if !field.is_empty() {
            path.push('/');
            path.push_str(field);
        }
        if !contains_value(&result, &path) {
            let filler = if i < fields.len() - 1 || leaf == Leaf::Object {
                Value::Object(Map::new())
            } else {
                Value::Array(Vec::new())
            };
            result = add(&result, &path, filler);
        }
    }
    result
}

fn tokens(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn resolve<'a>(doc: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(doc);
    }
    let mut current = doc;
    for token in tokens(pointer) {
        current = match current {
            Value::Object(fields) => fields.get(&token)?,
            Value::Array(items) => items.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn add_at(current: &Value, toks: &[String], value: Value) -> Option<Value> {
    let (token, rest) = toks.split_first()?;
    match current {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            if rest.is_empty() {
                fields.insert(token.clone(), value);
            } else {
                let updated = add_at(fields.get(token)?, rest, value)?;
                fields.insert(token.clone(), updated);
            }
            Some(Value::Object(fields))
        }
        Value::Array(items) => {
            let mut items = items.clone();
            if rest.is_empty() {
                if token == "-" {
                    items.push(value);
                } else {
                    let index = token.parse::<usize>().ok()?;
                    if index > items.len() {
                        return None;
                    }
                    items.insert(index, value);
                }
            } else {
                let index = token.parse::<usize>().ok()?;
                let updated = add_at(items.get(index)?, rest, value)?;
                items[index] = updated;
            }
            Some(Value::Array(items))
        }
        _ => None,
    }
}

fn set_at(current: &Value, toks: &[String], value: Value) -> Option<Value> {
    let (token, rest) = toks.split_first()?;
    match current {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            let slot = fields.get(token)?;
            let updated = if rest.is_empty() { value } else { set_at(slot, rest, value)? };
            fields.insert(token.clone(), updated);
            Some(Value::Object(fields))
        }
        Value::Array(items) => {
            let index = token.parse::<usize>().ok()?;
            let mut items = items.clone();
            let slot = items.get(index)?;
            items[index] = if rest.is_empty() { value } else { set_at(slot, rest, value)? };
            Some(Value::Array(items))
        }
        _ => None,
    }
}

fn remove_at(current: &Value, toks: &[String]) -> Option<Value> {
    let (token, rest) = toks.split_first()?;
    match current {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            if rest.is_empty() {
                fields.shift_remove(token)?;
            } else {
                let updated = remove_at(fields.get(token)?, rest)?;
                fields.insert(token.clone(), updated);
            }
            Some(Value::Object(fields))
        }
        Value::Array(items) => {
            let index = token.parse::<usize>().ok()?;
            let mut items = items.clone();
            if rest.is_empty() {
                if index >= items.len() {
                    return None;
                }
                items.remove(index);
            } else {
                let updated = remove_at(items.get(index)?, rest)?;
                items[index] = updated;
            }
            Some(Value::Array(items))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escaped_tokens() {
        let doc = json!({ "a/b": 1, "c~d": 2 });
        assert_eq!(get_value(&doc, "/a~1b"), Some(json!(1)));
        assert_eq!(get_value(&doc, "/c~0d"), Some(json!(2)));
    }

    #[test]
    fn test_contains_value_on_empty_docs() {
        assert!(!contains_value(&json!({}), "/a"));
        assert!(!contains_value(&json!({}), ""));
        assert!(!contains_value(&json!(null), "/a"));
        assert!(contains_value(&json!({ "a": null }), "/a"));
    }

    #[test]
    fn test_add_into_array() {
        let doc = json!({ "a": [1, 3] });
        assert_eq!(add(&doc, "/a/1", json!(2)), json!({ "a": [1, 2, 3] }));
        assert_eq!(add(&doc, "/a/-", json!(4)), json!({ "a": [1, 3, 4] }));
        // out of range or non-numeric: unchanged
        assert_eq!(add(&doc, "/a/9", json!(0)), doc);
        assert_eq!(add(&doc, "/a/x", json!(0)), doc);
    }

    #[test]
    fn test_add_missing_parent_is_noop() {
        let doc = json!({ "a": 1 });
        assert_eq!(add(&doc, "/b/c", json!(2)), doc);
        // final segment under an existing object succeeds
        assert_eq!(add(&doc, "/b", json!(2)), json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_add_on_scalar_root_builds_object() {
        assert_eq!(add(&json!("x"), "/a", json!(1)), json!({ "a": 1 }));
    }

    #[test]
    fn test_replace_present_and_absent() {
        let doc = json!({ "a": { "b": 1 }, "c": [1, 2] });
        assert_eq!(
            replace(&doc, "/a/b", json!(9)),
            json!({ "a": { "b": 9 }, "c": [1, 2] })
        );
        assert_eq!(
            replace(&doc, "/c/1", json!(9)),
            json!({ "a": { "b": 1 }, "c": [1, 9] })
        );
        assert_eq!(
            replace(&doc, "/d", json!(9)),
            json!({ "a": { "b": 1 }, "c": [1, 2], "d": 9 })
        );
        assert_eq!(replace(&doc, "", json!(9)), json!(9));
    }

    #[test]
    fn test_remove() {
        let doc = json!({ "a": { "b": 1 }, "c": [1, 2] });
        assert_eq!(remove(&doc, "/a/b"), json!({ "a": {}, "c": [1, 2] }));
        assert_eq!(remove(&doc, "/c/0"), json!({ "a": { "b": 1 }, "c": [2] }));
        // absent path and root removal: unchanged
        assert_eq!(remove(&doc, "/x"), doc);
        assert_eq!(remove(&doc, ""), doc);
    }

    #[test]
    fn test_fix_path_leaf_kinds() {
        assert_eq!(
            fix_path(&json!({}), Leaf::Object, "/a/b"),
            json!({ "a": { "b": {} } })
        );
        assert_eq!(
            fix_path(&json!({}), Leaf::Array, "/a/b"),
            json!({ "a": { "b": [] } })
        );
        // root pointer materializes the leaf container itself
        assert_eq!(fix_path(&json!({}), Leaf::Array, ""), json!([]));
        assert_eq!(fix_path(&json!({}), Leaf::Object, ""), json!({}));
    }

    #[test]
    fn test_fix_path_never_overwrites() {
        let doc = json!({ "a": { "b": 7 } });
        assert_eq!(fix_path(&doc, Leaf::Array, "/a/b"), doc);
        let doc = json!({ "a": [1] });
        assert_eq!(fix_path(&doc, Leaf::Object, "/a"), doc);
    }

    #[test]
    fn test_fix_path_idempotent() {
        let doc = json!({ "x": 1 });
        let once = fix_path(&doc, Leaf::Array, "/a/b/c");
        let twice = fix_path(&once, Leaf::Array, "/a/b/c");
        assert_eq!(once, twice);
    }
}

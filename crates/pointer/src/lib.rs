//! Extended JSON Pointer utilities over `serde_json::Value`.
//!
//! This crate provides the document-access layer used by the transformation
//! engine: pointer resolution, containment tests, insert/replace/remove, and
//! path materialization (`fix_path`). Pointers follow RFC 6901 token syntax,
//! extended with the literal `[i]` broadcast marker which
//! [`split_on_wildcard`] turns into an ordered list of sub-pointers.
//!
//! Every mutating operation takes the document by reference and returns a new
//! root value; a structurally invalid operation returns the input unchanged
//! rather than failing.

pub mod ops;
pub mod value;

// --- Public API ---
pub use ops::{WILDCARD, add, contains_value, fix_path, get_value, remove, replace, split_on_wildcard};
pub use value::{Leaf, is_empty, values};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_value_nested() {
        let doc = json!({ "a": { "b": [ { "c": 1 } ] } });
        assert_eq!(get_value(&doc, "/a/b/0/c"), Some(json!(1)));
        assert_eq!(get_value(&doc, ""), Some(doc.clone()));
        assert_eq!(get_value(&doc, "/a/x"), None);
        assert_eq!(get_value(&doc, "/a/b/5"), None);
    }

    #[test]
    fn test_fix_path_then_replace_succeeds_on_sparse_doc() {
        let doc = json!({});
        let fixed = fix_path(&doc, Leaf::Array, "/a/b/items");
        assert_eq!(fixed, json!({ "a": { "b": { "items": [] } } }));
        let out = replace(&fixed, "/a/b/items", json!([1, 2]));
        assert_eq!(out, json!({ "a": { "b": { "items": [1, 2] } } }));
    }

    #[test]
    fn test_split_on_wildcard() {
        assert_eq!(split_on_wildcard("/a[i]/b"), vec!["/a", "/b"]);
        assert_eq!(split_on_wildcard("/a[i]"), vec!["/a", ""]);
        assert_eq!(split_on_wildcard("/plain"), vec!["/plain"]);
        assert_eq!(split_on_wildcard("/g[i]/v[i]"), vec!["/g", "/v", ""]);
    }
}

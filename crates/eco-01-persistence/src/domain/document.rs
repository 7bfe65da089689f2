//! # Document Shape
//!
//! Both backends store JSON objects with two mandatory fields:
//!
//! - `id`   - the entity id within its collection
//! - `rev`  - a monotonically increasing revision, bumped on every write
//!
//! `update` applies a shallow merge: each top-level field of the patch
//! replaces the stored field of the same name; fields absent from the patch
//! are left untouched. Nested objects are replaced wholesale, not merged.

use serde_json::Value;
use shared_types::{Collection, EcoError, EcoResult};

/// Extract the `id` field of a document.
#[must_use]
pub fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Extract the `rev` field of a document. Documents written before the
/// revision scheme read as revision 0.
#[must_use]
pub fn doc_rev(doc: &Value) -> u64 {
    doc.get("rev").and_then(Value::as_u64).unwrap_or(0)
}

/// Shallow-merge `patch` over `base`, in place.
///
/// Only object documents are merged; the `id` field of the base is never
/// replaced, and `rev` is managed by the store, not the patch.
pub fn shallow_merge(base: &mut Value, patch: &Value) {
    let (Some(base_map), Some(patch_map)) = (base.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, value) in patch_map {
        if key == "id" || key == "rev" {
            continue;
        }
        base_map.insert(key.clone(), value.clone());
    }
}

/// Validate that a document to be created is an object carrying an id.
pub fn require_valid_document(collection: Collection, doc: &Value) -> EcoResult<String> {
    if !doc.is_object() {
        return Err(EcoError::ValidationError(format!(
            "document for {collection} must be a JSON object"
        )));
    }
    match doc_id(doc) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(EcoError::ValidationError(format!(
            "document for {collection} is missing a non-empty id"
        ))),
    }
}
